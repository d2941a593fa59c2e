mod check_cmd;
mod cli;
mod extract_cmd;
mod page_range;
mod patterns_cmd;
mod shared;
mod words_cmd;

use clap::Parser;
use cli::{Cli, Commands};
use pdftagger::{ExtractOptions, WordGroupOptions};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Words {
            ref file,
            ref pages,
            ref format,
            word_gap,
            line_tolerance,
            split_on_style,
            lines,
        } => {
            let layout = layout_options(word_gap, line_tolerance, split_on_style);
            words_cmd::run(file, pages.as_deref(), format, &layout, lines)
        }
        Commands::Extract {
            ref store,
            ref file,
            min_common,
            word_gap,
            line_tolerance,
            split_on_style,
            policy,
            ref format,
        } => {
            let options = ExtractOptions {
                min_rectangle_common: min_common,
                hit_policy: policy.into(),
            };
            let layout = layout_options(word_gap, line_tolerance, split_on_style);
            extract_cmd::run(store, file, &options, &layout, format)
        }
        Commands::Check {
            ref store,
            ref file,
            ref known,
            ref write_store,
            min_common,
            word_gap,
            line_tolerance,
            split_on_style,
            ref format,
        } => {
            let options = ExtractOptions {
                min_rectangle_common: min_common,
                ..ExtractOptions::default()
            };
            let layout = layout_options(word_gap, line_tolerance, split_on_style);
            check_cmd::run(store, file, known, write_store.as_deref(), &options, &layout, format)
        }
        Commands::Patterns {
            ref store,
            kind,
            ref field,
            ref format,
        } => patterns_cmd::run(store, kind, field, format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

fn layout_options(word_gap: f64, line_tolerance: f64, split_on_style: bool) -> WordGroupOptions {
    WordGroupOptions {
        word_gap_factor: word_gap,
        line_tolerance,
        split_on_style_change: split_on_style,
        ..WordGroupOptions::default()
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
