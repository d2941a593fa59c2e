use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pdftagger::{HitPolicy, SourceKind};

/// Reconstruct word groups and run learned extraction patterns over rendered PDF pages.
#[derive(Debug, Parser)]
#[command(name = "pdftagger", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconstruct word groups (or lines) from rendered text primitives
    Words {
        /// Path to the pages JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Forward gap, in glyph widths, that starts a new word group (default: 1.0)
        #[arg(long, default_value_t = 1.0)]
        word_gap: f64,

        /// Maximum baseline difference for primitives on one line (default: 0.5)
        #[arg(long, default_value_t = 0.5)]
        line_tolerance: f64,

        /// Start a new word group whenever the style changes
        #[arg(long)]
        split_on_style: bool,

        /// Emit one rectangle per line instead of word groups
        #[arg(long)]
        lines: bool,
    },

    /// Run a pattern store against a document and print the hits
    Extract {
        /// Path to the pattern store JSON file
        #[arg(value_name = "STORE")]
        store: PathBuf,

        /// Path to the pages JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Minimum fraction of a candidate covered by a reference rectangle (default: 0.7)
        #[arg(long, default_value_t = 0.7)]
        min_common: f64,

        /// Forward gap, in glyph widths, that starts a new word group (default: 1.0)
        #[arg(long, default_value_t = 1.0)]
        word_gap: f64,

        /// Maximum baseline difference for primitives on one line (default: 0.5)
        #[arg(long, default_value_t = 0.5)]
        line_tolerance: f64,

        /// Start a new word group whenever the style changes
        #[arg(long)]
        split_on_style: bool,

        /// How to pick one value when a field has several hits
        #[arg(long, value_enum, default_value_t = PolicyArg::BestRanked)]
        policy: PolicyArg,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Check a store against known values and charge false positives
    Check {
        /// Path to the pattern store JSON file
        #[arg(value_name = "STORE")]
        store: PathBuf,

        /// Path to the pages JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to a JSON object mapping field names to correct values
        #[arg(value_name = "KNOWN")]
        known: PathBuf,

        /// Write the updated store to this path
        #[arg(long, value_name = "PATH")]
        write_store: Option<PathBuf>,

        /// Minimum fraction of a candidate covered by a reference rectangle (default: 0.7)
        #[arg(long, default_value_t = 0.7)]
        min_common: f64,

        /// Forward gap, in glyph widths, that starts a new word group (default: 1.0)
        #[arg(long, default_value_t = 1.0)]
        word_gap: f64,

        /// Maximum baseline difference for primitives on one line (default: 0.5)
        #[arg(long, default_value_t = 0.5)]
        line_tolerance: f64,

        /// Start a new word group whenever the style changes
        #[arg(long)]
        split_on_style: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// List the patterns of one source kind targeting one field
    Patterns {
        /// Path to the pattern store JSON file
        #[arg(value_name = "STORE")]
        store: PathBuf,

        /// Source kind (WordGroupsInfos, LinesInfos, PdfTextInfos, ColorFontWordGroupsInfos)
        #[arg(long, value_parser = parse_source_kind)]
        kind: SourceKind,

        /// Metadata field name
        #[arg(long)]
        field: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

/// Output format for reconstructed text.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Output format for store reports.
#[derive(Debug, Clone, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Hit policy as a command-line value.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    First,
    Last,
    BestRanked,
    MostFrequent,
}

impl From<PolicyArg> for HitPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::First => HitPolicy::First,
            PolicyArg::Last => HitPolicy::Last,
            PolicyArg::BestRanked => HitPolicy::BestRanked,
            PolicyArg::MostFrequent => HitPolicy::MostFrequent,
        }
    }
}

fn parse_source_kind(s: &str) -> Result<SourceKind, String> {
    s.parse().map_err(|e: pdftagger::TagError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn policy_arg_maps_to_hit_policy() {
        assert_eq!(HitPolicy::from(PolicyArg::MostFrequent), HitPolicy::MostFrequent);
        assert_eq!(HitPolicy::from(PolicyArg::BestRanked), HitPolicy::default());
    }

    #[test]
    fn source_kind_parser() {
        assert_eq!(parse_source_kind("LinesInfos"), Ok(SourceKind::Lines));
        assert_eq!(
            parse_source_kind("Lines"),
            Err("unknown source kind: Lines".to_string())
        );
    }

    #[test]
    fn parses_check_layout_flags() {
        let cli = Cli::try_parse_from([
            "pdftagger",
            "check",
            "store.json",
            "pages.json",
            "known.json",
            "--min-common",
            "0.9",
            "--word-gap",
            "2.5",
            "--line-tolerance",
            "1.0",
            "--split-on-style",
        ])
        .unwrap();
        match cli.command {
            Commands::Check {
                min_common,
                word_gap,
                line_tolerance,
                split_on_style,
                ..
            } => {
                assert_eq!(min_common, 0.9);
                assert_eq!(word_gap, 2.5);
                assert_eq!(line_tolerance, 1.0);
                assert!(split_on_style);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_extract_flags() {
        let cli = Cli::try_parse_from([
            "pdftagger",
            "extract",
            "store.json",
            "pages.json",
            "--min-common",
            "0.5",
            "--policy",
            "most-frequent",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract {
                min_common, policy, ..
            } => {
                assert_eq!(min_common, 0.5);
                assert!(matches!(policy, PolicyArg::MostFrequent));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
