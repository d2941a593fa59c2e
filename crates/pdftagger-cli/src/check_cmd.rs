use std::path::Path;

use pdftagger::{ExtractOptions, KnownValues, Pattern, PatternRecord, WordGroupOptions};

use crate::cli::ReportFormat;
use crate::extract_cmd::hit_json;
use crate::shared::{load_document, load_store, read_json, to_json, write_store};

pub fn run(
    store_path: &Path,
    file: &Path,
    known: &Path,
    write_store_to: Option<&Path>,
    options: &ExtractOptions,
    layout: &WordGroupOptions,
    format: &ReportFormat,
) -> Result<(), i32> {
    let mut store = load_store(store_path)?.with_options(*options);
    let document = load_document(file, layout)?;
    let known: KnownValues = read_json(known, "known values")?;

    let check = store.check_against_known_values(&document, &known);

    match format {
        ReportFormat::Text => {
            println!("field\tsource\tmatches\terrors\tregex");
            for pattern in &check.error_patterns {
                print_pattern(pattern);
            }
        }
        ReportFormat::Json => {
            let records: Vec<PatternRecord> =
                check.error_patterns.iter().map(PatternRecord::from).collect();
            let json = serde_json::json!({
                "doc_id": check.result.doc_id,
                "error_patterns": records,
                "hits": check.result.hits.iter().map(hit_json).collect::<Vec<_>>(),
            });
            println!("{}", to_json(&json)?);
        }
    }

    if let Some(path) = write_store_to {
        write_store(path, &store)?;
    }
    Ok(())
}

fn print_pattern(pattern: &Pattern) {
    println!(
        "{}\t{}\t{}\t{}\t{}",
        pattern.metadata_field(),
        pattern.source_kind(),
        pattern.matches_count(),
        pattern.errors_count(),
        pattern.regex(),
    );
}
