use std::path::Path;

use pdftagger::{PatternRecord, SourceKind};

use crate::cli::ReportFormat;
use crate::shared::{load_store, to_json};

pub fn run(store: &Path, kind: SourceKind, field: &str, format: &ReportFormat) -> Result<(), i32> {
    let store = load_store(store)?;
    let found = store.find_patterns(kind, field);

    match format {
        ReportFormat::Text => {
            println!("page\tlast_page\tregex\tmatch_index\tmatches\terrors\tnet");
            for p in found {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    p.page_number(),
                    p.is_last_page(),
                    p.regex(),
                    p.match_index(),
                    p.matches_count(),
                    p.errors_count(),
                    p.net_score(),
                );
            }
        }
        ReportFormat::Json => {
            let records: Vec<PatternRecord> = found.into_iter().map(PatternRecord::from).collect();
            println!("{}", to_json(&records)?);
        }
    }
    Ok(())
}
