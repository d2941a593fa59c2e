use std::path::Path;

use pdftagger::{ExtractOptions, ExtractionResult, Hit, WordGroupOptions};

use crate::cli::ReportFormat;
use crate::shared::{load_document, load_store, to_json};

pub fn run(
    store: &Path,
    file: &Path,
    options: &ExtractOptions,
    layout: &WordGroupOptions,
    format: &ReportFormat,
) -> Result<(), i32> {
    let store = load_store(store)?.with_options(*options);
    let document = load_document(file, layout)?;
    let result = store.extract(&document);

    match format {
        ReportFormat::Text => {
            write_hits_text(&result);
            println!();
            write_values_text(&result, options);
            Ok(())
        }
        ReportFormat::Json => {
            let json = serde_json::json!({
                "doc_id": result.doc_id,
                "hits": result.hits.iter().map(hit_json).collect::<Vec<_>>(),
                "values": values_json(&result, options),
            });
            println!("{}", to_json(&json)?);
            Ok(())
        }
    }
}

fn write_hits_text(result: &ExtractionResult) {
    println!("page\tfield\tsource\tvalue\tmatched");
    for hit in &result.hits {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            hit.page_number,
            hit.field(),
            hit.pattern.source_kind(),
            hit.value,
            hit.matched_text,
        );
    }
}

fn write_values_text(result: &ExtractionResult, options: &ExtractOptions) {
    println!("field\tvalue");
    for (field, value) in result.best_values(options.hit_policy) {
        println!("{field}\t{value}");
    }
}

pub fn hit_json(hit: &Hit) -> serde_json::Value {
    serde_json::json!({
        "page": hit.page_number,
        "field": hit.field(),
        "source": hit.pattern.source_kind().as_str(),
        "pattern_index": hit.pattern_index,
        "type": hit.value.field_type().as_str(),
        "value": hit.value.to_string(),
        "matched": hit.matched_text,
    })
}

fn values_json(result: &ExtractionResult, options: &ExtractOptions) -> serde_json::Value {
    result
        .best_values(options.hit_policy)
        .into_iter()
        .map(|(field, value)| (field, serde_json::Value::String(value.to_string())))
        .collect::<serde_json::Map<_, _>>()
        .into()
}
