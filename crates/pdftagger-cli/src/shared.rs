use std::fs;
use std::path::Path;

use pdftagger::{
    DefaultHierarchy, Document, PageData, PatternStore, StoreProfile, TagError, TextPrimitive,
    WordGroupOptions,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// One page of renderer output, as read from a pages JSON file.
#[derive(Debug, serde::Deserialize)]
pub struct PageInput {
    pub page_number: usize,
    #[serde(default)]
    pub primitives: Vec<TextPrimitive>,
}

/// Read and parse a JSON file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is missing,
/// unreadable or not valid JSON for `T`.
pub fn read_json<T: DeserializeOwned>(file: &Path, what: &str) -> Result<T, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    let text = fs::read_to_string(file).map_err(|e| {
        eprintln!("Error: failed to read {what}: {e}");
        1
    })?;
    serde_json::from_str(&text).map_err(|e| {
        eprintln!("Error: failed to parse {what}: {e}");
        1
    })
}

pub fn load_pages(file: &Path) -> Result<Vec<PageInput>, i32> {
    read_json(file, "pages")
}

/// Load a pages file and reconstruct it. The file stem becomes the document id.
pub fn load_document(file: &Path, options: &WordGroupOptions) -> Result<Document, i32> {
    let pages = load_pages(file)?;
    let document = Document::new(
        pages
            .iter()
            .map(|p| PageData::from_primitives(p.page_number, &p.primitives, options))
            .collect(),
    );
    Ok(match file.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => document.with_doc_id(stem),
        None => document,
    })
}

pub fn load_store(file: &Path) -> Result<PatternStore, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    let profile = StoreProfile::from_path(file).map_err(|e| {
        match e {
            TagError::Io(e) => eprintln!("Error: failed to read pattern store: {e}"),
            e => eprintln!("Error: failed to parse pattern store: {e}"),
        }
        1
    })?;
    Ok(PatternStore::from_profile(profile, &DefaultHierarchy::default()))
}

/// Write a store back as a profile, keeping records it could not load.
pub fn write_store(file: &Path, store: &PatternStore) -> Result<(), i32> {
    store.to_profile().write_to_path(file).map_err(|e| {
        eprintln!("Error: failed to write {}: {e}", file.display());
        1
    })
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, i32> {
    serde_json::to_string(value).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })
}

/// Escape a string for CSV output.
///
/// If the text contains commas, double quotes, or newlines, wraps it in
/// double quotes and escapes any internal double quotes by doubling them.
pub fn csv_escape(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
