use std::path::Path;

use pdftagger::{TextRect, WordGroupOptions, WordGroupReconstructor, reconstruct_lines};

use crate::cli::OutputFormat;
use crate::page_range::parse_page_range;
use crate::shared::{PageInput, csv_escape, load_pages, to_json};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    options: &WordGroupOptions,
    lines: bool,
) -> Result<(), i32> {
    let mut inputs = load_pages(file)?;
    if let Some(range) = pages {
        let last_page = inputs.iter().map(|p| p.page_number).max().unwrap_or(0);
        let wanted = parse_page_range(range, last_page).map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?;
        inputs.retain(|p| wanted.contains(&p.page_number));
    }

    let groups: Vec<(usize, Vec<TextRect>)> = inputs
        .iter()
        .map(|page| (page.page_number, reconstruct_page(page, options, lines)))
        .collect();

    match format {
        OutputFormat::Text => write_text(&groups),
        OutputFormat::Json => write_json(&groups),
        OutputFormat::Csv => write_csv(&groups),
    }
}

fn reconstruct_page(page: &PageInput, options: &WordGroupOptions, lines: bool) -> Vec<TextRect> {
    if lines {
        reconstruct_lines(&page.primitives, options)
    } else {
        WordGroupReconstructor::reconstruct(&page.primitives, options)
    }
}

fn font_name(group: &TextRect) -> &str {
    group
        .style
        .as_ref()
        .and_then(|s| s.font_name.as_deref())
        .unwrap_or("")
}

fn write_text(groups: &[(usize, Vec<TextRect>)]) -> Result<(), i32> {
    println!("page\ttext\tllx\tlly\turx\tury\tfont");
    for (page, rects) in groups {
        for g in rects {
            println!(
                "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{}",
                page,
                g.text,
                g.rect.llx,
                g.rect.lly,
                g.rect.urx,
                g.rect.ury,
                font_name(g),
            );
        }
    }
    Ok(())
}

fn write_json(groups: &[(usize, Vec<TextRect>)]) -> Result<(), i32> {
    let all: Vec<serde_json::Value> = groups
        .iter()
        .flat_map(|(page, rects)| {
            rects.iter().map(move |g| {
                serde_json::json!({
                    "page": page,
                    "text": g.text,
                    "llx": g.rect.llx,
                    "lly": g.rect.lly,
                    "urx": g.rect.urx,
                    "ury": g.rect.ury,
                    "style": g.style,
                })
            })
        })
        .collect();
    println!("{}", to_json(&all)?);
    Ok(())
}

fn write_csv(groups: &[(usize, Vec<TextRect>)]) -> Result<(), i32> {
    println!("page,text,llx,lly,urx,ury");
    for (page, rects) in groups {
        for g in rects {
            println!(
                "{},{},{:.2},{:.2},{:.2},{:.2}",
                page,
                csv_escape(&g.text),
                g.rect.llx,
                g.rect.lly,
                g.rect.urx,
                g.rect.ury,
            );
        }
    }
    Ok(())
}
