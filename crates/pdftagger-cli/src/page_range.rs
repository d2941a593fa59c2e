/// Parse a page range string like "1,3-5" into a sorted list of page numbers.
///
/// Page numbers are 1-indexed on both sides. Returns an error for invalid
/// input (page 0, pages past `last_page`, malformed ranges).
pub fn parse_page_range(input: &str, last_page: usize) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_page(start)?, parse_page(end)?),
            None => {
                let page = parse_page(part)?;
                (page, page)
            }
        };
        if start > end {
            return Err(format!("invalid page range: '{part}'"));
        }
        if end > last_page {
            return Err(format!("page {end} exceeds last page ({last_page})"));
        }
        pages.extend(start..=end);
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn parse_page(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("page 0 is invalid (pages start at 1)".to_string()),
        Ok(page) => Ok(page),
        Err(_) => Err(format!("invalid page number: '{}'", s.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page() {
        assert_eq!(parse_page_range("1", 5).unwrap(), vec![1]);
        assert_eq!(parse_page_range("3", 5).unwrap(), vec![3]);
    }

    #[test]
    fn ranges_and_lists_are_merged() {
        assert_eq!(parse_page_range("2-4", 5).unwrap(), vec![2, 3, 4]);
        assert_eq!(parse_page_range("5, 1,2-3,3", 5).unwrap(), vec![1, 2, 3, 5]);
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(parse_page_range("0", 5).unwrap_err().contains("page 0"));
        assert!(parse_page_range("6", 5).unwrap_err().contains("exceeds"));
        assert!(parse_page_range("4-2", 5).unwrap_err().contains("invalid page range"));
        assert!(parse_page_range("a", 5).unwrap_err().contains("invalid page number"));
    }

    #[test]
    fn empty_parts_are_ignored() {
        assert_eq!(parse_page_range("1,,2,", 5).unwrap(), vec![1, 2]);
    }
}
