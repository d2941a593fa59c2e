use std::collections::BTreeMap;

use crate::pattern::Pattern;

/// Page number to pattern indices, rebuilt for every extraction call.
///
/// Patterns flagged `is_last_page` are eligible on every page regardless of
/// their recorded page number.
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    by_page: BTreeMap<usize, Vec<usize>>,
    every_page: Vec<usize>,
}

impl PageIndex {
    pub fn build(patterns: &[Pattern]) -> Self {
        let mut index = PageIndex::default();
        for (i, pattern) in patterns.iter().enumerate() {
            if pattern.is_last_page() {
                index.every_page.push(i);
            } else {
                index.by_page.entry(pattern.page_number()).or_default().push(i);
            }
        }
        index
    }

    /// Indices of the patterns eligible on `page_number`, in store order.
    pub fn for_page(&self, page_number: usize) -> Vec<usize> {
        let own = self.by_page.get(&page_number).map(Vec::as_slice).unwrap_or_default();
        let mut merged = Vec::with_capacity(own.len() + self.every_page.len());
        let (mut a, mut b) = (own.iter().peekable(), self.every_page.iter().peekable());
        loop {
            let next = match (a.peek(), b.peek()) {
                (Some(x), Some(y)) if x < y => a.next(),
                (Some(_), Some(_)) => b.next(),
                (Some(_), None) => a.next(),
                (None, Some(_)) => b.next(),
                (None, None) => break,
            };
            merged.extend(next.copied());
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.by_page.is_empty() && self.every_page.is_empty()
    }
}
