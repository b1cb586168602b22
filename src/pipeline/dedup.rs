use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PageDeduplicator {
    seen: HashMap<String, u32>,
}

impl PageDeduplicator {
    /// Records `sha256` for `page_number`. Returns the earlier page carrying the
    /// same bytes, if any; the first sighting is kept.
    pub fn first_seen(&mut self, sha256: &str, page_number: u32) -> Option<u32> {
        if let Some(first) = self.seen.get(sha256) {
            return Some(*first);
        }
        self.seen.insert(sha256.to_string(), page_number);
        None
    }

    pub fn distinct(&self) -> usize {
        self.seen.len()
    }
}
