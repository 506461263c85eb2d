//! Reverse lookup of unknown numbers
//!
//! Only an offline provider ships; it returns canned directory-style
//! results so unknown-caller cards and the CSV log have something to show.

use serde::Serialize;

use crate::phone;

/// Maximum results kept per lookup
pub const MAX_RESULTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

impl SearchResult {
    fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

pub trait SearchProvider {
    /// Results mentioning `phone`, best first
    fn search(&self, phone: &str) -> Vec<SearchResult>;
}

/// Canned results, no network access
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSearch;

impl SearchProvider for OfflineSearch {
    fn search(&self, phone: &str) -> Vec<SearchResult> {
        let num = phone::normalize(phone);
        if num.is_empty() {
            return Vec::new();
        }

        tracing::debug!("Offline search for {}", num);
        vec![
            SearchResult::new(
                format!("{} Αρτοποιείο στο Ηράκλειο - στοιχεία επικοινωνίας", num),
                "https://example.com/heraklion-bakery",
            ),
            SearchResult::new(
                format!("Επιχειρηματικός κατάλογος: τηλ. {}", grouped(&num)),
                "https://example.com/business-directory",
            ),
            SearchResult::new(
                format!("Αναζήτηση τηλεφώνου ({}) - πιθανός πελάτης", num),
                "https://example.com/reverse-lookup",
            ),
        ]
    }
}

/// Ten-digit numbers as `XXX XXX XXXX`, anything else unchanged
fn grouped(num: &str) -> String {
    if num.len() == 10 {
        format!("{} {} {}", &num[..3], &num[3..6], &num[6..])
    } else {
        num.to_string()
    }
}
