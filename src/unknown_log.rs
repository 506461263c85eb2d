//! Append-only CSV log of calls from numbers not in the directory
//!
//! One row per lookup: timestamp, canonical phone, then three
//! title/url pairs (padded with empty cells).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::errors::Result;
use crate::phone;
use crate::search::{SearchResult, MAX_RESULTS};

const HEADER: [&str; 8] = [
    "timestamp", "phone", "title1", "url1", "title2", "url2", "title3", "url3",
];

/// UTF-8 byte order mark, written once so spreadsheet tools pick the encoding
const BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone)]
pub struct UnknownCallLog {
    path: PathBuf,
}

impl UnknownCallLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an unknown caller now
    pub fn append(&self, phone: &str, results: &[SearchResult]) -> Result<()> {
        self.append_at(phone, results, Local::now())
    }

    /// Record an unknown caller at `at`; writes the header if the file is new
    pub fn append_at(&self, phone: &str, results: &[SearchResult], at: DateTime<Local>) -> Result<()> {
        let is_new = !self.path.exists();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if is_new {
            file.write_all(BOM)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
        }
        writer.write_record(row(phone, results, at))?;
        writer.flush()?;

        tracing::info!("Logged unknown caller {} to {:?}", phone, self.path);
        Ok(())
    }
}

fn row(phone: &str, results: &[SearchResult], at: DateTime<Local>) -> Vec<String> {
    let mut row = Vec::with_capacity(HEADER.len());
    row.push(at.to_rfc3339());
    row.push(phone::normalize(phone));
    for i in 0..MAX_RESULTS {
        match results.get(i) {
            Some(r) => {
                row.push(r.title.clone());
                row.push(r.url.clone());
            }
            None => {
                row.push(String::new());
                row.push(String::new());
            }
        }
    }
    row
}
