//! Section-scoped reader for the `[Calls]` block of a MicroSIP INI
//!
//! Data lines look like
//! `key=phone;display name;direction;epoch;duration;status[;...]`.
//! Whitespace is dropped from the whole line before splitting, so field
//! values come out without spaces. Anything that cannot be decoded is skipped; a missing file or a read
//! error simply ends with whatever was collected so far.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, Local};

use super::{CallRecord, Direction};
use crate::phone;

/// Section holding call history (compared case-insensitively)
const TARGET_SECTION: &str = "calls";

/// phone, display name, direction, epoch, duration, status
const MIN_FIELDS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Outside,
    InsideTarget,
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Header(&'a str),
    Data,
    Other,
}

/// Read every call record from the INI at `path`.
///
/// A missing file is not an error: it means there is no history yet.
pub fn parse_call_log(path: &Path) -> Vec<CallRecord> {
    if !path.exists() {
        tracing::debug!("Call log not found at {:?}, skipping history", path);
        return Vec::new();
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Failed to open call log {:?}: {}", path, e);
            return Vec::new();
        }
    };

    tracing::debug!("Found call log at {:?}, reading", path);
    parse_reader(BufReader::new(file))
}

/// Scan `reader` line by line and decode the first `[Calls]` section.
///
/// Bytes that are not valid UTF-8 are replaced, never fatal.
pub fn parse_reader<R: BufRead>(mut reader: R) -> Vec<CallRecord> {
    let mut calls = Vec::new();
    let mut section = Section::Outside;
    let mut raw_seen = 0usize;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Stopped reading call log early: {}", e);
                break;
            }
        }

        let line = String::from_utf8_lossy(&buf);
        let compacted = compact(&line);

        match (section, classify(&compacted)) {
            (_, LineKind::Blank) => {}
            (_, LineKind::Header(name)) if name.eq_ignore_ascii_case(TARGET_SECTION) => {
                section = Section::InsideTarget;
            }
            // The calls block is contiguous; the next header ends it
            (Section::InsideTarget, LineKind::Header(_)) => break,
            (Section::InsideTarget, LineKind::Data) => {
                let Some(payload) = extract_payload(&compacted) else {
                    continue;
                };
                raw_seen += 1;
                match decode_payload(payload) {
                    Some(record) => calls.push(record),
                    None => tracing::trace!("Skipping malformed call entry: {}", payload),
                }
            }
            (Section::InsideTarget, LineKind::Other) | (Section::Outside, _) => {}
        }
    }

    tracing::info!("Parsed {} calls total (raw seen {})", calls.len(), raw_seen);
    calls
}

/// Drop control characters and all whitespace
fn compact(line: &str) -> String {
    line.chars()
        .filter(|c| !c.is_ascii_control() && !c.is_whitespace())
        .collect()
}

fn classify(compacted: &str) -> LineKind<'_> {
    if compacted.is_empty() {
        return LineKind::Blank;
    }
    if compacted.len() >= 2 && compacted.starts_with('[') && compacted.ends_with(']') {
        return LineKind::Header(&compacted[1..compacted.len() - 1]);
    }
    if compacted.contains('=') {
        return LineKind::Data;
    }
    LineKind::Other
}

/// Value side of a compacted `key=value` line, or None for empty and `null` entries
fn extract_payload(compacted: &str) -> Option<&str> {
    let (_, value) = compacted.split_once('=')?;
    if value.is_empty() || value.eq_ignore_ascii_case("null") {
        return None;
    }
    Some(value)
}

fn decode_payload(payload: &str) -> Option<CallRecord> {
    let fields: Vec<&str> = payload.split(';').collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let phone = phone::normalize(fields[0]);
    if phone.is_empty() {
        return None;
    }
    let timestamp = parse_epoch(fields[3])?;

    Some(CallRecord {
        phone,
        display_name: fields[1].to_string(),
        direction: Direction::from_code(fields[2].trim()),
        timestamp,
        duration_raw: fields[4].to_string(),
        status: fields[5].trim().to_string(),
    })
}

/// Unix seconds, tolerating stray formatting between the digits
fn parse_epoch(raw: &str) -> Option<DateTime<Local>> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let secs: i64 = digits.parse().ok()?;
    DateTime::from_timestamp(secs, 0).map(|utc| utc.with_timezone(&Local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> Vec<CallRecord> {
        parse_reader(content.as_bytes())
    }

    #[test]
    fn test_parse_valid_entries() {
        let content = "[Settings]\n\
                       volume=80\n\
                       [Calls]\n\
                       0=2104848484;Maria;2;1723458000;00:01:23;Answered\n\
                       1=+30 210 484 8484;Maria P;0;1723458900;00:00:10;Canceled by caller\n";
        let calls = parse(content);

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].phone, "2104848484");
        assert_eq!(calls[0].display_name, "Maria");
        assert_eq!(calls[0].direction, Direction::Incoming);
        assert_eq!(calls[0].timestamp.timestamp(), 1_723_458_000);
        assert_eq!(calls[0].duration_raw, "00:01:23");
        assert_eq!(calls[0].status, "Answered");

        assert_eq!(calls[1].phone, "302104848484");
        assert_eq!(calls[1].display_name, "MariaP");
        assert_eq!(calls[1].direction, Direction::Outgoing);
        assert_eq!(calls[1].status, "Canceledbycaller");
    }

    #[test]
    fn test_phone_is_normalized_raw() {
        for raw in ["(210) 484-8484", "210.484.8484", "sip:2104848484"] {
            let content = format!("[Calls]\nx={};;2;1723458000;0;ok\n", raw);
            let calls = parse(&content);
            assert_eq!(calls.len(), 1, "raw: {}", raw);
            assert_eq!(calls[0].phone, phone::normalize(raw));
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let calls = parse_call_log(&tmp.path().join("microsip.ini"));
        assert!(calls.is_empty());
    }

    #[test]
    fn test_parse_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("microsip.ini");
        std::fs::write(
            &path,
            "[Calls]\r\n0=2104848484;Maria;3;1723458000;00:00:00;Busy Here\r\n",
        )
        .unwrap();

        let calls = parse_call_log(&path);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].direction, Direction::Missed);
        assert_eq!(calls[0].status, "BusyHere");
    }

    #[test]
    fn test_next_section_stops_collection() {
        let content = "[Calls]\n\
                       0=2104848484;Maria;2;1723458000;00:01:23;Answered\n\
                       [Other]\n\
                       1=2104848484;Maria;2;1723458000;00:01:23;Answered\n\
                       [Calls]\n\
                       2=2104848484;Maria;2;1723458000;00:01:23;Answered\n";
        assert_eq!(parse(content).len(), 1);
    }

    #[test]
    fn test_repeated_calls_header_keeps_scanning() {
        let content = "[Calls]\n\
                       0=2104848484;Maria;2;1723458000;00:01:23;Answered\n\
                       [Calls]\n\
                       1=2105551234;Nikos;0;1723458900;00:00:10;Busy\n\
                       [Settings]\n\
                       2=2104848484;Maria;2;1723458000;00:01:23;Answered\n";
        let calls = parse(content);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].phone, "2105551234");
    }

    #[test]
    fn test_fields_come_from_compacted_line() {
        let content = "[Calls]\n0 = 210 484 8484 ; Maria P ; 2 ; 1723458000 ; 00:01:23 ; Request Timeout\n";
        let calls = parse(content);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].phone, "2104848484");
        assert_eq!(calls[0].display_name, "MariaP");
        assert_eq!(calls[0].direction, Direction::Incoming);
        assert_eq!(calls[0].duration_raw, "00:01:23");
        assert_eq!(calls[0].status, "RequestTimeout");
    }

    #[test]
    fn test_lines_outside_calls_ignored() {
        let content = "[Settings]\n\
                       0=2104848484;Maria;2;1723458000;00:01:23;Answered\n\
                       [Contacts]\n\
                       1=2104848484;Maria;2;1723458000;00:01:23;Answered\n";
        assert!(parse(content).is_empty());
    }

    #[test]
    fn test_header_tolerates_case_and_noise() {
        let content = "  [ cAlLs ]\t\r\n0=2104848484;Maria;2;1723458000;00:01:23;Answered\r\n";
        assert_eq!(parse(content).len(), 1);
    }

    #[test]
    fn test_null_and_empty_payloads_skipped() {
        let content = "[Calls]\n\
                       0=\n\
                       1=NULL\n\
                       2 = null \n\
                       3=2104848484;Maria;2;1723458000;00:01:23;Answered\n";
        assert_eq!(parse(content).len(), 1);
    }

    #[test]
    fn test_short_entries_skipped() {
        let content = "[Calls]\n\
                       0=2104848484;Maria;2;1723458000;00:01:23\n\
                       1=garbage\n\
                       no separator here\n\
                       2=2104848484;Maria;2;1723458000;00:01:23;Answered;extra;fields\n";
        let calls = parse(content);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].status, "Answered");
    }

    #[test]
    fn test_bad_epochs_skipped() {
        let content = "[Calls]\n\
                       0=2104848484;Maria;2;;00:01:23;Answered\n\
                       1=2104848484;Maria;2;never;00:01:23;Answered\n\
                       2=2104848484;Maria;2;99999999999999999999999;00:01:23;Answered\n\
                       3=2104848484;Maria;2;9223372036854775807;00:01:23;Answered\n";
        assert!(parse(content).is_empty());
    }

    #[test]
    fn test_epoch_with_stray_formatting() {
        let content = "[Calls]\n0=2104848484;Maria;2;1,723,458,000;00:01:23;Answered\n";
        let calls = parse(content);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].timestamp.timestamp(), 1_723_458_000);
    }

    #[test]
    fn test_entries_without_digits_in_phone_skipped() {
        let content = "[Calls]\n0=anonymous;Hidden;2;1723458000;00:00:05;Answered\n";
        assert!(parse(content).is_empty());
    }

    #[test]
    fn test_invalid_utf8_tolerated() {
        let mut content = b"[Calls]\n0=2104848484;Mar\xffia;2;1723458000;00:01:23;Answered\n".to_vec();
        content.extend_from_slice(b"1=2105551234;\xfe;0;1723458000;00:00:01;Busy\n");
        let calls = parse_reader(content.as_slice());
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].phone, "2105551234");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("[Calls]"), LineKind::Header("Calls"));
        assert_eq!(classify("[]"), LineKind::Header(""));
        assert_eq!(classify("a=b"), LineKind::Data);
        assert_eq!(classify("["), LineKind::Other);
        assert_eq!(classify(";comment"), LineKind::Other);
    }
}
