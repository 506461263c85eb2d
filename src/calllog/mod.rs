//! Call history records read from a MicroSIP-style INI file
//!
//! The INI mixes several sections; only `[Calls]` carries history. See
//! [`parser`] for the line format.

pub mod parser;

use chrono::{DateTime, Local};
use serde::Serialize;

pub use parser::parse_call_log;

/// Call direction, decoded from the numeric code in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Direction {
    Outgoing,
    Incoming,
    Missed,
    Other,
}

impl Direction {
    /// Fixed display order used by renderers
    pub const DISPLAY_ORDER: [Direction; 4] = [
        Direction::Outgoing,
        Direction::Incoming,
        Direction::Missed,
        Direction::Other,
    ];

    /// Map a raw log code: `0` outgoing, `2` incoming, `3` missed, anything else other
    pub fn from_code(code: &str) -> Self {
        match code {
            "0" => Direction::Outgoing,
            "2" => Direction::Incoming,
            "3" => Direction::Missed,
            _ => Direction::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Outgoing => "Outgoing",
            Direction::Incoming => "Incoming",
            Direction::Missed => "Missed",
            Direction::Other => "Other",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One historical call
///
/// Only constructed by the parser, so `phone` is always a non-empty digit
/// string and `timestamp` always a valid instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// Canonical digits of the remote party
    pub phone: String,
    /// Name as recorded minus whitespace, may be empty
    pub display_name: String,
    pub direction: Direction,
    /// When the call happened, in local time
    pub timestamp: DateTime<Local>,
    /// Duration exactly as written in the log
    pub duration_raw: String,
    /// Outcome label as recorded, with whitespace removed
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_codes() {
        assert_eq!(Direction::from_code("0"), Direction::Outgoing);
        assert_eq!(Direction::from_code("2"), Direction::Incoming);
        assert_eq!(Direction::from_code("3"), Direction::Missed);
        for code in ["1", "", "00", "x", "4"] {
            assert_eq!(Direction::from_code(code), Direction::Other, "code: {:?}", code);
        }
    }

    #[test]
    fn test_display_order() {
        let labels: Vec<_> = Direction::DISPLAY_ORDER.iter().map(|d| d.label()).collect();
        assert_eq!(labels, ["Outgoing", "Incoming", "Missed", "Other"]);
    }
}
