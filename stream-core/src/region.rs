//! AWS region resolution.
//!
//! Codes are checked by shape, not against a list, so regions launched later
//! are accepted: a two-letter area, one or more lowercase words, and a
//! number (`us-west-2`, `us-gov-east-1`, `eu-isoe-west-1`).

use crate::error::StartupError;
use std::fmt;
use std::str::FromStr;

/// A validated region code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region(String);

impl Region {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default Kinesis endpoint for this region.
    pub fn kinesis_endpoint(&self) -> String {
        let suffix = if self.0.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        };
        format!("https://kinesis.{}.{}", self.0, suffix)
    }
}

impl FromStr for Region {
    type Err = StartupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        if is_region_code(&code) {
            Ok(Region(code))
        } else {
            Err(StartupError::InvalidRegion(s.to_string()))
        }
    }
}

fn is_region_code(code: &str) -> bool {
    let parts: Vec<&str> = code.split('-').collect();
    if parts.len() < 3 {
        return false;
    }
    let (area, rest) = (parts[0], &parts[1..]);
    let (number, words) = match rest.split_last() {
        Some(split) => split,
        None => return false,
    };
    area.len() == 2
        && area.bytes().all(|b| b.is_ascii_lowercase())
        && !number.is_empty()
        && number.bytes().all(|b| b.is_ascii_digit())
        && words
            .iter()
            .all(|w| !w.is_empty() && w.bytes().all(|b| b.is_ascii_lowercase()))
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
