//! # Date header values
//!
//! The Date header uses the RFC 1123 form of the Internet Message Format
//! date, always in GMT:
//!
//! ```text
//! Date: Sat, 13 Nov 2010 23:29:00 GMT
//! ```
//!
//! Decoding accepts anything RFC 2822 allows, including numeric zones, and
//! normalizes to UTC. Encoding always writes the GMT form.
//!
//! ```rust
//! use rvoip_sip_wire::types::date::DateCategory;
//! use chrono::{TimeZone, Utc};
//!
//! let date = DateCategory::parse(b"Sat, 13 Nov 2010 23:29:00 GMT").unwrap();
//! assert_eq!(date.value, Utc.with_ymd_and_hms(2010, 11, 13, 23, 29, 0).unwrap());
//! assert_eq!(date.to_string(), "Sat, 13 Nov 2010 23:29:00 GMT");
//! ```

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::DecodeError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DateCategory {
    pub value: DateTime<Utc>,
}

impl DateCategory {
    pub fn new(value: DateTime<Utc>) -> Self {
        DateCategory { value }
    }

    pub fn now() -> Self {
        DateCategory::new(Utc::now())
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let text = std::str::from_utf8(text)
            .map_err(|e| DecodeError::new("Date", format!("invalid UTF-8: {}", e)))?;
        DateTime::parse_from_rfc2822(text.trim())
            .map(|dt| DateCategory::new(dt.with_timezone(&Utc)))
            .map_err(|e| DecodeError::new("Date", format!("'{}': {}", text, e)))
    }
}

impl fmt::Display for DateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.format("%a, %d %b %Y %H:%M:%S GMT"))
    }
}
