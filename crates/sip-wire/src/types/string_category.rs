use std::fmt;

use crate::error::DecodeError;

/// Free-form text value.
///
/// Subject, Server, User-Agent and Organization use it, as does every
/// header whose name is not recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringCategory {
    pub value: String,
}

impl StringCategory {
    pub fn new(value: impl Into<String>) -> Self {
        StringCategory { value: value.into() }
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let value = std::str::from_utf8(text)
            .map_err(|e| DecodeError::new("text", format!("invalid UTF-8: {}", e)))?;
        Ok(StringCategory::new(value))
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for StringCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
