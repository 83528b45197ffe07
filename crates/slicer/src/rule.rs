use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SlicerError;

/// Item selection rule: keep every Nth item of the upstream feed.
///
/// An item at zero-based position `i` survives iff `i % rule == 0`, so a
/// rule of 1 keeps everything and a rule of 3 keeps positions 0, 3, 6, …
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rule(u32);

impl Rule {
    /// Validate a raw rule value. Zero, negatives, and values beyond u32
    /// range are rejected rather than coerced.
    pub fn new(raw: i64) -> crate::Result<Self> {
        if raw < 1 || raw > i64::from(u32::MAX) {
            return Err(SlicerError::InvalidRule(raw));
        }
        Ok(Self(raw as u32))
    }

    /// The identity rule: every item survives.
    pub fn identity() -> Self {
        Self(1)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Whether the item at the given zero-based position survives.
    pub fn keeps(self, index: usize) -> bool {
        index % self.0 as usize == 0
    }
}

impl TryFrom<i64> for Rule {
    type Error = SlicerError;

    fn try_from(raw: i64) -> crate::Result<Self> {
        Self::new(raw)
    }
}

impl From<Rule> for i64 {
    fn from(rule: Rule) -> i64 {
        i64::from(rule.0)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
