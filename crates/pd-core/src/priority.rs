//! Declared parcel priority.

use std::fmt;

use crate::ValidationError;

/// Customer-declared urgency, 1 (low) to 3 (urgent).
///
/// Only `Urgent` influences agent matching (it prefers Express riders); all
/// three levels feed the heap score and the quote multiplier.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum Priority {
    Low,
    Medium,
    Urgent,
}

impl Priority {
    /// Numeric level as declared by the customer (1, 2 or 3).
    #[inline]
    pub fn level(self) -> u8 {
        match self {
            Priority::Low    => 1,
            Priority::Medium => 2,
            Priority::Urgent => 3,
        }
    }

    #[inline]
    pub fn is_urgent(self) -> bool {
        matches!(self, Priority::Urgent)
    }
}

impl TryFrom<u8> for Priority {
    type Error = ValidationError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::Urgent),
            other => Err(ValidationError::Priority(other as i64)),
        }
    }
}

impl TryFrom<i64> for Priority {
    type Error = ValidationError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        u8::try_from(level)
            .map_err(|_| ValidationError::Priority(level))
            .and_then(Priority::try_from)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.level()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}
