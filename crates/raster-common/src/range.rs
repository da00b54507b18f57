//! Value ranges with independently open or closed bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A numeric interval used by range membership tests and range replacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub lower: f32,
    pub upper: f32,
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
}

impl ValueRange {
    pub fn new(lower: f32, upper: f32, lower_inclusive: bool, upper_inclusive: bool) -> Self {
        Self {
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
        }
    }

    /// `[lower, upper]`
    pub fn inclusive(lower: f32, upper: f32) -> Self {
        Self::new(lower, upper, true, true)
    }

    /// `(lower, upper)`
    pub fn exclusive(lower: f32, upper: f32) -> Self {
        Self::new(lower, upper, false, false)
    }

    /// Membership test. NaN is never inside a range.
    pub fn contains(&self, value: f32) -> bool {
        let above = if self.lower_inclusive {
            value >= self.lower
        } else {
            value > self.lower
        };
        let below = if self.upper_inclusive {
            value <= self.upper
        } else {
            value < self.upper
        };
        above && below
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lower_inclusive { '[' } else { '(' };
        let close = if self.upper_inclusive { ']' } else { ')' };
        write!(f, "{}{}, {}{}", open, self.lower, self.upper, close)
    }
}

/// Parse interval notation such as `"[0, 10)"`.
impl FromStr for ValueRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let lower_inclusive = match chars.next() {
            Some('[') => true,
            Some('(') => false,
            _ => return Err(RangeParseError::InvalidFormat(s.to_string())),
        };
        let upper_inclusive = match chars.next_back() {
            Some(']') => true,
            Some(')') => false,
            _ => return Err(RangeParseError::InvalidFormat(s.to_string())),
        };

        let inner = chars.as_str();
        let (lower, upper) = inner
            .split_once(',')
            .ok_or_else(|| RangeParseError::InvalidFormat(s.to_string()))?;
        let lower: f32 = lower
            .trim()
            .parse()
            .map_err(|_| RangeParseError::InvalidNumber(lower.trim().to_string()))?;
        let upper: f32 = upper
            .trim()
            .parse()
            .map_err(|_| RangeParseError::InvalidNumber(upper.trim().to_string()))?;

        if upper < lower {
            return Err(RangeParseError::Inverted(s.to_string()));
        }

        Ok(Self::new(lower, upper, lower_inclusive, upper_inclusive))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RangeParseError {
    #[error("Invalid range format: {0}. Expected e.g. '[0, 10)'")]
    InvalidFormat(String),

    #[error("Invalid number in range: {0}")]
    InvalidNumber(String),

    #[error("Range bounds are inverted: {0}")]
    Inverted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_flags() {
        let half_open = ValueRange::new(0.0, 10.0, true, false);
        assert!(half_open.contains(0.0));
        assert!(half_open.contains(9.99));
        assert!(!half_open.contains(10.0));

        let closed = ValueRange::inclusive(0.0, 10.0);
        assert!(closed.contains(10.0));

        let open = ValueRange::exclusive(0.0, 10.0);
        assert!(!open.contains(0.0));
        assert!(!open.contains(f32::NAN));
    }

    #[test]
    fn test_parse_interval_notation() {
        let range: ValueRange = "(1.5, 3]".parse().unwrap();
        assert_eq!(range, ValueRange::new(1.5, 3.0, false, true));
        assert_eq!(range.to_string(), "(1.5, 3]");

        assert!("1, 3".parse::<ValueRange>().is_err());
        assert!("[a, 3]".parse::<ValueRange>().is_err());
        assert!("[5, 3]".parse::<ValueRange>().is_err());
    }
}
