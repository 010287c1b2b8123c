//! Press number value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Highest press number on the shop floor.
pub const MAX_PRESS_NUMBER: i16 = 5;

/// Number of a press a tool can be mounted on (0 through 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct PressNumber(i16);

impl PressNumber {
    /// Creates a press number, rejecting values outside 0..=5.
    pub fn new(number: i16) -> Result<Self, ValidationError> {
        if !(0..=MAX_PRESS_NUMBER).contains(&number) {
            return Err(ValidationError::out_of_range(
                "press",
                0,
                i64::from(MAX_PRESS_NUMBER),
                i64::from(number),
            ));
        }
        Ok(Self(number))
    }

    pub fn as_i16(&self) -> i16 {
        self.0
    }
}

impl TryFrom<i16> for PressNumber {
    type Error = ValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PressNumber> for i16 {
    fn from(press: PressNumber) -> Self {
        press.0
    }
}

impl fmt::Display for PressNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
