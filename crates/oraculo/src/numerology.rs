//! Life path number: the digit sum of a birth date, reduced to one digit.

use crate::calendar::{self, CalendarError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single digit in 1..=9. Master numbers (11, 22, 33) are not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LifePathNumber(u8);

impl LifePathNumber {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for LifePathNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sum the decimal digits of `n` until a single digit remains.
pub fn reduce_to_digit(mut n: u32) -> u8 {
    while n > 9 {
        n = digit_sum(n);
    }
    n as u8
}

fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Life path number of a `YYYY-MM-DD` birth date.
///
/// Every digit of the date string is summed, then the total is reduced.
/// Empty input yields `Ok(None)`.
pub fn life_path_number(date: &str) -> Result<Option<LifePathNumber>, CalendarError> {
    if calendar::parse_optional(date)?.is_none() {
        return Ok(None);
    }

    let total: u32 = date.chars().filter_map(|c| c.to_digit(10)).sum();
    Ok(Some(LifePathNumber(reduce_to_digit(total))))
}
