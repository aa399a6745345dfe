//! Compact textual schedule code.
//!
//! Seven characters, one slot per weekday in Sunday-first order. A slot holds
//! `'0'` when the day is absent and the day's 1-based number otherwise, so
//! `{Mon, Wed}` is stored as `"0204000"`.

use super::{Schedule, WeekDay};
use crate::error::ValidationError;

const SLOTS: usize = 7;

fn marker(day: WeekDay) -> char {
    char::from(b'0' + day.number())
}

/// Encode a schedule for storage.
pub fn days_to_code(days: &Schedule) -> String {
    WeekDay::ALL
        .iter()
        .map(|&day| if days.contains(day) { marker(day) } else { '0' })
        .collect()
}

/// Decode a stored schedule code.
///
/// # Errors
/// Returns `InvalidScheduleCode` if the code is not seven characters or a slot
/// holds anything other than `'0'` or its own day number.
pub fn code_to_days(code: &str) -> Result<Schedule, ValidationError> {
    let invalid = || ValidationError::InvalidScheduleCode(code.to_string());
    if code.chars().count() != SLOTS {
        return Err(invalid());
    }

    let mut days = Schedule::new();
    for (day, slot) in WeekDay::ALL.iter().zip(code.chars()) {
        match slot {
            '0' => {}
            c if c == marker(*day) => {
                days.insert(*day);
            }
            _ => return Err(invalid()),
        }
    }
    Ok(days)
}

/// Whether `code` marks `day` as scheduled, without decoding the whole code.
pub fn schedule_contains(code: &str, day: WeekDay) -> bool {
    let slot = usize::from(day.number()) - 1;
    code.chars().nth(slot) == Some(marker(day))
}
