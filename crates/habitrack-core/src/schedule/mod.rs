//! Weekly schedules for trackers.
//!
//! A schedule is a set of weekdays. Weeks start on Sunday, and each day
//! carries its 1-based number (Sunday = 1 ... Saturday = 7), which is what the
//! compact storage code in [`code`] is built from.

pub mod code;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use code::{code_to_days, days_to_code, schedule_contains};

/// Day of the week, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekDay {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl WeekDay {
    /// All days in slot order.
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Sunday,
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
    ];

    /// 1-based day number (Sunday = 1).
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    /// Weekday of a calendar date.
    pub fn of(day: NaiveDate) -> Self {
        day.weekday().into()
    }

    pub fn short_name(self) -> &'static str {
        match self {
            WeekDay::Sunday => "sun",
            WeekDay::Monday => "mon",
            WeekDay::Tuesday => "tue",
            WeekDay::Wednesday => "wed",
            WeekDay::Thursday => "thu",
            WeekDay::Friday => "fri",
            WeekDay::Saturday => "sat",
        }
    }
}

impl From<chrono::Weekday> for WeekDay {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => WeekDay::Sunday,
            chrono::Weekday::Mon => WeekDay::Monday,
            chrono::Weekday::Tue => WeekDay::Tuesday,
            chrono::Weekday::Wed => WeekDay::Wednesday,
            chrono::Weekday::Thu => WeekDay::Thursday,
            chrono::Weekday::Fri => WeekDay::Friday,
            chrono::Weekday::Sat => WeekDay::Saturday,
        }
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for WeekDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sun" | "sunday" => Ok(WeekDay::Sunday),
            "mon" | "monday" => Ok(WeekDay::Monday),
            "tue" | "tues" | "tuesday" => Ok(WeekDay::Tuesday),
            "wed" | "wednesday" => Ok(WeekDay::Wednesday),
            "thu" | "thurs" | "thursday" => Ok(WeekDay::Thursday),
            "fri" | "friday" => Ok(WeekDay::Friday),
            "sat" | "saturday" => Ok(WeekDay::Saturday),
            _ => Err(ValidationError::UnknownWeekday(s.to_string())),
        }
    }
}

/// Set of weekdays a tracker is due on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule(BTreeSet<WeekDay>);

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn every_day() -> Self {
        WeekDay::ALL.into_iter().collect()
    }

    pub fn contains(&self, day: WeekDay) -> bool {
        self.0.contains(&day)
    }

    /// Whether the schedule is due on the weekday of `date`.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.contains(WeekDay::of(date))
    }

    pub fn insert(&mut self, day: WeekDay) -> bool {
        self.0.insert(day)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = WeekDay> + '_ {
        self.0.iter().copied()
    }

    /// Parse a comma-separated list such as `"mon,wed,fri"`.
    ///
    /// `"all"` (or `"daily"`) yields every day.
    pub fn parse_list(list: &str) -> Result<Self, ValidationError> {
        match list.trim().to_lowercase().as_str() {
            "all" | "daily" => return Ok(Self::every_day()),
            _ => {}
        }
        list.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(WeekDay::from_str)
            .collect()
    }
}

impl FromIterator<WeekDay> for Schedule {
    fn from_iter<I: IntoIterator<Item = WeekDay>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(WeekDay::short_name).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_numbers_are_sunday_first() {
        assert_eq!(WeekDay::Sunday.number(), 1);
        assert_eq!(WeekDay::Saturday.number(), 7);
        assert_eq!(WeekDay::from_number(2), Some(WeekDay::Monday));
        assert_eq!(WeekDay::from_number(0), None);
        assert_eq!(WeekDay::from_number(8), None);
    }

    #[test]
    fn weekday_of_date() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(WeekDay::of(monday), WeekDay::Monday);
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(WeekDay::of(sunday), WeekDay::Sunday);
    }

    #[test]
    fn parse_list_accepts_names_and_all() {
        let schedule = Schedule::parse_list("Mon, wednesday").unwrap();
        assert_eq!(schedule.len(), 2);
        assert!(schedule.contains(WeekDay::Monday));
        assert!(schedule.contains(WeekDay::Wednesday));

        assert_eq!(Schedule::parse_list("all").unwrap(), Schedule::every_day());
        assert_eq!(
            Schedule::parse_list("mon,funday"),
            Err(ValidationError::UnknownWeekday("funday".to_string()))
        );
    }

    #[test]
    fn schedule_display_is_ordered() {
        let schedule: Schedule = [WeekDay::Friday, WeekDay::Monday].into_iter().collect();
        assert_eq!(schedule.to_string(), "mon,fri");
    }

    #[test]
    fn schedule_serializes_as_list() {
        let schedule: Schedule = [WeekDay::Tuesday].into_iter().collect();
        assert_eq!(serde_json::to_string(&schedule).unwrap(), r#"["tuesday"]"#);
    }
}
