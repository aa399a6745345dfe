use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Normalization of timestamps to the calendar date they fall on.
///
/// Every day that enters a record store goes through this, so two timestamps
/// on the same date always compare equal.
pub trait IntoCalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl IntoCalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl IntoCalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

/// Uses the date in the timestamp's own time zone.
impl<Tz: TimeZone> IntoCalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: IntoCalendarDay + ?Sized> IntoCalendarDay for &T {
    fn calendar_day(&self) -> NaiveDate {
        (**self).calendar_day()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn datetime_uses_local_date_of_its_zone() {
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let late = tz.with_ymd_and_hms(2024, 5, 10, 23, 30, 0).unwrap();
        assert_eq!(late.calendar_day(), NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());

        let utc = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 1).unwrap();
        assert_eq!(utc.calendar_day(), NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
    }
}
