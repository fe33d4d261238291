use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use shared::{EngineError, EngineResult, Weekday};
use std::collections::BTreeSet;

/// One annotated date of the target month.
#[derive(Debug, Clone, Serialize)]
pub struct DayInfo {
    pub date: NaiveDate,
    pub weekday: Weekday,
    /// Member of the externally provided public-holiday table.
    pub is_public_holiday: bool,
    /// Saturday, Sunday, or public holiday.
    pub is_holiday: bool,
    /// Holiday whose successor day is not a holiday. The successor may fall
    /// in the next month and is classified by the same rule.
    pub is_last_day_of_holiday_run: bool,
}

/// Ordered dates of one (year, month) with weekday and holiday
/// classification.
#[derive(Debug, Clone)]
pub struct MonthCalendar {
    year: i32,
    month: u32,
    days: Vec<DayInfo>,
    public_holidays: BTreeSet<NaiveDate>,
}

impl MonthCalendar {
    pub fn build(
        year: i32,
        month: u32,
        public_holidays: &BTreeSet<NaiveDate>,
    ) -> EngineResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            EngineError::Validation(format!("Invalid target month: {}-{:02}", year, month))
        })?;

        let mut days = Vec::new();
        let mut date = first;
        while date.month() == month {
            let is_public = public_holidays.contains(&date);
            let is_holiday = is_holiday_date(date, public_holidays);
            let next = date
                .succ_opt()
                .ok_or_else(|| EngineError::Validation(format!("Date overflow after {}", date)))?;
            days.push(DayInfo {
                date,
                weekday: Weekday::of(date),
                is_public_holiday: is_public,
                is_holiday,
                is_last_day_of_holiday_run: is_holiday && !is_holiday_date(next, public_holidays),
            });
            date = next;
        }

        Ok(Self {
            year,
            month,
            days,
            public_holidays: public_holidays.clone(),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month's dates in ascending order.
    pub fn days(&self) -> &[DayInfo] {
        &self.days
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days
            .first()
            .zip(self.days.last())
            .is_some_and(|(first, last)| first.date <= date && date <= last.date)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayInfo> {
        if !self.contains(date) {
            return None;
        }
        self.days.get(date.day0() as usize)
    }

    /// Holiday classification extended with per-hospital extra holiday
    /// dates. Works for dates beyond the month edge.
    pub fn is_holiday_with(&self, date: NaiveDate, extra: &BTreeSet<NaiveDate>) -> bool {
        extra.contains(&date) || is_holiday_date(date, &self.public_holidays)
    }

    /// Last-day-of-holiday-run classification under extra holiday dates.
    pub fn is_last_day_of_holiday_run_with(
        &self,
        date: NaiveDate,
        extra: &BTreeSet<NaiveDate>,
    ) -> bool {
        if !self.is_holiday_with(date, extra) {
            return false;
        }
        match date.succ_opt() {
            Some(next) => !self.is_holiday_with(next, extra),
            None => true,
        }
    }
}

fn is_holiday_date(date: NaiveDate, public_holidays: &BTreeSet<NaiveDate>) -> bool {
    Weekday::of(date).is_weekend() || public_holidays.contains(&date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_enumeration_is_complete_and_ordered() {
        let calendar = MonthCalendar::build(2025, 10, &BTreeSet::new()).unwrap();

        assert_eq!(calendar.days().len(), 31);
        assert_eq!(calendar.days()[0].date, ymd(2025, 10, 1));
        assert_eq!(calendar.days()[30].date, ymd(2025, 10, 31));
        assert!(calendar.days().windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        assert!(MonthCalendar::build(2025, 13, &BTreeSet::new()).is_err());
    }

    #[test]
    fn test_weekend_and_public_holiday_classification() {
        // 2025-10-13 is Sports Day in Japan, a Monday.
        let holidays: BTreeSet<_> = [ymd(2025, 10, 13)].into();
        let calendar = MonthCalendar::build(2025, 10, &holidays).unwrap();

        let saturday = calendar.day(ymd(2025, 10, 11)).unwrap();
        assert!(saturday.is_holiday);
        assert!(!saturday.is_public_holiday);

        let monday = calendar.day(ymd(2025, 10, 13)).unwrap();
        assert!(monday.is_holiday);
        assert!(monday.is_public_holiday);

        let tuesday = calendar.day(ymd(2025, 10, 14)).unwrap();
        assert!(!tuesday.is_holiday);
    }

    #[test]
    fn test_last_day_of_holiday_run() {
        // Sat 11, Sun 12, Mon 13 (public) form one run ending on the 13th.
        let holidays: BTreeSet<_> = [ymd(2025, 10, 13)].into();
        let calendar = MonthCalendar::build(2025, 10, &holidays).unwrap();

        assert!(!calendar.day(ymd(2025, 10, 11)).unwrap().is_last_day_of_holiday_run);
        assert!(!calendar.day(ymd(2025, 10, 12)).unwrap().is_last_day_of_holiday_run);
        assert!(calendar.day(ymd(2025, 10, 13)).unwrap().is_last_day_of_holiday_run);

        // A plain Sunday ends its own run.
        assert!(calendar.day(ymd(2025, 10, 5)).unwrap().is_last_day_of_holiday_run);
    }

    #[test]
    fn test_run_spanning_month_edge() {
        // 2025-08-31 is a Sunday; the run only ends there because 09-01 is
        // a Monday workday.
        let calendar = MonthCalendar::build(2025, 8, &BTreeSet::new()).unwrap();

        let saturday = calendar.day(ymd(2025, 8, 30)).unwrap();
        let sunday = calendar.day(ymd(2025, 8, 31)).unwrap();
        assert!(!saturday.is_last_day_of_holiday_run);
        assert!(sunday.is_last_day_of_holiday_run);
    }

    #[test]
    fn test_extra_holidays_extend_runs() {
        let holidays: BTreeSet<_> = [ymd(2025, 10, 13)].into();
        let calendar = MonthCalendar::build(2025, 10, &holidays).unwrap();

        // With the 14th marked as a hospital-local holiday, the run now
        // ends on the 14th instead of the 13th.
        let extra: BTreeSet<_> = [ymd(2025, 10, 14)].into();
        assert!(!calendar.is_last_day_of_holiday_run_with(ymd(2025, 10, 13), &extra));
        assert!(calendar.is_last_day_of_holiday_run_with(ymd(2025, 10, 14), &extra));
    }
}
