use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of "now" for anything that depends on the calendar day.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date the daily-submission window is keyed on.
    fn today(&self) -> NaiveDate;
}

/// Wall clock; days roll over at local midnight.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
