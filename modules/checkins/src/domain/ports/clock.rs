use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

/// Source of "today" and of record timestamps for the ledger.
///
/// All arithmetic downstream works on calendar dates; instants are only stored.
pub trait Clock: Send + Sync {
    /// Current calendar date in the clock's zone.
    fn today(&self) -> NaiveDate;

    /// Current instant, used for `created_at` stamps.
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date of `instant` in the clock's zone.
    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate;
}

/// Device-local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&Local).date_naive()
    }
}

/// Clock pinned to a single date; instants are read in UTC and `now` is
/// midnight UTC of that date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.today.and_time(NaiveTime::MIN).and_utc()
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.date_naive()
    }
}
