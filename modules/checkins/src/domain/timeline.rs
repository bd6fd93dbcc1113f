use std::collections::HashSet;

use chrono::NaiveDate;

use crate::contract::model::TimelineDay;

/// Every calendar day from `created_on` through `today`, most recent first.
///
/// `check_in_dates` is treated as a set: order and duplicates do not matter.
/// A creation date after `today` collapses to a single entry for `today`.
pub fn build_timeline<I>(created_on: NaiveDate, check_in_dates: I, today: NaiveDate) -> Vec<TimelineDay>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let completed: HashSet<NaiveDate> = check_in_dates.into_iter().collect();
    let start = created_on.min(today);

    let mut days: Vec<TimelineDay> = start
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| TimelineDay {
            date,
            completed: completed.contains(&date),
        })
        .collect();
    days.reverse();
    days
}
