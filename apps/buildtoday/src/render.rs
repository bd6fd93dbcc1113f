//! Plain-text views printed to stdout.

use std::fmt::Write;

use checkins::contract::model::{CheckInOutcome, TimelineDay, User, UserStatus};
use checkins::domain::dates::format_date;

const DONE: char = '●';
const MISSED: char = '○';

fn days(n: u32) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}

fn user_line(user: &User) -> String {
    match &user.email {
        Some(email) => format!("{} <{}>", user.id, email),
        None => user.id.to_string(),
    }
}

pub fn status(status: &UserStatus) -> String {
    let stats = &status.user.stats;
    let mut out = String::new();

    let _ = writeln!(out, "User:    {}", user_line(&status.user));
    let _ = writeln!(
        out,
        "Today:   {}  {}",
        format_date(status.today),
        if status.checked_in_today {
            "checked in"
        } else {
            "not checked in yet"
        }
    );
    let _ = writeln!(
        out,
        "Streak:  {} {} (best {})",
        stats.current_streak,
        days(stats.current_streak),
        stats.max_streak
    );
    match status.tier.next_threshold() {
        Some(next) => {
            let _ = writeln!(
                out,
                "Power:   {} · {} ({} to next tier)",
                stats.power,
                status.tier,
                next.saturating_sub(stats.power)
            );
        }
        None => {
            let _ = writeln!(out, "Power:   {} · {}", stats.power, status.tier);
        }
    }
    out
}

pub fn check_in(outcome: &CheckInOutcome) -> String {
    let stats = &outcome.user.stats;
    format!(
        "Checked in for {}. Streak: {} {}, power: {}.\n",
        format_date(outcome.check_in.date),
        stats.current_streak,
        days(stats.current_streak),
        stats.power
    )
}

/// One line per day, most recent first; `limit` keeps only the newest days.
pub fn timeline(days: &[TimelineDay], limit: Option<usize>) -> String {
    let shown = limit.unwrap_or(days.len()).min(days.len());
    let mut out = String::new();
    for day in &days[..shown] {
        let mark = if day.completed { DONE } else { MISSED };
        let _ = writeln!(out, "{} {}", mark, format_date(day.date));
    }
    let completed = days.iter().filter(|d| d.completed).count();
    let _ = writeln!(out, "{completed}/{} days completed", days.len());
    out
}
