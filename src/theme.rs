use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

/// A grammar topic that drives the day's prompt and challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyTheme {
    pub title: &'static str,
    pub category: &'static str,
}

const fn theme(title: &'static str, category: &'static str) -> DailyTheme {
    DailyTheme { title, category }
}

pub const DAILY_THEMES: [DailyTheme; 8] = [
    theme("Simple Past", "Simple Past"),
    theme("Present Continuous", "Present Continuous"),
    theme("Present Perfect", "Present Perfect"),
    theme("Simple Future", "Simple Future"),
    theme("Past Continuous", "Past Continuous"),
    theme("Prepositions of Place", "Prepositions"),
    theme("Past Perfect", "Past Perfect"),
    theme("Future Continuous", "Future Continuous"),
];

pub fn today_theme() -> DailyTheme {
    theme_for(Utc::now())
}

/// Picks the rotation entry for the UTC calendar day containing `now`.
///
/// Day 1 of the year (Jan 1) maps to the first theme, so every client sees
/// the same theme for the whole UTC day.
pub fn theme_for(now: DateTime<Utc>) -> DailyTheme {
    let day_of_year = now.ordinal() as usize;
    DAILY_THEMES[(day_of_year - 1) % DAILY_THEMES.len()]
}
