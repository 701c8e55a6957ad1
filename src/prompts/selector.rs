//! Deterministic daily prompt rotation.

use chrono::{Datelike, NaiveDate};

/// Reflection questions, in rotation order
pub const PROMPTS: [&str; 8] = [
    "What decision did you make today?",
    "What friction did you encounter?",
    "What was a win today?",
    "What idea is on your mind?",
    "What question needs answering?",
    "What unfinished business is nagging at you?",
    "How are you feeling right now?",
    "What pattern have you noticed?",
];

/// Rotation index for a date. January 1st is index 0.
pub fn prompt_index(date: NaiveDate) -> usize {
    // ordinal0() is the zero-based day of the year
    date.ordinal0() as usize % PROMPTS.len()
}

/// The reflection question for a calendar date
pub fn select_prompt(date: NaiveDate) -> &'static str {
    PROMPTS[prompt_index(date)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_jan_first_is_index_zero_every_year() {
        for year in [1999, 2000, 2024, 2025, 2026, 2100] {
            assert_eq!(prompt_index(ymd(year, 1, 1)), 0);
            assert_eq!(select_prompt(ymd(year, 1, 1)), PROMPTS[0]);
        }
    }

    #[test]
    fn test_rotation_advances_one_per_day_and_wraps() {
        assert_eq!(prompt_index(ymd(2026, 1, 2)), 1);
        assert_eq!(prompt_index(ymd(2026, 1, 8)), 7);
        assert_eq!(prompt_index(ymd(2026, 1, 9)), 0);
        // Feb 1 is day 32 → ordinal0 31 → 31 % 8
        assert_eq!(prompt_index(ymd(2026, 2, 1)), 7);
    }

    #[test]
    fn test_same_date_same_question() {
        let d = ymd(2026, 10, 15);
        assert_eq!(select_prompt(d), select_prompt(d));
    }

    #[test]
    fn test_leap_year_shifts_after_february() {
        // Mar 1 is ordinal0 60 in a leap year, 59 otherwise
        assert_eq!(prompt_index(ymd(2024, 3, 1)), 60 % 8);
        assert_eq!(prompt_index(ymd(2025, 3, 1)), 59 % 8);
    }

    #[test]
    fn test_dec_31_of_leap_year() {
        assert_eq!(prompt_index(ymd(2024, 12, 31)), 365 % 8);
    }
}
