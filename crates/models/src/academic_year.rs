use chrono::{Datelike, NaiveDate};

/// Semesters a student can be in, and that a course can be offered at
pub const MAX_SEMESTER: i32 = 14;

pub fn is_valid_semester(semester: i32) -> bool {
    (1..=MAX_SEMESTER).contains(&semester)
}

/// Academic year containing `date`, e.g. `2025/2026`. A new academic year
/// starts in July.
pub fn academic_year_of(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= 7 {
        format!("{}/{}", year, year + 1)
    } else {
        format!("{}/{}", year - 1, year)
    }
}

pub fn current_academic_year() -> String {
    academic_year_of(chrono::Local::now().date_naive())
}

/// Accepts `YYYY/YYYY` where the second year follows the first
pub fn is_valid_academic_year(value: &str) -> bool {
    let Some((start, end)) = value.split_once('/') else {
        return false;
    };

    let is_year = |part: &str| part.len() == 4 && part.chars().all(|c| c.is_ascii_digit());
    if !is_year(start) || !is_year(end) {
        return false;
    }

    match (start.parse::<i32>(), end.parse::<i32>()) {
        (Ok(start), Ok(end)) => end == start + 1,
        _ => false,
    }
}
