//! Birth-date parsing and age computation.
//!
//! Registry sources disagree on date formats, so parsing is tolerant:
//! `YYYY-MM-DD`, `YYYY/MM/DD`, `MM-DD-YYYY` and `MM/DD/YYYY`, each optionally
//! followed by a space and a time component which is ignored.

use chrono::{Datelike, NaiveDate};

/// Minimum age for senior-citizen eligibility.
pub const SENIOR_AGE: u32 = 60;

/// Parse a birth date in any of the accepted layouts.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
  let date = raw.trim().split(' ').next()?;
  let separator = if date.contains('-') {
    '-'
  } else if date.contains('/') {
    '/'
  } else {
    return None;
  };

  let parts: Vec<&str> = date.split(separator).collect();
  let [a, b, c] = parts.as_slice() else {
    return None;
  };
  let (year, month, day) = if a.len() == 4 { (a, b, c) } else { (c, a, b) };
  NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Whole years between the birth date and `reference`. Unparseable input and
/// birth dates after `reference` both yield 0.
pub fn age_on(birth_date: &str, reference: NaiveDate) -> u32 {
  let Some(birth) = parse_birth_date(birth_date) else {
    return 0;
  };
  let mut age = reference.year() - birth.year();
  if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
    age -= 1;
  }
  age.max(0) as u32
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, day).unwrap() }

  #[test]
  fn accepts_all_layouts() {
    let expected = Some(d(1950, 3, 15));
    assert_eq!(parse_birth_date("1950-03-15"), expected);
    assert_eq!(parse_birth_date("1950/03/15"), expected);
    assert_eq!(parse_birth_date("03-15-1950"), expected);
    assert_eq!(parse_birth_date("03/15/1950"), expected);
    assert_eq!(parse_birth_date("1950-03-15 08:30:00"), expected);
  }

  #[test]
  fn rejects_garbage() {
    assert_eq!(parse_birth_date(""), None);
    assert_eq!(parse_birth_date("March 15"), None);
    assert_eq!(parse_birth_date("1950-13-40"), None);
  }

  #[test]
  fn age_counts_completed_years() {
    let reference = d(2026, 2, 25);
    assert_eq!(age_on("1966-02-25", reference), 60);
    assert_eq!(age_on("1966-02-26", reference), 59);
    assert_eq!(age_on("not a date", reference), 0);
    assert_eq!(age_on("2030-01-01", reference), 0);
  }
}
