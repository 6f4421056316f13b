use chrono::{
  Local,
  NaiveDate,
  Utc
};
use chrono_tz::Tz;

const ISO_DATE_FORMAT: &str =
  "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str =
  "%d/%m/%Y";

/// Parses the `YYYY-MM-DD` dates the
/// page carries in `data-fecha` and in
/// forecast keys. A trailing time part
/// (`2025-01-07T00:00:00Z`) is ignored
/// so a timestamp never shifts the
/// calendar day.
#[must_use]
pub fn parse_iso_date(
  raw: &str
) -> Option<NaiveDate> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  let date_part = trimmed
    .split_once('T')
    .map_or(trimmed, |(date, _)| date);

  NaiveDate::parse_from_str(
    date_part,
    ISO_DATE_FORMAT
  )
  .ok()
}

#[must_use]
pub fn format_iso_date(
  date: NaiveDate
) -> String {
  date
    .format(ISO_DATE_FORMAT)
    .to_string()
}

/// `DD/MM/YYYY`, as shown in tooltips.
#[must_use]
pub fn format_display_date(
  date: NaiveDate
) -> String {
  date
    .format(DISPLAY_DATE_FORMAT)
    .to_string()
}

#[must_use]
pub fn days_between(
  from: NaiveDate,
  to: NaiveDate
) -> i64 {
  to.signed_duration_since(from)
    .num_days()
}

pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::info!(
        source,
        timezone = %trimmed,
        "configured calendar timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

#[must_use]
pub fn today_in_timezone(
  timezone: Tz
) -> NaiveDate {
  Utc::now()
    .with_timezone(&timezone)
    .date_naive()
}

/// Calendar date of the local clock.
#[must_use]
pub fn today_local() -> NaiveDate {
  Local::now().date_naive()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(
    year: i32,
    month: u32,
    day: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(
      year, month, day
    )
    .expect("valid date")
  }

  #[test]
  fn display_format_is_zero_padded() {
    assert_eq!(
      format_display_date(ymd(
        2024, 3, 5
      )),
      "05/03/2024"
    );
    assert_eq!(
      format_display_date(ymd(
        2025, 12, 31
      )),
      "31/12/2025"
    );
  }

  #[test]
  fn parses_plain_and_timestamped_dates(
  ) {
    assert_eq!(
      parse_iso_date("2025-01-07"),
      Some(ymd(2025, 1, 7))
    );
    assert_eq!(
      parse_iso_date(
        " 2025-01-07T23:30:00-03:00 "
      ),
      Some(ymd(2025, 1, 7))
    );
    assert_eq!(
      parse_iso_date("07/01/2025"),
      None
    );
    assert_eq!(parse_iso_date(""), None);
    assert_eq!(
      parse_iso_date("2025-02-30"),
      None
    );
  }

  #[test]
  fn iso_format_matches_cell_attribute()
  {
    assert_eq!(
      format_iso_date(ymd(2025, 6, 9)),
      "2025-06-09"
    );
  }

  #[test]
  fn days_between_is_signed() {
    let a = ymd(2025, 2, 27);
    let b = ymd(2025, 3, 2);
    assert_eq!(days_between(a, b), 3);
    assert_eq!(days_between(b, a), -3);
    assert_eq!(days_between(a, a), 0);
  }

  #[test]
  fn rejects_unknown_timezone() {
    assert!(
      parse_timezone("Mars/Olympus", "test")
        .is_none()
    );
    assert_eq!(
      parse_timezone(
        "America/Argentina/Buenos_Aires",
        "test"
      ),
      Some(
        chrono_tz::America::Argentina::Buenos_Aires
      )
    );
  }
}
