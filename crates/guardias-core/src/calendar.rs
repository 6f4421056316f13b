use chrono::NaiveDate;

use crate::datetime::parse_iso_date;
use crate::forecast::{
  CellWeather,
  ForecastBatch
};
use crate::resolver::DutyDate;

/// One rendered day cell, detached from
/// the document it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
  pub raw_date: String,
  pub date:     Option<NaiveDate>,
  pub group:    Option<String>,
  pub is_today: bool,
  pub weather:  Option<CellWeather>
}

impl CalendarCell {
  pub fn from_attributes(
    date_attr: Option<&str>,
    group_attr: Option<&str>,
    today_attr: Option<&str>
  ) -> Self {
    let raw_date = date_attr
      .unwrap_or_default()
      .to_string();
    let date = parse_iso_date(&raw_date);
    let group = group_attr
      .filter(|group| {
        !group.trim().is_empty()
      })
      .map(str::to_string);

    Self {
      raw_date,
      date,
      group,
      is_today: today_attr
        .is_some_and(parse_flag),
      weather: None
    }
  }

  #[must_use]
  pub fn duty_date(
    &self
  ) -> Option<DutyDate> {
    Some(DutyDate::new(
      self.date?,
      self.group.clone()?
    ))
  }
}

/// Truthiness of the server-rendered
/// `data-es-hoy` marker.
#[must_use]
pub fn parse_flag(raw: &str) -> bool {
  matches!(
    raw
      .trim()
      .to_ascii_lowercase()
      .as_str(),
    "true" | "1" | "yes"
  )
}

#[must_use]
pub fn duty_dates(
  cells: &[CalendarCell]
) -> Vec<DutyDate> {
  cells
    .iter()
    .filter_map(CalendarCell::duty_date)
    .collect()
}

#[must_use]
pub fn today_cells(
  cells: &[CalendarCell]
) -> Vec<usize> {
  cells
    .iter()
    .enumerate()
    .filter(|(_, cell)| cell.is_today)
    .map(|(index, _)| index)
    .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellUpdate {
  pub index:   usize,
  pub weather: CellWeather
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct ApplySummary {
  /// Forecast days that matched at
  /// least one cell.
  pub matched_days:  usize,
  pub updated_cells: usize
}

/// Every cell whose day has a forecast
/// entry, with what to write on it.
#[must_use]
pub fn plan_forecast(
  cells: &[CalendarCell],
  batch: &ForecastBatch
) -> Vec<CellUpdate> {
  cells
    .iter()
    .enumerate()
    .filter_map(|(index, cell)| {
      let entry =
        batch.get(cell.date?)?;
      Some(CellUpdate {
        index,
        weather: entry.cell_weather()
      })
    })
    .collect()
}

#[must_use]
pub fn summarize(
  cells: &[CalendarCell],
  plan: &[CellUpdate]
) -> ApplySummary {
  let mut days = plan
    .iter()
    .filter_map(|update| {
      cells
        .get(update.index)
        .and_then(|cell| cell.date)
    })
    .collect::<Vec<_>>();
  days.sort_unstable();
  days.dedup();

  ApplySummary {
    matched_days:  days.len(),
    updated_cells: plan.len()
  }
}

/// Overwrites the weather of every
/// matching cell. Running it again with
/// the same batch leaves the cells
/// unchanged.
pub fn apply_forecast(
  cells: &mut [CalendarCell],
  batch: &ForecastBatch
) -> ApplySummary {
  let plan = plan_forecast(cells, batch);
  let summary = summarize(cells, &plan);

  for update in plan {
    if let Some(cell) =
      cells.get_mut(update.index)
    {
      cell.weather = Some(update.weather);
    }
  }

  tracing::debug!(
    matched_days = summary.matched_days,
    updated_cells = summary.updated_cells,
    "applied forecast to cells"
  );
  summary
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::forecast::ForecastEntry;

  fn cell(
    date: &str,
    group: &str,
    today: &str
  ) -> CalendarCell {
    CalendarCell::from_attributes(
      Some(date),
      Some(group),
      Some(today)
    )
  }

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
  fn reads_markup_attributes() {
    let today =
      cell("2025-01-07", "Juan", "True");
    assert!(today.is_today);
    assert_eq!(
      today.date,
      Some(ymd(2025, 1, 7))
    );
    assert_eq!(
      today.group.as_deref(),
      Some("Juan")
    );

    let other =
      cell("2025-01-08", "", "False");
    assert!(!other.is_today);
    assert_eq!(other.group, None);
    assert_eq!(other.duty_date(), None);

    let blank =
      CalendarCell::from_attributes(
        None, None, None
      );
    assert_eq!(blank.date, None);
    assert!(!blank.is_today);
  }

  #[test]
  fn duty_dates_skip_incomplete_cells() {
    let cells = vec![
      cell("2025-01-07", "Juan", "False"),
      cell("bad", "Juan", "False"),
      cell("2025-01-08", "", "False"),
      cell("2025-01-09", "Ana", "False"),
    ];
    assert_eq!(
      duty_dates(&cells),
      vec![
        DutyDate::new(
          ymd(2025, 1, 7),
          "Juan"
        ),
        DutyDate::new(
          ymd(2025, 1, 9),
          "Ana"
        ),
      ]
    );
  }

  #[test]
  fn today_cells_follow_marker() {
    let cells = vec![
      cell("2025-01-07", "Juan", "False"),
      cell("2025-01-08", "Juan", "True"),
    ];
    assert_eq!(today_cells(&cells), vec![1]);
  }

  #[test]
  fn applying_twice_equals_applying_once()
  {
    let mut batch =
      ForecastBatch::default();
    batch.insert(
      ymd(2025, 1, 7),
      ForecastEntry {
        icon:     "☀️".to_string(),
        temp_max: Some(30.0),
        temp_min: Some(15.0)
      }
    );
    batch.insert(
      ymd(2025, 1, 8),
      ForecastEntry::icon_only("☁️")
    );

    let mut cells = vec![
      cell("2025-01-07", "Juan", "True"),
      cell("2025-01-07", "Juan", "False"),
      cell("2025-01-08", "Juan", "False"),
      cell("2025-01-09", "Ana", "False"),
    ];

    let first =
      apply_forecast(&mut cells, &batch);
    let once = cells.clone();
    let second =
      apply_forecast(&mut cells, &batch);

    assert_eq!(cells, once);
    assert_eq!(first, second);
    assert_eq!(
      first,
      ApplySummary {
        matched_days:  2,
        updated_cells: 3
      }
    );
    assert_eq!(
      cells[0]
        .weather
        .as_ref()
        .and_then(|w| w.temp_avg),
      Some(23)
    );
    assert_eq!(cells[3].weather, None);
  }

  #[test]
  fn reapplying_with_fewer_temperatures_clears_them(
  ) {
    let day = ymd(2025, 1, 7);
    let mut cells =
      vec![cell("2025-01-07", "Juan", "")];

    let mut rich = ForecastBatch::default();
    rich.insert(
      day,
      ForecastEntry {
        icon:     "☀️".to_string(),
        temp_max: Some(30.0),
        temp_min: Some(15.0)
      }
    );
    let _ = apply_forecast(&mut cells, &rich);

    let mut poor = ForecastBatch::default();
    poor.insert(
      day,
      ForecastEntry::icon_only("☁️")
    );
    let _ = apply_forecast(&mut cells, &poor);

    let weather = cells[0]
      .weather
      .as_ref()
      .expect("weather applied");
    assert_eq!(weather.icon, "☁️");
    assert_eq!(weather.temp_max, None);
    assert_eq!(weather.temp_avg, None);
  }
}
