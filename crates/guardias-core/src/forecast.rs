use std::collections::BTreeMap;

use chrono::NaiveDate;
use guardias_shared::{
  ClimaDetail,
  ClimaValue
};
use serde::Serialize;
use serde_json::Value;

use crate::datetime::parse_iso_date;

/// One day of forecast, normalized from
/// either wire shape.
#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct ForecastEntry {
  pub icon:     String,
  pub temp_max: Option<f64>,
  pub temp_min: Option<f64>
}

/// What gets written onto a calendar
/// cell for one forecast entry.
#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct CellWeather {
  pub icon:     String,
  pub temp_max: Option<f64>,
  pub temp_min: Option<f64>,
  pub temp_avg: Option<i64>
}

pub const ATTR_CLIMA_ICON: &str =
  "data-clima-emoji";
pub const ATTR_TEMP_MAX: &str =
  "data-temp-max";
pub const ATTR_TEMP_MIN: &str =
  "data-temp-min";
pub const ATTR_TEMP_AVG: &str =
  "data-temp-avg";

impl CellWeather {
  /// Attribute name/value pairs for the
  /// cell. Missing temperatures render
  /// as the empty string so a later,
  /// poorer payload clears stale values.
  #[must_use]
  pub fn attributes(
    &self
  ) -> [(&'static str, String); 4] {
    [
      (
        ATTR_TEMP_MAX,
        format_temperature(
          self.temp_max
        )
      ),
      (
        ATTR_TEMP_MIN,
        format_temperature(
          self.temp_min
        )
      ),
      (
        ATTR_TEMP_AVG,
        self
          .temp_avg
          .map(|avg| avg.to_string())
          .unwrap_or_default()
      ),
      (ATTR_CLIMA_ICON, self.icon.clone())
    ]
  }
}

fn format_temperature(
  value: Option<f64>
) -> String {
  match value {
    | Some(v) if v.fract() == 0.0 => {
      format!("{v:.0}")
    }
    | Some(v) => v.to_string(),
    | None => String::new()
  }
}

/// Half-up rounding (`-2.5` → `-2`),
/// the rule the page has always used
/// for the average temperature.
fn round_half_up(value: f64) -> i64 {
  (value + 0.5).floor() as i64
}

fn coerce_temperature(
  value: Option<&Value>
) -> Option<f64> {
  let parsed = match value? {
    | Value::Number(number) => {
      number.as_f64()
    }
    | Value::String(raw) => {
      let trimmed = raw.trim();
      if trimmed.is_empty() {
        None
      } else {
        trimmed.parse::<f64>().ok()
      }
    }
    | _ => None
  };
  parsed.filter(|v| v.is_finite())
}

impl ForecastEntry {
  pub fn icon_only(
    icon: impl Into<String>
  ) -> Self {
    Self {
      icon:     icon.into(),
      temp_max: None,
      temp_min: None
    }
  }

  fn from_detail(
    detail: &ClimaDetail
  ) -> Self {
    Self {
      icon:     detail
        .emoji
        .clone()
        .unwrap_or_default(),
      temp_max: coerce_temperature(
        detail.temp_max.as_ref()
      ),
      temp_min: coerce_temperature(
        detail.temp_min.as_ref()
      )
    }
  }

  /// `None` for shapes that are neither
  /// an icon string nor an object.
  #[must_use]
  pub fn from_clima_value(
    value: &ClimaValue
  ) -> Option<Self> {
    match value {
      | ClimaValue::Icon(icon) => {
        Some(Self::icon_only(
          icon.clone()
        ))
      }
      | ClimaValue::Detailed(detail) => {
        Some(Self::from_detail(detail))
      }
      | ClimaValue::Malformed(_) => None
    }
  }

  #[must_use]
  pub fn average(&self) -> Option<i64> {
    match (self.temp_max, self.temp_min)
    {
      | (Some(max), Some(min)) => Some(
        round_half_up((max + min) / 2.0)
      ),
      | (Some(max), None) => {
        Some(round_half_up(max))
      }
      | (None, Some(min)) => {
        Some(round_half_up(min))
      }
      | (None, None) => None
    }
  }

  #[must_use]
  pub fn cell_weather(
    &self
  ) -> CellWeather {
    CellWeather {
      icon:     self.icon.clone(),
      temp_max: self.temp_max,
      temp_min: self.temp_min,
      temp_avg: self.average()
    }
  }
}

/// A whole payload keyed by calendar
/// day, with the count of entries that
/// had to be dropped.
#[derive(
  Debug, Clone, Default, PartialEq,
)]
pub struct ForecastBatch {
  entries: BTreeMap<
    NaiveDate,
    ForecastEntry
  >,
  skipped: usize
}

impl ForecastBatch {
  #[tracing::instrument(
    level = "debug",
    skip(clima),
    fields(received = clima.len())
  )]
  pub fn from_clima_map(
    clima: &BTreeMap<String, ClimaValue>
  ) -> Self {
    let mut batch = Self::default();

    for (key, value) in clima {
      let Some(date) = parse_iso_date(key)
      else {
        tracing::warn!(
          key = %key,
          "skipping forecast entry with invalid date key"
        );
        batch.skipped += 1;
        continue;
      };

      match ForecastEntry::from_clima_value(
        value
      ) {
        | Some(entry) => {
          tracing::trace!(
            %date,
            icon = %entry.icon,
            temp_max = ?entry.temp_max,
            temp_min = ?entry.temp_min,
            "normalized forecast entry"
          );
          batch
            .entries
            .insert(date, entry);
        }
        | None => {
          tracing::warn!(
            %date,
            value = ?value,
            "skipping forecast entry with unexpected shape"
          );
          batch.skipped += 1;
        }
      }
    }

    tracing::debug!(
      applied = batch.entries.len(),
      skipped = batch.skipped,
      "forecast batch normalized"
    );
    batch
  }

  pub fn insert(
    &mut self,
    date: NaiveDate,
    entry: ForecastEntry
  ) {
    self.entries.insert(date, entry);
  }

  #[must_use]
  pub fn get(
    &self,
    date: NaiveDate
  ) -> Option<&ForecastEntry> {
    self.entries.get(&date)
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = (&NaiveDate, &ForecastEntry)>
  {
    self.entries.iter()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  #[must_use]
  pub fn skipped(&self) -> usize {
    self.skipped
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn detailed(
    emoji: &str,
    max: Value,
    min: Value
  ) -> ClimaValue {
    ClimaValue::from(json!({
      "emoji": emoji,
      "temp_max": max,
      "temp_min": min,
    }))
  }

  #[test]
  fn average_uses_both_bounds_when_present(
  ) {
    let entry =
      ForecastEntry::from_clima_value(
        &detailed(
          "⛅",
          json!(21),
          json!(8)
        )
      )
      .expect("detailed entry");
    assert_eq!(entry.average(), Some(15));
  }

  #[test]
  fn average_falls_back_to_single_bound()
  {
    let only_max =
      ForecastEntry::from_clima_value(
        &detailed(
          "☀️",
          json!(18),
          Value::Null
        )
      )
      .expect("entry");
    assert_eq!(only_max.average(), Some(18));

    let only_min =
      ForecastEntry::from_clima_value(
        &detailed("☁️", json!(""), json!(-3))
      )
      .expect("entry");
    assert_eq!(only_min.temp_max, None);
    assert_eq!(only_min.average(), Some(-3));
  }

  #[test]
  fn icon_only_entry_has_no_average() {
    let entry =
      ForecastEntry::from_clima_value(
        &ClimaValue::Icon("🌫️".to_string())
      )
      .expect("icon entry");
    assert_eq!(entry.average(), None);
    let weather = entry.cell_weather();
    assert_eq!(weather.temp_avg, None);
    assert_eq!(
      weather.attributes()[2],
      (ATTR_TEMP_AVG, String::new())
    );
  }

  #[test]
  fn rounding_is_half_up() {
    let entry = ForecastEntry {
      icon:     String::new(),
      temp_max: Some(-2.0),
      temp_min: Some(-3.0)
    };
    assert_eq!(entry.average(), Some(-2));

    let entry = ForecastEntry {
      icon:     String::new(),
      temp_max: Some(10.0),
      temp_min: Some(5.0)
    };
    assert_eq!(entry.average(), Some(8));
  }

  #[test]
  fn numeric_strings_are_accepted() {
    let entry =
      ForecastEntry::from_clima_value(
        &detailed(
          "🌧️",
          json!(" 14 "),
          json!("abc")
        )
      )
      .expect("entry");
    assert_eq!(entry.temp_max, Some(14.0));
    assert_eq!(entry.temp_min, None);
  }

  #[test]
  fn batch_skips_bad_keys_and_shapes() {
    let mut clima = BTreeMap::new();
    clima.insert(
      "2025-06-01".to_string(),
      ClimaValue::Icon("☀️".to_string())
    );
    clima.insert(
      "mañana".to_string(),
      ClimaValue::Icon("☀️".to_string())
    );
    clima.insert(
      "2025-06-02".to_string(),
      ClimaValue::from(json!([1, 2]))
    );
    clima.insert(
      "2025-06-03".to_string(),
      detailed("⛈️", json!(20), json!(10))
    );

    let batch =
      ForecastBatch::from_clima_map(&clima);
    assert_eq!(batch.len(), 2);
    assert_eq!(batch.skipped(), 2);
    let june_3 =
      NaiveDate::from_ymd_opt(2025, 6, 3)
        .expect("valid date");
    assert_eq!(
      batch
        .get(june_3)
        .and_then(ForecastEntry::average),
      Some(15)
    );
  }

  #[test]
  fn attributes_render_whole_degrees_without_fraction(
  ) {
    let weather = CellWeather {
      icon:     "☀️".to_string(),
      temp_max: Some(21.0),
      temp_min: Some(7.5),
      temp_avg: Some(14)
    };
    let attrs = weather.attributes();
    assert_eq!(attrs[0].1, "21");
    assert_eq!(attrs[1].1, "7.5");
    assert_eq!(attrs[2].1, "14");
    assert_eq!(attrs[3].1, "☀️");
  }
}
