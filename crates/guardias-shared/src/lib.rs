use std::collections::BTreeMap;

use serde::{
  Deserialize,
  Serialize
};
use serde_json::Value;

/// Body returned by the forecast
/// endpoint (`/api/clima`).
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct ClimaResponse {
  #[serde(default)]
  pub success: bool,
  #[serde(default)]
  pub clima:
    Option<BTreeMap<String, ClimaValue>>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub error:   Option<String>
}

impl ClimaResponse {
  pub fn has_data(&self) -> bool {
    self
      .clima
      .as_ref()
      .is_some_and(|clima| {
        !clima.is_empty()
      })
  }
}

/// One forecast value. Older servers
/// send a bare icon string; newer ones
/// send an object with temperatures.
/// Anything else is kept as
/// `Malformed` so a single bad entry
/// does not fail the whole payload.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
#[serde(
  untagged,
  from = "serde_json::Value"
)]
pub enum ClimaValue {
  Icon(String),
  Detailed(ClimaDetail),
  Malformed(Value)
}

#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct ClimaDetail {
  #[serde(default)]
  pub emoji:    Option<String>,
  #[serde(default)]
  pub temp_max: Option<Value>,
  #[serde(default)]
  pub temp_min: Option<Value>
}

impl From<Value> for ClimaValue {
  fn from(value: Value) -> Self {
    match value {
      | Value::String(icon) => {
        Self::Icon(icon)
      }
      | Value::Object(_) => {
        match serde_json::from_value::<
          ClimaDetail
        >(value.clone())
        {
          | Ok(detail) => {
            Self::Detailed(detail)
          }
          | Err(_) => {
            Self::Malformed(value)
          }
        }
      }
      | other => Self::Malformed(other)
    }
  }
}

/// `detail` of the `themeChanged`
/// custom event broadcast between
/// views of the page.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ThemeChangedDetail {
  pub theme: String
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_mixed_forecast_payload() {
    let raw = r#"{
      "success": true,
      "clima": {
        "2025-06-01": "☀️",
        "2025-06-02": {"emoji": "🌧️", "temp_max": 12, "temp_min": null},
        "2025-06-03": 42
      }
    }"#;

    let response: ClimaResponse =
      serde_json::from_str(raw)
        .expect("decode payload");

    assert!(response.success);
    assert!(response.has_data());
    let clima = response
      .clima
      .expect("clima present");
    assert_eq!(
      clima.get("2025-06-01"),
      Some(&ClimaValue::Icon(
        "☀️".to_string()
      ))
    );
    match clima.get("2025-06-02") {
      | Some(ClimaValue::Detailed(
        detail
      )) => {
        assert_eq!(
          detail.emoji.as_deref(),
          Some("🌧️")
        );
        assert_eq!(
          detail.temp_max,
          Some(Value::from(12))
        );
        assert_eq!(
          detail.temp_min,
          None
        );
      }
      | other => {
        panic!(
          "expected detailed entry, got {other:?}"
        )
      }
    }
    assert!(matches!(
      clima.get("2025-06-03"),
      Some(ClimaValue::Malformed(_))
    ));
  }

  #[test]
  fn error_payload_has_no_data() {
    let response: ClimaResponse =
      serde_json::from_str(
        r#"{"success": false, "error": "boom"}"#
      )
      .expect("decode error payload");

    assert!(!response.success);
    assert!(!response.has_data());
    assert_eq!(
      response.error.as_deref(),
      Some("boom")
    );
  }

  #[test]
  fn object_with_wrong_icon_type_is_malformed(
  ) {
    let value = ClimaValue::from(
      serde_json::json!({"emoji": 7})
    );
    assert!(matches!(
      value,
      ClimaValue::Malformed(_)
    ));
  }
}
