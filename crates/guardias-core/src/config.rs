use anyhow::Context;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::datetime::{
  parse_timezone,
  today_in_timezone,
  today_local
};

const MAX_EXPORT_SCALE: f64 = 4.0;

fn default_base_path() -> String {
  "/guardias".to_string()
}

fn default_visible_ms() -> u32 {
  3_000
}

fn default_retry_label_reset_ms() -> u32
{
  2_000
}

fn default_export_scale() -> f64 {
  2.0
}

fn default_export_padding_px() -> u32 {
  20
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct PageConfig {
  #[serde(default)]
  pub version:       u32,
  /// IANA zone used to decide which
  /// calendar day is "today". Unset
  /// means the browser's local day.
  #[serde(default)]
  pub timezone:      Option<String>,
  #[serde(default)]
  pub clima:         ClimaConfig,
  #[serde(default)]
  pub navigation:    NavigationConfig,
  #[serde(default)]
  pub notifications: NotificationConfig,
  #[serde(default)]
  pub export:        ExportConfig
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Deserialize,
)]
pub struct ClimaConfig {
  #[serde(default)]
  pub endpoint: Option<String>
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct NavigationConfig {
  #[serde(default = "default_base_path")]
  pub base_path: String
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct NotificationConfig {
  #[serde(
    default = "default_visible_ms"
  )]
  pub visible_ms:           u32,
  #[serde(
    default = "default_retry_label_reset_ms"
  )]
  pub retry_label_reset_ms: u32
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct ExportConfig {
  #[serde(
    default = "default_export_scale"
  )]
  pub scale:      f64,
  #[serde(
    default = "default_export_padding_px"
  )]
  pub padding_px: u32
}

impl Default for PageConfig {
  fn default() -> Self {
    Self {
      version:       1,
      timezone:      None,
      clima:         ClimaConfig::default(),
      navigation:
        NavigationConfig::default(),
      notifications:
        NotificationConfig::default(),
      export:        ExportConfig::default()
    }
  }
}

impl Default for NavigationConfig {
  fn default() -> Self {
    Self {
      base_path: default_base_path()
    }
  }
}

impl Default for NotificationConfig {
  fn default() -> Self {
    Self {
      visible_ms:           default_visible_ms(
      ),
      retry_label_reset_ms:
        default_retry_label_reset_ms()
    }
  }
}

impl Default for ExportConfig {
  fn default() -> Self {
    Self {
      scale:      default_export_scale(),
      padding_px: default_export_padding_px(
      )
    }
  }
}

impl PageConfig {
  pub fn parse(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<PageConfig>(raw)
        .context(
          "failed parsing page config"
        )?;
    config.sanitize();
    Ok(config)
  }

  /// Parses `raw`, logging and falling
  /// back to defaults on error.
  pub fn load_or_default(
    raw: &str
  ) -> Self {
    match Self::parse(raw) {
      | Ok(config) => {
        tracing::info!(
          version = config.version,
          timezone = ?config.timezone,
          base_path = %config.navigation.base_path,
          "loaded page config"
        );
        config
      }
      | Err(error) => {
        tracing::error!(
          error = %format!("{error:#}"),
          "failed parsing page config; using defaults"
        );
        Self::default()
      }
    }
  }

  fn sanitize(&mut self) {
    if self
      .timezone
      .as_deref()
      .is_some_and(|tz| {
        tz.trim().is_empty()
      })
    {
      self.timezone = None;
    }

    if self
      .clima
      .endpoint
      .as_deref()
      .is_some_and(|url| {
        url.trim().is_empty()
      })
    {
      self.clima.endpoint = None;
    }

    let base = self
      .navigation
      .base_path
      .trim()
      .trim_end_matches('/')
      .to_string();
    self.navigation.base_path = base;

    if self.notifications.visible_ms == 0
    {
      self.notifications.visible_ms =
        default_visible_ms();
    }

    if !self.export.scale.is_finite() {
      self.export.scale =
        default_export_scale();
    }
    self.export.scale = self
      .export
      .scale
      .clamp(1.0, MAX_EXPORT_SCALE);
  }

  #[must_use]
  pub fn calendar_timezone(
    &self
  ) -> Option<Tz> {
    self.timezone.as_deref().and_then(
      |raw| {
        parse_timezone(raw, "guardias.toml")
      }
    )
  }

  /// The single calendar day every
  /// date comparison on the page uses.
  #[must_use]
  pub fn today(&self) -> NaiveDate {
    match self.calendar_timezone() {
      | Some(tz) => today_in_timezone(tz),
      | None => today_local()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_uses_defaults() {
    let config = PageConfig::parse("")
      .expect("parse empty config");
    assert_eq!(
      config.navigation.base_path,
      "/guardias"
    );
    assert_eq!(
      config.notifications.visible_ms,
      3_000
    );
    assert_eq!(
      config
        .notifications
        .retry_label_reset_ms,
      2_000
    );
    assert_eq!(config.export.scale, 2.0);
    assert_eq!(config.export.padding_px, 20);
    assert_eq!(config.timezone, None);
  }

  #[test]
  fn sanitizes_out_of_range_values() {
    let config = PageConfig::parse(
      r#"
version = 1
timezone = "   "

[clima]
endpoint = ""

[navigation]
base_path = "/turnos/"

[notifications]
visible_ms = 0

[export]
scale = 12.0
"#
    )
    .expect("parse config");

    assert_eq!(config.timezone, None);
    assert_eq!(config.clima.endpoint, None);
    assert_eq!(
      config.navigation.base_path,
      "/turnos"
    );
    assert_eq!(
      config.notifications.visible_ms,
      3_000
    );
    assert_eq!(config.export.scale, 4.0);
  }

  #[test]
  fn invalid_document_falls_back() {
    let config = PageConfig::load_or_default(
      "version = \"one\""
    );
    assert_eq!(config, PageConfig::default());
  }

  #[test]
  fn configured_timezone_is_parsed() {
    let config = PageConfig::parse(
      "timezone = \"America/Argentina/Buenos_Aires\""
    )
    .expect("parse config");
    assert_eq!(
      config.calendar_timezone(),
      Some(
        chrono_tz::America::Argentina::Buenos_Aires
      )
    );

    let bad = PageConfig::parse(
      "timezone = \"Nowhere/Land\""
    )
    .expect("parse config");
    assert_eq!(bad.calendar_timezone(), None);
  }
}
