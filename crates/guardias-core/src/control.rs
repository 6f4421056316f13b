//! Forecast request lifecycle: which URL
//! to hit, how a response is judged, and
//! what the request button looks like in
//! each state.

use guardias_shared::ClimaResponse;

use crate::forecast::ForecastBatch;

const DEFAULT_CLIMA_PATH: &str =
  "/api/clima";
const PREFIXED_CLIMA_PATH: &str =
  "/guardias/api/clima";
const APP_PATH_PREFIX: &str =
  "/guardias";

pub const MSG_LOADED: &str =
  "✅ Pronóstico cargado correctamente";
pub const MSG_EMPTY: &str =
  "❌ Error al cargar";
pub const MSG_CONNECTION: &str =
  "❌ Error de conexión";

#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
  #[error("forecast request failed: {0}")]
  Transport(String),
  #[error(
    "forecast response was not valid \
     JSON: {0}"
  )]
  Decode(String)
}

/// Explicit `data-clima-url` wins, then
/// an override from config, then a path
/// derived from where the page is
/// mounted.
#[must_use]
pub fn resolve_clima_url(
  button_url: Option<&str>,
  configured: Option<&str>,
  pathname: &str
) -> String {
  let explicit = button_url
    .or(configured)
    .map(str::trim)
    .filter(|url| !url.is_empty());
  if let Some(url) = explicit {
    return url.to_string();
  }

  if pathname.contains(APP_PATH_PREFIX)
  {
    PREFIXED_CLIMA_PATH.to_string()
  } else {
    DEFAULT_CLIMA_PATH.to_string()
  }
}

#[derive(Debug)]
pub enum FetchOutcome {
  Loaded(ForecastBatch),
  /// Well-formed response without
  /// usable data.
  Empty,
  Failed(FetchFailure)
}

impl FetchOutcome {
  pub fn classify(
    result: Result<
      ClimaResponse,
      FetchFailure
    >
  ) -> Self {
    let response = match result {
      | Ok(response) => response,
      | Err(failure) => {
        tracing::error!(
          error = %failure,
          "forecast request failed"
        );
        return Self::Failed(failure);
      }
    };

    if !response.success
      || !response.has_data()
    {
      tracing::warn!(
        success = response.success,
        error = ?response.error,
        "forecast response had no data"
      );
      return Self::Empty;
    }

    let batch = response
      .clima
      .as_ref()
      .map(ForecastBatch::from_clima_map)
      .unwrap_or_default();
    if batch.is_empty() {
      tracing::warn!(
        skipped = batch.skipped(),
        "every forecast entry was malformed"
      );
      return Self::Empty;
    }

    Self::Loaded(batch)
  }

  #[must_use]
  pub fn notification(
    &self
  ) -> &'static str {
    match self {
      | Self::Loaded(_) => MSG_LOADED,
      | Self::Empty => MSG_EMPTY,
      | Self::Failed(_) => MSG_CONNECTION
    }
  }

  #[must_use]
  pub fn control_state(
    &self
  ) -> ControlState {
    match self {
      | Self::Loaded(_) => {
        ControlState::Loaded
      }
      | Self::Empty | Self::Failed(_) => {
        ControlState::Failed
      }
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ControlState {
  Idle,
  Loading,
  Loaded,
  Failed
}

/// How the request button renders in a
/// given state.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct ControlView {
  pub label:    &'static str,
  pub title:    &'static str,
  pub opacity:  &'static str,
  pub disabled: bool
}

impl ControlState {
  #[must_use]
  pub fn view(self) -> ControlView {
    match self {
      | Self::Idle => ControlView {
        label:    "Solicitar Pronóstico",
        title:    "Solicitar pronóstico",
        opacity:  "1",
        disabled: false
      },
      | Self::Loading => ControlView {
        label:    "⏳",
        title:    "Cargando...",
        opacity:  "1",
        disabled: true
      },
      | Self::Loaded => ControlView {
        label:    "✅ Cargado",
        title:    "Pronóstico cargado",
        opacity:  "0.7",
        disabled: true
      },
      | Self::Failed => ControlView {
        label:    "❌ Error",
        title:    "Error - Click para \
                   reintentar",
        opacity:  "1",
        disabled: false
      }
    }
  }

  /// A click only starts a request from
  /// a state that accepts one.
  #[must_use]
  pub fn accepts_request(self) -> bool {
    !self.view().disabled
  }

  /// Failed buttons fall back to the
  /// idle label after a short delay,
  /// staying clickable.
  #[must_use]
  pub fn resets_label(self) -> bool {
    self == Self::Failed
  }
}
