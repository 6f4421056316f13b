use serde::Serialize;

/// `data-anio` of the calendar, or the
/// fallback when missing or not a year.
#[must_use]
pub fn page_year(
  attr: Option<&str>,
  fallback: i32
) -> i32 {
  attr
    .map(str::trim)
    .and_then(|raw| raw.parse::<i32>().ok())
    .unwrap_or(fallback)
}

#[must_use]
pub fn export_filename(
  year: i32
) -> String {
  format!("cronograma-guardias-{year}.png")
}

#[must_use]
pub fn export_title(year: i32) -> String {
  format!("Cronograma de Guardias {year}")
}

/// Target of a `data-year-delta`
/// button. Non-numeric deltas are
/// ignored.
#[must_use]
pub fn year_navigation_path(
  base_path: &str,
  year: i32,
  delta_attr: Option<&str>
) -> Option<String> {
  let delta = delta_attr
    .unwrap_or("0")
    .trim()
    .parse::<i32>()
    .ok()?;
  let target = year.checked_add(delta)?;
  Some(format!(
    "{}/anio/{target}",
    base_path.trim_end_matches('/')
  ))
}

/// Options object handed to
/// `html2canvas`.
#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
  pub background_color: String,
  pub scale:            f64,
  pub width:            f64,
  pub height:           f64,
  pub window_width:     f64,
  pub window_height:    f64
}

impl RenderOptions {
  /// Renders the whole `width` x
  /// `height` wrapper, with the window
  /// sized to it so nothing is clipped.
  #[must_use]
  pub fn for_wrapper(
    background_color: &str,
    scale: f64,
    width: f64,
    height: f64
  ) -> Self {
    Self {
      background_color:
        background_color.to_string(),
      scale,
      width,
      height,
      window_width: width,
      window_height: height
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn year_attribute_falls_back() {
    assert_eq!(
      page_year(Some("2026"), 2000),
      2026
    );
    assert_eq!(
      page_year(Some(""), 2000),
      2000
    );
    assert_eq!(
      page_year(Some("abc"), 2000),
      2000
    );
    assert_eq!(page_year(None, 2000), 2000);
  }

  #[test]
  fn export_names_carry_the_year() {
    assert_eq!(
      export_filename(2025),
      "cronograma-guardias-2025.png"
    );
    assert_eq!(
      export_title(2025),
      "Cronograma de Guardias 2025"
    );
  }

  #[test]
  fn navigation_applies_delta() {
    assert_eq!(
      year_navigation_path(
        "/guardias",
        2025,
        Some("-1")
      )
      .as_deref(),
      Some("/guardias/anio/2024")
    );
    assert_eq!(
      year_navigation_path(
        "/guardias/",
        2025,
        Some("1")
      )
      .as_deref(),
      Some("/guardias/anio/2026")
    );
    assert_eq!(
      year_navigation_path(
        "/guardias",
        2025,
        Some("next")
      ),
      None
    );
  }

  #[test]
  fn render_options_serialize_as_camel_case(
  ) {
    let options = RenderOptions::for_wrapper(
      "rgb(0, 0, 0)",
      2.0,
      800.0,
      600.0
    );
    let json = serde_json::to_value(
      &options
    )
    .expect("serialize options");
    assert_eq!(
      json["backgroundColor"],
      "rgb(0, 0, 0)"
    );
    assert_eq!(json["windowWidth"], 800.0);
    assert_eq!(json["windowHeight"], 600.0);
    assert_eq!(json["scale"], 2.0);
  }
}
