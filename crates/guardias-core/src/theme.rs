pub const THEME_STORAGE_KEY: &str =
  "portal_theme";
/// Written alongside the primary key
/// for pages that still read it.
pub const LEGACY_THEME_STORAGE_KEY:
  &str = "theme";
pub const THEME_CHANGED_EVENT: &str =
  "themeChanged";
pub const THEME_ATTRIBUTE: &str =
  "data-theme";

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum ThemeMode {
  Light,
  #[default]
  Dark
}

impl ThemeMode {
  /// Anything but `light` is dark.
  #[must_use]
  pub fn from_stored(raw: &str) -> Self {
    match raw {
      | "light" => Self::Light,
      | _ => Self::Dark
    }
  }

  /// Primary key first, then the legacy
  /// one, then the dark default.
  #[must_use]
  pub fn resolve_saved(
    primary: Option<&str>,
    legacy: Option<&str>
  ) -> Self {
    primary
      .filter(|raw| !raw.is_empty())
      .or_else(|| {
        legacy
          .filter(|raw| !raw.is_empty())
      })
      .map_or_else(
        Self::default,
        Self::from_stored
      )
  }

  #[must_use]
  pub fn from_checkbox(
    checked: bool
  ) -> Self {
    if checked {
      Self::Dark
    } else {
      Self::Light
    }
  }

  #[must_use]
  pub fn storage_value(
    self
  ) -> &'static str {
    match self {
      | Self::Light => "light",
      | Self::Dark => "dark"
    }
  }

  #[must_use]
  pub fn checkbox_checked(self) -> bool {
    self == Self::Dark
  }
}

/// Whether a `storage` event concerns
/// the theme preference.
#[must_use]
pub fn is_theme_key(
  key: Option<&str>
) -> bool {
  matches!(
    key,
    Some(THEME_STORAGE_KEY)
      | Some(LEGACY_THEME_STORAGE_KEY)
  )
}
