/// Which duty group, if any, the legend
/// is currently filtering by. Owned by
/// the page state and handed to the
/// legend click handler.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct LegendFilter {
  active: Option<String>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
  Activated(String),
  Cleared
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Emphasis {
  /// No filter active.
  Neutral,
  Focused,
  Dimmed
}

pub type StyleDecl =
  (&'static str, &'static str);

const LEGEND_NEUTRAL: &[StyleDecl] = &[
  ("opacity", "1"),
  ("transform", "scale(1)"),
  ("box-shadow", ""),
  ("filter", "none")
];
const LEGEND_FOCUSED: &[StyleDecl] = &[
  ("opacity", "1"),
  ("transform", "scale(1.05)"),
  (
    "box-shadow",
    "0 4px 12px rgba(0, 0, 0, 0.3)"
  ),
  ("filter", "none")
];
const LEGEND_DIMMED: &[StyleDecl] = &[
  ("opacity", "0.4"),
  ("transform", "scale(1)"),
  ("box-shadow", ""),
  ("filter", "grayscale(100%)")
];
const CELL_VISIBLE: &[StyleDecl] = &[
  ("opacity", "1"),
  ("filter", "none")
];
const CELL_DIMMED: &[StyleDecl] = &[
  ("opacity", "0.3"),
  ("filter", "grayscale(80%)")
];

impl Emphasis {
  #[must_use]
  pub fn legend_styles(
    self
  ) -> &'static [StyleDecl] {
    match self {
      | Self::Neutral => LEGEND_NEUTRAL,
      | Self::Focused => LEGEND_FOCUSED,
      | Self::Dimmed => LEGEND_DIMMED
    }
  }

  #[must_use]
  pub fn cell_styles(
    self
  ) -> &'static [StyleDecl] {
    match self {
      | Self::Neutral | Self::Focused => {
        CELL_VISIBLE
      }
      | Self::Dimmed => CELL_DIMMED
    }
  }
}

impl LegendFilter {
  #[must_use]
  pub fn active(&self) -> Option<&str> {
    self.active.as_deref()
  }

  /// Clicking the active group clears
  /// the filter; any other group takes
  /// over.
  pub fn toggle(
    &mut self,
    group: &str
  ) -> FilterChange {
    if self.active.as_deref()
      == Some(group)
    {
      self.active = None;
      tracing::debug!(
        group,
        "legend filter cleared"
      );
      FilterChange::Cleared
    } else {
      self.active =
        Some(group.to_string());
      tracing::debug!(
        group,
        "legend filter activated"
      );
      FilterChange::Activated(
        group.to_string()
      )
    }
  }

  #[must_use]
  pub fn legend_emphasis(
    &self,
    item_group: Option<&str>
  ) -> Emphasis {
    self.emphasis(item_group)
  }

  /// Cells without a group are dimmed
  /// while a filter is active.
  #[must_use]
  pub fn cell_emphasis(
    &self,
    cell_group: Option<&str>
  ) -> Emphasis {
    self.emphasis(cell_group)
  }

  fn emphasis(
    &self,
    group: Option<&str>
  ) -> Emphasis {
    match self.active.as_deref() {
      | None => Emphasis::Neutral,
      | Some(active)
        if group == Some(active) =>
      {
        Emphasis::Focused
      }
      | Some(_) => Emphasis::Dimmed
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn toggling_same_group_twice_clears() {
    let mut filter =
      LegendFilter::default();
    assert_eq!(
      filter.toggle("Juan"),
      FilterChange::Activated(
        "Juan".to_string()
      )
    );
    assert_eq!(filter.active(), Some("Juan"));
    assert_eq!(
      filter.toggle("Juan"),
      FilterChange::Cleared
    );
    assert_eq!(filter.active(), None);
  }

  #[test]
  fn switching_groups_keeps_filter_active(
  ) {
    let mut filter =
      LegendFilter::default();
    let _ = filter.toggle("Juan");
    assert_eq!(
      filter.toggle("Ana"),
      FilterChange::Activated(
        "Ana".to_string()
      )
    );
    assert_eq!(filter.active(), Some("Ana"));
  }

  #[test]
  fn emphasis_follows_active_group() {
    let mut filter =
      LegendFilter::default();
    assert_eq!(
      filter.cell_emphasis(Some("Juan")),
      Emphasis::Neutral
    );

    let _ = filter.toggle("Juan");
    assert_eq!(
      filter.cell_emphasis(Some("Juan")),
      Emphasis::Focused
    );
    assert_eq!(
      filter.cell_emphasis(Some("Ana")),
      Emphasis::Dimmed
    );
    assert_eq!(
      filter.cell_emphasis(None),
      Emphasis::Dimmed
    );
    assert_eq!(
      filter.legend_emphasis(Some("Ana")),
      Emphasis::Dimmed
    );
  }

  #[test]
  fn neutral_legend_resets_every_property(
  ) {
    let props: Vec<&str> =
      Emphasis::Neutral
        .legend_styles()
        .iter()
        .map(|(prop, _)| *prop)
        .collect();
    for prop in [
      "opacity",
      "transform",
      "box-shadow",
      "filter"
    ] {
      assert!(props.contains(&prop));
    }
    assert_eq!(
      Emphasis::Dimmed.cell_styles(),
      &[
        ("opacity", "0.3"),
        ("filter", "grayscale(80%)")
      ]
    );
  }
}
