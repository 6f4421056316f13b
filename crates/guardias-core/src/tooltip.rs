use crate::datetime::format_display_date;
use crate::resolver::DutyStatus;

pub const DUTY_TOOLTIP_ID: &str =
  "guardia-tooltip";
pub const CLIMA_TOOLTIP_ID: &str =
  "clima-tooltip-custom";
const TOOLTIP_GAP_PX: f64 = 10.0;
const UNAVAILABLE_LABEL: &str =
  "No disponible";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipLine {
  pub class:   &'static str,
  pub text:    String,
  pub strong:  bool,
  /// Extra element the line is nested
  /// in, for stylesheet compatibility.
  pub wrapper: Option<&'static str>
}

impl TooltipLine {
  fn plain(
    class: &'static str,
    text: impl Into<String>
  ) -> Self {
    Self {
      class,
      text: text.into(),
      strong: false,
      wrapper: None
    }
  }

  fn strong(
    class: &'static str,
    text: impl Into<String>
  ) -> Self {
    Self {
      strong: true,
      ..Self::plain(class, text)
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
  pub id:    &'static str,
  pub class: &'static str,
  pub lines: Vec<TooltipLine>
}

impl TooltipContent {
  /// Lines joined with newlines; handy
  /// for logging and tests.
  #[must_use]
  pub fn plain_text(&self) -> String {
    self
      .lines
      .iter()
      .map(|line| line.text.as_str())
      .collect::<Vec<_>>()
      .join("\n")
  }
}

/// Tooltip shown after clicking a
/// legend item.
#[must_use]
pub fn duty_tooltip(
  group: &str,
  status: &DutyStatus,
  holidays: Option<&str>
) -> TooltipContent {
  let mut lines = vec![TooltipLine::plain(
    "tooltip-title",
    group
  )];

  match status {
    | DutyStatus::OnDuty {
      block,
      days_remaining
    } => {
      lines.push(TooltipLine::strong(
        "tooltip-detail",
        "Guardia actual"
      ));
      lines.push(TooltipLine::plain(
        "tooltip-detail",
        format!(
          "Hasta: {}",
          format_display_date(block.end)
        )
      ));
      lines.push(TooltipLine::plain(
        "tooltip-detail",
        format!(
          "Quedan: {days_remaining} días"
        )
      ));
    }
    | DutyStatus::Upcoming { .. }
    | DutyStatus::Unavailable => {
      lines.push(TooltipLine::strong(
        "tooltip-detail",
        "Próxima guardia"
      ));
      lines.push(TooltipLine::plain(
        "tooltip-detail",
        format!(
          "En {} días",
          status.days_until_next()
        )
      ));
      lines.push(TooltipLine::plain(
        "tooltip-detail",
        status
          .next_date()
          .map(format_display_date)
          .unwrap_or_else(|| {
            UNAVAILABLE_LABEL.to_string()
          })
      ));
    }
  }

  if let Some(count) = holidays
    .map(str::trim)
    .filter(|count| !count.is_empty())
  {
    lines.push(TooltipLine {
      wrapper: Some("tooltip-feriados"),
      ..TooltipLine::plain(
        "feriados-count",
        format!("{count} feriados/año")
      )
    });
  }

  TooltipContent {
    id: DUTY_TOOLTIP_ID,
    class: "guardia-tooltip",
    lines
  }
}

/// Tooltip shown while hovering a cell
/// that carries a forecast.
#[must_use]
pub fn clima_tooltip(
  group: Option<&str>,
  icon: &str,
  avg_attr: Option<&str>
) -> TooltipContent {
  let mut lines = vec![
    TooltipLine::plain(
      "tooltip-guardia-name",
      group.unwrap_or_default()
    ),
    TooltipLine::plain(
      "tooltip-clima-emoji",
      icon
    ),
  ];

  if let Some(avg) = avg_attr
    .map(str::trim)
    .filter(|avg| {
      !avg.is_empty() && *avg != "null"
    })
  {
    lines.push(TooltipLine::plain(
      "tooltip-temps",
      format!("Temp. media: {avg}°C")
    ));
  }

  TooltipContent {
    id: CLIMA_TOOLTIP_ID,
    class: "clima-tooltip-custom",
    lines
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq,
)]
pub struct Rect {
  pub left:   f64,
  pub top:    f64,
  pub width:  f64,
  pub height: f64
}

/// Document coordinates that centre a
/// tooltip of `size` (width, height)
/// just above `anchor`, given the
/// anchor's viewport rect.
#[must_use]
pub fn place_above(
  anchor: Rect,
  size: (f64, f64),
  scroll_y: f64
) -> (f64, f64) {
  let (width, height) = size;
  let left = anchor.left
    + anchor.width / 2.0
    - width / 2.0;
  let top = anchor.top
    - height
    - TOOLTIP_GAP_PX
    + scroll_y;
  (left, top)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::resolver::DutyBlock;

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
  fn on_duty_tooltip_shows_end_and_remaining(
  ) {
    let status = DutyStatus::OnDuty {
      block:          DutyBlock {
        start: ymd(2025, 1, 7),
        end:   ymd(2025, 1, 20)
      },
      days_remaining: 4
    };
    let content = duty_tooltip(
      "Juan",
      &status,
      Some("3")
    );
    assert_eq!(
      content.plain_text(),
      "Juan\nGuardia actual\nHasta: \
       20/01/2025\nQuedan: 4 días\n3 \
       feriados/año"
    );
    assert!(content.lines[1].strong);
    assert_eq!(
      content.lines[4].wrapper,
      Some("tooltip-feriados")
    );
  }

  #[test]
  fn upcoming_tooltip_shows_next_date() {
    let status = DutyStatus::Upcoming {
      next:       ymd(2025, 3, 5),
      days_until: 9
    };
    let content =
      duty_tooltip("Ana", &status, None);
    assert_eq!(
      content.plain_text(),
      "Ana\nPróxima guardia\nEn 9 \
       días\n05/03/2025"
    );
  }

  #[test]
  fn unavailable_tooltip_says_so() {
    let content = duty_tooltip(
      "Pedro",
      &DutyStatus::Unavailable,
      Some(" ")
    );
    assert_eq!(
      content.plain_text(),
      "Pedro\nPróxima guardia\nEn 0 \
       días\nNo disponible"
    );
  }

  #[test]
  fn clima_tooltip_omits_missing_average()
  {
    let with_avg = clima_tooltip(
      Some("Maria"),
      "⛅",
      Some("17")
    );
    assert_eq!(
      with_avg.plain_text(),
      "Maria\n⛅\nTemp. media: 17°C"
    );

    for missing in
      [None, Some(""), Some("null")]
    {
      let content = clima_tooltip(
        Some("Maria"),
        "⛅",
        missing
      );
      assert_eq!(content.lines.len(), 2);
    }
  }

  #[test]
  fn tooltip_is_centred_above_anchor() {
    let anchor = Rect {
      left:   100.0,
      top:    200.0,
      width:  40.0,
      height: 30.0
    };
    assert_eq!(
      place_above(
        anchor,
        (80.0, 50.0),
        300.0
      ),
      (80.0, 440.0)
    );
  }
}
