pub mod calendar;
pub mod config;
pub mod control;
pub mod datetime;
pub mod export;
pub mod forecast;
pub mod legend;
pub mod resolver;
pub mod theme;
pub mod tooltip;

use chrono::NaiveDate;

use crate::calendar::CalendarCell;
use crate::resolver::DutyStatus;
use crate::tooltip::TooltipContent;

/// Resolves `group` against the cells
/// read from the page and builds the
/// legend tooltip for it.
#[tracing::instrument(
  skip(cells, holidays),
  fields(cells = cells.len())
)]
pub fn legend_tooltip(
  cells: &[CalendarCell],
  group: &str,
  holidays: Option<&str>,
  today: NaiveDate
) -> (DutyStatus, TooltipContent) {
  let dates = calendar::duty_dates(cells);
  let status =
    resolver::resolve(group, &dates, today);
  let content = tooltip::duty_tooltip(
    group, &status, holidays
  );
  (status, content)
}
