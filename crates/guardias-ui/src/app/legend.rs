use gloo::events::EventListener;
use guardias_core::legend::{
  FilterChange,
  LegendFilter
};
use guardias_core::legend_tooltip;
use guardias_core::tooltip::DUTY_TOOLTIP_ID;
use web_sys::Element;

use super::{Page, tooltip, ui_debug};
use crate::dom;

pub(super) fn init(
  page: &Page
) -> anyhow::Result<()> {
  let items = dom::query_all(
    &page.document,
    dom::LEGEND_SELECTOR
  );
  tracing::debug!(
    items = items.len(),
    "binding legend items"
  );

  for item in items {
    dom::set_styles(
      &item,
      &[("cursor", "pointer")]
    );
    let page = page.clone();
    let target = item.clone();
    EventListener::new(
      &item,
      "click",
      move |_| {
        if let Err(error) =
          on_legend_click(&page, &target)
        {
          tracing::error!(
            error = %format!("{error:#}"),
            "legend click failed"
          );
        }
      }
    )
    .forget();
  }
  Ok(())
}

fn on_legend_click(
  page: &Page,
  item: &Element
) -> anyhow::Result<()> {
  let Some(group) =
    item.get_attribute("data-guardia")
  else {
    return Ok(());
  };

  let (change, filter) = {
    let mut state = page.state.borrow_mut();
    let change = state.legend.toggle(&group);
    (change, state.legend.clone())
  };
  paint(page, &filter);

  match change {
    | FilterChange::Cleared => {
      ui_debug(
        "legend.cleared",
        &group
      );
      tooltip::hide(
        &page.document,
        DUTY_TOOLTIP_ID
      );
    }
    | FilterChange::Activated(group) => {
      let holidays =
        item.get_attribute("data-feriados");
      let (_, cells) =
        dom::read_cells(&page.document);
      let (status, content) = legend_tooltip(
        &cells,
        &group,
        holidays.as_deref(),
        page.today()
      );
      tracing::info!(
        group = %group,
        on_duty = status.is_on_duty(),
        "legend group selected"
      );
      tooltip::render(
        &page.document,
        &content
      )?;
    }
  }
  Ok(())
}

/// Restyles every legend item and cell
/// for the current filter.
fn paint(page: &Page, filter: &LegendFilter) {
  for item in dom::query_all(
    &page.document,
    dom::LEGEND_SELECTOR
  ) {
    let group =
      item.get_attribute("data-guardia");
    dom::set_styles(
      &item,
      filter
        .legend_emphasis(group.as_deref())
        .legend_styles()
    );
  }

  let (elements, cells) =
    dom::read_cells(&page.document);
  for (element, cell) in
    elements.iter().zip(&cells)
  {
    dom::set_styles(
      element,
      filter
        .cell_emphasis(cell.group.as_deref())
        .cell_styles()
    );
  }
}
