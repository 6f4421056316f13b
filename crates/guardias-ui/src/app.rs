mod clima;
mod export;
mod legend;
mod notify;
mod theme;
mod tooltip;

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Datelike, NaiveDate};
use gloo::console::log;
use gloo::events::EventListener;
use guardias_core::calendar::today_cells;
use guardias_core::config::PageConfig;
use guardias_core::control::ControlState;
use guardias_core::export::page_year;
use guardias_core::legend::LegendFilter;
use web_sys::Document;

use crate::dom;

const TODAY_CLASS: &str = "today";

/// Mutable page state shared by the
/// event handlers.
#[derive(Debug)]
pub struct UiState {
  pub legend: LegendFilter,
  pub clima:  ControlState
}

impl Default for UiState {
  fn default() -> Self {
    Self {
      legend: LegendFilter::default(),
      clima:  ControlState::Idle
    }
  }
}

/// Everything a handler needs; cheap to
/// clone into closures.
#[derive(Clone)]
pub struct Page {
  pub config:   Rc<PageConfig>,
  pub document: Document,
  pub state:    Rc<RefCell<UiState>>
}

impl Page {
  fn new(
    config: PageConfig
  ) -> anyhow::Result<Self> {
    Ok(Self {
      config:   Rc::new(config),
      document: dom::document()?,
      state:    Rc::new(RefCell::new(
        UiState::default()
      ))
    })
  }

  /// Read on every use so a page left
  /// open past midnight moves on.
  pub fn today(&self) -> NaiveDate {
    self.config.today()
  }

  pub fn year(&self) -> i32 {
    let attr = self
      .document
      .get_element_by_id(dom::CALENDAR_ID)
      .and_then(|calendar| {
        calendar.get_attribute("data-anio")
      });
    page_year(
      attr.as_deref(),
      self.today().year()
    )
  }
}

/// Runs [`start`] once the document has
/// been parsed.
pub fn start_when_ready(config: PageConfig) {
  let document = match dom::document() {
    | Ok(document) => document,
    | Err(error) => {
      tracing::error!(
        error = %format!("{error:#}"),
        "page script has no document"
      );
      return;
    }
  };

  if document.ready_state() == "loading" {
    EventListener::once(
      &document,
      "DOMContentLoaded",
      move |_| start(config)
    )
    .forget();
  } else {
    start(config);
  }
}

fn start(config: PageConfig) {
  let page = match Page::new(config) {
    | Ok(page) => page,
    | Err(error) => {
      tracing::error!(
        error = %format!("{error:#}"),
        "failed preparing page"
      );
      return;
    }
  };

  let steps: [(&str, anyhow::Result<()>); 6] = [
    ("theme", theme::init(&page)),
    ("today", highlight_today(&page)),
    ("legend", legend::init(&page)),
    ("clima", clima::init(&page)),
    ("export", export::init(&page)),
    (
      "navigation",
      init_year_navigation(&page)
    ),
  ];

  for (step, result) in steps {
    if let Err(error) = result {
      tracing::error!(
        step,
        error = %format!("{error:#}"),
        "failed initializing page feature"
      );
    }
  }

  ui_debug(
    "page.ready",
    "calendar handlers bound"
  );
}

fn highlight_today(
  page: &Page
) -> anyhow::Result<()> {
  let (elements, cells) =
    dom::read_cells(&page.document);

  for index in today_cells(&cells) {
    if let Some(element) = elements.get(index)
    {
      element
        .class_list()
        .add_1(TODAY_CLASS)
        .map_err(dom::js_err)?;
    }
  }
  Ok(())
}

fn init_year_navigation(
  page: &Page
) -> anyhow::Result<()> {
  for button in dom::query_all(
    &page.document,
    dom::YEAR_DELTA_SELECTOR
  ) {
    let page = page.clone();
    let target = button.clone();
    EventListener::new(
      &button,
      "click",
      move |_| {
        let delta = target
          .get_attribute("data-year-delta");
        if let Err(error) =
          export::navigate_year(
            &page,
            delta.as_deref()
          )
        {
          tracing::error!(
            error = %format!("{error:#}"),
            "year navigation failed"
          );
        }
      }
    )
    .forget();
  }
  Ok(())
}

fn ui_debug(event: &str, detail: &str) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}
