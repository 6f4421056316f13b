use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use guardias_core::calendar::{
  ApplySummary,
  plan_forecast,
  summarize
};
use guardias_core::control::{
  ControlState,
  FetchOutcome,
  resolve_clima_url
};
use guardias_core::forecast::ForecastBatch;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlButtonElement;

use super::{Page, notify, tooltip};
use crate::api::fetch_clima;
use crate::dom::{self, js_err};

const ICON_CLASS: &str = "clima-emoji";
const STALE_TEMP_CLASS: &str = "clima-temp";
const LABEL_CLASS: &str = "btn-clima-text";

pub(super) fn init(
  page: &Page
) -> anyhow::Result<()> {
  let Some(button) =
    dom::by_id::<HtmlButtonElement>(
      &page.document,
      dom::CLIMA_BUTTON_ID
    )
  else {
    tracing::debug!(
      "no forecast button on page"
    );
    return Ok(());
  };

  render_control(
    page,
    &button,
    ControlState::Idle
  )?;

  let page = page.clone();
  let target = button.clone();
  EventListener::new(
    &button,
    "click",
    move |_| request(&page, &target)
  )
  .forget();
  Ok(())
}

fn render_label(
  page: &Page,
  button: &HtmlButtonElement,
  label: &str
) -> anyhow::Result<()> {
  let slot = dom::ensure_child(
    &page.document,
    button,
    LABEL_CLASS
  )?;
  slot.set_text_content(Some(label));
  Ok(())
}

fn render_control(
  page: &Page,
  button: &HtmlButtonElement,
  state: ControlState
) -> anyhow::Result<()> {
  let view = state.view();
  render_label(page, button, view.label)?;
  button.set_title(view.title);
  button.set_disabled(view.disabled);
  dom::set_styles(
    button,
    &[("opacity", view.opacity)]
  );
  Ok(())
}

fn request(
  page: &Page,
  button: &HtmlButtonElement
) {
  {
    let mut state = page.state.borrow_mut();
    if !state.clima.accepts_request() {
      tracing::debug!(
        state = ?state.clima,
        "ignoring forecast click"
      );
      return;
    }
    state.clima = ControlState::Loading;
  }
  if let Err(error) = render_control(
    page,
    button,
    ControlState::Loading
  ) {
    tracing::warn!(
      error = %format!("{error:#}"),
      "failed rendering loading state"
    );
  }

  let pathname = dom::window()
    .and_then(|window| {
      window
        .location()
        .pathname()
        .map_err(js_err)
    })
    .unwrap_or_default();
  let url = resolve_clima_url(
    button
      .get_attribute("data-clima-url")
      .as_deref(),
    page.config.clima.endpoint.as_deref(),
    &pathname
  );
  tracing::info!(url = %url, "requesting forecast");

  let page = page.clone();
  let button = button.clone();
  spawn_local(async move {
    let outcome =
      FetchOutcome::classify(fetch_clima(&url).await);

    if let FetchOutcome::Loaded(batch) = &outcome
    {
      match apply(&page, batch) {
        | Ok(summary) => tracing::info!(
          matched_days = summary.matched_days,
          updated_cells = summary.updated_cells,
          "forecast applied"
        ),
        | Err(error) => tracing::error!(
          error = %format!("{error:#}"),
          "failed applying forecast"
        )
      }
    }

    let next = outcome.control_state();
    page.state.borrow_mut().clima = next;
    if let Err(error) =
      render_control(&page, &button, next)
    {
      tracing::warn!(
        error = %format!("{error:#}"),
        "failed rendering request state"
      );
    }
    if let Err(error) =
      notify::show(&page, outcome.notification())
    {
      tracing::warn!(
        error = %format!("{error:#}"),
        "failed showing notification"
      );
    }

    if next.resets_label() {
      schedule_label_reset(page, button);
    }
  });
}

/// Puts the idle label back on a failed
/// button unless another request moved
/// it on in the meantime.
fn schedule_label_reset(
  page: Page,
  button: HtmlButtonElement
) {
  let delay =
    page.config.notifications.retry_label_reset_ms;
  Timeout::new(delay, move || {
    let state = page.state.borrow().clima;
    if !state.resets_label() {
      return;
    }
    if let Err(error) = render_label(
      &page,
      &button,
      ControlState::Idle.view().label
    ) {
      tracing::warn!(
        error = %format!("{error:#}"),
        "failed resetting button label"
      );
    }
  })
  .forget();
}

/// Writes the forecast onto every
/// matching cell. Repeated runs replace
/// the icon and attributes in place.
fn apply(
  page: &Page,
  batch: &ForecastBatch
) -> anyhow::Result<ApplySummary> {
  let (elements, cells) =
    dom::read_cells(&page.document);
  let plan = plan_forecast(&cells, batch);
  let summary = summarize(&cells, &plan);

  for update in &plan {
    let Some(element) =
      elements.get(update.index)
    else {
      continue;
    };

    let icon = dom::ensure_child(
      &page.document,
      element,
      ICON_CLASS
    )?;
    icon.set_text_content(Some(
      &update.weather.icon
    ));

    if let Some(stale) = element
      .query_selector(&format!(
        ".{STALE_TEMP_CLASS}"
      ))
      .map_err(js_err)?
    {
      stale.remove();
    }

    for (name, value) in
      update.weather.attributes()
    {
      element
        .set_attribute(name, &value)
        .map_err(js_err)?;
    }

    tooltip::bind_clima_hover(page, element)?;
  }

  Ok(summary)
}
