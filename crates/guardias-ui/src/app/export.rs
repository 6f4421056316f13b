use gloo::events::EventListener;
use guardias_core::export::{
  RenderOptions,
  export_filename,
  export_title,
  year_navigation_path
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{
  JsFuture,
  spawn_local
};
use web_sys::{
  HtmlAnchorElement,
  HtmlButtonElement,
  HtmlCanvasElement,
  HtmlElement
};

use super::Page;
use crate::dom::{self, js_err};

const BUSY_LABEL: &str = "Generando...";

#[wasm_bindgen]
extern "C" {
  /// Global from the page's html2canvas
  /// script tag.
  #[wasm_bindgen(js_name = html2canvas, catch)]
  fn html2canvas(
    element: &HtmlElement,
    options: &JsValue
  ) -> Result<js_sys::Promise, JsValue>;
}

pub(super) fn init(
  page: &Page
) -> anyhow::Result<()> {
  let Some(button) =
    dom::by_id::<HtmlButtonElement>(
      &page.document,
      dom::DOWNLOAD_BUTTON_ID
    )
  else {
    return Ok(());
  };

  let page = page.clone();
  let target = button.clone();
  EventListener::new(
    &button,
    "click",
    move |_| {
      let page = page.clone();
      let button = target.clone();
      spawn_local(async move {
        if let Err(error) =
          download(&page, &button).await
        {
          tracing::error!(
            error = %format!("{error:#}"),
            "calendar export failed"
          );
        }
      });
    }
  )
  .forget();
  Ok(())
}

async fn download(
  page: &Page,
  button: &HtmlButtonElement
) -> anyhow::Result<()> {
  let Some(calendar) =
    dom::by_id::<HtmlElement>(
      &page.document,
      dom::CALENDAR_ID
    )
  else {
    tracing::warn!(
      "no calendar to export"
    );
    return Ok(());
  };
  let year = page.year();

  let original = button.inner_html();
  button.set_text_content(Some(BUSY_LABEL));
  button.set_disabled(true);

  let result =
    render(page, &calendar, year).await;

  button.set_inner_html(&original);
  button.set_disabled(false);
  result
}

fn create_html(
  page: &Page,
  tag: &str
) -> anyhow::Result<HtmlElement> {
  page
    .document
    .create_element(tag)
    .map_err(js_err)?
    .dyn_into::<HtmlElement>()
    .map_err(|_| {
      anyhow::anyhow!("<{tag}> is not an HtmlElement")
    })
}

fn computed(
  element: &HtmlElement,
  property: &str
) -> String {
  dom::window()
    .ok()
    .and_then(|window| {
      window
        .get_computed_style(element)
        .ok()
        .flatten()
    })
    .and_then(|style| {
      style.get_property_value(property).ok()
    })
    .unwrap_or_default()
}

/// Renders an off-flow copy of the
/// calendar under a title and downloads
/// it as PNG. The copy is removed again
/// whether or not rendering succeeds.
async fn render(
  page: &Page,
  calendar: &HtmlElement,
  year: i32
) -> anyhow::Result<()> {
  let body = page
    .document
    .body()
    .ok_or_else(|| {
      anyhow::anyhow!("document has no body")
    })?;
  let background =
    computed(calendar, "background-color");
  let padding = format!(
    "{}px",
    page.config.export.padding_px
  );

  let wrapper = create_html(page, "div")?;
  dom::set_styles(
    &wrapper,
    &[
      ("background", background.as_str()),
      ("padding", padding.as_str()),
      ("display", "inline-block")
    ]
  );

  let title = create_html(page, "h2")?;
  title.set_text_content(Some(
    &export_title(year)
  ));
  let color = computed(&body, "color");
  let font = computed(&body, "font-family");
  dom::set_styles(
    &title,
    &[
      ("text-align", "center"),
      ("margin-bottom", "15px"),
      ("color", color.as_str()),
      ("font-family", font.as_str())
    ]
  );

  let copy = calendar
    .clone_node_with_deep(true)
    .map_err(js_err)?
    .dyn_into::<HtmlElement>()
    .map_err(|_| {
      anyhow::anyhow!("calendar copy is not an HtmlElement")
    })?;
  let width = format!(
    "{}px",
    calendar.scroll_width()
  );
  dom::set_styles(
    &copy,
    &[
      ("overflow", "visible"),
      ("width", width.as_str()),
      ("max-width", "none")
    ]
  );

  wrapper.append_child(&title).map_err(js_err)?;
  wrapper.append_child(&copy).map_err(js_err)?;
  body.append_child(&wrapper).map_err(js_err)?;

  let canvas = capture(page, &wrapper).await;
  wrapper.remove();
  let canvas = canvas?;

  let data_url =
    canvas.to_data_url().map_err(js_err)?;
  let link = page
    .document
    .create_element("a")
    .map_err(js_err)?
    .dyn_into::<HtmlAnchorElement>()
    .map_err(|_| {
      anyhow::anyhow!("<a> is not an anchor")
    })?;
  let filename = export_filename(year);
  link.set_download(&filename);
  link.set_href(&data_url);
  link.click();

  tracing::info!(
    file = %filename,
    "calendar exported"
  );
  Ok(())
}

async fn capture(
  page: &Page,
  wrapper: &HtmlElement
) -> anyhow::Result<HtmlCanvasElement> {
  let background = computed(
    &page
      .document
      .body()
      .ok_or_else(|| {
        anyhow::anyhow!("document has no body")
      })?,
    "background-color"
  );
  let options = RenderOptions::for_wrapper(
    &background,
    page.config.export.scale,
    f64::from(wrapper.scroll_width()),
    f64::from(wrapper.scroll_height())
  );
  let options =
    serde_wasm_bindgen::to_value(&options)
      .map_err(|e| {
        anyhow::anyhow!(
          "failed encoding render options: {e}"
        )
      })?;

  let promise =
    html2canvas(wrapper, &options).map_err(js_err)?;
  JsFuture::from(promise)
    .await
    .map_err(js_err)?
    .dyn_into::<HtmlCanvasElement>()
    .map_err(|_| {
      anyhow::anyhow!("html2canvas did not return a canvas")
    })
}

/// Follows a `data-year-delta` button to
/// the neighbouring year's page.
pub(super) fn navigate_year(
  page: &Page,
  delta: Option<&str>
) -> anyhow::Result<()> {
  let Some(path) = year_navigation_path(
    &page.config.navigation.base_path,
    page.year(),
    delta
  ) else {
    tracing::warn!(
      delta = ?delta,
      "ignoring year button without a numeric delta"
    );
    return Ok(());
  };

  tracing::info!(path = %path, "navigating to year");
  dom::window()?
    .location()
    .set_href(&path)
    .map_err(js_err)
}
