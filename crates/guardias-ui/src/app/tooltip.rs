use gloo::events::EventListener;
use guardias_core::forecast::{
  ATTR_CLIMA_ICON,
  ATTR_TEMP_AVG
};
use guardias_core::tooltip::{
  CLIMA_TOOLTIP_ID,
  Rect,
  TooltipContent,
  TooltipLine,
  clima_tooltip,
  place_above
};
use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  Element,
  HtmlElement
};

use super::Page;
use crate::dom::{self, js_err};

/// Set on cells whose hover listeners
/// are already attached.
const HOVER_BOUND_ATTR: &str =
  "data-clima-hover";

fn render_line(
  document: &Document,
  line: &TooltipLine
) -> anyhow::Result<Element> {
  let tag = if line.wrapper.is_some() {
    "span"
  } else {
    "div"
  };
  let element = document
    .create_element(tag)
    .map_err(js_err)?;
  element.set_class_name(line.class);

  if line.strong {
    let strong = document
      .create_element("strong")
      .map_err(js_err)?;
    strong.set_text_content(Some(&line.text));
    element
      .append_child(&strong)
      .map_err(js_err)?;
  } else {
    element.set_text_content(Some(&line.text));
  }

  match line.wrapper {
    | Some(class) => {
      let wrapper = document
        .create_element("div")
        .map_err(js_err)?;
      wrapper.set_class_name(class);
      wrapper
        .append_child(&element)
        .map_err(js_err)?;
      Ok(wrapper)
    }
    | None => Ok(element)
  }
}

/// Replaces any tooltip with the same id
/// and appends the new one to `body`.
/// Text goes in as text content only.
pub(super) fn render(
  document: &Document,
  content: &TooltipContent
) -> anyhow::Result<HtmlElement> {
  dom::remove_by_id(document, content.id);

  let tooltip = document
    .create_element("div")
    .map_err(js_err)?
    .dyn_into::<HtmlElement>()
    .map_err(|_| {
      anyhow::anyhow!("div is not an HtmlElement")
    })?;
  tooltip.set_id(content.id);
  tooltip.set_class_name(content.class);

  for line in &content.lines {
    tooltip
      .append_child(&render_line(
        document, line
      )?)
      .map_err(js_err)?;
  }

  document
    .body()
    .ok_or_else(|| {
      anyhow::anyhow!("document has no body")
    })?
    .append_child(&tooltip)
    .map_err(js_err)?;
  Ok(tooltip)
}

pub(super) fn hide(
  document: &Document,
  id: &str
) {
  dom::remove_by_id(document, id);
}

fn show_clima(
  document: &Document,
  cell: &Element
) -> anyhow::Result<()> {
  let Some(icon) =
    cell.get_attribute(ATTR_CLIMA_ICON)
  else {
    return Ok(());
  };
  let content = clima_tooltip(
    cell
      .get_attribute("data-guardia")
      .as_deref(),
    &icon,
    cell.get_attribute(ATTR_TEMP_AVG).as_deref()
  );
  let tooltip = render(document, &content)?;

  let anchor = cell.get_bounding_client_rect();
  let size = tooltip.get_bounding_client_rect();
  let scroll_y = dom::window()?
    .scroll_y()
    .map_err(js_err)?;
  let (left, top) = place_above(
    Rect {
      left:   anchor.left(),
      top:    anchor.top(),
      width:  anchor.width(),
      height: anchor.height()
    },
    (size.width(), size.height()),
    scroll_y
  );

  let left = format!("{left}px");
  let top = format!("{top}px");
  dom::set_styles(
    &tooltip,
    &[
      ("position", "absolute"),
      ("left", left.as_str()),
      ("top", top.as_str())
    ]
  );
  Ok(())
}

/// Attaches hover listeners once per
/// cell, however many times the forecast
/// is applied.
pub(super) fn bind_clima_hover(
  page: &Page,
  cell: &Element
) -> anyhow::Result<()> {
  if cell.has_attribute(HOVER_BOUND_ATTR) {
    return Ok(());
  }
  cell
    .set_attribute(HOVER_BOUND_ATTR, "1")
    .map_err(js_err)?;

  let document = page.document.clone();
  let target = cell.clone();
  EventListener::new(
    cell,
    "mouseenter",
    move |_| {
      if let Err(error) =
        show_clima(&document, &target)
      {
        tracing::warn!(
          error = %format!("{error:#}"),
          "failed showing forecast tooltip"
        );
      }
    }
  )
  .forget();

  let document = page.document.clone();
  EventListener::new(
    cell,
    "mouseleave",
    move |_| hide(&document, CLIMA_TOOLTIP_ID)
  )
  .forget();

  Ok(())
}
