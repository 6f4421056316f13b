use anyhow::anyhow;
use guardias_core::calendar::CalendarCell;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
  Document,
  Element,
  HtmlElement,
  Window
};

pub const CELL_SELECTOR: &str =
  ".dia-celda";
pub const LEGEND_SELECTOR: &str =
  ".leyenda-item";
pub const YEAR_DELTA_SELECTOR: &str =
  "[data-year-delta]";
pub const CALENDAR_ID: &str =
  "calendario-captura";
pub const CLIMA_BUTTON_ID: &str =
  "btn-clima";
pub const DOWNLOAD_BUTTON_ID: &str =
  "btn-download";
pub const THEME_CHECKBOX_ID: &str =
  "theme-checkbox";

pub fn js_err(error: JsValue) -> anyhow::Error {
  anyhow!("{error:?}")
}

pub fn window() -> anyhow::Result<Window> {
  web_sys::window()
    .ok_or_else(|| anyhow!("no global window"))
}

pub fn document() -> anyhow::Result<Document>
{
  window()?.document().ok_or_else(|| {
    anyhow!("window has no document")
  })
}

pub fn by_id<T: JsCast>(
  document: &Document,
  id: &str
) -> Option<T> {
  document
    .get_element_by_id(id)?
    .dyn_into::<T>()
    .ok()
}

pub fn query_all(
  document: &Document,
  selector: &str
) -> Vec<Element> {
  match document.query_selector_all(selector)
  {
    | Ok(list) => {
      (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| {
          node.dyn_into::<Element>().ok()
        })
        .collect()
    }
    | Err(error) => {
      tracing::error!(
        selector,
        error = ?error,
        "selector query failed"
      );
      Vec::new()
    }
  }
}

/// Applies inline declarations; an empty
/// value removes the property.
pub fn set_styles(
  element: &Element,
  styles: &[(&str, &str)]
) {
  let Some(html) =
    element.dyn_ref::<HtmlElement>()
  else {
    return;
  };
  let style = html.style();

  for (property, value) in styles {
    let result = if value.is_empty() {
      style
        .remove_property(property)
        .map(|_| ())
    } else {
      style.set_property(property, value)
    };
    if let Err(error) = result {
      tracing::warn!(
        property,
        error = ?error,
        "failed setting style"
      );
    }
  }
}

pub fn read_cell(
  element: &Element
) -> CalendarCell {
  CalendarCell::from_attributes(
    element
      .get_attribute("data-fecha")
      .as_deref(),
    element
      .get_attribute("data-guardia")
      .as_deref(),
    element
      .get_attribute("data-es-hoy")
      .as_deref()
  )
}

/// Calendar cells in document order,
/// paired with what they carry.
pub fn read_cells(
  document: &Document
) -> (Vec<Element>, Vec<CalendarCell>) {
  let elements =
    query_all(document, CELL_SELECTOR);
  let cells =
    elements.iter().map(read_cell).collect();
  (elements, cells)
}

/// The first `span.<class>` under
/// `parent`, created when missing.
pub fn ensure_child(
  document: &Document,
  parent: &Element,
  class: &str
) -> anyhow::Result<Element> {
  if let Some(existing) = parent
    .query_selector(&format!(".{class}"))
    .map_err(js_err)?
  {
    return Ok(existing);
  }

  let child = document
    .create_element("span")
    .map_err(js_err)?;
  child.set_class_name(class);
  parent
    .append_child(&child)
    .map_err(js_err)?;
  Ok(child)
}

pub fn remove_by_id(
  document: &Document,
  id: &str
) {
  if let Some(element) =
    document.get_element_by_id(id)
  {
    element.remove();
  }
}
