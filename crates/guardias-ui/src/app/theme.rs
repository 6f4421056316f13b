use gloo::events::EventListener;
use guardias_core::theme::{
  LEGACY_THEME_STORAGE_KEY,
  THEME_ATTRIBUTE,
  THEME_CHANGED_EVENT,
  THEME_STORAGE_KEY,
  ThemeMode,
  is_theme_key
};
use guardias_shared::ThemeChangedDetail;
use wasm_bindgen::JsCast;
use web_sys::{
  CustomEvent,
  CustomEventInit,
  Document,
  HtmlInputElement,
  Storage,
  StorageEvent
};

use super::Page;
use crate::dom;

fn local_storage() -> Option<Storage> {
  web_sys::window().and_then(|window| {
    window.local_storage().ok().flatten()
  })
}

fn load_theme_mode() -> ThemeMode {
  let storage = local_storage();
  let read = |key: &str| {
    storage.as_ref().and_then(|storage| {
      storage.get_item(key).ok().flatten()
    })
  };

  ThemeMode::resolve_saved(
    read(THEME_STORAGE_KEY).as_deref(),
    read(LEGACY_THEME_STORAGE_KEY)
      .as_deref()
  )
}

/// Writes both keys so older pages on
/// the same origin stay in sync.
fn save_theme_mode(theme: ThemeMode) {
  if let Some(storage) = local_storage() {
    for key in [
      THEME_STORAGE_KEY,
      LEGACY_THEME_STORAGE_KEY
    ] {
      if let Err(error) = storage
        .set_item(key, theme.storage_value())
      {
        tracing::warn!(
          key,
          error = ?error,
          "failed saving theme"
        );
      }
    }
  }
}

fn apply_theme(
  document: &Document,
  theme: ThemeMode
) {
  let applied = document
    .document_element()
    .map(|root| {
      root.set_attribute(
        THEME_ATTRIBUTE,
        theme.storage_value()
      )
    });
  if let Some(Err(error)) = applied {
    tracing::warn!(
      error = ?error,
      "failed applying theme attribute"
    );
  }

  if let Some(checkbox) =
    dom::by_id::<HtmlInputElement>(
      document,
      dom::THEME_CHECKBOX_ID
    )
  {
    checkbox
      .set_checked(theme.checkbox_checked());
  }
}

fn broadcast(
  theme: ThemeMode
) -> anyhow::Result<()> {
  let detail = serde_wasm_bindgen::to_value(
    &ThemeChangedDetail {
      theme: theme
        .storage_value()
        .to_string()
    }
  )
  .map_err(|e| {
    anyhow::anyhow!(
      "failed encoding theme detail: {e}"
    )
  })?;

  let init = CustomEventInit::new();
  init.set_detail(&detail);
  let event =
    CustomEvent::new_with_event_init_dict(
      THEME_CHANGED_EVENT,
      &init
    )
    .map_err(dom::js_err)?;
  dom::window()?
    .dispatch_event(&event)
    .map_err(dom::js_err)?;
  Ok(())
}

fn select(
  document: &Document,
  theme: ThemeMode
) {
  apply_theme(document, theme);
  save_theme_mode(theme);
  if let Err(error) = broadcast(theme) {
    tracing::warn!(
      error = %format!("{error:#}"),
      "failed broadcasting theme change"
    );
  }
}

pub(super) fn init(
  page: &Page
) -> anyhow::Result<()> {
  let saved = load_theme_mode();
  tracing::debug!(
    theme = saved.storage_value(),
    "restoring saved theme"
  );
  select(&page.document, saved);

  if let Some(checkbox) =
    dom::by_id::<HtmlInputElement>(
      &page.document,
      dom::THEME_CHECKBOX_ID
    )
  {
    let document = page.document.clone();
    let target = checkbox.clone();
    EventListener::new(
      &checkbox,
      "change",
      move |_| {
        select(
          &document,
          ThemeMode::from_checkbox(
            target.checked()
          )
        );
      }
    )
    .forget();
  }

  let window = dom::window()?;

  let document = page.document.clone();
  EventListener::new(
    &window,
    "storage",
    move |event| {
      let Some(event) =
        event.dyn_ref::<StorageEvent>()
      else {
        return;
      };
      if !is_theme_key(
        event.key().as_deref()
      ) {
        return;
      }
      if let Some(value) = event
        .new_value()
        .filter(|value| !value.is_empty())
      {
        apply_theme(
          &document,
          ThemeMode::from_stored(&value)
        );
      }
    }
  )
  .forget();

  let document = page.document.clone();
  EventListener::new(
    &window,
    THEME_CHANGED_EVENT,
    move |event| {
      let Some(event) =
        event.dyn_ref::<CustomEvent>()
      else {
        return;
      };
      match serde_wasm_bindgen::from_value::<
        ThemeChangedDetail
      >(event.detail())
      {
        | Ok(detail) => apply_theme(
          &document,
          ThemeMode::from_stored(
            &detail.theme
          )
        ),
        | Err(error) => {
          tracing::debug!(
            error = %error,
            "ignoring theme event without detail"
          );
        }
      }
    }
  )
  .forget();

  Ok(())
}
