use gloo::timers::callback::Timeout;

use super::Page;
use crate::dom::{self, js_err};

const NOTIFICATION_ID: &str =
  "notificacion-clima";
const SHOW_CLASS: &str = "show";
const SHOW_DELAY_MS: u32 = 10;
const FADE_OUT_MS: u32 = 300;

/// Shows `message` as the only
/// notification on the page, removed
/// after the configured delay.
pub(super) fn show(
  page: &Page,
  message: &str
) -> anyhow::Result<()> {
  let document = &page.document;
  dom::remove_by_id(document, NOTIFICATION_ID);

  let notification = document
    .create_element("div")
    .map_err(js_err)?;
  notification.set_id(NOTIFICATION_ID);
  notification.set_class_name(NOTIFICATION_ID);
  notification.set_text_content(Some(message));
  document
    .body()
    .ok_or_else(|| {
      anyhow::anyhow!("document has no body")
    })?
    .append_child(&notification)
    .map_err(js_err)?;

  let shown = notification.clone();
  Timeout::new(SHOW_DELAY_MS, move || {
    let _ = shown.class_list().add_1(SHOW_CLASS);
  })
  .forget();

  Timeout::new(
    page.config.notifications.visible_ms,
    move || {
      let _ = notification
        .class_list()
        .remove_1(SHOW_CLASS);
      Timeout::new(FADE_OUT_MS, move || {
        notification.remove();
      })
      .forget();
    }
  )
  .forget();

  Ok(())
}
