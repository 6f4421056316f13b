mod api;
mod app;
mod dom;

use guardias_core::config::PageConfig;

const PAGE_CONFIG_TOML: &str =
  include_str!("../assets/guardias.toml");

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting guardias page script"
  );

  let config =
    PageConfig::load_or_default(
      PAGE_CONFIG_TOML
    );

  app::start_when_ready(config);
}
