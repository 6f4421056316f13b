use gloo::net::http::Request;
use guardias_core::control::FetchFailure;
use guardias_shared::ClimaResponse;

/// GET the forecast endpoint. The body
/// is decoded whatever the status code,
/// since the server reports its own
/// failures as `{"success": false}`.
pub async fn fetch_clima(
  url: &str
) -> Result<ClimaResponse, FetchFailure> {
  let response = Request::get(url)
    .send()
    .await
    .map_err(|e| {
      FetchFailure::Transport(e.to_string())
    })?;

  let status = response.status();
  let body =
    response.text().await.map_err(|e| {
      FetchFailure::Transport(e.to_string())
    })?;

  tracing::debug!(
    url,
    status,
    bytes = body.len(),
    "forecast response received"
  );

  serde_json::from_str::<ClimaResponse>(
    &body
  )
  .map_err(|e| {
    FetchFailure::Decode(e.to_string())
  })
}
