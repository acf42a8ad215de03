use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError, JsonValue};

use super::config::BASE_URL;

/// Builds a client rooted at `/bot<token>`. The token lives in the URL, so
/// no auth header is sent.
pub fn connect(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    let token = auth.require("bot_token")?;
    let root = base_url.unwrap_or(BASE_URL).trim_end_matches('/');
    Ok(HttpClient::new(&format!("{}/bot{}", root, token), AuthScheme::None, http)?
        .with_error_extractor(extract_error))
}

fn extract_error(body: &JsonValue) -> Option<String> {
    body["description"].as_str().map(str::to_string)
}

/// Calls a Bot API method and unwraps the `{"ok": .., "result": ..}` envelope.
pub async fn call(client: &HttpClient, method: &str, body: JsonValue) -> Result<JsonValue, ConnectorError> {
    let response = client.post(&format!("/{}", method)).json(body).send().await?;
    unwrap_envelope(response)
}

fn unwrap_envelope(mut response: JsonValue) -> Result<JsonValue, ConnectorError> {
    if response["ok"].as_bool() == Some(true) {
        return Ok(response["result"].take());
    }
    let status = response["error_code"]
        .as_u64()
        .and_then(|code| u16::try_from(code).ok())
        .unwrap_or(200);
    Err(ConnectorError::Api {
        status,
        message: extract_error(&response).unwrap_or_else(|| "Telegram request was not ok".to_string()),
        body: response.to_string(),
    })
}
