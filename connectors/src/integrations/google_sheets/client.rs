use async_trait::async_trait;
use wakflo::form::{to_options, OptionsContext, OptionsLoader, SelectOption};
use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError, JsonValue};

use super::config::{DRIVE_BASE_URL, SHEETS_BASE_URL, SPREADSHEET_MIME_TYPE};

/// Client for the Sheets v4 API.
///
/// `base_url` replaces both the Sheets and Drive roots (tests point both at
/// one mock server).
pub fn sheets(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    bearer(auth, http, base_url.unwrap_or(SHEETS_BASE_URL))
}

/// Client for the Drive v3 API (spreadsheet listing).
pub fn drive(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    bearer(auth, http, base_url.unwrap_or(DRIVE_BASE_URL))
}

fn bearer(auth: &AuthContext, http: &HttpConfig, base_url: &str) -> Result<HttpClient, ConnectorError> {
    let token = auth.access_token()?;
    HttpClient::new(base_url, AuthScheme::Bearer(token.to_string()), http)
}

/// Drive query matching spreadsheets that are not in the trash.
pub fn spreadsheet_query() -> String {
    format!("mimeType='{}' and trashed=false", SPREADSHEET_MIME_TYPE)
}

/// Fetches the `sheets[].properties` of a spreadsheet.
pub async fn fetch_sheets(client: &HttpClient, spreadsheet_id: &str) -> Result<Vec<JsonValue>, ConnectorError> {
    let path = format!("/spreadsheets/{}", urlencoding::encode(spreadsheet_id));
    let spreadsheet = client
        .get(&path)
        .query("fields", "sheets.properties")
        .send()
        .await?;
    Ok(spreadsheet["sheets"].as_array().cloned().unwrap_or_default())
}

/// Dropdown of the user's spreadsheets.
pub struct SpreadsheetOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for SpreadsheetOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let client = drive(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let files = client
            .get("/files")
            .query("q", spreadsheet_query())
            .query("fields", "files(id,name)")
            .query("pageSize", 100)
            .send()
            .await?;
        Ok(to_options(&files["files"], "id", "name"))
    }
}

/// Dropdown of worksheet titles; depends on `spreadSheetId`.
pub struct WorksheetOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for WorksheetOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let spreadsheet_id = ctx.field("spreadSheetId")?;
        let client = sheets(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let sheets = fetch_sheets(&client, &spreadsheet_id).await?;
        Ok(sheets
            .iter()
            .filter_map(|sheet| sheet["properties"]["title"].as_str())
            .map(|title| SelectOption::new(title, title))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn options_ctx(input: JsonValue) -> OptionsContext {
        OptionsContext {
            auth: AuthContext::with_token("tok"),
            input,
            ..OptionsContext::default()
        }
    }

    #[tokio::test]
    async fn test_spreadsheet_options() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/files")
            .match_query(Matcher::UrlEncoded(
                "q".into(),
                "mimeType='application/vnd.google-apps.spreadsheet' and trashed=false".into(),
            ))
            .with_status(200)
            .with_body(r#"{"files": [{"id": "abc", "name": "Budget"}]}"#)
            .create_async()
            .await;

        let loader = SpreadsheetOptions {
            base_url: Some(server.url()),
        };
        let options = loader.load(&options_ctx(JsonValue::Null)).await.unwrap();
        assert_eq!(options, vec![SelectOption::new("abc", "Budget")]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_worksheet_options_depend_on_spreadsheet() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/spreadsheets/abc")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"sheets": [
                    {"properties": {"sheetId": 0, "title": "Sheet1"}},
                    {"properties": {"sheetId": 1, "title": "Totals"}}
                ]}"#,
            )
            .create_async()
            .await;

        let loader = WorksheetOptions {
            base_url: Some(server.url()),
        };

        let err = loader.load(&options_ctx(json!({}))).await.unwrap_err();
        assert!(matches!(err, ConnectorError::MissingField(ref f) if f == "spreadSheetId"));

        let options = loader
            .load(&options_ctx(json!({"spreadSheetId": "abc"})))
            .await
            .unwrap();
        assert_eq!(
            options,
            vec![SelectOption::new("Sheet1", "Sheet1"), SelectOption::new("Totals", "Totals")]
        );
    }
}
