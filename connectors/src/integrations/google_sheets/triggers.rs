use async_trait::async_trait;
use serde_json::json;
use tracing::debug;
use wakflo::form::Form;
use wakflo::polling::filter_array_since;
use wakflo::{ConnectorError, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::client::{drive, spreadsheet_query};
use super::config::DOCS_URL;

/// Emits spreadsheets created since the last poll.
///
/// Drive filters on `createdTime` server-side; the client-side pass drops the
/// boundary record Drive may still return.
pub struct NewSpreadsheet {
    base_url: Option<String>,
}

impl NewSpreadsheet {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[async_trait]
impl Trigger for NewSpreadsheet {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new(
            "new_spreadsheet",
            "New Spreadsheet",
            "Triggers when a spreadsheet is created in Google Drive",
        )
        .documentation(DOCS_URL)
        .sample_output(json!([{
            "id": "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms",
            "name": "Budget",
            "createdTime": "2026-02-18T12:00:00.000Z",
            "webViewLink": "https://docs.google.com/spreadsheets/d/1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms/edit"
        }]))
    }

    fn properties(&self) -> Form {
        Form::empty()
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        let window = ctx.state.window();
        let mut query = spreadsheet_query();
        if let Some(since) = window.since() {
            query.push_str(&format!(
                " and createdTime > '{}'",
                since.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            ));
        }

        let client = drive(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = client
            .get("/files")
            .query("q", query)
            .query("orderBy", "createdTime desc")
            .query("fields", "files(id,name,createdTime,webViewLink)")
            .send()
            .await?;

        let items = filter_array_since(&response, "files", "createdTime", &window);
        debug!(count = items.len(), "Google Sheets new_spreadsheet poll complete");
        Ok(TriggerOutput::new(items))
    }
}
