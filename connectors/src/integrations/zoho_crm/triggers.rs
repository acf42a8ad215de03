use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use wakflo::form::Form;
use wakflo::input;
use wakflo::polling::filter_array_since;
use wakflo::{ConnectorError, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::actions::module_field;
use super::client::{connect, module_path};
use super::config::DOCS_URL;

/// Emits records created in a module since the last poll.
///
/// `If-Modified-Since` narrows the listing server-side; it also matches
/// records that were only edited, so results are filtered on `Created_Time`.
pub struct NewRecord {
    base_url: Option<String>,
}

impl NewRecord {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct NewRecordProps {
    #[serde(default)]
    module: String,
}

#[async_trait]
impl Trigger for NewRecord {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new("new_record", "New Record", "Triggers when a record is created in a module")
            .documentation(DOCS_URL)
            .sample_output(json!([{
                "id": "4150868000001234001",
                "Last_Name": "Lovelace",
                "Created_Time": "2026-02-18T12:00:00+00:00"
            }]))
    }

    fn properties(&self) -> Form {
        Form::new(vec![module_field(&self.base_url)])
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        let props: NewRecordProps = ctx.input()?;
        input::require("module", &props.module)?;
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;

        let window = ctx.state.window();
        let mut request = client
            .get(&module_path(&props.module))
            .query("sort_by", "Created_Time")
            .query("sort_order", "desc")
            .query("per_page", 200)
            .accept_status(StatusCode::NOT_MODIFIED);
        if let Some(since) = window.since() {
            let header = since.to_rfc3339_opts(SecondsFormat::Secs, false);
            request = request.header("If-Modified-Since", &header);
        }
        // 204 (empty module) and 304 both decode to null
        let response = request.send().await?;

        let items = filter_array_since(&response, "data", "Created_Time", &window);
        debug!(count = items.len(), module = %props.module, "Zoho CRM new_record poll complete");
        Ok(TriggerOutput::new(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockito::{Matcher, Server};
    use wakflo::{AuthContext, PollState};

    const LEADS: &str = r#"{"data": [
        {"id": "2", "Last_Name": "Hopper", "Created_Time": "2026-02-18T09:00:00+00:00"},
        {"id": "1", "Last_Name": "Lovelace", "Created_Time": "2026-02-10T09:00:00+00:00"}
    ], "info": {"more_records": false}}"#;

    #[tokio::test]
    async fn test_poll_sends_if_modified_since() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/Leads")
            .match_header("if-modified-since", "2026-02-18T00:00:00+00:00")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("sort_by".into(), "Created_Time".into()),
                Matcher::UrlEncoded("sort_order".into(), "desc".into()),
            ]))
            .with_status(200)
            .with_body(LEADS)
            .create_async()
            .await;

        let trigger = NewRecord::new(Some(server.url()));
        let last_run = Utc.with_ymd_and_hms(2026, 2, 18, 0, 0, 0).unwrap();
        let ctx = TriggerContext::new(
            json!({"module": "Leads"}),
            AuthContext::with_token("z"),
            PollState::since(last_run),
        );
        let output = trigger.execute(&ctx).await.unwrap();
        assert_eq!(output.items.len(), 1);
        assert_eq!(output.items[0]["id"], "2");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_poll_not_modified() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/Leads")
            .match_query(Matcher::Any)
            .with_status(304)
            .create_async()
            .await;

        let trigger = NewRecord::new(Some(server.url()));
        let ctx = TriggerContext::new(
            json!({"module": "Leads"}),
            AuthContext::with_token("z"),
            PollState::since(Utc::now()),
        );
        let output = trigger.execute(&ctx).await.unwrap();
        assert!(output.items.is_empty());
    }

    #[tokio::test]
    async fn test_poll_requires_module() {
        let trigger = NewRecord::new(Some("http://127.0.0.1:1".to_string()));
        let ctx = TriggerContext::new(json!({}), AuthContext::with_token("z"), PollState::default());
        let err = trigger.execute(&ctx).await.unwrap_err();
        assert!(matches!(err, ConnectorError::MissingField(ref f) if f == "module"));
    }
}
