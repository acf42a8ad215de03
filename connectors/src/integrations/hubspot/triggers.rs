use async_trait::async_trait;
use serde_json::json;
use tracing::debug;
use wakflo::form::Form;
use wakflo::polling::filter_array_since;
use wakflo::{ConnectorError, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::client::{connect, search_contacts};
use super::config::DOCS_URL;

/// Emits contacts created since the last poll, via the CRM search API.
pub struct NewContact {
    base_url: Option<String>,
}

impl NewContact {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[async_trait]
impl Trigger for NewContact {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new("new_contact", "New Contact", "Triggers when a contact is created")
            .documentation(DOCS_URL)
            .sample_output(json!([{
                "id": "51",
                "properties": {"email": "ada@example.com", "createdate": "2026-02-18T12:00:00.000Z"},
                "createdAt": "2026-02-18T12:00:00.000Z"
            }]))
    }

    fn properties(&self) -> Form {
        Form::empty()
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        let window = ctx.state.window();
        let filters = match window.since() {
            Some(t) => vec![json!({
                "propertyName": "createdate",
                "operator": "GT",
                "value": t.timestamp_millis().to_string(),
            })],
            None => Vec::new(),
        };

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = search_contacts(&client, filters, 100).await?;

        let items = filter_array_since(&response, "results", "createdAt", &window);
        debug!(count = items.len(), "HubSpot new_contact poll complete");
        Ok(TriggerOutput::new(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockito::{Matcher, Server};
    use wakflo::{AuthContext, JsonValue, PollState};

    const RESULTS: &str = r#"{"total": 2, "results": [
        {"id": "52", "createdAt": "2026-02-18T10:00:00.000Z"},
        {"id": "51", "createdAt": "2026-02-18T00:00:00.000Z"}
    ]}"#;

    #[tokio::test]
    async fn test_first_poll_has_no_filters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/crm/v3/objects/contacts/search")
            .match_body(Matcher::PartialJson(json!({"filterGroups": [], "limit": 100})))
            .with_status(200)
            .with_body(RESULTS)
            .create_async()
            .await;

        let trigger = NewContact::new(Some(server.url()));
        let output = trigger
            .execute(&TriggerContext::new(JsonValue::Null, AuthContext::with_token("t"), PollState::default()))
            .await
            .unwrap();
        assert_eq!(output.items.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_poll_filters_createdate_in_millis() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/crm/v3/objects/contacts/search")
            .match_body(Matcher::PartialJson(json!({
                "filterGroups": [{"filters": [
                    {"propertyName": "createdate", "operator": "GT", "value": "1771372800000"}
                ]}]
            })))
            .with_status(200)
            .with_body(RESULTS)
            .create_async()
            .await;

        let trigger = NewContact::new(Some(server.url()));
        let state = PollState::since(Utc.with_ymd_and_hms(2026, 2, 18, 0, 0, 0).unwrap());
        let output = trigger
            .execute(&TriggerContext::new(JsonValue::Null, AuthContext::with_token("t"), state))
            .await
            .unwrap();
        assert_eq!(output.items.len(), 1);
        assert_eq!(output.items[0]["id"], "52");
        mock.assert_async().await;
    }
}
