use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use wakflo::form::Form;
use wakflo::input;
use wakflo::polling::filter_array_since;
use wakflo::{ConnectorError, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::actions::list_field;
use super::client::{connect, list_segment};
use super::config::DOCS_URL;

/// Emits subscribers who became active since the last poll.
///
/// `date` only has day resolution, so same-day subscribers from earlier polls
/// come back and are dropped on `Date`.
pub struct NewSubscriber {
    base_url: Option<String>,
}

impl NewSubscriber {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct NewSubscriberProps {
    #[serde(default)]
    list_id: String,
}

#[async_trait]
impl Trigger for NewSubscriber {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new("new_subscriber", "New Subscriber", "Triggers when a list gains an active subscriber")
            .documentation(DOCS_URL)
            .sample_output(json!([{
                "EmailAddress": "ada@example.com",
                "Name": "Ada",
                "Date": "2026-02-18 12:00:00",
                "State": "Active"
            }]))
    }

    fn properties(&self) -> Form {
        Form::new(vec![list_field(&self.base_url)])
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        let props: NewSubscriberProps = ctx.input()?;
        input::require("list_id", &props.list_id)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let window = ctx.state.window();
        let mut request = client
            .get(&format!("/lists/{}/active.json", list_segment(&props.list_id)))
            .query("orderfield", "date")
            .query("orderdirection", "desc")
            .query("pagesize", 1000);
        if let Some(since) = window.since() {
            request = request.query("date", since.format("%Y-%m-%d"));
        }
        let response = request.send().await?;

        let items = filter_array_since(&response, "Results", "Date", &window);
        debug!(count = items.len(), "Campaign Monitor new_subscriber poll complete");
        Ok(TriggerOutput::new(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockito::{Matcher, Server};
    use wakflo::{AuthContext, PollState};

    const ACTIVE: &str = r#"{"Results": [
        {"EmailAddress": "late@example.com", "Date": "2026-02-18 15:00:00", "State": "Active"},
        {"EmailAddress": "early@example.com", "Date": "2026-02-18 09:00:00", "State": "Active"}
    ], "PageNumber": 1, "TotalNumberOfRecords": 2}"#;

    fn auth() -> AuthContext {
        AuthContext::default().with_extra("api_key", "cm-key")
    }

    #[tokio::test]
    async fn test_poll_uses_date_and_filters_same_day() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/lists/l1/active.json")
            .match_query(Matcher::UrlEncoded("date".into(), "2026-02-18".into()))
            .with_status(200)
            .with_body(ACTIVE)
            .create_async()
            .await;

        let trigger = NewSubscriber::new(Some(server.url()));
        let state = PollState::since(Utc.with_ymd_and_hms(2026, 2, 18, 12, 0, 0).unwrap());
        let output = trigger
            .execute(&TriggerContext::new(json!({"list_id": "l1"}), auth(), state))
            .await
            .unwrap();
        assert_eq!(output.items.len(), 1);
        assert_eq!(output.items[0]["EmailAddress"], "late@example.com");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_first_poll_returns_everything() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/lists/l1/active.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(ACTIVE)
            .create_async()
            .await;

        let trigger = NewSubscriber::new(Some(server.url()));
        let output = trigger
            .execute(&TriggerContext::new(json!({"list_id": "l1"}), auth(), PollState::default()))
            .await
            .unwrap();
        assert_eq!(output.items.len(), 2);
    }
}
