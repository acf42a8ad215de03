use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use wakflo::form::{DynamicOptions, Form, Property};
use wakflo::input;
use wakflo::polling::filter_array_since;
use wakflo::{ConnectorError, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::client::{connect, AudienceOptions};
use super::config::DOCS_URL;

/// Emits audience members who opted in since the last poll.
pub struct NewSubscriber {
    base_url: Option<String>,
}

impl NewSubscriber {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct NewSubscriberProps {
    #[serde(default)]
    list_id: String,
}

#[async_trait]
impl Trigger for NewSubscriber {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new(
            "new_subscriber",
            "New Subscriber",
            "Triggers when a member joins an audience",
        )
        .documentation(DOCS_URL)
        .sample_output(json!([{
            "id": "9e26471d35a78862c17e467d87cddedf",
            "email_address": "jane@example.com",
            "status": "subscribed",
            "timestamp_opt": "2026-02-18T12:00:00+00:00"
        }]))
    }

    fn properties(&self) -> Form {
        Form::new(vec![Property::dynamic_select(
            "list-id",
            "Audience",
            DynamicOptions::new(AudienceOptions {
                base_url: self.base_url.clone(),
            }),
        )
        .required()])
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        let props: NewSubscriberProps = ctx.input()?;
        input::require("list-id", &props.list_id)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let window = ctx.state.window();
        let path = format!("/lists/{}/members", urlencoding::encode(props.list_id.trim()));
        let mut request = client.get(&path).query("count", 1000);
        if let Some(since) = window.since() {
            request = request.query(
                "since_timestamp_opt",
                since.to_rfc3339_opts(SecondsFormat::Secs, false),
            );
        }
        let response = request.send().await?;

        let items = filter_array_since(&response, "members", "timestamp_opt", &window);
        debug!(count = items.len(), "Mailchimp new_subscriber poll complete");
        Ok(TriggerOutput::new(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::NoCallServer;
    use chrono::{TimeZone, Utc};
    use mockito::{Matcher, Server};
    use wakflo::{AuthContext, PollState};

    const MEMBERS: &str = r#"{"members": [
        {"id": "1", "email_address": "old@example.com", "timestamp_opt": "2026-02-18T00:00:00+00:00"},
        {"id": "2", "email_address": "new@example.com", "timestamp_opt": "2026-02-18T09:30:00+00:00"},
        {"id": "3", "email_address": "imported@example.com", "timestamp_opt": ""}
    ], "total_items": 3}"#;

    #[tokio::test]
    async fn test_first_poll_fetches_all_members() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/lists/a1/members")
            .match_query(Matcher::UrlEncoded("count".into(), "1000".into()))
            .with_status(200)
            .with_body(MEMBERS)
            .create_async()
            .await;

        let trigger = NewSubscriber::new(Some(server.url()));
        let ctx = TriggerContext::new(json!({"list-id": "a1"}), AuthContext::with_token("tok"), PollState::default());
        let output = trigger.execute(&ctx).await.unwrap();
        assert_eq!(output.items.len(), 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_poll_since_passes_timestamp_and_filters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/lists/a1/members")
            .match_query(Matcher::UrlEncoded(
                "since_timestamp_opt".into(),
                "2026-02-18T00:00:00+00:00".into(),
            ))
            .with_status(200)
            .with_body(MEMBERS)
            .create_async()
            .await;

        let trigger = NewSubscriber::new(Some(server.url()));
        let ctx = TriggerContext::new(
            json!({"list-id": "a1"}),
            AuthContext::with_token("tok"),
            PollState::since(Utc.with_ymd_and_hms(2026, 2, 18, 0, 0, 0).unwrap()),
        );
        let output = trigger.execute(&ctx).await.unwrap();
        assert_eq!(output.items.len(), 1);
        assert_eq!(output.items[0]["email_address"], "new@example.com");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_requires_audience() {
        let server = NoCallServer::start().await;
        let trigger = NewSubscriber::new(Some(server.url()));
        let ctx = TriggerContext::new(json!({}), AuthContext::with_token("tok"), PollState::default());
        let err = trigger.execute(&ctx).await.unwrap_err();
        assert!(err.is_validation());
        server.assert_no_calls().await;
    }
}
