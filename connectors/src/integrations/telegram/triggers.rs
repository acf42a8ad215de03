use async_trait::async_trait;
use serde_json::json;
use tracing::debug;
use wakflo::form::Form;
use wakflo::polling::filter_since;
use wakflo::{ConnectorError, JsonValue, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::client::{call, connect};
use super::config::DOCS_URL;

/// Emits messages received by the bot.
///
/// `getUpdates` is offset based: the cursor holds the highest `update_id`
/// already seen and the next poll asks for `cursor + 1`. Delivery is
/// at-least-once; if the host loses the cursor the same updates come back.
pub struct MessageReceived {
    base_url: Option<String>,
}

impl MessageReceived {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[async_trait]
impl Trigger for MessageReceived {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new(
            "message_received",
            "Message Received",
            "Triggers when the bot receives a message",
        )
        .documentation(DOCS_URL)
        .sample_output(json!([{
            "update_id": 815,
            "message": {
                "message_id": 42,
                "from": {"id": 1001, "first_name": "Ada"},
                "chat": {"id": 1001, "type": "private"},
                "date": 1771416000,
                "text": "hello"
            }
        }]))
    }

    fn properties(&self) -> Form {
        Form::empty()
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        let last_update = ctx.state.cursor.as_ref().and_then(JsonValue::as_i64);

        let mut body = json!({"allowed_updates": ["message"], "timeout": 0});
        if let Some(last) = last_update {
            let offset = last
                .checked_add(1)
                .ok_or_else(|| ConnectorError::invalid("cursor", "update id is out of range"))?;
            body["offset"] = json!(offset);
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let result = call(&client, "getUpdates", body).await?;
        let updates = result.as_array().cloned().unwrap_or_default();

        let highest = updates
            .iter()
            .filter_map(|update| update["update_id"].as_i64())
            .chain(last_update)
            .max();

        let messages: Vec<JsonValue> = updates
            .into_iter()
            .filter(|update| update.get("message").is_some())
            .collect();
        let items = filter_since(messages, "message.date", &ctx.state.window());
        debug!(count = items.len(), cursor = ?highest, "Telegram message_received poll complete");

        let output = TriggerOutput::new(items);
        Ok(match highest {
            Some(id) => output.with_cursor(json!(id)),
            None => output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockito::{Matcher, Server};
    use wakflo::{AuthContext, PollState};

    const UPDATES: &str = r#"{"ok": true, "result": [
        {"update_id": 10, "message": {"message_id": 1, "date": 1771372800, "text": "early"}},
        {"update_id": 11, "edited_message": {"message_id": 1, "date": 1771372900, "text": "edit"}},
        {"update_id": 12, "message": {"message_id": 2, "date": 1771416000, "text": "late"}}
    ]}"#;

    fn auth() -> AuthContext {
        AuthContext::default().with_extra("bot_token", "123:ABC")
    }

    #[tokio::test]
    async fn test_first_poll_without_offset() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:ABC/getUpdates")
            .match_body(Matcher::Json(json!({"allowed_updates": ["message"], "timeout": 0})))
            .with_status(200)
            .with_body(UPDATES)
            .create_async()
            .await;

        let trigger = MessageReceived::new(Some(server.url()));
        let ctx = TriggerContext::new(JsonValue::Null, auth(), PollState::default());
        let output = trigger.execute(&ctx).await.unwrap();

        assert_eq!(output.items.len(), 2);
        assert_eq!(output.cursor, Some(json!(12)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_poll_uses_offset_and_filters_by_date() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:ABC/getUpdates")
            .match_body(Matcher::PartialJson(json!({"offset": 10})))
            .with_status(200)
            .with_body(UPDATES)
            .create_async()
            .await;

        let trigger = MessageReceived::new(Some(server.url()));
        let state = PollState {
            cursor: Some(json!(9)),
            ..PollState::since(Utc.with_ymd_and_hms(2026, 2, 18, 0, 0, 0).unwrap())
        };
        let ctx = TriggerContext::new(JsonValue::Null, auth(), state);
        let output = trigger.execute(&ctx).await.unwrap();

        assert_eq!(output.items.len(), 1);
        assert_eq!(output.items[0]["message"]["text"], "late");
        assert_eq!(output.cursor, Some(json!(12)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_poll_keeps_cursor() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:ABC/getUpdates")
            .with_status(200)
            .with_body(r#"{"ok": true, "result": []}"#)
            .create_async()
            .await;

        let trigger = MessageReceived::new(Some(server.url()));
        let state = PollState {
            cursor: Some(json!(12)),
            ..PollState::default()
        };
        let output = trigger
            .execute(&TriggerContext::new(JsonValue::Null, auth(), state))
            .await
            .unwrap();
        assert!(output.items.is_empty());
        assert_eq!(output.cursor, Some(json!(12)));
    }

    #[tokio::test]
    async fn test_out_of_range_cursor_is_rejected() {
        let server = crate::test_support::NoCallServer::start().await;
        let trigger = MessageReceived::new(Some(server.url()));
        let state = PollState {
            cursor: Some(json!(i64::MAX)),
            ..PollState::default()
        };
        let err = trigger
            .execute(&TriggerContext::new(JsonValue::Null, auth(), state))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidInput { ref field, .. } if field == "cursor"));
        server.assert_no_calls().await;
    }

    #[tokio::test]
    async fn test_poll_conflict_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:ABC/getUpdates")
            .with_status(409)
            .with_body(r#"{"ok": false, "error_code": 409, "description": "Conflict: can't use getUpdates method while webhook is active"}"#)
            .create_async()
            .await;

        let trigger = MessageReceived::new(Some(server.url()));
        let err = trigger
            .execute(&TriggerContext::new(JsonValue::Null, auth(), PollState::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
    }
}
