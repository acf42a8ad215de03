use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use wakflo::form::Form;
use wakflo::input::{self, string_or_number};
use wakflo::polling::filter_since;
use wakflo::{ConnectorError, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::actions::{channel_field, guild_field};
use super::client::connect;
use super::config::DOCS_URL;

/// Emits messages posted to a channel since the last poll.
pub struct NewChannelMessage {
    base_url: Option<String>,
}

impl NewChannelMessage {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct NewChannelMessageProps {
    #[serde(default, deserialize_with = "string_or_number")]
    channel_id: String,
}

#[async_trait]
impl Trigger for NewChannelMessage {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new(
            "new_channel_message",
            "New Channel Message",
            "Triggers when a message is posted in a channel",
        )
        .documentation(DOCS_URL)
        .sample_output(json!([{
            "id": "1205512345678901234",
            "content": "hello",
            "author": {"id": "80351110224678912", "username": "ada"},
            "timestamp": "2026-02-18T12:00:00.000000+00:00"
        }]))
    }

    fn properties(&self) -> Form {
        Form::new(vec![guild_field(&self.base_url), channel_field(&self.base_url)])
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        let props: NewChannelMessageProps = ctx.input()?;
        input::require("channel_id", &props.channel_id)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let messages = client
            .get(&format!("/channels/{}/messages", urlencoding::encode(props.channel_id.trim())))
            .query("limit", 100)
            .send()
            .await?;

        let records = messages.as_array().cloned().unwrap_or_default();
        let items = filter_since(records, "timestamp", &ctx.state.window());
        debug!(count = items.len(), "Discord new_channel_message poll complete");
        Ok(TriggerOutput::new(items))
    }
}
