use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use wakflo::form::{DynamicOptions, Form, Property};
use wakflo::http::success_or;
use wakflo::input::{self, opt_string_or_number, string_or_number};
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{connect, ChannelOptions, GuildOptions, RoleOptions};
use super::config::{CHANNEL_TYPES, DOCS_URL};

pub(crate) fn guild_field(base_url: &Option<String>) -> Property {
    Property::dynamic_select(
        "guild_id",
        "Server",
        DynamicOptions::new(GuildOptions {
            base_url: base_url.clone(),
        }),
    )
}

pub(crate) fn channel_field(base_url: &Option<String>) -> Property {
    Property::dynamic_select(
        "channel_id",
        "Channel",
        DynamicOptions::new(ChannelOptions {
            base_url: base_url.clone(),
        })
        .depends_on("guild_id"),
    )
    .required()
}

fn segment(id: &str) -> String {
    urlencoding::encode(id.trim()).into_owned()
}

// ---------------------------------------------------------------------------
// send_message
// ---------------------------------------------------------------------------

pub struct SendMessage {
    base_url: Option<String>,
}

impl SendMessage {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct SendMessageProps {
    #[serde(default, deserialize_with = "string_or_number")]
    channel_id: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    tts: bool,
}

#[async_trait]
impl Action for SendMessage {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("send_message", "Send Message", "Posts a message to a text channel")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "id": "1205512345678901234",
                "channel_id": "1205500000000000000",
                "content": "Deploy finished",
                "timestamp": "2026-02-18T12:00:00.000000+00:00"
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            guild_field(&self.base_url),
            channel_field(&self.base_url),
            Property::long_text("content", "Message").required(),
            Property::boolean("tts", "Text to Speech"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: SendMessageProps = ctx.input()?;
        input::require("channel_id", &props.channel_id)?;
        input::require("content", &props.content)?;
        if props.content.chars().count() > 2000 {
            return Err(ConnectorError::invalid("content", "messages are limited to 2000 characters"));
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client
            .post(&format!("/channels/{}/messages", segment(&props.channel_id)))
            .json(json!({"content": props.content, "tts": props.tts}))
            .send()
            .await
    }
}

// ---------------------------------------------------------------------------
// create_channel
// ---------------------------------------------------------------------------

pub struct CreateChannel {
    base_url: Option<String>,
}

impl CreateChannel {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreateChannelProps {
    #[serde(default, deserialize_with = "string_or_number")]
    guild_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "opt_string_or_number")]
    channel_type: Option<String>,
}

#[async_trait]
impl Action for CreateChannel {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_channel", "Create Channel", "Creates a channel in a server")
            .documentation(DOCS_URL)
            .sample_output(json!({"id": "1205500000000000001", "name": "incidents", "type": 0}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            guild_field(&self.base_url).required(),
            Property::short_text("name", "Channel Name").required(),
            Property::short_text("topic", "Topic"),
            Property::select("type", "Channel Type", CHANNEL_TYPES).default_value(json!("0")),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateChannelProps = ctx.input()?;
        input::require("guild_id", &props.guild_id)?;
        input::require("name", &props.name)?;

        let channel_type = match input::non_blank(&props.channel_type) {
            None => 0,
            Some(raw) => match raw.parse::<u8>() {
                Ok(t) if CHANNEL_TYPES.iter().any(|(id, _)| *id == raw) => t,
                _ => return Err(ConnectorError::invalid("type", format!("unsupported channel type '{}'", raw))),
            },
        };

        let mut body = json!({"name": props.name.trim(), "type": channel_type});
        if let Some(topic) = input::non_blank(&props.topic) {
            body["topic"] = json!(topic);
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client
            .post(&format!("/guilds/{}/channels", segment(&props.guild_id)))
            .json(body)
            .send()
            .await
    }
}

// ---------------------------------------------------------------------------
// add_role_to_member
// ---------------------------------------------------------------------------

pub struct AddRoleToMember {
    base_url: Option<String>,
}

impl AddRoleToMember {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct AddRoleProps {
    #[serde(default, deserialize_with = "string_or_number")]
    guild_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    user_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    role_id: String,
}

#[async_trait]
impl Action for AddRoleToMember {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("add_role_to_member", "Add Role to Member", "Grants a role to a server member")
            .documentation(DOCS_URL)
            .sample_output(json!({"success": true}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            guild_field(&self.base_url).required(),
            Property::short_text("user_id", "User ID").required(),
            Property::dynamic_select(
                "role_id",
                "Role",
                DynamicOptions::new(RoleOptions {
                    base_url: self.base_url.clone(),
                })
                .depends_on("guild_id"),
            )
            .required(),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: AddRoleProps = ctx.input()?;
        input::require("guild_id", &props.guild_id)?;
        input::require("user_id", &props.user_id)?;
        input::require("role_id", &props.role_id)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let path = format!(
            "/guilds/{}/members/{}/roles/{}",
            segment(&props.guild_id),
            segment(&props.user_id),
            segment(&props.role_id)
        );
        let response = client.put(&path).send().await?;
        Ok(success_or(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::NoCallServer;
    use mockito::{Matcher, Server};
    use wakflo::AuthContext;

    fn ctx(input: JsonValue) -> ActionContext {
        ActionContext::new(input, AuthContext::default().with_extra("bot_token", "bot-tok"))
    }

    #[tokio::test]
    async fn test_send_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/channels/c1/messages")
            .match_header("authorization", "Bot bot-tok")
            .match_body(Matcher::Json(json!({"content": "hi", "tts": false})))
            .with_status(200)
            .with_body(r#"{"id": "m1", "channel_id": "c1", "content": "hi"}"#)
            .create_async()
            .await;

        let action = SendMessage::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({"channel_id": "c1", "content": "hi"})))
            .await
            .unwrap();
        assert_eq!(output["id"], "m1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_message_validation() {
        let server = NoCallServer::start().await;
        let action = SendMessage::new(Some(server.url()));

        let err = action.perform(&ctx(json!({"content": "hi"}))).await.unwrap_err();
        assert!(matches!(err, ConnectorError::MissingField(ref f) if f == "channel_id"));

        let long = "x".repeat(2001);
        let err = action
            .perform(&ctx(json!({"channel_id": "c1", "content": long})))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidInput { .. }));

        server.assert_no_calls().await;
    }

    #[tokio::test]
    async fn test_create_channel() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/guilds/g1/channels")
            .match_body(Matcher::Json(json!({"name": "incidents", "type": 2, "topic": "on-call"})))
            .with_status(201)
            .with_body(r#"{"id": "c9", "name": "incidents", "type": 2}"#)
            .create_async()
            .await;

        let action = CreateChannel::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({"guild_id": "g1", "name": "incidents", "type": 2, "topic": "on-call"})))
            .await
            .unwrap();
        assert_eq!(output["id"], "c9");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_channel_rejects_unknown_type() {
        let server = NoCallServer::start().await;
        let action = CreateChannel::new(Some(server.url()));
        let err = action
            .perform(&ctx(json!({"guild_id": "g1", "name": "x", "type": "13"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidInput { ref field, .. } if field == "type"));
        server.assert_no_calls().await;
    }

    #[tokio::test]
    async fn test_add_role_to_member_no_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/guilds/g1/members/u1/roles/r1")
            .with_status(204)
            .create_async()
            .await;

        let action = AddRoleToMember::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({"guild_id": "g1", "user_id": "u1", "role_id": "r1"})))
            .await
            .unwrap();
        assert_eq!(output, json!({"success": true}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_role_missing_permissions() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/guilds/g1/members/u1/roles/r1")
            .with_status(403)
            .with_body(r#"{"message": "Missing Permissions", "code": 50013}"#)
            .create_async()
            .await;

        let action = AddRoleToMember::new(Some(server.url()));
        let err = action
            .perform(&ctx(json!({"guild_id": "g1", "user_id": "u1", "role_id": "r1"})))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("Missing Permissions"));
    }
}
