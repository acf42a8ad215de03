use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use wakflo::form::{Form, Property};
use wakflo::input::{self, opt_string_or_number, string_or_number};
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{call, connect};
use super::config::{DOCS_URL, PARSE_MODES};

/// Telegram accepts numeric chat ids and `@channelusername`.
fn chat_id_value(chat_id: &str) -> JsonValue {
    match chat_id.trim().parse::<i64>() {
        Ok(id) => json!(id),
        Err(_) => json!(chat_id.trim()),
    }
}

fn chat_id_field() -> Property {
    Property::short_text("chat_id", "Chat ID")
        .required()
        .description("Numeric chat id or @channelusername")
}

/// Resolves an invite-link expiry to a Unix timestamp.
///
/// Accepts relative durations (`30s`, `15m`, `1h`, `2d`, `1w`) counted from
/// `now`, RFC 3339, `YYYY-MM-DD HH:MM[:SS]` (UTC) and `YYYY-MM-DD`.
pub fn resolve_expire_date(raw: &str, now: DateTime<Utc>) -> Result<i64, ConnectorError> {
    let s = raw.trim();
    if let Some(duration) = parse_relative(s) {
        return Ok((now + duration).timestamp());
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.timestamp());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(t.and_utc().timestamp());
        }
    }
    if let Some(t) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(t.and_utc().timestamp());
    }
    Err(ConnectorError::invalid(
        "expire_date",
        format!(
            "'{}' is not a duration (1h, 2d, ...), RFC 3339 timestamp or YYYY-MM-DD [HH:MM[:SS]] date",
            s
        ),
    ))
}

fn parse_relative(s: &str) -> Option<Duration> {
    let unit = s.chars().last()?;
    let amount: i64 = s[..s.len() - unit.len_utf8()].parse().ok()?;
    if amount <= 0 {
        return None;
    }
    match unit {
        's' => Duration::try_seconds(amount),
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        'w' => Duration::try_weeks(amount),
        _ => None,
    }
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
    chat_id: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    parse_mode: Option<String>,
    #[serde(default)]
    disable_notification: bool,
}

#[async_trait]
impl Action for SendMessage {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("send_message", "Send Message", "Sends a text message to a chat")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "message_id": 42,
                "chat": {"id": -1001234567890_i64, "type": "supergroup"},
                "date": 1771416000,
                "text": "Deploy finished"
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            chat_id_field(),
            Property::long_text("text", "Text").required(),
            Property::select("parse_mode", "Parse Mode", PARSE_MODES),
            Property::boolean("disable_notification", "Send Silently"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: SendMessageProps = ctx.input()?;
        input::require("chat_id", &props.chat_id)?;
        input::require("text", &props.text)?;

        let mut body = json!({
            "chat_id": chat_id_value(&props.chat_id),
            "text": props.text,
        });
        if let Some(mode) = input::non_blank(&props.parse_mode) {
            body["parse_mode"] = json!(mode);
        }
        if props.disable_notification {
            body["disable_notification"] = json!(true);
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        call(&client, "sendMessage", body).await
    }
}

// ---------------------------------------------------------------------------
// create_invite_link
// ---------------------------------------------------------------------------

pub struct CreateInviteLink {
    base_url: Option<String>,
}

impl CreateInviteLink {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreateInviteLinkProps {
    #[serde(default, deserialize_with = "string_or_number")]
    chat_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    expire_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    member_limit: Option<String>,
}

#[async_trait]
impl Action for CreateInviteLink {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new(
            "create_invite_link",
            "Create Invite Link",
            "Creates an additional invite link for a chat",
        )
        .documentation(DOCS_URL)
        .sample_output(json!({
            "invite_link": "https://t.me/+AbCdEf123456",
            "name": "launch",
            "expire_date": 1771419600,
            "is_primary": false,
            "is_revoked": false
        }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            chat_id_field(),
            Property::short_text("name", "Link Name"),
            Property::short_text("expire_date", "Expires")
                .description("Relative (30m, 1h, 2d, 1w) or absolute (2026-03-01 12:00)"),
            Property::number("member_limit", "Member Limit").description("1-99999"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateInviteLinkProps = ctx.input()?;
        input::require("chat_id", &props.chat_id)?;

        let mut body = json!({"chat_id": chat_id_value(&props.chat_id)});
        if let Some(name) = input::non_blank(&props.name) {
            body["name"] = json!(name);
        }
        if let Some(expire) = input::non_blank(&props.expire_date) {
            body["expire_date"] = json!(resolve_expire_date(expire, Utc::now())?);
        }
        if let Some(limit) = input::non_blank(&props.member_limit) {
            let limit: u32 = limit
                .parse()
                .ok()
                .filter(|n| (1..=99_999).contains(n))
                .ok_or_else(|| ConnectorError::invalid("member_limit", "must be between 1 and 99999"))?;
            body["member_limit"] = json!(limit);
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        call(&client, "createChatInviteLink", body).await
    }
}

// ---------------------------------------------------------------------------
// get_chat
// ---------------------------------------------------------------------------

pub struct GetChat {
    base_url: Option<String>,
}

impl GetChat {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct GetChatProps {
    #[serde(default, deserialize_with = "string_or_number")]
    chat_id: String,
}

#[async_trait]
impl Action for GetChat {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("get_chat", "Get Chat", "Fetches up-to-date information about a chat")
            .documentation(DOCS_URL)
            .sample_output(json!({"id": -1001234567890_i64, "title": "Ops", "type": "supergroup"}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![chat_id_field()])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: GetChatProps = ctx.input()?;
        input::require("chat_id", &props.chat_id)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        call(&client, "getChat", json!({"chat_id": chat_id_value(&props.chat_id)})).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::NoCallServer;
    use chrono::TimeZone;
    use mockito::{Matcher, Server};
    use wakflo::AuthContext;

    fn ctx(input: JsonValue) -> ActionContext {
        ActionContext::new(input, AuthContext::default().with_extra("bot_token", "123:ABC"))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_resolve_relative_durations() {
        let base = now().timestamp();
        assert_eq!(resolve_expire_date("1h", now()).unwrap(), base + 3600);
        assert_eq!(resolve_expire_date("30s", now()).unwrap(), base + 30);
        assert_eq!(resolve_expire_date("15m", now()).unwrap(), base + 900);
        assert_eq!(resolve_expire_date("2d", now()).unwrap(), base + 2 * 86_400);
        assert_eq!(resolve_expire_date(" 1w ", now()).unwrap(), base + 7 * 86_400);
    }

    #[test]
    fn test_resolve_absolute_dates() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap().timestamp();
        assert_eq!(resolve_expire_date("2026-03-01T12:30:00Z", now()).unwrap(), expected);
        assert_eq!(resolve_expire_date("2026-03-01T14:30:00+02:00", now()).unwrap(), expected);
        assert_eq!(resolve_expire_date("2026-03-01 12:30", now()).unwrap(), expected);
        assert_eq!(resolve_expire_date("2026-03-01 12:30:00", now()).unwrap(), expected);

        let midnight = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap().timestamp();
        assert_eq!(resolve_expire_date("2026-03-01", now()).unwrap(), midnight);
    }

    #[test]
    fn test_resolve_rejects_malformed_input() {
        for raw in ["tomorrow", "1y", "0h", "-1h", "h", "2026-13-01", "01/03/2026", ""] {
            let err = resolve_expire_date(raw, now()).unwrap_err();
            assert!(
                matches!(err, ConnectorError::InvalidInput { ref field, .. } if field == "expire_date"),
                "{raw} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_invite_link_sends_resolved_expiry() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:ABC/createChatInviteLink")
            .match_body(Matcher::Json(json!({
                "chat_id": -100123,
                "name": "launch",
                "expire_date": Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap().timestamp()
            })))
            .with_status(200)
            .with_body(r#"{"ok": true, "result": {"invite_link": "https://t.me/+abc", "name": "launch"}}"#)
            .create_async()
            .await;

        let action = CreateInviteLink::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({"chat_id": -100123, "name": "launch", "expire_date": "2030-01-01"})))
            .await
            .unwrap();
        assert_eq!(output["invite_link"], "https://t.me/+abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_invite_link_relative_expiry() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:ABC/createChatInviteLink")
            .match_body(Matcher::PartialJson(json!({"chat_id": "@ops"})))
            .with_status(200)
            .with_body_from_request(|request| {
                let sent: JsonValue = serde_json::from_slice(request.body().unwrap()).unwrap();
                serde_json::to_vec(&json!({"ok": true, "result": sent})).unwrap()
            })
            .create_async()
            .await;
        let before = Utc::now().timestamp();
        let action = CreateInviteLink::new(Some(server.url()));
        let sent = action
            .perform(&ctx(json!({"chat_id": "@ops", "expire_date": "1h"})))
            .await
            .unwrap();
        let after = Utc::now().timestamp();
        mock.assert_async().await;

        let expire = sent["expire_date"].as_i64().unwrap();
        assert!(expire >= before + 3600);
        assert!(expire <= after + 3600);
    }

    #[tokio::test]
    async fn test_create_invite_link_bad_date_makes_no_call() {
        let server = NoCallServer::start().await;
        let action = CreateInviteLink::new(Some(server.url()));
        let err = action
            .perform(&ctx(json!({"chat_id": 1, "expire_date": "next friday"})))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        server.assert_no_calls().await;
    }

    #[tokio::test]
    async fn test_send_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:ABC/sendMessage")
            .match_body(Matcher::Json(json!({
                "chat_id": 42,
                "text": "*done*",
                "parse_mode": "MarkdownV2"
            })))
            .with_status(200)
            .with_body(r#"{"ok": true, "result": {"message_id": 7, "text": "done"}}"#)
            .create_async()
            .await;

        let action = SendMessage::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({"chat_id": "42", "text": "*done*", "parse_mode": "MarkdownV2"})))
            .await
            .unwrap();
        assert_eq!(output["message_id"], 7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_message_requires_text() {
        let server = NoCallServer::start().await;
        let action = SendMessage::new(Some(server.url()));
        let err = action.perform(&ctx(json!({"chat_id": 42}))).await.unwrap_err();
        assert!(matches!(err, ConnectorError::MissingField(ref f) if f == "text"));
        server.assert_no_calls().await;
    }

    #[tokio::test]
    async fn test_get_chat_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:ABC/getChat")
            .with_status(400)
            .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#)
            .create_async()
            .await;

        let action = GetChat::new(Some(server.url()));
        let err = action.perform(&ctx(json!({"chat_id": 9}))).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
    }
}
