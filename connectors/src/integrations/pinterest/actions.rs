use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map};
use wakflo::form::{DynamicOptions, Form, Property};
use wakflo::http::success_or;
use wakflo::input::{self, string_or_number};
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{connect, BoardOptions};
use super::config::{DOCS_URL, PRIVACY_LEVELS};

pub(crate) fn board_field(base_url: &Option<String>) -> Property {
    Property::dynamic_select(
        "board_id",
        "Board",
        DynamicOptions::new(BoardOptions {
            base_url: base_url.clone(),
        }),
    )
}

fn is_http_url(raw: &str) -> bool {
    raw.starts_with("https://") || raw.starts_with("http://")
}

// ---------------------------------------------------------------------------
// create_pin
// ---------------------------------------------------------------------------

pub struct CreatePin {
    base_url: Option<String>,
}

impl CreatePin {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreatePinProps {
    #[serde(default, deserialize_with = "string_or_number")]
    board_id: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    alt_text: Option<String>,
}

#[async_trait]
impl Action for CreatePin {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_pin", "Create Pin", "Pins an image to a board")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "id": "813744226420795884",
                "board_id": "549755885175",
                "title": "Lemon tart",
                "link": "https://example.com/lemon-tart",
                "created_at": "2026-02-18T12:00:00"
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            board_field(&self.base_url).required(),
            Property::url("image_url", "Image URL").required(),
            Property::short_text("title", "Title"),
            Property::long_text("description", "Description"),
            Property::url("link", "Destination Link"),
            Property::short_text("alt_text", "Alt Text"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreatePinProps = ctx.input()?;
        input::require("board_id", &props.board_id)?;
        input::require("image_url", &props.image_url)?;
        let image_url = props.image_url.trim();
        if !is_http_url(image_url) {
            return Err(ConnectorError::invalid("image_url", "must be an http(s) URL"));
        }
        let link = input::non_blank(&props.link);
        if let Some(link) = link {
            if !is_http_url(link) {
                return Err(ConnectorError::invalid("link", "must be an http(s) URL"));
            }
        }

        let mut body = Map::new();
        body.insert("board_id".into(), json!(props.board_id.trim()));
        body.insert(
            "media_source".into(),
            json!({"source_type": "image_url", "url": image_url}),
        );
        if let Some(title) = input::non_blank(&props.title) {
            body.insert("title".into(), json!(title));
        }
        if let Some(description) = input::non_blank(&props.description) {
            body.insert("description".into(), json!(description));
        }
        if let Some(link) = link {
            body.insert("link".into(), json!(link));
        }
        if let Some(alt_text) = input::non_blank(&props.alt_text) {
            body.insert("alt_text".into(), json!(alt_text));
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client.post("/pins").json(JsonValue::Object(body)).send().await
    }
}

// ---------------------------------------------------------------------------
// create_board
// ---------------------------------------------------------------------------

pub struct CreateBoard {
    base_url: Option<String>,
}

impl CreateBoard {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreateBoardProps {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    privacy: Option<String>,
}

#[async_trait]
impl Action for CreateBoard {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_board", "Create Board", "Creates a board on the connected account")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "id": "549755885175",
                "name": "Recipes",
                "privacy": "PUBLIC"
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            Property::short_text("name", "Name").required(),
            Property::long_text("description", "Description"),
            Property::select("privacy", "Privacy", &[("PUBLIC", "Public"), ("SECRET", "Secret")])
                .default_value(json!("PUBLIC")),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateBoardProps = ctx.input()?;
        input::require("name", &props.name)?;
        let privacy = input::non_blank(&props.privacy)
            .map(str::to_uppercase)
            .unwrap_or_else(|| "PUBLIC".to_string());
        if !PRIVACY_LEVELS.contains(&privacy.as_str()) {
            return Err(ConnectorError::invalid(
                "privacy",
                format!("expected one of {}", PRIVACY_LEVELS.join(", ")),
            ));
        }

        let mut body = Map::new();
        body.insert("name".into(), json!(props.name.trim()));
        body.insert("privacy".into(), json!(privacy));
        if let Some(description) = input::non_blank(&props.description) {
            body.insert("description".into(), json!(description));
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client.post("/boards").json(JsonValue::Object(body)).send().await
    }
}

// ---------------------------------------------------------------------------
// delete_pin
// ---------------------------------------------------------------------------

pub struct DeletePin {
    base_url: Option<String>,
}

impl DeletePin {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct DeletePinProps {
    #[serde(default, deserialize_with = "string_or_number")]
    pin_id: String,
}

#[async_trait]
impl Action for DeletePin {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("delete_pin", "Delete Pin", "Deletes a pin")
            .documentation(DOCS_URL)
            .sample_output(json!({"success": true}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![Property::short_text("pin_id", "Pin ID").required()])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: DeletePinProps = ctx.input()?;
        input::require("pin_id", &props.pin_id)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let path = format!("/pins/{}", urlencoding::encode(props.pin_id.trim()));
        Ok(success_or(client.delete(&path).send().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::NoCallServer;
    use mockito::{Matcher, Server};
    use wakflo::AuthContext;

    fn ctx(input: JsonValue) -> ActionContext {
        ActionContext::new(input, AuthContext::with_token("pin"))
    }

    #[tokio::test]
    async fn test_create_pin() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/pins")
            .match_header("authorization", "Bearer pin")
            .match_body(Matcher::Json(json!({
                "board_id": "549755885175",
                "media_source": {"source_type": "image_url", "url": "https://img.example.com/tart.jpg"},
                "title": "Lemon tart"
            })))
            .with_status(201)
            .with_body(r#"{"id": "813744226420795884", "board_id": "549755885175"}"#)
            .create_async()
            .await;

        let action = CreatePin::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({
                "board_id": 549755885175u64,
                "image_url": " https://img.example.com/tart.jpg ",
                "title": "Lemon tart",
                "description": ""
            })))
            .await
            .unwrap();
        assert_eq!(output["id"], "813744226420795884");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_pin_rejects_bad_urls() {
        let server = NoCallServer::start().await;
        let action = CreatePin::new(Some(server.url()));

        let err = action
            .perform(&ctx(json!({"board_id": "1", "image_url": "tart.jpg"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidInput { ref field, .. } if field == "image_url"));

        let err = action
            .perform(&ctx(json!({"board_id": "1", "image_url": "https://x/y.jpg", "link": "ftp://x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidInput { ref field, .. } if field == "link"));

        server.assert_no_calls().await;
    }

    #[tokio::test]
    async fn test_create_board_privacy() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/boards")
            .match_body(Matcher::Json(json!({"name": "Recipes", "privacy": "SECRET"})))
            .with_status(201)
            .with_body(r#"{"id": "549755885175", "name": "Recipes", "privacy": "SECRET"}"#)
            .create_async()
            .await;

        let action = CreateBoard::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({"name": "Recipes", "privacy": "secret"})))
            .await
            .unwrap();
        assert_eq!(output["privacy"], "SECRET");
        mock.assert_async().await;

        let err = action
            .perform(&ctx(json!({"name": "Recipes", "privacy": "friends"})))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_delete_pin_no_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/pins/813744226420795884")
            .with_status(204)
            .create_async()
            .await;

        let action = DeletePin::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({"pin_id": "813744226420795884"})))
            .await
            .unwrap();
        assert_eq!(output, json!({"success": true}));
        mock.assert_async().await;
    }
}
