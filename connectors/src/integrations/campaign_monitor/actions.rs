use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use wakflo::form::{DynamicOptions, Form, Property};
use wakflo::http::success_or;
use wakflo::input;
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{connect, list_segment, ListOptions};
use super::config::{CONSENT_OPTIONS, DOCS_URL};

pub(crate) fn list_field(base_url: &Option<String>) -> Property {
    Property::dynamic_select(
        "list_id",
        "List",
        DynamicOptions::new(ListOptions {
            base_url: base_url.clone(),
        }),
    )
    .required()
}

// ---------------------------------------------------------------------------
// add_subscriber
// ---------------------------------------------------------------------------

pub struct AddSubscriber {
    base_url: Option<String>,
}

impl AddSubscriber {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct AddSubscriberProps {
    #[serde(default)]
    list_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    consent_to_track: Option<String>,
    #[serde(default)]
    resubscribe: bool,
}

#[async_trait]
impl Action for AddSubscriber {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("add_subscriber", "Add Subscriber", "Adds a subscriber to a list")
            .documentation(DOCS_URL)
            .sample_output(json!({"email": "ada@example.com"}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            list_field(&self.base_url),
            Property::email("email", "Email").required(),
            Property::short_text("name", "Name"),
            Property::select("consent_to_track", "Consent to Track", CONSENT_OPTIONS)
                .default_value(json!("Unchanged")),
            Property::boolean("resubscribe", "Resubscribe if Unsubscribed"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: AddSubscriberProps = ctx.input()?;
        input::require("list_id", &props.list_id)?;
        input::require("email", &props.email)?;
        let consent = input::non_blank(&props.consent_to_track).unwrap_or("Unchanged");
        if !CONSENT_OPTIONS.iter().any(|(id, _)| *id == consent) {
            return Err(ConnectorError::invalid("consent_to_track", "must be Yes, No or Unchanged"));
        }

        let body = json!({
            "EmailAddress": props.email.trim(),
            "Name": input::non_blank(&props.name).unwrap_or_default(),
            "ConsentToTrack": consent,
            "Resubscribe": props.resubscribe,
        });

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = client
            .post(&format!("/subscribers/{}.json", list_segment(&props.list_id)))
            .json(body)
            .send()
            .await?;

        // the API answers with the subscribed address as a bare JSON string
        Ok(match response {
            JsonValue::String(email) => json!({"email": email}),
            other => other,
        })
    }
}

// ---------------------------------------------------------------------------
// unsubscribe
// ---------------------------------------------------------------------------

pub struct Unsubscribe {
    base_url: Option<String>,
}

impl Unsubscribe {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct UnsubscribeProps {
    #[serde(default)]
    list_id: String,
    #[serde(default)]
    email: String,
}

#[async_trait]
impl Action for Unsubscribe {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("unsubscribe", "Unsubscribe", "Unsubscribes an address from a list")
            .documentation(DOCS_URL)
            .sample_output(json!({"success": true}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            list_field(&self.base_url),
            Property::email("email", "Email").required(),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: UnsubscribeProps = ctx.input()?;
        input::require("list_id", &props.list_id)?;
        input::require("email", &props.email)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = client
            .post(&format!("/subscribers/{}/unsubscribe.json", list_segment(&props.list_id)))
            .json(json!({"EmailAddress": props.email.trim()}))
            .send()
            .await?;
        Ok(success_or(response))
    }
}
