use crate::auth::{AuthSchema, IntegrationAuth};
use crate::context::{ActionContext, TriggerContext};
use crate::error::ConnectorError;
use crate::form::Form;
use crate::JsonValue;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Descriptive metadata for an integration.
#[derive(Clone, Debug, Serialize)]
pub struct IntegrationMetadata {
    /// Unique identifier, lowercase snake_case (e.g. "google_sheets").
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub description: String,
    /// Icon reference shown in the workflow editor.
    pub icon: String,
    pub version: String,
    pub category: String,
    pub authors: Vec<String>,
}

/// Descriptor for a single action.
#[derive(Clone, Debug, Serialize)]
pub struct ActionMetadata {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub description: String,
    /// Pointer to the vendor API documentation for this operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Example output shown to UI consumers.
    #[serde(rename = "sampleOutput")]
    pub sample_output: JsonValue,
}

impl ActionMetadata {
    pub fn new(id: &str, display_name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            documentation: None,
            sample_output: JsonValue::Null,
        }
    }

    pub fn documentation(mut self, url: &str) -> Self {
        self.documentation = Some(url.to_string());
        self
    }

    pub fn sample_output(mut self, sample: JsonValue) -> Self {
        self.sample_output = sample;
        self
    }
}

/// Triggers share the action descriptor shape.
pub type TriggerMetadata = ActionMetadata;

/// How the host should drive a trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerStrategy {
    Polling,
    Webhook,
}

/// Scheduling hint returned by `Trigger::criteria`. The host owns the schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TriggerCriteria {
    pub strategy: TriggerStrategy,
    /// Suggested poll interval in seconds.
    #[serde(rename = "intervalSecs")]
    pub interval_secs: u64,
}

impl TriggerCriteria {
    pub fn polling(interval_secs: u64) -> Self {
        Self {
            strategy: TriggerStrategy::Polling,
            interval_secs,
        }
    }
}

impl Default for TriggerCriteria {
    fn default() -> Self {
        Self::polling(300)
    }
}

/// Result of one trigger poll.
///
/// Each item is delivered to the workflow as a separate event. `cursor`, when
/// set, should be stored by the host and handed back in
/// `PollState::cursor` on the next poll. Delivery is at-least-once.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TriggerOutput {
    pub items: Vec<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<JsonValue>,
}

impl TriggerOutput {
    pub fn new(items: Vec<JsonValue>) -> Self {
        Self {
            items,
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, cursor: JsonValue) -> Self {
        self.cursor = Some(cursor);
        self
    }
}

/// A single API operation triggered by a workflow step.
///
/// `perform` decodes and validates input, resolves credentials, issues the
/// outbound call(s) and reshapes the response. No retries, no caching.
#[async_trait]
pub trait Action: Send + Sync {
    fn metadata(&self) -> ActionMetadata;

    /// Form rendered for this action's inputs.
    fn properties(&self) -> Form;

    /// Action-level auth override; `None` inherits the integration's auth.
    fn auth(&self) -> Option<AuthSchema> {
        None
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError>;
}

/// A polling check for new remote records.
///
/// The host calls `execute` on its own schedule. `start`/`stop` are lifecycle
/// hooks for webhook-style triggers and do nothing for polling ones.
#[async_trait]
pub trait Trigger: Send + Sync {
    fn metadata(&self) -> TriggerMetadata;

    fn properties(&self) -> Form;

    fn auth(&self) -> Option<AuthSchema> {
        None
    }

    fn criteria(&self) -> TriggerCriteria {
        TriggerCriteria::default()
    }

    async fn start(&self, _ctx: &TriggerContext) -> Result<(), ConnectorError> {
        Ok(())
    }

    async fn stop(&self, _ctx: &TriggerContext) -> Result<(), ConnectorError> {
        Ok(())
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError>;
}

/// Integration interface for third-party services.
///
/// Integrations are stateless: credentials, poll state and schedules are
/// owned by the host. Action and trigger lists are built once when the
/// integration is constructed.
///
/// # Lifecycle
/// 1. Host calls `metadata()` and `auth()` to render the connection form
/// 2. User connects (OAuth flow or custom fields, run by the host)
/// 3. Host lists `actions()` / `triggers()` and renders their `properties()`
/// 4. Host calls `perform` / `execute` with the step input and credentials
pub trait Integration: Send + Sync {
    fn metadata(&self) -> IntegrationMetadata;

    fn auth(&self) -> IntegrationAuth;

    fn actions(&self) -> &[Arc<dyn Action>];

    fn triggers(&self) -> &[Arc<dyn Trigger>];

    /// Finds an action by id.
    fn action(&self, id: &str) -> Option<Arc<dyn Action>> {
        self.actions()
            .iter()
            .find(|a| a.metadata().id == id)
            .cloned()
    }

    /// Finds a trigger by id.
    fn trigger(&self, id: &str) -> Option<Arc<dyn Trigger>> {
        self.triggers()
            .iter()
            .find(|t| t.metadata().id == id)
            .cloned()
    }
}
