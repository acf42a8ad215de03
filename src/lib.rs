//! Wakflo plugin SDK - the contract every connector implements.
//!
//! A connector ("integration") wraps one third-party REST API and exposes
//! actions (one API call per workflow step) and triggers (polling checks for
//! new remote records). The host platform loads integrations, renders each
//! operation's form, and invokes it with user-supplied input.
//!
//! # Architecture
//!
//! ```text
//!      Host platform (workflow engine, scheduler, credential store)
//!          ↓  input + auth + lastRun
//! ┌─────────────────────────────────────────┐
//! │   Integration (implements trait)         │
//! │  - metadata / auth schema                │
//! │  - actions: properties() + perform()     │
//! │  - triggers: properties() + execute()    │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │   HttpClient (shared helper)             │
//! │  - auth scheme, JSON body                │
//! │  - 2xx decode / non-2xx error            │
//! └─────────────────────────────────────────┘
//!          ↓
//!     Third-party REST API
//! ```
//!
//! # Creating an action
//!
//! ```no_run
//! use async_trait::async_trait;
//! use serde::Deserialize;
//! use wakflo::form::{Form, Property};
//! use wakflo::http::{AuthScheme, HttpClient};
//! use wakflo::{input, Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};
//!
//! #[derive(Deserialize)]
//! struct Props {
//!     #[serde(default)]
//!     name: String,
//! }
//!
//! struct CreateThing;
//!
//! #[async_trait]
//! impl Action for CreateThing {
//!     fn metadata(&self) -> ActionMetadata {
//!         ActionMetadata::new("create_thing", "Create Thing", "Creates a thing")
//!     }
//!
//!     fn properties(&self) -> Form {
//!         Form::new(vec![Property::short_text("name", "Name").required()])
//!     }
//!
//!     async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
//!         let props: Props = ctx.input()?;
//!         input::require("name", &props.name)?;
//!         let token = ctx.auth.access_token()?;
//!         let client = HttpClient::new(
//!             "https://api.example.com",
//!             AuthScheme::Bearer(token.to_string()),
//!             &ctx.http,
//!         )?;
//!         client
//!             .post("/things")
//!             .json(serde_json::json!({ "name": props.name }))
//!             .send()
//!             .await
//!     }
//! }
//! ```

// Plugin contract (integration, action, trigger)
pub mod plugin;

// Form schema and dynamic options
pub mod form;

// Auth schema and per-invocation credentials
pub mod auth;

// Per-invocation contexts
pub mod context;

// Input validation helpers
pub mod input;

// Shared outbound HTTP helper
pub mod http;

// Trigger time filtering
pub mod polling;

// Error taxonomy
pub mod error;

// TOML + environment configuration
pub mod config;

/// The platform's generic output type.
///
/// `serde_json::Value` is already a closed sum type (object, array, string,
/// number, bool, null), so reshaping code matches on it exhaustively.
pub use serde_json::Value as JsonValue;

pub use auth::{AuthContext, AuthSchema, IntegrationAuth, OAuthConfig};
pub use context::{ActionContext, PollState, TriggerContext};
pub use error::ConnectorError;
pub use plugin::{
    Action, ActionMetadata, Integration, IntegrationMetadata, Trigger, TriggerCriteria,
    TriggerMetadata, TriggerOutput, TriggerStrategy,
};
pub use polling::PollWindow;
