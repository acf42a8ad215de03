//! Per-invocation contexts handed to actions and triggers by the host.

use crate::auth::AuthContext;
use crate::error::ConnectorError;
use crate::form::OptionsContext;
use crate::http::HttpConfig;
use crate::polling::PollWindow;
use crate::JsonValue;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Input, credentials and HTTP settings for one `Action::perform` call.
#[derive(Clone, Debug, Default)]
pub struct ActionContext {
    /// The step's configured parameters (a JSON object).
    pub input: JsonValue,
    pub auth: AuthContext,
    pub http: HttpConfig,
}

impl ActionContext {
    pub fn new(input: JsonValue, auth: AuthContext) -> Self {
        Self {
            input,
            auth,
            http: HttpConfig::default(),
        }
    }

    /// Decodes the input into the action's props struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, ConnectorError> {
        decode_input(&self.input)
    }
}

/// Host-persisted polling state for one trigger instance.
///
/// Both values are stored by the host between polls. If the host fails to
/// persist them, the next poll re-delivers records (at-least-once).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PollState {
    /// When the trigger last ran successfully; `None` on the first poll.
    #[serde(default, alias = "lastRun")]
    pub last_run: Option<DateTime<Utc>>,
    /// Opaque cursor returned by the previous poll (e.g. a Telegram update id).
    #[serde(default)]
    pub cursor: Option<JsonValue>,
}

impl PollState {
    pub fn since(last_run: DateTime<Utc>) -> Self {
        Self {
            last_run: Some(last_run),
            cursor: None,
        }
    }

    pub fn window(&self) -> PollWindow {
        match self.last_run {
            Some(t) => PollWindow::Since(t),
            None => PollWindow::All,
        }
    }
}

/// Input, credentials and polling state for one `Trigger::execute` call.
#[derive(Clone, Debug, Default)]
pub struct TriggerContext {
    pub input: JsonValue,
    pub auth: AuthContext,
    pub http: HttpConfig,
    pub state: PollState,
}

impl TriggerContext {
    pub fn new(input: JsonValue, auth: AuthContext, state: PollState) -> Self {
        Self {
            input,
            auth,
            http: HttpConfig::default(),
            state,
        }
    }

    pub fn input<T: DeserializeOwned>(&self) -> Result<T, ConnectorError> {
        decode_input(&self.input)
    }
}

impl From<&ActionContext> for OptionsContext {
    fn from(ctx: &ActionContext) -> Self {
        OptionsContext {
            auth: ctx.auth.clone(),
            input: ctx.input.clone(),
            http: ctx.http.clone(),
        }
    }
}

/// Decodes a step's JSON input, treating `null` as an empty object.
pub fn decode_input<T: DeserializeOwned>(input: &JsonValue) -> Result<T, ConnectorError> {
    let value = if input.is_null() {
        JsonValue::Object(Default::default())
    } else {
        input.clone()
    };
    serde_json::from_value(value).map_err(|e| ConnectorError::invalid("input", e.to_string()))
}
