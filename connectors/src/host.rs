//! Local host harness - drives integrations the way the platform does.
//!
//! The platform owns credentials, schedules and poll state; this harness takes
//! them as arguments so integrations can be exercised from the CLI and tests.

use crate::registry::all_integrations;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};
use wakflo::config::WakfloConfig;
use wakflo::form::{Form, OptionsContext, PropertyOptions, SelectOption};
use wakflo::{
    ActionContext, AuthContext, ConnectorError, Integration, JsonValue, PollState, TriggerContext,
    TriggerOutput,
};

pub struct Host {
    config: WakfloConfig,
    integrations: Vec<Arc<dyn Integration>>,
}

impl Host {
    /// Host over every integration in the registry.
    pub fn new(config: WakfloConfig) -> Self {
        Self::with_integrations(config, all_integrations())
    }

    pub fn with_integrations(config: WakfloConfig, integrations: Vec<Arc<dyn Integration>>) -> Self {
        Self { config, integrations }
    }

    pub fn integrations(&self) -> &[Arc<dyn Integration>] {
        &self.integrations
    }

    pub fn integration(&self, name: &str) -> Result<Arc<dyn Integration>, ConnectorError> {
        self.integrations
            .iter()
            .find(|integration| integration.metadata().name == name)
            .cloned()
            .ok_or_else(|| ConnectorError::NotFound(format!("integration '{}'", name)))
    }

    /// Runs an action after checking the form's required fields.
    pub async fn perform(
        &self,
        integration: &str,
        action: &str,
        input: JsonValue,
        auth: AuthContext,
    ) -> Result<JsonValue, ConnectorError> {
        let found = self.integration(integration)?;
        let action_impl = found
            .action(action)
            .ok_or_else(|| ConnectorError::NotFound(format!("action '{}.{}'", integration, action)))?;

        preflight(&action_impl.properties(), &input)?;

        info!(integration = %integration, action = %action, "Performing action");
        let ctx = ActionContext {
            input,
            auth,
            http: self.config.http.clone(),
        };
        action_impl.perform(&ctx).await
    }

    /// Runs one poll of a trigger with host-supplied state.
    pub async fn poll(
        &self,
        integration: &str,
        trigger: &str,
        input: JsonValue,
        auth: AuthContext,
        state: PollState,
    ) -> Result<TriggerOutput, ConnectorError> {
        let found = self.integration(integration)?;
        let trigger_impl = found
            .trigger(trigger)
            .ok_or_else(|| ConnectorError::NotFound(format!("trigger '{}.{}'", integration, trigger)))?;

        preflight(&trigger_impl.properties(), &input)?;

        info!(
            integration = %integration,
            trigger = %trigger,
            last_run = ?state.last_run,
            "Polling trigger"
        );
        let ctx = TriggerContext {
            input,
            auth,
            http: self.config.http.clone(),
            state,
        };
        let output = trigger_impl.execute(&ctx).await?;
        debug!(items = output.items.len(), has_cursor = output.cursor.is_some(), "Poll finished");
        Ok(output)
    }

    /// Resolves the options of a select field on an action or trigger form.
    pub async fn options(
        &self,
        integration: &str,
        operation: &str,
        field: &str,
        input: JsonValue,
        auth: AuthContext,
    ) -> Result<Vec<SelectOption>, ConnectorError> {
        let found = self.integration(integration)?;
        let form = operation_form(found.as_ref(), operation).ok_or_else(|| {
            ConnectorError::NotFound(format!("operation '{}.{}'", integration, operation))
        })?;
        let property = form
            .get(field)
            .ok_or_else(|| ConnectorError::NotFound(format!("field '{}' on '{}'", field, operation)))?;

        match &property.options {
            Some(PropertyOptions::Static(options)) => Ok(options.clone()),
            Some(PropertyOptions::Dynamic(dynamic)) => {
                let ctx = OptionsContext {
                    auth,
                    input,
                    http: self.config.http.clone(),
                };
                dynamic.load(&ctx).await
            }
            None => Err(ConnectorError::invalid(field, "field has no options")),
        }
    }

    /// Metadata, auth schema and every form of an integration as JSON.
    pub fn describe(&self, integration: &str) -> Result<JsonValue, ConnectorError> {
        let found = self.integration(integration)?;

        let mut actions = Vec::new();
        for action in found.actions() {
            actions.push(json!({
                "metadata": to_json(&action.metadata())?,
                "auth": to_json(&action.auth())?,
                "properties": to_json(&action.properties())?,
            }));
        }
        let mut triggers = Vec::new();
        for trigger in found.triggers() {
            triggers.push(json!({
                "metadata": to_json(&trigger.metadata())?,
                "criteria": to_json(&trigger.criteria())?,
                "properties": to_json(&trigger.properties())?,
            }));
        }

        Ok(json!({
            "metadata": to_json(&found.metadata())?,
            "auth": to_json(&found.auth())?,
            "actions": actions,
            "triggers": triggers,
        }))
    }
}

fn operation_form(integration: &dyn Integration, operation: &str) -> Option<Form> {
    if let Some(action) = integration.action(operation) {
        return Some(action.properties());
    }
    integration.trigger(operation).map(|trigger| trigger.properties())
}

fn preflight(form: &Form, input: &JsonValue) -> Result<(), ConnectorError> {
    match form.missing_required(input).into_iter().next() {
        Some(key) => Err(ConnectorError::MissingField(key)),
        None => Ok(()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<JsonValue, ConnectorError> {
    serde_json::to_value(value).map_err(|e| ConnectorError::Other(e.into()))
}
