use async_trait::async_trait;
use chrono::SecondsFormat;
use serde_json::json;
use tracing::debug;
use wakflo::form::Form;
use wakflo::polling::filter_since;
use wakflo::{ConnectorError, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::client::connect;
use super::config::DOCS_URL;

/// Emits tickets created since the last poll.
///
/// Freshdesk can only filter listings by `updated_since`, which also returns
/// older tickets that were edited; those are dropped on `created_at`.
pub struct NewTicket {
    base_url: Option<String>,
}

impl NewTicket {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[async_trait]
impl Trigger for NewTicket {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new("new_ticket", "New Ticket", "Triggers when a ticket is created")
            .documentation(DOCS_URL)
            .sample_output(json!([{
                "id": 1042,
                "subject": "Printer on fire",
                "status": 2,
                "created_at": "2026-02-18T12:00:00Z"
            }]))
    }

    fn properties(&self) -> Form {
        Form::empty()
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let window = ctx.state.window();

        let mut request = client
            .get("/tickets")
            .query("order_by", "created_at")
            .query("order_type", "desc")
            .query("per_page", 100);
        if let Some(since) = window.since() {
            request = request.query("updated_since", since.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let tickets = request.send().await?;

        let records = tickets.as_array().cloned().unwrap_or_default();
        let items = filter_since(records, "created_at", &window);
        debug!(count = items.len(), "Freshdesk new_ticket poll complete");
        Ok(TriggerOutput::new(items))
    }
}
