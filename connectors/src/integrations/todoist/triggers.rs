use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use wakflo::form::{DynamicOptions, Form, Property};
use wakflo::input::{self, opt_string_or_number};
use wakflo::polling::filter_since;
use wakflo::{ConnectorError, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::client::{connect, ProjectOptions};
use super::config::DOCS_URL;

/// Emits tasks created since the last poll.
///
/// The REST API has no creation-time filter, so the same listing is fetched
/// on every poll and filtered on `created_at` client-side.
pub struct NewTask {
    base_url: Option<String>,
}

impl NewTask {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct NewTaskProps {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    project_id: Option<String>,
}

#[async_trait]
impl Trigger for NewTask {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new("new_task", "New Task", "Triggers when a task is created")
            .documentation(DOCS_URL)
            .sample_output(json!([{
                "id": "2995104339",
                "content": "Buy milk",
                "created_at": "2026-02-18T12:00:00.000000Z"
            }]))
    }

    fn properties(&self) -> Form {
        Form::new(vec![Property::dynamic_select(
            "project_id",
            "Project",
            DynamicOptions::new(ProjectOptions {
                base_url: self.base_url.clone(),
            }),
        )
        .description("Only watch this project (optional)")])
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        let props: NewTaskProps = ctx.input()?;
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;

        let mut request = client.get("/tasks");
        if let Some(project_id) = input::non_blank(&props.project_id) {
            request = request.query("project_id", project_id);
        }
        let tasks = request.send().await?;

        let records = tasks.as_array().cloned().unwrap_or_default();
        let items = filter_since(records, "created_at", &ctx.state.window());
        debug!(count = items.len(), "Todoist new_task poll complete");
        Ok(TriggerOutput::new(items))
    }
}
