use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map};
use wakflo::form::{DynamicOptions, Form, Property};
use wakflo::http::success_or;
use wakflo::input::{self, list_or_csv, opt_string_or_number, string_or_number};
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{connect, ProjectOptions};
use super::config::DOCS_URL;

fn project_field(base_url: &Option<String>) -> Property {
    Property::dynamic_select(
        "project_id",
        "Project",
        DynamicOptions::new(ProjectOptions {
            base_url: base_url.clone(),
        }),
    )
}

// ---------------------------------------------------------------------------
// create_task
// ---------------------------------------------------------------------------

pub struct CreateTask {
    base_url: Option<String>,
}

impl CreateTask {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreateTaskProps {
    #[serde(default)]
    content: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    project_id: Option<String>,
    #[serde(default)]
    due_string: Option<String>,
    #[serde(default)]
    priority: Option<u8>,
    #[serde(default, deserialize_with = "list_or_csv")]
    labels: Vec<String>,
}

#[async_trait]
impl Action for CreateTask {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_task", "Create Task", "Creates a new task in Todoist")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "id": "2995104339",
                "content": "Buy milk",
                "project_id": "2203306141",
                "priority": 1,
                "created_at": "2026-02-18T12:00:00.000000Z",
                "url": "https://todoist.com/showTask?id=2995104339"
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            Property::short_text("content", "Task Content").required(),
            Property::long_text("description", "Description"),
            project_field(&self.base_url).description("Defaults to the Inbox"),
            Property::short_text("due_string", "Due Date")
                .description("Natural language due date, e.g. \"tomorrow at 9am\""),
            Property::select(
                "priority",
                "Priority",
                &[("1", "Normal"), ("2", "Medium"), ("3", "High"), ("4", "Urgent")],
            ),
            Property::array("labels", "Labels"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateTaskProps = ctx.input()?;
        input::require("content", &props.content)?;
        if let Some(priority) = props.priority {
            if !(1..=4).contains(&priority) {
                return Err(ConnectorError::invalid("priority", "must be between 1 and 4"));
            }
        }

        let mut body = Map::new();
        body.insert("content".into(), json!(props.content.trim()));
        if let Some(description) = input::non_blank(&props.description) {
            body.insert("description".into(), json!(description));
        }
        if let Some(project_id) = input::non_blank(&props.project_id) {
            body.insert("project_id".into(), json!(project_id));
        }
        if let Some(due) = input::non_blank(&props.due_string) {
            body.insert("due_string".into(), json!(due));
        }
        if let Some(priority) = props.priority {
            body.insert("priority".into(), json!(priority));
        }
        if !props.labels.is_empty() {
            body.insert("labels".into(), json!(props.labels));
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client.post("/tasks").json(JsonValue::Object(body)).send().await
    }
}

// ---------------------------------------------------------------------------
// close_task
// ---------------------------------------------------------------------------

pub struct CloseTask {
    base_url: Option<String>,
}

impl CloseTask {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CloseTaskProps {
    #[serde(default, deserialize_with = "string_or_number")]
    task_id: String,
}

#[async_trait]
impl Action for CloseTask {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("close_task", "Close Task", "Marks a task as completed")
            .documentation(DOCS_URL)
            .sample_output(json!({"success": true}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![Property::short_text("task_id", "Task ID").required()])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CloseTaskProps = ctx.input()?;
        input::require("task_id", &props.task_id)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let path = format!("/tasks/{}/close", urlencoding::encode(props.task_id.trim()));
        let response = client.post(&path).send().await?;
        Ok(success_or(response))
    }
}

// ---------------------------------------------------------------------------
// find_task
// ---------------------------------------------------------------------------

pub struct FindTask {
    base_url: Option<String>,
}

impl FindTask {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct FindTaskProps {
    #[serde(default)]
    content: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    project_id: Option<String>,
}

#[async_trait]
impl Action for FindTask {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new(
            "find_task",
            "Find Task",
            "Finds the first active task whose content contains the search text",
        )
        .documentation(DOCS_URL)
        .sample_output(json!({"id": "2995104339", "content": "Buy milk"}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            Property::short_text("content", "Search Text").required(),
            project_field(&self.base_url),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: FindTaskProps = ctx.input()?;
        input::require("content", &props.content)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let mut request = client.get("/tasks");
        if let Some(project_id) = input::non_blank(&props.project_id) {
            request = request.query("project_id", project_id);
        }
        let tasks = request.send().await?;

        let needle = props.content.trim().to_lowercase();
        let found = tasks
            .as_array()
            .into_iter()
            .flatten()
            .find(|task| {
                task["content"]
                    .as_str()
                    .map(|c| c.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .cloned();

        Ok(found.unwrap_or_else(|| json!({"found": false, "content": props.content.trim()})))
    }
}
