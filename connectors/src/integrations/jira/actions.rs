use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use wakflo::form::{DynamicOptions, Form, Property};
use wakflo::input::{self, list_or_csv, opt_string_or_number, string_or_number};
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{adf, connect, IssueTypeOptions, ProjectOptions};
use super::config::DOCS_URL;

pub(crate) fn project_field(base_url: &Option<String>) -> Property {
    Property::dynamic_select(
        "project_key",
        "Project",
        DynamicOptions::new(ProjectOptions {
            base_url: base_url.clone(),
        }),
    )
}

fn issue_path(key: &str) -> String {
    format!("/issue/{}", urlencoding::encode(key.trim()))
}

// ---------------------------------------------------------------------------
// create_issue
// ---------------------------------------------------------------------------

pub struct CreateIssue {
    base_url: Option<String>,
}

impl CreateIssue {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreateIssueProps {
    #[serde(default)]
    project_key: String,
    #[serde(default, deserialize_with = "string_or_number")]
    issue_type_id: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "list_or_csv")]
    labels: Vec<String>,
}

#[async_trait]
impl Action for CreateIssue {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_issue", "Create Issue", "Creates an issue in a project")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "id": "10042",
                "key": "OPS-42",
                "self": "https://acme.atlassian.net/rest/api/3/issue/10042"
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            project_field(&self.base_url).required(),
            Property::dynamic_select(
                "issue_type_id",
                "Issue Type",
                DynamicOptions::new(IssueTypeOptions {
                    base_url: self.base_url.clone(),
                })
                .depends_on("project_key"),
            )
            .required(),
            Property::short_text("summary", "Summary").required(),
            Property::long_text("description", "Description"),
            Property::array("labels", "Labels"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateIssueProps = ctx.input()?;
        input::require("project_key", &props.project_key)?;
        input::require("issue_type_id", &props.issue_type_id)?;
        input::require("summary", &props.summary)?;

        let mut fields = json!({
            "project": {"key": props.project_key.trim()},
            "issuetype": {"id": props.issue_type_id.trim()},
            "summary": props.summary.trim(),
        });
        if let Some(description) = input::non_blank(&props.description) {
            fields["description"] = adf(description);
        }
        if !props.labels.is_empty() {
            // labels may not contain spaces
            if props.labels.iter().any(|l| l.contains(char::is_whitespace)) {
                return Err(ConnectorError::invalid("labels", "labels cannot contain spaces"));
            }
            fields["labels"] = json!(props.labels);
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client.post("/issue").json(json!({"fields": fields})).send().await
    }
}

// ---------------------------------------------------------------------------
// get_issue
// ---------------------------------------------------------------------------

pub struct GetIssue {
    base_url: Option<String>,
}

impl GetIssue {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct IssueKeyProps {
    #[serde(default, deserialize_with = "string_or_number")]
    issue_key: String,
}

#[async_trait]
impl Action for GetIssue {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("get_issue", "Get Issue", "Fetches an issue by key or id")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "id": "10042",
                "key": "OPS-42",
                "fields": {"summary": "Rotate keys", "status": {"name": "To Do"}}
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![Property::short_text("issue_key", "Issue Key").required()])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: IssueKeyProps = ctx.input()?;
        input::require("issue_key", &props.issue_key)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client.get(&issue_path(&props.issue_key)).send().await
    }
}

// ---------------------------------------------------------------------------
// add_comment
// ---------------------------------------------------------------------------

pub struct AddComment {
    base_url: Option<String>,
}

impl AddComment {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct AddCommentProps {
    #[serde(default, deserialize_with = "string_or_number")]
    issue_key: String,
    #[serde(default)]
    comment: String,
}

#[async_trait]
impl Action for AddComment {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("add_comment", "Add Comment", "Adds a comment to an issue")
            .documentation(DOCS_URL)
            .sample_output(json!({"id": "10100", "created": "2026-02-18T12:00:00.000+0000"}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            Property::short_text("issue_key", "Issue Key").required(),
            Property::long_text("comment", "Comment").required(),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: AddCommentProps = ctx.input()?;
        input::require("issue_key", &props.issue_key)?;
        input::require("comment", &props.comment)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client
            .post(&format!("{}/comment", issue_path(&props.issue_key)))
            .json(json!({"body": adf(&props.comment)}))
            .send()
            .await
    }
}

// ---------------------------------------------------------------------------
// search_issues
// ---------------------------------------------------------------------------

pub struct SearchIssues {
    base_url: Option<String>,
}

impl SearchIssues {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct SearchIssuesProps {
    #[serde(default)]
    jql: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    max_results: Option<String>,
}

#[async_trait]
impl Action for SearchIssues {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("search_issues", "Search Issues", "Runs a JQL query")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "issues": [{"id": "10042", "key": "OPS-42", "fields": {"summary": "Rotate keys"}}],
                "isLast": true
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            Property::long_text("jql", "JQL")
                .required()
                .description("e.g. project = OPS AND status = \"To Do\""),
            Property::number("max_results", "Max Results").default_value(json!(50)),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: SearchIssuesProps = ctx.input()?;
        input::require("jql", &props.jql)?;
        let max_results = match input::non_blank(&props.max_results) {
            None => 50,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=100).contains(n))
                .ok_or_else(|| ConnectorError::invalid("max_results", "must be between 1 and 100"))?,
        };

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client
            .get("/search/jql")
            .query("jql", props.jql.trim())
            .query("maxResults", max_results)
            .query("fields", "*navigable")
            .send()
            .await
    }
}
