use async_trait::async_trait;
use chrono::Duration;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use wakflo::form::Form;
use wakflo::input;
use wakflo::polling::{filter_array_since, PollWindow};
use wakflo::{ConnectorError, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::actions::project_field;
use super::client::connect;
use super::config::{DOCS_URL, JQL_TIME_FORMAT, JQL_ZONE_SLACK_HOURS};

/// JQL for issues created after the window start, newest first.
///
/// Jira reads JQL times in the account's profile time zone, which is not
/// known here. The bound is written in UTC minus the widest zone offset, so
/// the query always overlaps the previous poll; the client-side filter on
/// `fields.created` removes the overlap. The first poll has no time bound.
pub fn new_issue_jql(project_key: Option<&str>, window: &PollWindow) -> String {
    let mut clauses = Vec::new();
    if let Some(key) = project_key {
        clauses.push(format!("project = \"{}\"", key.replace('"', "\\\"")));
    }
    if let Some(t) = window.since() {
        let bound = t - Duration::hours(JQL_ZONE_SLACK_HOURS);
        clauses.push(format!("created > \"{}\"", bound.format(JQL_TIME_FORMAT)));
    }
    if clauses.is_empty() {
        "ORDER BY created DESC".to_string()
    } else {
        format!("{} ORDER BY created DESC", clauses.join(" AND "))
    }
}

pub struct NewIssue {
    base_url: Option<String>,
}

impl NewIssue {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct NewIssueProps {
    #[serde(default)]
    project_key: Option<String>,
}

#[async_trait]
impl Trigger for NewIssue {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new("new_issue", "New Issue", "Triggers when an issue is created")
            .documentation(DOCS_URL)
            .sample_output(json!([{
                "id": "10042",
                "key": "OPS-42",
                "fields": {"summary": "Rotate keys", "created": "2026-02-18T12:00:00.000+0000"}
            }]))
    }

    fn properties(&self) -> Form {
        Form::new(vec![project_field(&self.base_url).description("Only watch this project (optional)")])
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        let props: NewIssueProps = ctx.input()?;
        let window = ctx.state.window();
        let jql = new_issue_jql(input::non_blank(&props.project_key), &window);

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = client
            .get("/search/jql")
            .query("jql", &jql)
            .query("maxResults", 100)
            .query("fields", "*navigable")
            .send()
            .await?;

        let items = filter_array_since(&response, "issues", "fields.created", &window);
        debug!(count = items.len(), jql = %jql, "Jira new_issue poll complete");
        Ok(TriggerOutput::new(items))
    }
}
