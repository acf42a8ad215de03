pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::form::Property;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, Trigger};

use self::actions::{AddComment, CreateIssue, GetIssue, SearchIssues};
use self::triggers::NewIssue;

/// Jira Cloud integration (REST API v3).
pub struct Jira {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl Jira {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Replaces `{instance_url}/rest/api/3` (for testing).
    pub fn with_base_url(base_url: String) -> Self {
        Self::build(Some(base_url))
    }

    fn build(base_url: Option<String>) -> Self {
        Self {
            actions: vec![
                Arc::new(CreateIssue::new(base_url.clone())),
                Arc::new(GetIssue::new(base_url.clone())),
                Arc::new(AddComment::new(base_url.clone())),
                Arc::new(SearchIssues::new(base_url.clone())),
            ],
            triggers: vec![Arc::new(NewIssue::new(base_url))],
        }
    }
}

impl Default for Jira {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for Jira {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "jira".to_string(),
            display_name: "Jira".to_string(),
            description: "Create, comment on and search Jira issues".to_string(),
            icon: "/icons/jira.svg".to_string(),
            version: "0.1.0".to_string(),
            category: "project-management".to_string(),
            authors: vec!["Wakflo <integrations@wakflo.com>".to_string()],
        }
    }

    fn auth(&self) -> IntegrationAuth {
        IntegrationAuth::custom(vec![
            Property::url("instance_url", "Instance URL")
                .required()
                .description("https://your-team.atlassian.net"),
            Property::email("email", "Account Email").required(),
            Property::secret("api_token", "API Token").required(),
        ])
    }

    fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    fn triggers(&self) -> &[Arc<dyn Trigger>] {
        &self.triggers
    }
}
