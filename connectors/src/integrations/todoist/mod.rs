pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, OAuthConfig, Trigger};

use self::actions::{CloseTask, CreateTask, FindTask};
use self::config::{AUTH_URL, SCOPES, TOKEN_URL};
use self::triggers::NewTask;

/// Todoist integration - tasks and projects over the REST v2 API.
pub struct Todoist {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl Todoist {
    /// Create an integration using the real Todoist API base URL.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create an integration with a custom API base URL (for testing).
    pub fn with_base_url(base_url: String) -> Self {
        Self::build(Some(base_url))
    }

    fn build(base_url: Option<String>) -> Self {
        Self {
            actions: vec![
                Arc::new(CreateTask::new(base_url.clone())),
                Arc::new(CloseTask::new(base_url.clone())),
                Arc::new(FindTask::new(base_url.clone())),
            ],
            triggers: vec![Arc::new(NewTask::new(base_url))],
        }
    }
}

impl Default for Todoist {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for Todoist {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "todoist".to_string(),
            display_name: "Todoist".to_string(),
            description: "Create, complete and watch tasks in Todoist".to_string(),
            icon: "/icons/todoist.svg".to_string(),
            version: "0.1.0".to_string(),
            category: "productivity".to_string(),
            authors: vec!["Wakflo <integrations@wakflo.com>".to_string()],
        }
    }

    fn auth(&self) -> IntegrationAuth {
        IntegrationAuth::oauth2(OAuthConfig::new(AUTH_URL, TOKEN_URL, SCOPES))
    }

    fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    fn triggers(&self) -> &[Arc<dyn Trigger>] {
        &self.triggers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wakflo::AuthSchema;

    #[test]
    fn test_integration_metadata() {
        let integration = Todoist::new();
        assert_eq!(integration.metadata().name, "todoist");
        assert_eq!(integration.actions().len(), 3);
        assert_eq!(integration.triggers().len(), 1);
        assert!(integration.action("create_task").is_some());
        assert!(integration.trigger("new_task").is_some());

        match integration.auth().schema {
            AuthSchema::OAuth2(oauth) => {
                assert!(oauth.auth_url.contains("todoist.com"));
                assert!(oauth.scopes.contains(&"data:read_write".to_string()));
            }
            other => panic!("unexpected auth schema: {other:?}"),
        }
    }
}
