pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, OAuthConfig, Trigger};

use self::actions::{CreateBoard, CreatePin, DeletePin};
use self::config::{AUTH_URL, SCOPES, TOKEN_URL};
use self::triggers::NewPin;

/// Pinterest integration - pins and boards over the v5 API.
pub struct Pinterest {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl Pinterest {
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
                Arc::new(CreatePin::new(base_url.clone())),
                Arc::new(CreateBoard::new(base_url.clone())),
                Arc::new(DeletePin::new(base_url.clone())),
            ],
            triggers: vec![Arc::new(NewPin::new(base_url))],
        }
    }
}

impl Default for Pinterest {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for Pinterest {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "pinterest".to_string(),
            display_name: "Pinterest".to_string(),
            description: "Create pins and boards and watch for new pins".to_string(),
            icon: "/icons/pinterest.svg".to_string(),
            version: "0.1.0".to_string(),
            category: "social".to_string(),
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
