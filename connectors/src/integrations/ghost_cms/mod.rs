pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::form::Property;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, Trigger};

use self::actions::{CreateMember, CreatePost, FindMember};
use self::triggers::{NewMember, NewPost};

/// Ghost CMS integration over the Admin API.
pub struct GhostCms {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl GhostCms {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Replaces `{url}/ghost/api/admin` (for testing).
    pub fn with_base_url(base_url: String) -> Self {
        Self::build(Some(base_url))
    }

    fn build(base_url: Option<String>) -> Self {
        Self {
            actions: vec![
                Arc::new(CreatePost::new(base_url.clone())),
                Arc::new(CreateMember::new(base_url.clone())),
                Arc::new(FindMember::new(base_url.clone())),
            ],
            triggers: vec![
                Arc::new(NewPost::new(base_url.clone())),
                Arc::new(NewMember::new(base_url)),
            ],
        }
    }
}

impl Default for GhostCms {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for GhostCms {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "ghost_cms".to_string(),
            display_name: "Ghost".to_string(),
            description: "Publish posts and manage members on a Ghost site".to_string(),
            icon: "/icons/ghost_cms.svg".to_string(),
            version: "0.1.0".to_string(),
            category: "cms".to_string(),
            authors: vec!["Wakflo <integrations@wakflo.com>".to_string()],
        }
    }

    fn auth(&self) -> IntegrationAuth {
        IntegrationAuth::custom(vec![
            Property::url("url", "Site URL").required(),
            Property::secret("admin_api_key", "Admin API Key")
                .required()
                .description("From a custom integration, formatted <id>:<secret>"),
        ])
    }

    fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    fn triggers(&self) -> &[Arc<dyn Trigger>] {
        &self.triggers
    }
}
