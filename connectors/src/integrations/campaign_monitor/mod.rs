pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::form::Property;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, Trigger};

use self::actions::{AddSubscriber, Unsubscribe};
use self::triggers::NewSubscriber;

/// Campaign Monitor subscriber lists.
pub struct CampaignMonitor {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl CampaignMonitor {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self::build(Some(base_url))
    }

    fn build(base_url: Option<String>) -> Self {
        Self {
            actions: vec![
                Arc::new(AddSubscriber::new(base_url.clone())),
                Arc::new(Unsubscribe::new(base_url.clone())),
            ],
            triggers: vec![Arc::new(NewSubscriber::new(base_url))],
        }
    }
}

impl Default for CampaignMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for CampaignMonitor {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "campaign_monitor".to_string(),
            display_name: "Campaign Monitor".to_string(),
            description: "Manage subscribers on Campaign Monitor lists".to_string(),
            icon: "/icons/campaign_monitor.svg".to_string(),
            version: "0.1.0".to_string(),
            category: "marketing".to_string(),
            authors: vec!["Wakflo <integrations@wakflo.com>".to_string()],
        }
    }

    fn auth(&self) -> IntegrationAuth {
        IntegrationAuth::custom(vec![
            Property::secret("api_key", "API Key").required(),
            Property::short_text("client_id", "Client ID")
                .required()
                .description("Used to list the client's subscriber lists"),
        ])
    }

    fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    fn triggers(&self) -> &[Arc<dyn Trigger>] {
        &self.triggers
    }
}
