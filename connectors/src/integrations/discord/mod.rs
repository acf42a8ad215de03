pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::form::Property;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, Trigger};

use self::actions::{AddRoleToMember, CreateChannel, SendMessage};
use self::triggers::NewChannelMessage;

/// Discord integration acting as a bot user.
pub struct Discord {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl Discord {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self::build(Some(base_url))
    }

    fn build(base_url: Option<String>) -> Self {
        Self {
            actions: vec![
                Arc::new(SendMessage::new(base_url.clone())),
                Arc::new(CreateChannel::new(base_url.clone())),
                Arc::new(AddRoleToMember::new(base_url.clone())),
            ],
            triggers: vec![Arc::new(NewChannelMessage::new(base_url))],
        }
    }
}

impl Default for Discord {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for Discord {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "discord".to_string(),
            display_name: "Discord".to_string(),
            description: "Post messages, create channels and assign roles with a bot".to_string(),
            icon: "/icons/discord.svg".to_string(),
            version: "0.1.0".to_string(),
            category: "communication".to_string(),
            authors: vec!["Wakflo <integrations@wakflo.com>".to_string()],
        }
    }

    fn auth(&self) -> IntegrationAuth {
        IntegrationAuth::custom(vec![Property::secret("bot_token", "Bot Token").required()])
    }

    fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    fn triggers(&self) -> &[Arc<dyn Trigger>] {
        &self.triggers
    }
}
