pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::form::Property;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, Trigger};

use self::actions::{CreateInviteLink, GetChat, SendMessage};
use self::triggers::MessageReceived;

/// Telegram Bot API integration.
pub struct Telegram {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl Telegram {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Replaces `https://api.telegram.org` (for testing).
    pub fn with_base_url(base_url: String) -> Self {
        Self::build(Some(base_url))
    }

    fn build(base_url: Option<String>) -> Self {
        Self {
            actions: vec![
                Arc::new(SendMessage::new(base_url.clone())),
                Arc::new(CreateInviteLink::new(base_url.clone())),
                Arc::new(GetChat::new(base_url.clone())),
            ],
            triggers: vec![Arc::new(MessageReceived::new(base_url))],
        }
    }
}

impl Default for Telegram {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for Telegram {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "telegram".to_string(),
            display_name: "Telegram".to_string(),
            description: "Send messages and manage chats through a Telegram bot".to_string(),
            icon: "/icons/telegram.svg".to_string(),
            version: "0.1.0".to_string(),
            category: "communication".to_string(),
            authors: vec!["Wakflo <integrations@wakflo.com>".to_string()],
        }
    }

    fn auth(&self) -> IntegrationAuth {
        IntegrationAuth::custom(vec![Property::secret("bot_token", "Bot Token")
            .required()
            .description("Token issued by @BotFather")])
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
    fn test_custom_auth_declares_bot_token() {
        let integration = Telegram::new();
        match integration.auth().schema {
            AuthSchema::Custom { fields } => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].key, "bot_token");
                assert!(fields[0].required);
            }
            other => panic!("unexpected auth schema: {other:?}"),
        }
        assert!(integration.action("create_invite_link").is_some());
        assert!(integration.trigger("message_received").is_some());
    }
}
