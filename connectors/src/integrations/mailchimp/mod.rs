pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, OAuthConfig, Trigger};

use self::actions::{AddMemberToList, AddSubscriberToTag, RemoveSubscriberFromTag, UpdateSubscriberStatus};
use self::config::{AUTH_URL, SCOPES, TOKEN_URL};
use self::triggers::NewSubscriber;

/// Mailchimp integration - audience members and tags over Marketing API 3.0.
pub struct Mailchimp {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl Mailchimp {
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
                Arc::new(AddMemberToList::new(base_url.clone())),
                Arc::new(AddSubscriberToTag::new(base_url.clone())),
                Arc::new(RemoveSubscriberFromTag::new(base_url.clone())),
                Arc::new(UpdateSubscriberStatus::new(base_url.clone())),
            ],
            triggers: vec![Arc::new(NewSubscriber::new(base_url))],
        }
    }
}

impl Default for Mailchimp {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for Mailchimp {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "mailchimp".to_string(),
            display_name: "Mailchimp".to_string(),
            description: "Manage audience members, tags and subscription status".to_string(),
            icon: "/icons/mailchimp.svg".to_string(),
            version: "0.1.0".to_string(),
            category: "marketing".to_string(),
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

    #[test]
    fn test_integration_metadata() {
        let integration = Mailchimp::new();
        assert_eq!(integration.metadata().name, "mailchimp");
        assert_eq!(integration.actions().len(), 4);
        assert!(integration.action("add_subscriber_to_tag").is_some());
        assert!(integration.action("remove_subscriber_from_tag").is_some());
        assert!(integration.trigger("new_subscriber").is_some());
    }
}
