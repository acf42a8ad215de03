pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, OAuthConfig, Trigger};

use self::actions::{CreateContact, FindContactByEmail};
use self::config::{AUTH_URL, SCOPES, TOKEN_URL};
use self::triggers::NewContact;

/// HubSpot CRM contacts.
pub struct HubSpot {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl HubSpot {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self::build(Some(base_url))
    }

    fn build(base_url: Option<String>) -> Self {
        Self {
            actions: vec![
                Arc::new(CreateContact::new(base_url.clone())),
                Arc::new(FindContactByEmail::new(base_url.clone())),
            ],
            triggers: vec![Arc::new(NewContact::new(base_url))],
        }
    }
}

impl Default for HubSpot {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for HubSpot {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "hubspot".to_string(),
            display_name: "HubSpot".to_string(),
            description: "Create and look up HubSpot CRM contacts".to_string(),
            icon: "/icons/hubspot.svg".to_string(),
            version: "0.1.0".to_string(),
            category: "crm".to_string(),
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
