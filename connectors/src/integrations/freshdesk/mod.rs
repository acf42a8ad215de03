pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::form::Property;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, Trigger};

use self::actions::{CreateContact, CreateTicket, GetTicket, UpdateTicket};
use self::triggers::NewTicket;

/// Freshdesk helpdesk integration (API v2).
pub struct Freshdesk {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl Freshdesk {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Bypasses the `{domain}.freshdesk.com` host (for testing).
    pub fn with_base_url(base_url: String) -> Self {
        Self::build(Some(base_url))
    }

    fn build(base_url: Option<String>) -> Self {
        Self {
            actions: vec![
                Arc::new(CreateTicket::new(base_url.clone())),
                Arc::new(GetTicket::new(base_url.clone())),
                Arc::new(UpdateTicket::new(base_url.clone())),
                Arc::new(CreateContact::new(base_url.clone())),
            ],
            triggers: vec![Arc::new(NewTicket::new(base_url))],
        }
    }
}

impl Default for Freshdesk {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for Freshdesk {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "freshdesk".to_string(),
            display_name: "Freshdesk".to_string(),
            description: "Create and update support tickets and contacts".to_string(),
            icon: "/icons/freshdesk.svg".to_string(),
            version: "0.1.0".to_string(),
            category: "customer-support".to_string(),
            authors: vec!["Wakflo <integrations@wakflo.com>".to_string()],
        }
    }

    fn auth(&self) -> IntegrationAuth {
        IntegrationAuth::custom(vec![
            Property::short_text("domain", "Helpdesk Domain")
                .required()
                .description("acme for acme.freshdesk.com"),
            Property::secret("api_key", "API Key").required(),
        ])
    }

    fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    fn triggers(&self) -> &[Arc<dyn Trigger>] {
        &self.triggers
    }
}
