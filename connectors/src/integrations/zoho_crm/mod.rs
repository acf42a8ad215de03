pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, OAuthConfig, Trigger};

use self::actions::{CreateRecord, GetRecord, SearchRecords};
use self::config::{AUTH_URL, SCOPES, TOKEN_URL};
use self::triggers::NewRecord;

/// Zoho CRM integration - generic module records over the v2 REST API.
pub struct ZohoCrm {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl ZohoCrm {
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
                Arc::new(CreateRecord::new(base_url.clone())),
                Arc::new(GetRecord::new(base_url.clone())),
                Arc::new(SearchRecords::new(base_url.clone())),
            ],
            triggers: vec![Arc::new(NewRecord::new(base_url))],
        }
    }
}

impl Default for ZohoCrm {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for ZohoCrm {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "zoho_crm".to_string(),
            display_name: "Zoho CRM".to_string(),
            description: "Create, look up and watch records in any Zoho CRM module".to_string(),
            icon: "/icons/zoho_crm.svg".to_string(),
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
