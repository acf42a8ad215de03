pub mod actions;
pub mod client;
pub mod config;
pub mod triggers;

use std::sync::Arc;
use wakflo::{Action, Integration, IntegrationAuth, IntegrationMetadata, OAuthConfig, Trigger};

use self::actions::{AppendRow, CreateSpreadsheet, CreateWorksheet, FindWorksheetByTitle};
use self::config::{AUTH_URL, SCOPES, TOKEN_URL};
use self::triggers::NewSpreadsheet;

/// Google Sheets integration. Spreadsheet listing goes through Drive v3.
pub struct GoogleSheets {
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl GoogleSheets {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Points both the Sheets and Drive clients at `base_url` (for testing).
    pub fn with_base_url(base_url: String) -> Self {
        Self::build(Some(base_url))
    }

    fn build(base_url: Option<String>) -> Self {
        Self {
            actions: vec![
                Arc::new(FindWorksheetByTitle::new(base_url.clone())),
                Arc::new(CreateSpreadsheet::new(base_url.clone())),
                Arc::new(CreateWorksheet::new(base_url.clone())),
                Arc::new(AppendRow::new(base_url.clone())),
            ],
            triggers: vec![Arc::new(NewSpreadsheet::new(base_url))],
        }
    }
}

impl Default for GoogleSheets {
    fn default() -> Self {
        Self::new()
    }
}

impl Integration for GoogleSheets {
    fn metadata(&self) -> IntegrationMetadata {
        IntegrationMetadata {
            name: "google_sheets".to_string(),
            display_name: "Google Sheets".to_string(),
            description: "Create spreadsheets, manage worksheets and append rows".to_string(),
            icon: "/icons/google_sheets.svg".to_string(),
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
