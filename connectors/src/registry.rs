//! Integration registry - every integration this crate ships.

use crate::integrations::campaign_monitor::CampaignMonitor;
use crate::integrations::discord::Discord;
use crate::integrations::freshdesk::Freshdesk;
use crate::integrations::ghost_cms::GhostCms;
use crate::integrations::google_sheets::GoogleSheets;
use crate::integrations::hubspot::HubSpot;
use crate::integrations::jira::Jira;
use crate::integrations::mailchimp::Mailchimp;
use crate::integrations::pinterest::Pinterest;
use crate::integrations::telegram::Telegram;
use crate::integrations::todoist::Todoist;
use crate::integrations::zoho_crm::ZohoCrm;
use std::sync::Arc;
use wakflo::Integration;

/// Returns all available integrations, each pointed at its vendor API.
pub fn all_integrations() -> Vec<Arc<dyn Integration>> {
    vec![
        Arc::new(GoogleSheets::new()),
        Arc::new(Mailchimp::new()),
        Arc::new(Telegram::new()),
        Arc::new(Discord::new()),
        Arc::new(Freshdesk::new()),
        Arc::new(GhostCms::new()),
        Arc::new(Todoist::new()),
        Arc::new(Jira::new()),
        Arc::new(HubSpot::new()),
        Arc::new(CampaignMonitor::new()),
        Arc::new(ZohoCrm::new()),
        Arc::new(Pinterest::new()),
    ]
}

/// Returns all integrations with every API root replaced by `base_url`.
///
/// Used by tests to route all traffic to one mock server.
pub fn all_integrations_with_base_url(base_url: &str) -> Vec<Arc<dyn Integration>> {
    let url = || base_url.to_string();
    vec![
        Arc::new(GoogleSheets::with_base_url(url())),
        Arc::new(Mailchimp::with_base_url(url())),
        Arc::new(Telegram::with_base_url(url())),
        Arc::new(Discord::with_base_url(url())),
        Arc::new(Freshdesk::with_base_url(url())),
        Arc::new(GhostCms::with_base_url(url())),
        Arc::new(Todoist::with_base_url(url())),
        Arc::new(Jira::with_base_url(url())),
        Arc::new(HubSpot::with_base_url(url())),
        Arc::new(CampaignMonitor::with_base_url(url())),
        Arc::new(ZohoCrm::with_base_url(url())),
        Arc::new(Pinterest::with_base_url(url())),
    ]
}

/// Finds an integration by its `metadata().name`.
pub fn find_integration(name: &str) -> Option<Arc<dyn Integration>> {
    all_integrations()
        .into_iter()
        .find(|integration| integration.metadata().name == name)
}
