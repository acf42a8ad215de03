//! Third-party integrations, one module per vendor API.

pub mod campaign_monitor;
pub mod discord;
pub mod freshdesk;
pub mod ghost_cms;
pub mod google_sheets;
pub mod hubspot;
pub mod jira;
pub mod mailchimp;
pub mod pinterest;
pub mod telegram;
pub mod todoist;
pub mod zoho_crm;
