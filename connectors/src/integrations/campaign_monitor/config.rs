pub const BASE_URL: &str = "https://api.createsend.com/api/v3.3";
pub const DOCS_URL: &str = "https://www.campaignmonitor.com/api/v3-3/subscribers/";

pub const CONSENT_OPTIONS: &[(&str, &str)] = &[("Yes", "Yes"), ("No", "No"), ("Unchanged", "Unchanged")];
