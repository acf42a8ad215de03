/// `{domain}` is the helpdesk subdomain (`acme` for acme.freshdesk.com).
pub const BASE_URL_TEMPLATE: &str = "https://{domain}.freshdesk.com/api/v2";
pub const DOCS_URL: &str = "https://developers.freshdesk.com/api/";

pub const PRIORITIES: &[(&str, &str)] = &[("1", "Low"), ("2", "Medium"), ("3", "High"), ("4", "Urgent")];
pub const STATUSES: &[(&str, &str)] = &[("2", "Open"), ("3", "Pending"), ("4", "Resolved"), ("5", "Closed")];
