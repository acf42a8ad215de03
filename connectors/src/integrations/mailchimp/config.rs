pub const AUTH_URL: &str = "https://login.mailchimp.com/oauth2/authorize";
pub const TOKEN_URL: &str = "https://login.mailchimp.com/oauth2/token";
pub const SCOPES: &[&str] = &[];

/// Marketing API root; `{server}` is the account's data centre (e.g. `us21`).
pub const BASE_URL_TEMPLATE: &str = "https://{server}.api.mailchimp.com/3.0";
pub const DOCS_URL: &str = "https://mailchimp.com/developer/marketing/api/";

pub const MEMBER_STATUSES: &[(&str, &str)] = &[
    ("subscribed", "Subscribed"),
    ("pending", "Pending"),
    ("unsubscribed", "Unsubscribed"),
    ("cleaned", "Cleaned"),
];
