pub const ADMIN_PATH: &str = "/ghost/api/admin";
pub const ACCEPT_VERSION: &str = "v5.0";
pub const DOCS_URL: &str = "https://ghost.org/docs/admin-api/";

/// Admin tokens are valid for at most five minutes.
pub const TOKEN_TTL_SECS: i64 = 300;
pub const TOKEN_AUDIENCE: &str = "/admin/";

pub const POST_STATUSES: &[(&str, &str)] = &[
    ("draft", "Draft"),
    ("published", "Published"),
    ("scheduled", "Scheduled"),
];
