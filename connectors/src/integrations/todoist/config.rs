pub const BASE_URL: &str = "https://api.todoist.com/rest/v2";
pub const AUTH_URL: &str = "https://todoist.com/oauth/authorize";
pub const TOKEN_URL: &str = "https://todoist.com/oauth/access_token";
pub const SCOPES: &[&str] = &["data:read_write", "data:delete"];

pub const DOCS_URL: &str = "https://developer.todoist.com/rest/v2";
