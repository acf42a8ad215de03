/// Used when the token response carried no `api_domain`.
pub const DEFAULT_API_DOMAIN: &str = "https://www.zohoapis.com";
pub const API_PATH: &str = "/crm/v2";
pub const AUTH_URL: &str = "https://accounts.zoho.com/oauth/v2/auth";
pub const TOKEN_URL: &str = "https://accounts.zoho.com/oauth/v2/token";
pub const SCOPES: &[&str] = &["ZohoCRM.modules.ALL", "ZohoCRM.settings.modules.READ"];
pub const DOCS_URL: &str = "https://www.zoho.com/crm/developer/docs/api/v2/";
