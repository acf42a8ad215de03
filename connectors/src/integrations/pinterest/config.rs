pub const BASE_URL: &str = "https://api.pinterest.com/v5";
pub const AUTH_URL: &str = "https://www.pinterest.com/oauth/";
pub const TOKEN_URL: &str = "https://api.pinterest.com/v5/oauth/token";
pub const SCOPES: &[&str] = &["boards:read", "boards:write", "pins:read", "pins:write"];

pub const PRIVACY_LEVELS: &[&str] = &["PUBLIC", "SECRET"];
pub const PAGE_SIZE: u32 = 100;

pub const DOCS_URL: &str = "https://developers.pinterest.com/docs/api/v5/";
