pub const BASE_URL: &str = "https://api.hubapi.com";
pub const AUTH_URL: &str = "https://app.hubspot.com/oauth/authorize";
pub const TOKEN_URL: &str = "https://api.hubapi.com/oauth/v1/token";
pub const SCOPES: &[&str] = &["crm.objects.contacts.read", "crm.objects.contacts.write"];
pub const DOCS_URL: &str = "https://developers.hubspot.com/docs/api/crm/contacts";

pub const CONTACTS_PATH: &str = "/crm/v3/objects/contacts";
pub const CONTACT_PROPERTIES: &[&str] = &["email", "firstname", "lastname", "phone", "company", "createdate"];
