use super::*;
use crate::form::Property;

#[test]
fn test_access_token_present() {
    let auth = AuthContext::with_token("abc123");
    assert_eq!(auth.access_token().unwrap(), "abc123");
}

#[test]
fn test_access_token_missing() {
    let auth = AuthContext::default();
    let err = auth.access_token().unwrap_err();
    assert!(matches!(err, ConnectorError::Auth(_)));
}

#[test]
fn test_access_token_blank() {
    let auth = AuthContext::with_token("   ");
    assert!(auth.access_token().is_err());
}

#[test]
fn test_require_extra() {
    let auth = AuthContext::default()
        .with_extra("domain", "acme")
        .with_extra("api_key", "");

    assert_eq!(auth.require("domain").unwrap(), "acme");

    let err = auth.require("api_key").unwrap_err();
    assert!(err.to_string().contains("api_key"));

    let err = auth.require("instance_url").unwrap_err();
    assert!(err.to_string().contains("instance_url"));
}

#[test]
fn test_get_trims() {
    let auth = AuthContext::default().with_extra("server", "  us21 ");
    assert_eq!(auth.get("server"), Some("us21"));
    assert_eq!(auth.get("missing"), None);
}

#[test]
fn test_debug_redacts_secrets() {
    let auth = AuthContext::with_token("super-secret").with_extra("api_key", "also-secret");
    let rendered = format!("{:?}", auth);
    assert!(!rendered.contains("super-secret"));
    assert!(!rendered.contains("also-secret"));
    assert!(rendered.contains("api_key"));
}

#[test]
fn test_deserialize_camel_case() {
    let auth: AuthContext = serde_json::from_value(serde_json::json!({
        "accessToken": "tok",
        "extra": {"domain": "acme"}
    }))
    .unwrap();
    assert_eq!(auth.access_token().unwrap(), "tok");
    assert_eq!(auth.get("domain"), Some("acme"));
}

#[test]
fn test_basic_credentials() {
    // base64("key:X")
    assert_eq!(basic_credentials("key", Some("X")), "Basic a2V5Olg=");
    // base64("user:")
    assert_eq!(basic_credentials("user", None), "Basic dXNlcjo=");
}

#[test]
fn test_schema_serialization() {
    let oauth = IntegrationAuth::oauth2(OAuthConfig::new(
        "https://example.com/authorize",
        "https://example.com/token",
        &["read", "write"],
    ));
    let json = serde_json::to_value(&oauth).unwrap();
    assert_eq!(json["required"], true);
    assert_eq!(json["schema"]["type"], "oauth2");
    assert_eq!(json["schema"]["scopes"][1], "write");

    let custom = IntegrationAuth::custom(vec![Property::secret("api_key", "API Key").required()]);
    let json = serde_json::to_value(&custom).unwrap();
    assert_eq!(json["schema"]["type"], "custom");
    assert_eq!(json["schema"]["fields"][0]["key"], "api_key");
    assert_eq!(json["schema"]["fields"][0]["required"], true);

    let none = serde_json::to_value(IntegrationAuth::none()).unwrap();
    assert_eq!(none["required"], false);
    assert_eq!(none["schema"]["type"], "none");
}
