use async_trait::async_trait;
use md5::{Digest, Md5};
use wakflo::form::{to_options, OptionsContext, OptionsLoader, SelectOption};
use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError, JsonValue};

use super::config::BASE_URL_TEMPLATE;

/// Builds a client for the account's data centre.
///
/// The data centre comes from the `server` auth field unless `base_url`
/// overrides the whole root.
pub fn connect(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    let token = auth.access_token()?;
    let base_url = match base_url {
        Some(url) => url.to_string(),
        None => BASE_URL_TEMPLATE.replace("{server}", auth.require("server")?),
    };
    Ok(HttpClient::new(&base_url, AuthScheme::Bearer(token.to_string()), http)?
        .with_error_extractor(extract_error))
}

/// Mailchimp errors are RFC 7807 problem documents.
fn extract_error(body: &JsonValue) -> Option<String> {
    body["detail"]
        .as_str()
        .or_else(|| body["title"].as_str())
        .map(str::to_string)
}

/// Member id used in member URLs: MD5 of the lowercased address.
pub fn subscriber_hash(email: &str) -> String {
    hex::encode(Md5::digest(email.trim().to_lowercase().as_bytes()))
}

/// Dropdown of audiences (lists).
pub struct AudienceOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for AudienceOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = client
            .get("/lists")
            .query("count", 100)
            .query("fields", "lists.id,lists.name")
            .send()
            .await?;
        Ok(to_options(&response["lists"], "id", "name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn test_subscriber_hash_is_case_insensitive() {
        assert_eq!(
            subscriber_hash("Urist.McVankab@freddiesjokes.com"),
            "62eeb292278cc15f5817cb78f7790b08"
        );
        assert_eq!(
            subscriber_hash(" urist.mcvankab@freddiesjokes.com "),
            subscriber_hash("URIST.MCVANKAB@FREDDIESJOKES.COM")
        );
    }

    #[test]
    fn test_connect_requires_server_without_override() {
        let auth = AuthContext::with_token("tok");
        let err = connect(&auth, &HttpConfig::default(), None).err().unwrap();
        assert!(matches!(err, ConnectorError::Auth(_)));

        let auth = auth.with_extra("server", "us21");
        let client = connect(&auth, &HttpConfig::default(), None).unwrap();
        assert_eq!(client.base_url(), "https://us21.api.mailchimp.com/3.0");
    }

    #[tokio::test]
    async fn test_audience_options() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/lists")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"lists": [{"id": "a1", "name": "Newsletter"}]}"#)
            .create_async()
            .await;

        let loader = AudienceOptions {
            base_url: Some(server.url()),
        };
        let ctx = OptionsContext {
            auth: AuthContext::with_token("tok"),
            ..OptionsContext::default()
        };
        let options = loader.load(&ctx).await.unwrap();
        assert_eq!(options, vec![SelectOption::new("a1", "Newsletter")]);
    }

    #[tokio::test]
    async fn test_problem_detail_is_extracted() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/lists")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"title": "API Key Invalid", "status": 401, "detail": "Your API key may be invalid."}"#)
            .create_async()
            .await;

        let client = connect(&AuthContext::with_token("tok"), &HttpConfig::default(), Some(&server.url())).unwrap();
        let err = client.get("/lists").query("count", 1).send().await.unwrap_err();
        match err {
            ConnectorError::Api { status, message, .. } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Your API key may be invalid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
