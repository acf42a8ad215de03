use async_trait::async_trait;
use wakflo::form::{to_options, OptionsContext, OptionsLoader, SelectOption};
use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError, JsonValue};

use super::config::{BASE_URL, PAGE_SIZE};

pub fn connect(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    let token = auth.access_token()?;
    Ok(HttpClient::new(
        base_url.unwrap_or(BASE_URL),
        AuthScheme::Bearer(token.to_string()),
        http,
    )?
    .with_error_extractor(extract_error))
}

// {"code": 2, "message": "Authentication failed."}
fn extract_error(body: &JsonValue) -> Option<String> {
    body["message"].as_str().map(str::to_string)
}

/// Dropdown of boards owned by the user.
pub struct BoardOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for BoardOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let boards = client.get("/boards").query("page_size", PAGE_SIZE).send().await?;
        Ok(to_options(&boards["items"], "id", "name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_board_options() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/boards")
            .match_header("authorization", "Bearer pin")
            .match_query(Matcher::UrlEncoded("page_size".into(), "100".into()))
            .with_status(200)
            .with_body(r#"{"items": [{"id": "549755885175", "name": "Recipes"}], "bookmark": null}"#)
            .create_async()
            .await;

        let loader = BoardOptions {
            base_url: Some(server.url()),
        };
        let ctx = OptionsContext {
            auth: AuthContext::with_token("pin"),
            ..OptionsContext::default()
        };
        let options = loader.load(&ctx).await.unwrap();
        assert_eq!(options, vec![SelectOption::new("549755885175", "Recipes")]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_message_extracted() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/boards")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"code": 2, "message": "Authentication failed."}"#)
            .create_async()
            .await;

        let loader = BoardOptions {
            base_url: Some(server.url()),
        };
        let ctx = OptionsContext {
            auth: AuthContext::with_token("expired"),
            ..OptionsContext::default()
        };
        let err = loader.load(&ctx).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("Authentication failed."));
    }
}
