use async_trait::async_trait;
use wakflo::form::{to_options, OptionsContext, OptionsLoader, SelectOption};
use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError};

use super::config::BASE_URL;

/// Builds a Bearer-authenticated client for the Todoist REST API.
pub fn connect(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    let token = auth.access_token()?;
    HttpClient::new(
        base_url.unwrap_or(BASE_URL),
        AuthScheme::Bearer(token.to_string()),
        http,
    )
}

/// Dropdown of the user's projects.
pub struct ProjectOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for ProjectOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let projects = client.get("/projects").send().await?;
        Ok(to_options(&projects, "id", "name"))
    }
}
