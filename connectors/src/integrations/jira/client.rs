use async_trait::async_trait;
use serde_json::json;
use wakflo::form::{to_options, OptionsContext, OptionsLoader, SelectOption};
use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError, JsonValue};

use super::config::API_PATH;

/// Builds a client for `{instance_url}/rest/api/3` using email + API token.
pub fn connect(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    let email = auth.require("email")?;
    let api_token = auth.require("api_token")?;
    let base_url = match base_url {
        Some(url) => url.to_string(),
        None => format!("{}{}", auth.require("instance_url")?.trim_end_matches('/'), API_PATH),
    };
    let scheme = AuthScheme::Basic {
        username: email.to_string(),
        password: Some(api_token.to_string()),
    };
    Ok(HttpClient::new(&base_url, scheme, http)?.with_error_extractor(extract_error))
}

/// Jira reports `errorMessages` and per-field `errors`.
fn extract_error(body: &JsonValue) -> Option<String> {
    let mut messages: Vec<String> = body["errorMessages"]
        .as_array()
        .map(|list| list.iter().filter_map(|m| m.as_str().map(str::to_string)).collect())
        .unwrap_or_default();
    if let Some(fields) = body["errors"].as_object() {
        messages.extend(
            fields
                .iter()
                .filter_map(|(field, m)| m.as_str().map(|m| format!("{}: {}", field, m))),
        );
    }
    (!messages.is_empty()).then(|| messages.join("; "))
}

/// Wraps plain text as an Atlassian Document Format document, one paragraph
/// per line.
pub fn adf(text: &str) -> JsonValue {
    let paragraphs: Vec<JsonValue> = text
        .lines()
        .map(|line| {
            if line.is_empty() {
                json!({"type": "paragraph", "content": []})
            } else {
                json!({"type": "paragraph", "content": [{"type": "text", "text": line}]})
            }
        })
        .collect();
    json!({"type": "doc", "version": 1, "content": paragraphs})
}

pub struct ProjectOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for ProjectOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let page = client
            .get("/project/search")
            .query("maxResults", 100)
            .send()
            .await?;
        Ok(to_options(&page["values"], "key", "name"))
    }
}

/// Issue types usable in the selected project; depends on `project_key`.
pub struct IssueTypeOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for IssueTypeOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let project = ctx.field("project_key")?;
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = client
            .get(&format!("/issue/createmeta/{}/issuetypes", urlencoding::encode(&project)))
            .send()
            .await?;
        let types = if response["issueTypes"].is_array() {
            &response["issueTypes"]
        } else {
            &response["values"]
        };
        Ok(to_options(types, "id", "name"))
    }
}
