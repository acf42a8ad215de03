use async_trait::async_trait;
use wakflo::form::{to_options, OptionsContext, OptionsLoader, SelectOption};
use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError, JsonValue};

use super::config::{BASE_URL, TEXT_CHANNEL};

/// Builds a client authenticated as the bot (`Authorization: Bot <token>`).
pub fn connect(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    let token = auth.require("bot_token")?;
    let scheme = AuthScheme::Header {
        name: "Authorization".to_string(),
        value: format!("Bot {}", token),
    };
    Ok(HttpClient::new(base_url.unwrap_or(BASE_URL), scheme, http)?.with_error_extractor(extract_error))
}

fn extract_error(body: &JsonValue) -> Option<String> {
    body["message"].as_str().map(str::to_string)
}

pub struct GuildOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for GuildOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let guilds = client.get("/users/@me/guilds").send().await?;
        Ok(to_options(&guilds, "id", "name"))
    }
}

/// Text channels of the selected guild.
pub struct ChannelOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for ChannelOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let guild_id = ctx.field("guild_id")?;
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let channels = client
            .get(&format!("/guilds/{}/channels", urlencoding::encode(&guild_id)))
            .send()
            .await?;
        let text_channels: Vec<JsonValue> = channels
            .as_array()
            .map(|all| {
                all.iter()
                    .filter(|c| c["type"].as_u64() == Some(TEXT_CHANNEL))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(to_options(&JsonValue::Array(text_channels), "id", "name"))
    }
}

/// Assignable roles of the selected guild (`@everyone` excluded).
pub struct RoleOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for RoleOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let guild_id = ctx.field("guild_id")?;
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let roles = client
            .get(&format!("/guilds/{}/roles", urlencoding::encode(&guild_id)))
            .send()
            .await?;
        Ok(to_options(&roles, "id", "name")
            .into_iter()
            .filter(|role| role.name != "@everyone")
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    fn ctx(input: JsonValue) -> OptionsContext {
        OptionsContext {
            auth: AuthContext::default().with_extra("bot_token", "bot-tok"),
            input,
            ..OptionsContext::default()
        }
    }

    #[tokio::test]
    async fn test_guild_options_use_bot_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users/@me/guilds")
            .match_header("authorization", "Bot bot-tok")
            .with_status(200)
            .with_body(r#"[{"id": "g1", "name": "Ops"}]"#)
            .create_async()
            .await;

        let loader = GuildOptions {
            base_url: Some(server.url()),
        };
        let options = loader.load(&ctx(JsonValue::Null)).await.unwrap();
        assert_eq!(options, vec![SelectOption::new("g1", "Ops")]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_channel_options_keep_text_channels() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/guilds/g1/channels")
            .with_status(200)
            .with_body(
                r#"[
                    {"id": "c1", "name": "general", "type": 0},
                    {"id": "c2", "name": "Lounge", "type": 2},
                    {"id": "c3", "name": "alerts", "type": 0}
                ]"#,
            )
            .create_async()
            .await;

        let loader = ChannelOptions {
            base_url: Some(server.url()),
        };
        let options = loader.load(&ctx(json!({"guild_id": "g1"}))).await.unwrap();
        assert_eq!(
            options,
            vec![SelectOption::new("c1", "general"), SelectOption::new("c3", "alerts")]
        );
    }

    #[tokio::test]
    async fn test_role_options_skip_everyone() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/guilds/g1/roles")
            .with_status(200)
            .with_body(r#"[{"id": "g1", "name": "@everyone"}, {"id": "r1", "name": "Moderator"}]"#)
            .create_async()
            .await;

        let loader = RoleOptions {
            base_url: Some(server.url()),
        };
        let options = loader.load(&ctx(json!({"guild_id": "g1"}))).await.unwrap();
        assert_eq!(options, vec![SelectOption::new("r1", "Moderator")]);
    }
}
