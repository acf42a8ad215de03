//! Registry-wide checks of the integration contract.

use mockito::{Matcher, Server};
use serde_json::json;
use std::collections::HashSet;
use wakflo::{ActionContext, AuthContext, AuthSchema, PollState, TriggerContext};
use wakflo_connectors::registry::{all_integrations, all_integrations_with_base_url};

/// Credentials that satisfy every integration's auth schema.
fn full_auth() -> AuthContext {
    AuthContext::with_token("token")
        .with_extra("bot_token", "123:abc")
        .with_extra("domain", "acme")
        .with_extra("api_key", "key")
        .with_extra("url", "https://blog.example.com")
        .with_extra("admin_api_key", "6489e0a5c2d3f:7a1b2c3d4e5f")
        .with_extra("instance_url", "https://acme.atlassian.net")
        .with_extra("email", "ops@example.com")
        .with_extra("api_token", "jira-token")
        .with_extra("client_id", "client")
        .with_extra("server", "us21")
}

#[tokio::test]
async fn test_empty_input_fails_validation_without_calls() {
    let mut server = Server::new_async().await;
    let mut mocks = Vec::new();
    for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        mocks.push(
            server
                .mock(method, Matcher::Any)
                .with_status(500)
                .expect(0)
                .create_async()
                .await,
        );
    }

    for integration in all_integrations_with_base_url(&server.url()) {
        let name = integration.metadata().name;
        for action in integration.actions() {
            let id = action.metadata().id;
            let ctx = ActionContext::new(json!({}), full_auth());
            let err = action
                .perform(&ctx)
                .await
                .err()
                .unwrap_or_else(|| panic!("{name}.{id} accepted empty input"));
            assert!(err.is_validation(), "{name}.{id}: expected a validation error, got {err}");
        }
    }

    for mock in &mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_missing_credentials_fail_before_calls() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .with_status(500)
        .expect(0)
        .create_async()
        .await;

    for integration in all_integrations_with_base_url(&server.url()) {
        if !integration.auth().required {
            continue;
        }
        let name = integration.metadata().name;
        for trigger in integration.triggers() {
            let id = trigger.metadata().id;
            let required: Vec<_> = trigger
                .properties()
                .properties()
                .iter()
                .filter(|p| p.required)
                .map(|p| p.key.clone())
                .collect();
            let input = json!(required
                .iter()
                .map(|key| (key.clone(), json!("1")))
                .collect::<serde_json::Map<_, _>>());
            let ctx = TriggerContext::new(input, AuthContext::default(), PollState::default());
            let err = trigger
                .execute(&ctx)
                .await
                .err()
                .unwrap_or_else(|| panic!("{name}.{id} polled without credentials"));
            assert!(err.is_validation(), "{name}.{id}: expected an auth error, got {err}");
        }
    }

    mock.assert_async().await;
}

#[test]
fn test_descriptors_are_well_formed() {
    let integrations = all_integrations();
    let mut names = HashSet::new();

    for integration in &integrations {
        let metadata = integration.metadata();
        assert!(names.insert(metadata.name.clone()), "duplicate integration {}", metadata.name);
        assert!(!metadata.display_name.is_empty());
        assert!(metadata.icon.ends_with(".svg"));
        assert!(!integration.actions().is_empty(), "{} has no actions", metadata.name);

        match integration.auth().schema {
            AuthSchema::OAuth2(oauth) => {
                assert!(oauth.auth_url.starts_with("https://"), "{}", metadata.name);
                assert!(oauth.token_url.starts_with("https://"), "{}", metadata.name);
            }
            AuthSchema::Custom { fields } => {
                assert!(fields.iter().any(|f| f.required), "{}", metadata.name);
            }
            AuthSchema::None => {}
        }

        for action in integration.actions() {
            let action_metadata = action.metadata();
            let form = action.properties();
            assert!(
                form.properties().iter().any(|p| p.required),
                "{}.{} has no required field",
                metadata.name,
                action_metadata.id
            );
            let keys: HashSet<&str> = form.keys().collect();
            assert_eq!(
                keys.len(),
                form.properties().len(),
                "{}.{}: duplicate keys",
                metadata.name,
                action_metadata.id
            );
            assert!(action_metadata.documentation.is_some());
        }

        for trigger in integration.triggers() {
            let trigger_metadata = trigger.metadata();
            assert!(trigger_metadata.sample_output.is_array(), "{}.{}", metadata.name, trigger_metadata.id);
            assert!(trigger.criteria().interval_secs > 0);
        }
    }
}
