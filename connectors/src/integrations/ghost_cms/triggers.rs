use async_trait::async_trait;
use serde_json::json;
use tracing::debug;
use wakflo::form::Form;
use wakflo::polling::{filter_array_since, PollWindow};
use wakflo::{ConnectorError, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::client::connect;
use super::config::DOCS_URL;

/// NQL filter for records created after the window start.
fn created_after(window: &PollWindow) -> Option<String> {
    window
        .since()
        .map(|t| format!("created_at:>'{}'", t.format("%Y-%m-%d %H:%M:%S")))
}

/// Lists one Admin API resource created since the last poll.
async fn poll_resource(
    base_url: Option<&str>,
    ctx: &TriggerContext,
    resource: &str,
) -> Result<TriggerOutput, ConnectorError> {
    let client = connect(&ctx.auth, &ctx.http, base_url)?;
    let window = ctx.state.window();

    let mut request = client
        .get(&format!("/{}/", resource))
        .query("order", "created_at desc")
        .query("limit", 100);
    if let Some(filter) = created_after(&window) {
        request = request.query("filter", filter);
    }
    let response = request.send().await?;

    let items = filter_array_since(&response, resource, "created_at", &window);
    debug!(resource = resource, count = items.len(), "Ghost poll complete");
    Ok(TriggerOutput::new(items))
}

pub struct NewPost {
    base_url: Option<String>,
}

impl NewPost {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[async_trait]
impl Trigger for NewPost {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new("new_post", "New Post", "Triggers when a post is created")
            .documentation(DOCS_URL)
            .sample_output(json!([{
                "id": "65d1f0c2a1b2c3d4e5f60718",
                "title": "Release notes",
                "status": "published",
                "created_at": "2026-02-18T12:00:00.000Z"
            }]))
    }

    fn properties(&self) -> Form {
        Form::empty()
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        poll_resource(self.base_url.as_deref(), ctx, "posts").await
    }
}

pub struct NewMember {
    base_url: Option<String>,
}

impl NewMember {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[async_trait]
impl Trigger for NewMember {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new("new_member", "New Member", "Triggers when someone becomes a member")
            .documentation(DOCS_URL)
            .sample_output(json!([{
                "id": "65d1f0c2a1b2c3d4e5f60719",
                "email": "ada@example.com",
                "status": "free",
                "created_at": "2026-02-18T12:00:00.000Z"
            }]))
    }

    fn properties(&self) -> Form {
        Form::empty()
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        poll_resource(self.base_url.as_deref(), ctx, "members").await
    }
}
