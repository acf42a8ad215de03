use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use wakflo::form::{Form, Property};
use wakflo::input::{self, list_or_csv};
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{connect, first_resource};
use super::config::{DOCS_URL, POST_STATUSES};

fn named(items: &[String]) -> Vec<JsonValue> {
    items.iter().map(|name| json!({"name": name})).collect()
}

// ---------------------------------------------------------------------------
// create_post
// ---------------------------------------------------------------------------

pub struct CreatePost {
    base_url: Option<String>,
}

impl CreatePost {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreatePostProps {
    #[serde(default)]
    title: String,
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, deserialize_with = "list_or_csv")]
    tags: Vec<String>,
}

#[async_trait]
impl Action for CreatePost {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_post", "Create Post", "Creates a post from HTML content")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "id": "65d1f0c2a1b2c3d4e5f60718",
                "title": "Release notes",
                "slug": "release-notes",
                "status": "draft",
                "created_at": "2026-02-18T12:00:00.000Z"
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            Property::short_text("title", "Title").required(),
            Property::long_text("html", "Content (HTML)"),
            Property::select("status", "Status", POST_STATUSES).default_value(json!("draft")),
            Property::array("tags", "Tags"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreatePostProps = ctx.input()?;
        input::require("title", &props.title)?;
        let status = input::non_blank(&props.status).unwrap_or("draft");
        if !POST_STATUSES.iter().any(|(id, _)| *id == status) {
            return Err(ConnectorError::invalid("status", format!("unknown post status '{}'", status)));
        }

        let mut post = json!({"title": props.title.trim(), "status": status});
        if let Some(html) = input::non_blank(&props.html) {
            post["html"] = json!(html);
        }
        if !props.tags.is_empty() {
            post["tags"] = json!(named(&props.tags));
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = client
            .post("/posts/")
            .query("source", "html")
            .json(json!({"posts": [post]}))
            .send()
            .await?;
        first_resource(response, "posts")
    }
}

// ---------------------------------------------------------------------------
// create_member
// ---------------------------------------------------------------------------

pub struct CreateMember {
    base_url: Option<String>,
}

impl CreateMember {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreateMemberProps {
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default, deserialize_with = "list_or_csv")]
    labels: Vec<String>,
}

#[async_trait]
impl Action for CreateMember {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_member", "Create Member", "Adds a member (subscriber) to the site")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "id": "65d1f0c2a1b2c3d4e5f60719",
                "email": "ada@example.com",
                "name": "Ada Lovelace",
                "status": "free"
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            Property::email("email", "Email").required(),
            Property::short_text("name", "Name"),
            Property::long_text("note", "Note"),
            Property::array("labels", "Labels"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateMemberProps = ctx.input()?;
        input::require("email", &props.email)?;

        let mut member = json!({"email": props.email.trim()});
        if let Some(name) = input::non_blank(&props.name) {
            member["name"] = json!(name);
        }
        if let Some(note) = input::non_blank(&props.note) {
            member["note"] = json!(note);
        }
        if !props.labels.is_empty() {
            member["labels"] = json!(named(&props.labels));
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = client
            .post("/members/")
            .json(json!({"members": [member]}))
            .send()
            .await?;
        first_resource(response, "members")
    }
}

// ---------------------------------------------------------------------------
// find_member
// ---------------------------------------------------------------------------

pub struct FindMember {
    base_url: Option<String>,
}

impl FindMember {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct FindMemberProps {
    #[serde(default)]
    email: String,
}

#[async_trait]
impl Action for FindMember {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("find_member", "Find Member", "Looks up a member by email address")
            .documentation(DOCS_URL)
            .sample_output(json!({"id": "65d1f0c2a1b2c3d4e5f60719", "email": "ada@example.com"}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![Property::email("email", "Email").required()])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: FindMemberProps = ctx.input()?;
        input::require("email", &props.email)?;
        let email = props.email.trim();
        if email.contains('\'') {
            return Err(ConnectorError::invalid("email", "email may not contain quotes"));
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = client
            .get("/members/")
            .query("filter", format!("email:'{}'", email))
            .query("limit", 1)
            .send()
            .await?;

        match first_resource(response, "members") {
            Ok(member) => Ok(member),
            Err(ConnectorError::Decode(_)) => Ok(json!({"found": false, "email": email})),
            Err(e) => Err(e),
        }
    }
}
