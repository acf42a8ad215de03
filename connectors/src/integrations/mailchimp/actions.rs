use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map};
use wakflo::form::{DynamicOptions, Form, Property};
use wakflo::input::{self, list_or_csv};
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{connect, subscriber_hash, AudienceOptions};
use super::config::{DOCS_URL, MEMBER_STATUSES};

fn audience_field(base_url: &Option<String>) -> Property {
    Property::dynamic_select(
        "list-id",
        "Audience",
        DynamicOptions::new(AudienceOptions {
            base_url: base_url.clone(),
        }),
    )
    .required()
}

fn check_status(status: &str) -> Result<(), ConnectorError> {
    if MEMBER_STATUSES.iter().any(|(id, _)| *id == status) {
        Ok(())
    } else {
        Err(ConnectorError::invalid(
            "status",
            format!("'{}' is not a member status", status),
        ))
    }
}

fn member_path(list_id: &str, email: &str) -> String {
    format!(
        "/lists/{}/members/{}",
        urlencoding::encode(list_id.trim()),
        subscriber_hash(email)
    )
}

// ---------------------------------------------------------------------------
// add_member_to_list
// ---------------------------------------------------------------------------

pub struct AddMemberToList {
    base_url: Option<String>,
}

impl AddMemberToList {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct AddMemberProps {
    #[serde(default)]
    list_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

#[async_trait]
impl Action for AddMemberToList {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new(
            "add_member_to_list",
            "Add Member to Audience",
            "Adds a new member to a Mailchimp audience",
        )
        .documentation(DOCS_URL)
        .sample_output(json!({
            "id": "9e26471d35a78862c17e467d87cddedf",
            "email_address": "jane@example.com",
            "status": "subscribed",
            "list_id": "a1"
        }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            audience_field(&self.base_url),
            Property::email("email", "Email").required(),
            Property::select("status", "Status", MEMBER_STATUSES).default_value(json!("subscribed")),
            Property::short_text("first-name", "First Name"),
            Property::short_text("last-name", "Last Name"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: AddMemberProps = ctx.input()?;
        input::require("list-id", &props.list_id)?;
        input::require("email", &props.email)?;
        let status = input::non_blank(&props.status).unwrap_or("subscribed");
        check_status(status)?;

        let mut merge_fields = Map::new();
        if let Some(first) = input::non_blank(&props.first_name) {
            merge_fields.insert("FNAME".to_string(), json!(first));
        }
        if let Some(last) = input::non_blank(&props.last_name) {
            merge_fields.insert("LNAME".to_string(), json!(last));
        }

        let mut body = json!({
            "email_address": props.email.trim(),
            "status": status,
        });
        if !merge_fields.is_empty() {
            body["merge_fields"] = JsonValue::Object(merge_fields);
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let path = format!("/lists/{}/members", urlencoding::encode(props.list_id.trim()));
        client.post(&path).json(body).send().await
    }
}

// ---------------------------------------------------------------------------
// add_subscriber_to_tag / remove_subscriber_from_tag
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TagProps {
    #[serde(default)]
    list_id: String,
    #[serde(default)]
    email: String,
    #[serde(default, deserialize_with = "list_or_csv")]
    tag_names: Vec<String>,
}

fn tag_form(base_url: &Option<String>) -> Form {
    Form::new(vec![
        audience_field(base_url),
        Property::email("email", "Subscriber Email").required(),
        Property::short_text("tag-names", "Tags")
            .required()
            .description("Comma separated tag names"),
    ])
}

/// Posts every tag with the same status; Mailchimp answers 204.
async fn post_tags(
    base_url: Option<&str>,
    ctx: &ActionContext,
    tag_status: &str,
) -> Result<(), ConnectorError> {
    let props: TagProps = ctx.input()?;
    input::require("list-id", &props.list_id)?;
    input::require("email", &props.email)?;
    input::require_list("tag-names", &props.tag_names)?;

    let tags: Vec<JsonValue> = props
        .tag_names
        .iter()
        .map(|name| json!({"name": name, "status": tag_status}))
        .collect();

    let client = connect(&ctx.auth, &ctx.http, base_url)?;
    let path = format!("{}/tags", member_path(&props.list_id, &props.email));
    client.post(&path).json(json!({"tags": tags})).send().await?;
    Ok(())
}

pub struct AddSubscriberToTag {
    base_url: Option<String>,
}

impl AddSubscriberToTag {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[async_trait]
impl Action for AddSubscriberToTag {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new(
            "add_subscriber_to_tag",
            "Add Subscriber to Tag",
            "Adds one or more tags to an audience member",
        )
        .documentation(DOCS_URL)
        .sample_output(json!({"status": "Tag added!"}))
    }

    fn properties(&self) -> Form {
        tag_form(&self.base_url)
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        post_tags(self.base_url.as_deref(), ctx, "active").await?;
        Ok(json!({"status": "Tag added!"}))
    }
}

pub struct RemoveSubscriberFromTag {
    base_url: Option<String>,
}

impl RemoveSubscriberFromTag {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[async_trait]
impl Action for RemoveSubscriberFromTag {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new(
            "remove_subscriber_from_tag",
            "Remove Subscriber from Tag",
            "Removes one or more tags from an audience member",
        )
        .documentation(DOCS_URL)
        .sample_output(json!({"status": "Tag removed!"}))
    }

    fn properties(&self) -> Form {
        tag_form(&self.base_url)
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        post_tags(self.base_url.as_deref(), ctx, "inactive").await?;
        Ok(json!({"status": "Tag removed!"}))
    }
}

// ---------------------------------------------------------------------------
// update_subscriber_status
// ---------------------------------------------------------------------------

pub struct UpdateSubscriberStatus {
    base_url: Option<String>,
}

impl UpdateSubscriberStatus {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct UpdateStatusProps {
    #[serde(default)]
    list_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    status: String,
}

#[async_trait]
impl Action for UpdateSubscriberStatus {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new(
            "update_subscriber_status",
            "Update Subscriber Status",
            "Changes the subscription status of an audience member",
        )
        .documentation(DOCS_URL)
        .sample_output(json!({
            "email_address": "jane@example.com",
            "status": "unsubscribed"
        }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            audience_field(&self.base_url),
            Property::email("email", "Subscriber Email").required(),
            Property::select("status", "Status", MEMBER_STATUSES).required(),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: UpdateStatusProps = ctx.input()?;
        input::require("list-id", &props.list_id)?;
        input::require("email", &props.email)?;
        input::require("status", &props.status)?;
        check_status(props.status.trim())?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client
            .patch(&member_path(&props.list_id, &props.email))
            .json(json!({"status": props.status.trim()}))
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::NoCallServer;
    use mockito::{Matcher, Server};
    use wakflo::AuthContext;

    const JANE_HASH: &str = "9e26471d35a78862c17e467d87cddedf";

    fn ctx(input: JsonValue) -> ActionContext {
        ActionContext::new(input, AuthContext::with_token("tok"))
    }

    #[tokio::test]
    async fn test_add_subscriber_to_tag_posts_active_tags() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", format!("/lists/a1/members/{}/tags", JANE_HASH).as_str())
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::Json(json!({
                "tags": [
                    {"name": "vip", "status": "active"},
                    {"name": "new", "status": "active"}
                ]
            })))
            .with_status(204)
            .create_async()
            .await;

        let action = AddSubscriberToTag::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({
                "list-id": "a1",
                "email": "Jane@Example.com",
                "tag-names": "vip, new"
            })))
            .await
            .unwrap();

        assert_eq!(output, json!({"status": "Tag added!"}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_subscriber_from_tag_posts_inactive_tags() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", format!("/lists/a1/members/{}/tags", JANE_HASH).as_str())
            .match_body(Matcher::Json(json!({"tags": [{"name": "vip", "status": "inactive"}]})))
            .with_status(204)
            .create_async()
            .await;

        let action = RemoveSubscriberFromTag::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({
                "list-id": "a1",
                "email": "jane@example.com",
                "tag-names": ["vip"]
            })))
            .await
            .unwrap();

        assert_eq!(output, json!({"status": "Tag removed!"}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_tag_validation_makes_no_calls() {
        let server = NoCallServer::start().await;
        let action = AddSubscriberToTag::new(Some(server.url()));

        let err = action
            .perform(&ctx(json!({"list-id": "a1", "email": "jane@example.com", "tag-names": " , "})))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::MissingField(ref f) if f == "tag-names"));

        let err = action
            .perform(&ctx(json!({"email": "jane@example.com", "tag-names": "vip"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::MissingField(ref f) if f == "list-id"));

        server.assert_no_calls().await;
    }

    #[tokio::test]
    async fn test_tag_api_error_carries_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", format!("/lists/a1/members/{}/tags", JANE_HASH).as_str())
            .with_status(404)
            .with_body(r#"{"title": "Resource Not Found", "status": 404, "detail": "The requested resource could not be found."}"#)
            .create_async()
            .await;

        let action = AddSubscriberToTag::new(Some(server.url()));
        let err = action
            .perform(&ctx(json!({"list-id": "a1", "email": "jane@example.com", "tag-names": "vip"})))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_add_member_to_list() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/lists/a1/members")
            .match_body(Matcher::Json(json!({
                "email_address": "jane@example.com",
                "status": "pending",
                "merge_fields": {"FNAME": "Jane"}
            })))
            .with_status(200)
            .with_body(r#"{"id": "9e26471d35a78862c17e467d87cddedf", "status": "pending"}"#)
            .create_async()
            .await;

        let action = AddMemberToList::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({
                "list-id": "a1",
                "email": "jane@example.com",
                "status": "pending",
                "first-name": "Jane",
                "last-name": ""
            })))
            .await
            .unwrap();
        assert_eq!(output["status"], "pending");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_subscriber_status_rejects_unknown_status() {
        let server = NoCallServer::start().await;
        let action = UpdateSubscriberStatus::new(Some(server.url()));
        let err = action
            .perform(&ctx(json!({"list-id": "a1", "email": "jane@example.com", "status": "archived"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidInput { .. }));
        server.assert_no_calls().await;
    }

    #[tokio::test]
    async fn test_update_subscriber_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", format!("/lists/a1/members/{}", JANE_HASH).as_str())
            .match_body(Matcher::Json(json!({"status": "unsubscribed"})))
            .with_status(200)
            .with_body(r#"{"email_address": "jane@example.com", "status": "unsubscribed"}"#)
            .create_async()
            .await;

        let action = UpdateSubscriberStatus::new(Some(server.url()));
        let output = action
            .perform(&ctx(json!({"list-id": "a1", "email": "jane@example.com", "status": "unsubscribed"})))
            .await
            .unwrap();
        assert_eq!(output["status"], "unsubscribed");
        mock.assert_async().await;
    }
}
