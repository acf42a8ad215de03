use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map};
use wakflo::form::{Form, Property};
use wakflo::input;
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{connect, search_contacts};
use super::config::{CONTACTS_PATH, DOCS_URL};

// ---------------------------------------------------------------------------
// create_contact
// ---------------------------------------------------------------------------

pub struct CreateContact {
    base_url: Option<String>,
}

impl CreateContact {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreateContactProps {
    #[serde(default)]
    email: String,
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    lastname: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    company: Option<String>,
}

#[async_trait]
impl Action for CreateContact {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_contact", "Create Contact", "Creates a CRM contact")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "id": "51",
                "properties": {"email": "ada@example.com", "firstname": "Ada", "createdate": "2026-02-18T12:00:00.000Z"},
                "createdAt": "2026-02-18T12:00:00.000Z",
                "archived": false
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            Property::email("email", "Email").required(),
            Property::short_text("firstname", "First Name"),
            Property::short_text("lastname", "Last Name"),
            Property::short_text("phone", "Phone"),
            Property::short_text("company", "Company"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateContactProps = ctx.input()?;
        input::require("email", &props.email)?;

        let mut properties = Map::new();
        properties.insert("email".to_string(), json!(props.email.trim()));
        for (key, value) in [
            ("firstname", &props.firstname),
            ("lastname", &props.lastname),
            ("phone", &props.phone),
            ("company", &props.company),
        ] {
            if let Some(value) = input::non_blank(value) {
                properties.insert(key.to_string(), json!(value));
            }
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client
            .post(CONTACTS_PATH)
            .json(json!({"properties": properties}))
            .send()
            .await
    }
}

// ---------------------------------------------------------------------------
// find_contact_by_email
// ---------------------------------------------------------------------------

pub struct FindContactByEmail {
    base_url: Option<String>,
}

impl FindContactByEmail {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct FindContactProps {
    #[serde(default)]
    email: String,
}

#[async_trait]
impl Action for FindContactByEmail {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new(
            "find_contact_by_email",
            "Find Contact by Email",
            "Looks up a CRM contact by email address",
        )
        .documentation(DOCS_URL)
        .sample_output(json!({"id": "51", "properties": {"email": "ada@example.com"}}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![Property::email("email", "Email").required()])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: FindContactProps = ctx.input()?;
        input::require("email", &props.email)?;
        let email = props.email.trim();

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let filter = json!({"propertyName": "email", "operator": "EQ", "value": email});
        let mut response = search_contacts(&client, vec![filter], 1).await?;

        match response.get_mut("results").and_then(|results| results.get_mut(0)) {
            Some(contact) => Ok(contact.take()),
            None => Ok(json!({"found": false, "email": email})),
        }
    }
}
