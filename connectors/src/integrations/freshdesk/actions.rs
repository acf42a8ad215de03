use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map};
use wakflo::form::{Form, Property};
use wakflo::input::{self, list_or_csv, opt_string_or_number, string_or_number};
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{choice, connect};
use super::config::{DOCS_URL, PRIORITIES, STATUSES};

fn ticket_path(id: &str) -> Result<String, ConnectorError> {
    let id = id.trim();
    if !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConnectorError::invalid("ticket_id", "ticket ids are numeric"));
    }
    Ok(format!("/tickets/{}", id))
}

// ---------------------------------------------------------------------------
// create_ticket
// ---------------------------------------------------------------------------

pub struct CreateTicket {
    base_url: Option<String>,
}

impl CreateTicket {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreateTicketProps {
    #[serde(default)]
    email: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    priority: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    status: Option<String>,
    #[serde(default, deserialize_with = "list_or_csv")]
    tags: Vec<String>,
}

#[async_trait]
impl Action for CreateTicket {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_ticket", "Create Ticket", "Opens a new support ticket")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "id": 1042,
                "subject": "Printer on fire",
                "status": 2,
                "priority": 1,
                "requester_id": 8001234567_i64,
                "created_at": "2026-02-18T12:00:00Z"
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            Property::email("email", "Requester Email").required(),
            Property::short_text("subject", "Subject").required(),
            Property::long_text("description", "Description")
                .required()
                .description("HTML content of the ticket"),
            Property::select("priority", "Priority", PRIORITIES).default_value(json!("1")),
            Property::select("status", "Status", STATUSES).default_value(json!("2")),
            Property::array("tags", "Tags"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateTicketProps = ctx.input()?;
        input::require("email", &props.email)?;
        input::require("subject", &props.subject)?;
        input::require("description", &props.description)?;
        let priority = choice("priority", input::non_blank(&props.priority), PRIORITIES)?.unwrap_or(1);
        let status = choice("status", input::non_blank(&props.status), STATUSES)?.unwrap_or(2);

        let mut body = json!({
            "email": props.email.trim(),
            "subject": props.subject.trim(),
            "description": props.description,
            "priority": priority,
            "status": status,
        });
        if !props.tags.is_empty() {
            body["tags"] = json!(props.tags);
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client.post("/tickets").json(body).send().await
    }
}

// ---------------------------------------------------------------------------
// get_ticket
// ---------------------------------------------------------------------------

pub struct GetTicket {
    base_url: Option<String>,
}

impl GetTicket {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct TicketIdProps {
    #[serde(default, deserialize_with = "string_or_number")]
    ticket_id: String,
}

#[async_trait]
impl Action for GetTicket {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("get_ticket", "Get Ticket", "Fetches a ticket by id")
            .documentation(DOCS_URL)
            .sample_output(json!({"id": 1042, "subject": "Printer on fire", "status": 2}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![Property::number("ticket_id", "Ticket ID").required()])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: TicketIdProps = ctx.input()?;
        input::require("ticket_id", &props.ticket_id)?;
        let path = ticket_path(&props.ticket_id)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client.get(&path).send().await
    }
}

// ---------------------------------------------------------------------------
// update_ticket
// ---------------------------------------------------------------------------

pub struct UpdateTicket {
    base_url: Option<String>,
}

impl UpdateTicket {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateTicketProps {
    #[serde(default, deserialize_with = "string_or_number")]
    ticket_id: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    priority: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    status: Option<String>,
}

#[async_trait]
impl Action for UpdateTicket {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("update_ticket", "Update Ticket", "Changes the subject, body, priority or status of a ticket")
            .documentation(DOCS_URL)
            .sample_output(json!({"id": 1042, "status": 4, "updated_at": "2026-02-18T13:00:00Z"}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            Property::number("ticket_id", "Ticket ID").required(),
            Property::short_text("subject", "Subject"),
            Property::long_text("description", "Description"),
            Property::select("priority", "Priority", PRIORITIES),
            Property::select("status", "Status", STATUSES),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: UpdateTicketProps = ctx.input()?;
        input::require("ticket_id", &props.ticket_id)?;
        let path = ticket_path(&props.ticket_id)?;

        let mut changes = Map::new();
        if let Some(subject) = input::non_blank(&props.subject) {
            changes.insert("subject".to_string(), json!(subject));
        }
        if let Some(description) = input::non_blank(&props.description) {
            changes.insert("description".to_string(), json!(description));
        }
        if let Some(priority) = choice("priority", input::non_blank(&props.priority), PRIORITIES)? {
            changes.insert("priority".to_string(), json!(priority));
        }
        if let Some(status) = choice("status", input::non_blank(&props.status), STATUSES)? {
            changes.insert("status".to_string(), json!(status));
        }
        if changes.is_empty() {
            return Err(ConnectorError::invalid("ticket_id", "no fields to update"));
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client.put(&path).json(JsonValue::Object(changes)).send().await
    }
}

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
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    company_id: Option<String>,
}

#[async_trait]
impl Action for CreateContact {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_contact", "Create Contact", "Adds a contact to the helpdesk")
            .documentation(DOCS_URL)
            .sample_output(json!({"id": 8001234567_i64, "name": "Ada Lovelace", "email": "ada@example.com"}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            Property::short_text("name", "Name").required(),
            Property::email("email", "Email").required(),
            Property::short_text("phone", "Phone"),
            Property::number("company_id", "Company ID"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateContactProps = ctx.input()?;
        input::require("name", &props.name)?;
        input::require("email", &props.email)?;

        let mut body = json!({"name": props.name.trim(), "email": props.email.trim()});
        if let Some(phone) = input::non_blank(&props.phone) {
            body["phone"] = json!(phone);
        }
        if let Some(company) = input::non_blank(&props.company_id) {
            let company: u64 = company
                .parse()
                .map_err(|_| ConnectorError::invalid("company_id", "company ids are numeric"))?;
            body["company_id"] = json!(company);
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client.post("/contacts").json(body).send().await
    }
}
