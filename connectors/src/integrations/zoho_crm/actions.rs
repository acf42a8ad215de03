use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use wakflo::form::{DynamicOptions, Form, Property};
use wakflo::input::{self, string_or_number};
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{connect, module_path, record_result, ModuleOptions};
use super::config::DOCS_URL;

pub(crate) fn module_field(base_url: &Option<String>) -> Property {
    Property::dynamic_select(
        "module",
        "Module",
        DynamicOptions::new(ModuleOptions {
            base_url: base_url.clone(),
        }),
    )
    .required()
}

// ---------------------------------------------------------------------------
// create_record
// ---------------------------------------------------------------------------

pub struct CreateRecord {
    base_url: Option<String>,
}

impl CreateRecord {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreateRecordProps {
    #[serde(default)]
    module: String,
    #[serde(default)]
    fields: JsonValue,
}

#[async_trait]
impl Action for CreateRecord {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_record", "Create Record", "Inserts a record into a CRM module")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "code": "SUCCESS",
                "details": {"id": "4150868000001234001", "Created_Time": "2026-02-18T12:00:00+00:00"},
                "message": "record added",
                "status": "success"
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            module_field(&self.base_url),
            Property::json("fields", "Fields")
                .required()
                .description("Record fields by API name, e.g. {\"Last_Name\": \"Lovelace\"}"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateRecordProps = ctx.input()?;
        input::require("module", &props.module)?;
        let fields = match props.fields {
            JsonValue::Null => return Err(ConnectorError::MissingField("fields".to_string())),
            JsonValue::Object(map) if map.is_empty() => {
                return Err(ConnectorError::MissingField("fields".to_string()))
            }
            JsonValue::Object(map) => JsonValue::Object(map),
            _ => return Err(ConnectorError::invalid("fields", "expected a JSON object")),
        };

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = client
            .post(&module_path(&props.module))
            .json(json!({"data": [fields]}))
            .send()
            .await?;
        record_result(&response)
    }
}

// ---------------------------------------------------------------------------
// get_record
// ---------------------------------------------------------------------------

pub struct GetRecord {
    base_url: Option<String>,
}

impl GetRecord {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct GetRecordProps {
    #[serde(default)]
    module: String,
    #[serde(default, deserialize_with = "string_or_number")]
    record_id: String,
}

#[async_trait]
impl Action for GetRecord {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("get_record", "Get Record", "Fetches a record by id")
            .documentation(DOCS_URL)
            .sample_output(json!({"id": "4150868000001234001", "Last_Name": "Lovelace"}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            module_field(&self.base_url),
            Property::short_text("record_id", "Record ID").required(),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: GetRecordProps = ctx.input()?;
        input::require("module", &props.module)?;
        input::require("record_id", &props.record_id)?;

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let path = format!(
            "{}/{}",
            module_path(&props.module),
            urlencoding::encode(props.record_id.trim())
        );
        let mut response = client.get(&path).send().await?;

        // 204 means no such record
        match response.get_mut("data").and_then(|data| data.get_mut(0)) {
            Some(record) => Ok(record.take()),
            None => Ok(json!({"found": false, "record_id": props.record_id.trim()})),
        }
    }
}

// ---------------------------------------------------------------------------
// search_records
// ---------------------------------------------------------------------------

pub struct SearchRecords {
    base_url: Option<String>,
}

impl SearchRecords {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct SearchRecordsProps {
    #[serde(default)]
    module: String,
    #[serde(default)]
    criteria: String,
}

#[async_trait]
impl Action for SearchRecords {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("search_records", "Search Records", "Finds records matching a criteria expression")
            .documentation(DOCS_URL)
            .sample_output(json!([{"id": "4150868000001234001", "Last_Name": "Lovelace"}]))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            module_field(&self.base_url),
            Property::short_text("criteria", "Criteria")
                .required()
                .description("e.g. (Last_Name:equals:Lovelace)"),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: SearchRecordsProps = ctx.input()?;
        input::require("module", &props.module)?;
        input::require("criteria", &props.criteria)?;
        let criteria = props.criteria.trim();
        if !(criteria.starts_with('(') && criteria.ends_with(')')) {
            return Err(ConnectorError::invalid("criteria", "wrap the expression in parentheses"));
        }

        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let mut response = client
            .get(&format!("{}/search", module_path(&props.module)))
            .query("criteria", criteria)
            .send()
            .await?;

        // 204 when nothing matches
        Ok(match response.get_mut("data") {
            Some(data) if data.is_array() => data.take(),
            _ => json!([]),
        })
    }
}
