use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use wakflo::form::{DynamicOptions, Form, Property};
use wakflo::input::{self, list_or_csv};
use wakflo::{Action, ActionContext, ActionMetadata, ConnectorError, JsonValue};

use super::client::{fetch_sheets, sheets, SpreadsheetOptions, WorksheetOptions};
use super::config::DOCS_URL;

fn spreadsheet_field(base_url: &Option<String>) -> Property {
    Property::dynamic_select(
        "spreadSheetId",
        "Spreadsheet",
        DynamicOptions::new(SpreadsheetOptions {
            base_url: base_url.clone(),
        }),
    )
    .required()
}

fn worksheet_field(base_url: &Option<String>) -> Property {
    Property::dynamic_select(
        "sheetTitle",
        "Worksheet",
        DynamicOptions::new(WorksheetOptions {
            base_url: base_url.clone(),
        })
        .depends_on("spreadSheetId"),
    )
    .required()
}

/// A1 range covering a whole worksheet, quoted so titles may contain spaces.
fn sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

// ---------------------------------------------------------------------------
// find_worksheet_by_title
// ---------------------------------------------------------------------------

pub struct FindWorksheetByTitle {
    base_url: Option<String>,
}

impl FindWorksheetByTitle {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindWorksheetProps {
    #[serde(default)]
    spread_sheet_id: String,
    #[serde(default)]
    sheet_title: String,
}

#[async_trait]
impl Action for FindWorksheetByTitle {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new(
            "find_worksheet_by_title",
            "Find Worksheet by Title",
            "Finds a worksheet in a spreadsheet by its title",
        )
        .documentation(DOCS_URL)
        .sample_output(json!({
            "properties": {
                "sheetId": 0,
                "title": "Sheet1",
                "index": 0,
                "sheetType": "GRID",
                "gridProperties": {"rowCount": 1000, "columnCount": 26}
            }
        }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            spreadsheet_field(&self.base_url),
            Property::short_text("sheetTitle", "Worksheet Title").required(),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: FindWorksheetProps = ctx.input()?;
        input::require("spreadSheetId", &props.spread_sheet_id)?;
        input::require("sheetTitle", &props.sheet_title)?;

        let client = sheets(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let worksheets = fetch_sheets(&client, props.spread_sheet_id.trim()).await?;

        let title = props.sheet_title.trim();
        let found = worksheets
            .into_iter()
            .find(|sheet| sheet["properties"]["title"].as_str() == Some(title));

        Ok(found.unwrap_or_else(|| json!({"found": false, "sheetTitle": title})))
    }
}

// ---------------------------------------------------------------------------
// create_spreadsheet
// ---------------------------------------------------------------------------

pub struct CreateSpreadsheet {
    base_url: Option<String>,
}

impl CreateSpreadsheet {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct CreateSpreadsheetProps {
    #[serde(default)]
    title: String,
}

#[async_trait]
impl Action for CreateSpreadsheet {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("create_spreadsheet", "Create Spreadsheet", "Creates a blank spreadsheet")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "spreadsheetId": "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms",
                "properties": {"title": "Budget"},
                "spreadsheetUrl": "https://docs.google.com/spreadsheets/d/1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms/edit"
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![Property::short_text("title", "Title").required()])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateSpreadsheetProps = ctx.input()?;
        input::require("title", &props.title)?;

        let client = sheets(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        client
            .post("/spreadsheets")
            .json(json!({"properties": {"title": props.title.trim()}}))
            .send()
            .await
    }
}

// ---------------------------------------------------------------------------
// create_worksheet
// ---------------------------------------------------------------------------

pub struct CreateWorksheet {
    base_url: Option<String>,
}

impl CreateWorksheet {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWorksheetProps {
    #[serde(default)]
    spread_sheet_id: String,
    #[serde(default)]
    title: String,
}

#[async_trait]
impl Action for CreateWorksheet {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new(
            "create_worksheet",
            "Create Worksheet",
            "Adds a worksheet to an existing spreadsheet",
        )
        .documentation(DOCS_URL)
        .sample_output(json!({"sheetId": 1893716431, "title": "Totals", "index": 1}))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            spreadsheet_field(&self.base_url),
            Property::short_text("title", "Worksheet Title").required(),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: CreateWorksheetProps = ctx.input()?;
        input::require("spreadSheetId", &props.spread_sheet_id)?;
        input::require("title", &props.title)?;

        let client = sheets(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let path = format!(
            "/spreadsheets/{}:batchUpdate",
            urlencoding::encode(props.spread_sheet_id.trim())
        );
        let response = client
            .post(&path)
            .json(json!({
                "requests": [{"addSheet": {"properties": {"title": props.title.trim()}}}]
            }))
            .send()
            .await?;

        let properties = &response["replies"][0]["addSheet"]["properties"];
        if properties.is_null() {
            return Err(ConnectorError::Decode(
                "batchUpdate reply did not contain addSheet properties".to_string(),
            ));
        }
        Ok(properties.clone())
    }
}

// ---------------------------------------------------------------------------
// append_row
// ---------------------------------------------------------------------------

pub struct AppendRow {
    base_url: Option<String>,
}

impl AppendRow {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendRowProps {
    #[serde(default)]
    spread_sheet_id: String,
    #[serde(default)]
    sheet_title: String,
    #[serde(default, deserialize_with = "list_or_csv")]
    values: Vec<String>,
    #[serde(default)]
    value_input_option: Option<String>,
}

#[async_trait]
impl Action for AppendRow {
    fn metadata(&self) -> ActionMetadata {
        ActionMetadata::new("append_row", "Append Row", "Appends a row of values to a worksheet")
            .documentation(DOCS_URL)
            .sample_output(json!({
                "spreadsheetId": "abc",
                "updatedRange": "Sheet1!A5:C5",
                "updatedRows": 1,
                "updatedColumns": 3,
                "updatedCells": 3
            }))
    }

    fn properties(&self) -> Form {
        Form::new(vec![
            spreadsheet_field(&self.base_url),
            worksheet_field(&self.base_url),
            Property::array("values", "Values")
                .required()
                .description("Cell values, left to right"),
            Property::select(
                "valueInputOption",
                "Value Input",
                &[("USER_ENTERED", "As if typed"), ("RAW", "Raw")],
            )
            .default_value(json!("USER_ENTERED")),
        ])
    }

    async fn perform(&self, ctx: &ActionContext) -> Result<JsonValue, ConnectorError> {
        let props: AppendRowProps = ctx.input()?;
        input::require("spreadSheetId", &props.spread_sheet_id)?;
        input::require("sheetTitle", &props.sheet_title)?;
        input::require_list("values", &props.values)?;

        let option = match input::non_blank(&props.value_input_option) {
            None => "USER_ENTERED",
            Some(o @ ("USER_ENTERED" | "RAW")) => o,
            Some(other) => {
                return Err(ConnectorError::invalid(
                    "valueInputOption",
                    format!("unsupported option '{}'", other),
                ))
            }
        };

        let client = sheets(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let path = format!(
            "/spreadsheets/{}/values/{}:append",
            urlencoding::encode(props.spread_sheet_id.trim()),
            urlencoding::encode(&sheet_range(props.sheet_title.trim()))
        );
        let response = client
            .post(&path)
            .query("valueInputOption", option)
            .json(json!({"values": [props.values]}))
            .send()
            .await?;

        Ok(match response.get("updates") {
            Some(updates) => updates.clone(),
            None => response,
        })
    }
}
