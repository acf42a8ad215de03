//! Form schema for action/trigger inputs.
//!
//! A [`Form`] is what the host renders for a workflow step. Fields can carry a
//! static option list or a [`DynamicOptions`] loader that queries the remote
//! API at render time (e.g. "pick a board"), optionally after other fields
//! have been filled in.

use crate::auth::AuthContext;
use crate::error::ConnectorError;
use crate::http::HttpConfig;
use crate::JsonValue;
use async_trait::async_trait;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Widget/type hint for a form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    ShortText,
    LongText,
    Secret,
    Number,
    Boolean,
    Select,
    MultiSelect,
    Array,
    Json,
    DateTime,
    Email,
    Url,
}

/// One selectable entry in a dropdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Everything an options loader may read: credentials, the fields already
/// filled in on the form, and HTTP settings.
#[derive(Clone, Debug, Default)]
pub struct OptionsContext {
    pub auth: AuthContext,
    pub input: JsonValue,
    pub http: HttpConfig,
}

impl OptionsContext {
    /// Returns a filled-in sibling field, or a missing-field error.
    ///
    /// Accepts strings and numbers, since ids are often numeric.
    pub fn field(&self, key: &str) -> Result<String, ConnectorError> {
        match self.input.get(key) {
            Some(JsonValue::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            Some(JsonValue::Number(n)) => Ok(n.to_string()),
            _ => Err(ConnectorError::MissingField(key.to_string())),
        }
    }
}

/// Resolves the options of a dynamic dropdown with a live API call.
#[async_trait]
pub trait OptionsLoader: Send + Sync {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError>;
}

/// A dropdown populated from live API data.
#[derive(Clone)]
pub struct DynamicOptions {
    /// Fields that must be filled before this one can load.
    pub depends_on: Vec<String>,
    pub loader: Arc<dyn OptionsLoader>,
}

impl DynamicOptions {
    pub fn new(loader: impl OptionsLoader + 'static) -> Self {
        Self {
            depends_on: Vec::new(),
            loader: Arc::new(loader),
        }
    }

    pub fn depends_on(mut self, key: &str) -> Self {
        self.depends_on.push(key.to_string());
        self
    }

    /// Checks the dependencies, then runs the loader.
    pub async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        for key in &self.depends_on {
            ctx.field(key)?;
        }
        self.loader.load(ctx).await
    }
}

impl fmt::Debug for DynamicOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicOptions")
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

/// Static or live option source for a select field.
#[derive(Clone, Debug)]
pub enum PropertyOptions {
    Static(Vec<SelectOption>),
    Dynamic(DynamicOptions),
}

impl Serialize for PropertyOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyOptions::Static(options) => {
                let mut s = serializer.serialize_struct("PropertyOptions", 2)?;
                s.serialize_field("dynamic", &false)?;
                s.serialize_field("options", options)?;
                s.end()
            }
            PropertyOptions::Dynamic(dynamic) => {
                let mut s = serializer.serialize_struct("PropertyOptions", 2)?;
                s.serialize_field("dynamic", &true)?;
                s.serialize_field("dependsOn", &dynamic.depends_on)?;
                s.end()
            }
        }
    }
}

/// A single form field.
#[derive(Clone, Debug, Serialize)]
pub struct Property {
    pub key: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<PropertyOptions>,
}

impl Property {
    pub fn new(key: &str, display_name: &str, kind: PropertyType) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            description: None,
            required: false,
            kind,
            default: None,
            options: None,
        }
    }

    pub fn short_text(key: &str, display_name: &str) -> Self {
        Self::new(key, display_name, PropertyType::ShortText)
    }

    pub fn long_text(key: &str, display_name: &str) -> Self {
        Self::new(key, display_name, PropertyType::LongText)
    }

    pub fn secret(key: &str, display_name: &str) -> Self {
        Self::new(key, display_name, PropertyType::Secret)
    }

    pub fn number(key: &str, display_name: &str) -> Self {
        Self::new(key, display_name, PropertyType::Number)
    }

    pub fn boolean(key: &str, display_name: &str) -> Self {
        Self::new(key, display_name, PropertyType::Boolean)
    }

    pub fn email(key: &str, display_name: &str) -> Self {
        Self::new(key, display_name, PropertyType::Email)
    }

    pub fn url(key: &str, display_name: &str) -> Self {
        Self::new(key, display_name, PropertyType::Url)
    }

    pub fn json(key: &str, display_name: &str) -> Self {
        Self::new(key, display_name, PropertyType::Json)
    }

    pub fn array(key: &str, display_name: &str) -> Self {
        Self::new(key, display_name, PropertyType::Array)
    }

    pub fn date_time(key: &str, display_name: &str) -> Self {
        Self::new(key, display_name, PropertyType::DateTime)
    }

    /// Select field with a fixed list of `(id, name)` options.
    pub fn select(key: &str, display_name: &str, options: &[(&str, &str)]) -> Self {
        let options = options
            .iter()
            .map(|(id, name)| SelectOption::new(*id, *name))
            .collect();
        let mut property = Self::new(key, display_name, PropertyType::Select);
        property.options = Some(PropertyOptions::Static(options));
        property
    }

    /// Select field backed by a live options loader.
    pub fn dynamic_select(key: &str, display_name: &str, options: DynamicOptions) -> Self {
        let mut property = Self::new(key, display_name, PropertyType::Select);
        property.options = Some(PropertyOptions::Dynamic(options));
        property
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn default_value(mut self, value: JsonValue) -> Self {
        self.default = Some(value);
        self
    }

    /// The live loader, if this field has one.
    pub fn dynamic(&self) -> Option<&DynamicOptions> {
        match &self.options {
            Some(PropertyOptions::Dynamic(dynamic)) => Some(dynamic),
            _ => None,
        }
    }
}

/// Ordered set of form fields for one action or trigger.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Form {
    properties: Vec<Property>,
}

impl Form {
    pub fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.key.as_str())
    }

    /// Keys of required fields that are absent or blank in `input`.
    pub fn missing_required(&self, input: &JsonValue) -> Vec<String> {
        self.properties
            .iter()
            .filter(|p| p.required && is_blank(input.get(&p.key)))
            .map(|p| p.key.clone())
            .collect()
    }
}

fn is_blank(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(s)) => s.trim().is_empty(),
        Some(JsonValue::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Maps a JSON list into dropdown options.
///
/// Ids may be strings or numbers; items without an id or name are skipped.
pub fn to_options(items: &JsonValue, id_field: &str, name_field: &str) -> Vec<SelectOption> {
    let Some(items) = items.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let id = match item.get(id_field)? {
                JsonValue::String(s) => s.clone(),
                JsonValue::Number(n) => n.to_string(),
                _ => return None,
            };
            let name = item.get(name_field)?.as_str()?.to_string();
            Some(SelectOption { id, name })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedOptions;

    #[async_trait]
    impl OptionsLoader for FixedOptions {
        async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
            let guild = ctx.field("guild_id")?;
            Ok(vec![SelectOption::new("c1", format!("general ({})", guild))])
        }
    }

    fn sample_form() -> Form {
        Form::new(vec![
            Property::short_text("guild_id", "Guild").required(),
            Property::dynamic_select(
                "channel_id",
                "Channel",
                DynamicOptions::new(FixedOptions).depends_on("guild_id"),
            )
            .required(),
            Property::long_text("content", "Content").description("Message body"),
            Property::select("priority", "Priority", &[("1", "Low"), ("2", "High")]),
        ])
    }

    #[test]
    fn test_missing_required() {
        let form = sample_form();
        let missing = form.missing_required(&json!({"guild_id": "  ", "content": "hi"}));
        assert_eq!(missing, vec!["guild_id".to_string(), "channel_id".to_string()]);

        let missing = form.missing_required(&json!({"guild_id": 42, "channel_id": "c1"}));
        assert!(missing.is_empty());

        let missing = form.missing_required(&json!({"guild_id": [], "channel_id": null}));
        assert_eq!(missing.len(), 2);
    }

    #[test]
    fn test_form_lookup() {
        let form = sample_form();
        assert_eq!(form.keys().count(), 4);
        assert!(form.get("channel_id").unwrap().dynamic().is_some());
        assert!(form.get("priority").unwrap().dynamic().is_none());
        assert!(form.get("nope").is_none());
    }

    #[test]
    fn test_form_serialization() {
        let json = serde_json::to_value(sample_form()).unwrap();
        assert_eq!(json[0]["key"], "guild_id");
        assert_eq!(json[0]["type"], "short_text");
        assert_eq!(json[1]["options"]["dynamic"], true);
        assert_eq!(json[1]["options"]["dependsOn"][0], "guild_id");
        assert_eq!(json[2]["description"], "Message body");
        assert_eq!(json[3]["options"]["dynamic"], false);
        assert_eq!(json[3]["options"]["options"][1]["name"], "High");
    }

    #[tokio::test]
    async fn test_dynamic_options_dependency() {
        let form = sample_form();
        let dynamic = form.get("channel_id").unwrap().dynamic().unwrap();

        let ctx = OptionsContext::default();
        let err = dynamic.load(&ctx).await.unwrap_err();
        assert!(matches!(err, ConnectorError::MissingField(ref f) if f == "guild_id"));

        let ctx = OptionsContext {
            input: json!({"guild_id": "g1"}),
            ..OptionsContext::default()
        };
        let options = dynamic.load(&ctx).await.unwrap();
        assert_eq!(options, vec![SelectOption::new("c1", "general (g1)")]);
    }

    #[test]
    fn test_to_options() {
        let items = json!([
            {"id": "a", "name": "Alpha"},
            {"id": 7, "name": "Seven"},
            {"id": null, "name": "skipped"},
            {"name": "no id"},
            {"id": "b"}
        ]);
        let options = to_options(&items, "id", "name");
        assert_eq!(
            options,
            vec![SelectOption::new("a", "Alpha"), SelectOption::new("7", "Seven")]
        );
        assert!(to_options(&json!({"id": "x"}), "id", "name").is_empty());
    }
}
