use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use wakflo::form::Form;
use wakflo::input::{self, opt_string_or_number};
use wakflo::polling::filter_array_since;
use wakflo::{ConnectorError, Trigger, TriggerContext, TriggerMetadata, TriggerOutput};

use super::actions::board_field;
use super::client::connect;
use super::config::{DOCS_URL, PAGE_SIZE};

/// Emits pins created since the last poll, account-wide or on one board.
pub struct NewPin {
    base_url: Option<String>,
}

impl NewPin {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

#[derive(Debug, Deserialize)]
struct NewPinProps {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    board_id: Option<String>,
}

#[async_trait]
impl Trigger for NewPin {
    fn metadata(&self) -> TriggerMetadata {
        TriggerMetadata::new("new_pin", "New Pin", "Triggers when a pin is created")
            .documentation(DOCS_URL)
            .sample_output(json!([{
                "id": "813744226420795884",
                "board_id": "549755885175",
                "title": "Lemon tart",
                "created_at": "2026-02-18T12:00:00"
            }]))
    }

    fn properties(&self) -> Form {
        Form::new(vec![board_field(&self.base_url).description("Only watch this board (optional)")])
    }

    async fn execute(&self, ctx: &TriggerContext) -> Result<TriggerOutput, ConnectorError> {
        let props: NewPinProps = ctx.input()?;
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;

        let path = match input::non_blank(&props.board_id) {
            Some(board_id) => format!("/boards/{}/pins", urlencoding::encode(board_id)),
            None => "/pins".to_string(),
        };
        let pins = client.get(&path).query("page_size", PAGE_SIZE).send().await?;

        let items = filter_array_since(&pins, "items", "created_at", &ctx.state.window());
        debug!(count = items.len(), "Pinterest new_pin poll complete");
        Ok(TriggerOutput::new(items))
    }
}
