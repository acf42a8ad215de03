use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use wakflo::config::{init_tracing, WakfloConfig};
use wakflo::{AuthContext, JsonValue, PollState};
use wakflo_connectors::Host;

/// Run Wakflo integrations locally.
#[derive(Debug, Parser)]
#[command(name = "wakflo-connectors", version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "WAKFLO_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List integrations with their actions and triggers
    List,
    /// Print an integration's metadata, auth schema and forms
    Describe { integration: String },
    /// Run an action once
    Perform {
        integration: String,
        action: String,
        #[command(flatten)]
        args: InvocationArgs,
    },
    /// Run one poll of a trigger
    Poll {
        integration: String,
        trigger: String,
        #[command(flatten)]
        args: InvocationArgs,
        /// Poll state (`{"lastRun": ..., "cursor": ...}`), inline JSON or @path
        #[arg(long)]
        state: Option<String>,
    },
    /// Resolve the options of a select field
    Options {
        integration: String,
        operation: String,
        field: String,
        #[command(flatten)]
        args: InvocationArgs,
    },
}

#[derive(Debug, Args)]
struct InvocationArgs {
    /// Step input, inline JSON or @path
    #[arg(long, default_value = "{}")]
    input: String,
    /// Credentials (`{"accessToken": ..., "extra": {...}}`), inline JSON or @path
    #[arg(long, env = "WAKFLO_AUTH")]
    auth: Option<String>,
}

impl InvocationArgs {
    fn input(&self) -> Result<JsonValue> {
        parse_json_arg("input", &self.input)
    }

    fn auth(&self) -> Result<AuthContext> {
        match &self.auth {
            Some(raw) => parse_json_arg("auth", raw),
            None => Ok(AuthContext::default()),
        }
    }
}

/// Parses inline JSON, or the contents of a file when the value starts with `@`.
fn parse_json_arg<T: DeserializeOwned>(name: &str, raw: &str) -> Result<T> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read --{} file {}", name, path))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&text).with_context(|| format!("--{} is not valid JSON", name))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", text);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = WakfloConfig::from_env_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&config.log);

    let host = Host::new(config);

    match cli.command {
        Command::List => {
            let listing: Vec<JsonValue> = host
                .integrations()
                .iter()
                .map(|integration| {
                    let metadata = integration.metadata();
                    serde_json::json!({
                        "name": metadata.name,
                        "displayName": metadata.display_name,
                        "category": metadata.category,
                        "actions": integration.actions().iter().map(|a| a.metadata().id).collect::<Vec<_>>(),
                        "triggers": integration.triggers().iter().map(|t| t.metadata().id).collect::<Vec<_>>(),
                    })
                })
                .collect();
            print_json(&listing)?;
        }
        Command::Describe { integration } => {
            let description = host
                .describe(&integration)
                .with_context(|| format!("Failed to describe {}", integration))?;
            print_json(&description)?;
        }
        Command::Perform {
            integration,
            action,
            args,
        } => {
            let output = host
                .perform(&integration, &action, args.input()?, args.auth()?)
                .await
                .with_context(|| format!("{}.{} failed", integration, action))?;
            print_json(&output)?;
        }
        Command::Poll {
            integration,
            trigger,
            args,
            state,
        } => {
            let state: PollState = match state {
                Some(raw) => parse_json_arg("state", &raw)?,
                None => PollState::default(),
            };
            let output = host
                .poll(&integration, &trigger, args.input()?, args.auth()?, state)
                .await
                .with_context(|| format!("{}.{} poll failed", integration, trigger))?;
            info!(items = output.items.len(), "Poll complete");
            print_json(&output)?;
        }
        Command::Options {
            integration,
            operation,
            field,
            args,
        } => {
            let options = host
                .options(&integration, &operation, &field, args.input()?, args.auth()?)
                .await
                .with_context(|| format!("Failed to load options for {}.{}", operation, field))?;
            print_json(&options)?;
        }
    }

    Ok(())
}
