//! Wakflo connectors - integrations built on the `wakflo` plugin SDK.
//!
//! Each integration wraps one third-party REST API:
//!
//! ```text
//! integrations/<service>/
//!   config.rs    base URLs, OAuth endpoints, scopes
//!   client.rs    shared HTTP helper with the service's auth scheme,
//!                dynamic option loaders
//!   actions.rs   one struct per API operation
//!   triggers.rs  polling triggers
//!   mod.rs       integration descriptor (metadata, auth, registration)
//! ```
//!
//! Every integration can be constructed against a custom base URL
//! (`with_base_url`) so tests run against a mock server.
//!
//! # Usage
//!
//! ```no_run
//! use wakflo::{ActionContext, AuthContext};
//! use wakflo_connectors::registry::find_integration;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let sheets = find_integration("google_sheets").expect("registered");
//! let action = sheets.action("find_worksheet_by_title").expect("registered");
//! let ctx = ActionContext::new(
//!     serde_json::json!({"spreadSheetId": "abc", "sheetTitle": "Sheet1"}),
//!     AuthContext::with_token("ya29..."),
//! );
//! let sheet = action.perform(&ctx).await?;
//! println!("{}", sheet);
//! # Ok(())
//! # }
//! ```

pub mod host;
pub mod integrations;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

pub use host::Host;
