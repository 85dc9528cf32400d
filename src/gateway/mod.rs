//! Gateway abstraction layer
//!
//! The session reconciler only sees the `Gateway` trait: three requests with
//! no confirmation of their own. The Dr.COM eportal used on SUDA_WiFi is the
//! one real implementation; tests substitute scripted stubs.

pub mod drcom;

pub use drcom::DrcomGateway;

use crate::error::Result;
use crate::models::{LoginRequest, SessionStatus};
use async_trait::async_trait;

/// Requests a captive-portal gateway understands
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch and parse the status page.
    ///
    /// An unreachable gateway reads as "not logged in, on the login page".
    async fn fetch_status(&self) -> Result<SessionStatus>;

    /// Submit credentials. Whether they were accepted is only visible
    /// through a later `fetch_status`.
    async fn submit_login(&self, request: &LoginRequest) -> Result<()>;

    /// Release the account's session and forget local cookies.
    async fn submit_logout(&mut self, client_ip: &str, full_account: &str) -> Result<()>;
}
