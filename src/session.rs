//! Session reconciliation
//!
//! The gateway never confirms an action directly. After submitting a login
//! or logout the reconciler re-reads the status page at a fixed interval
//! until it shows the wanted state or the deadline passes. It keeps no state
//! between calls; every decision comes from a fresh fetch.

use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::{suffixed_account, Carrier, LoginOutcome, LoginRequest, LogoutOutcome, SessionStatus};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Polling cadence after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub poll_interval: Duration,
    /// Measured from the moment the action request returned
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(300),
            deadline: Duration::from_secs(5),
        }
    }
}

/// Time source for the poll loop
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct SessionReconciler<G, C = TokioClock> {
    gateway: G,
    clock: C,
    policy: PollPolicy,
}

impl<G: Gateway> SessionReconciler<G, TokioClock> {
    pub fn new(gateway: G, policy: PollPolicy) -> Self {
        Self::with_clock(gateway, TokioClock, policy)
    }
}

impl<G: Gateway, C: Clock> SessionReconciler<G, C> {
    pub fn with_clock(gateway: G, clock: C, policy: PollPolicy) -> Self {
        Self {
            gateway,
            clock,
            policy,
        }
    }

    #[cfg(test)]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Current session as the gateway reports it right now
    pub async fn status(&self) -> Result<SessionStatus> {
        self.gateway.fetch_status().await
    }

    /// Log in and wait until the gateway reports an authenticated session
    pub async fn login(
        &self,
        account: &str,
        carrier: Carrier,
        client_ip: &str,
        password: &str,
    ) -> Result<LoginOutcome> {
        let request = LoginRequest {
            account: account.to_string(),
            carrier,
            client_ip: client_ip.to_string(),
            password: password.to_string(),
        };
        self.gateway.submit_login(&request).await?;

        match self.poll_until(|s| s.is_authenticated).await? {
            Some(status) => {
                tracing::info!("Login confirmed for {}", request.full_account());
                Ok(LoginOutcome::Authenticated(status))
            }
            None => {
                tracing::warn!(
                    "Gateway did not report {} as logged in within {:?}",
                    request.full_account(),
                    self.policy.deadline
                );
                Ok(LoginOutcome::TimedOut)
            }
        }
    }

    /// Log out and wait until the gateway serves its login page again
    pub async fn logout(
        &mut self,
        client_ip: &str,
        carrier: Carrier,
        login_account: &str,
    ) -> Result<LogoutOutcome> {
        let full_account = suffixed_account(login_account, carrier);
        self.gateway.submit_logout(client_ip, &full_account).await?;

        match self.poll_until(|s| s.is_portal_redirect).await? {
            Some(_) => {
                tracing::info!("Logout confirmed for {}", full_account);
                Ok(LogoutOutcome::LoggedOut)
            }
            None => {
                tracing::warn!(
                    "Gateway still reports {} as logged in after {:?}",
                    full_account,
                    self.policy.deadline
                );
                Ok(LogoutOutcome::TimedOut)
            }
        }
    }

    /// Fetch status until `converged` holds. `None` once the deadline passed.
    async fn poll_until<F>(&self, converged: F) -> Result<Option<SessionStatus>>
    where
        F: Fn(&SessionStatus) -> bool,
    {
        let started = self.clock.now();
        let mut polls = 0u32;

        loop {
            let status = self.gateway.fetch_status().await?;
            polls += 1;
            if converged(&status) {
                tracing::debug!("Converged after {} poll(s)", polls);
                return Ok(Some(status));
            }

            if self.clock.now().duration_since(started) >= self.policy.deadline {
                tracing::debug!("Deadline reached after {} poll(s)", polls);
                return Ok(None);
            }

            self.clock.sleep(self.policy.poll_interval).await;
        }
    }
}
