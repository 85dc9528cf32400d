//! Dr.COM eportal gateway (SUDA_WiFi)
//!
//! Status lives on the gateway root page; login and logout are actions on
//! the eportal service (`:801/eportal/`). None of the actions report a usable
//! result, so every transport failure here is logged and otherwise ignored.

use crate::config::GatewayConfig;
use crate::error::{is_transport, GatewayError, Result};
use crate::gateway::Gateway;
use crate::http::HttpClient;
use crate::models::{LoginRequest, SessionStatus};
use crate::parser::StatusParser;
use async_trait::async_trait;
use reqwest::Response;

/// MAC address the portal accepts when the real one is unknown
const NULL_MAC: &str = "000000000000";
const JS_VERSION: &str = "3.3.3";

/// Fixed key the login form carries
const PORTAL_KEY: &str = "123456";

/// Service account the portal's own logout call uses
const LOGOUT_ACCOUNT: &str = "drcom";
const LOGOUT_PASSWORD: &str = "123";

pub struct DrcomGateway {
    status_url: String,
    portal_url: String,
    client: HttpClient,
    parser: StatusParser,
}

impl DrcomGateway {
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        Ok(Self {
            status_url: config.status_url.clone(),
            portal_url: config.portal_url.clone(),
            client: HttpClient::new(config.http_settings())?,
            parser: StatusParser::new(config.portal_markers.clone()),
        })
    }

    async fn read_status(&self) -> reqwest::Result<SessionStatus> {
        let resp = self.client.get(&self.status_url).await?;
        let document = resp.text().await?;
        Ok(self.parser.parse(&document))
    }
}

/// Keep going on network failures, stop on malformed requests
fn absorb(action: &str, result: reqwest::Result<Response>) -> Result<()> {
    match result {
        Ok(resp) => {
            tracing::debug!("{} -> {}", action, resp.status());
            Ok(())
        }
        Err(e) if is_transport(&e) => {
            tracing::warn!("{} request failed, relying on status polling: {}", action, e);
            Ok(())
        }
        Err(e) => Err(GatewayError::InvalidRequest(e)),
    }
}

#[async_trait]
impl Gateway for DrcomGateway {
    async fn fetch_status(&self) -> Result<SessionStatus> {
        match self.read_status().await {
            Ok(status) => {
                if let Some(uid) = &status.unmatched_uid {
                    tracing::warn!(
                        "Gateway reports account '{}' with no known carrier suffix",
                        uid
                    );
                }
                tracing::debug!(
                    "Status: authenticated={} portal_redirect={}",
                    status.is_authenticated,
                    status.is_portal_redirect
                );
                Ok(status)
            }
            Err(e) if is_transport(&e) => {
                tracing::debug!("Gateway unreachable, assuming login page: {}", e);
                Ok(SessionStatus::unreachable())
            }
            Err(e) => Err(GatewayError::InvalidRequest(e)),
        }
    }

    async fn submit_login(&self, request: &LoginRequest) -> Result<()> {
        let full_account = request.full_account();
        tracing::info!(
            "Submitting login for {} from {}",
            full_account,
            request.client_ip
        );

        let form = [
            ("DDDDD", full_account.as_str()),
            ("upass", request.password.as_str()),
            ("R1", "0"),
            ("R2", "0"),
            ("R3", "0"),
            ("R6", "0"),
            ("para", "00"),
            ("0MKKey", PORTAL_KEY),
            ("ISP_select", request.carrier.suffix()),
            ("redirect_url", ""),
            ("v6ip", ""),
            ("wlanuserip", request.client_ip.as_str()),
        ];

        let result = self
            .client
            .post_form(
                &self.portal_url,
                &[("c", "ACSetting"), ("a", "Login")],
                &form,
                &self.status_url,
            )
            .await;
        absorb("Login", result)
    }

    async fn submit_logout(&mut self, client_ip: &str, full_account: &str) -> Result<()> {
        tracing::info!("Submitting logout for {} from {}", full_account, client_ip);

        let unbind = [
            ("c", "Portal"),
            ("a", "unbind_mac"),
            ("callback", "dr1003"),
            ("user_account", full_account),
            ("wlan_user_mac", NULL_MAC),
            ("wlan_user_ip", client_ip),
            ("jsVersion", JS_VERSION),
        ];
        let result = self.client.get_with_query(&self.portal_url, &unbind).await;
        absorb("Unbind MAC", result)?;

        let logout = [
            ("c", "Portal"),
            ("a", "logout"),
            ("callback", "dr1004"),
            ("login_method", "1"),
            ("user_account", LOGOUT_ACCOUNT),
            ("user_password", LOGOUT_PASSWORD),
            ("ac_logout", "1"),
            ("wlan_user_ip", client_ip),
            ("wlan_user_mac", NULL_MAC),
            ("jsVersion", JS_VERSION),
        ];
        let result = self.client.get_with_query(&self.portal_url, &logout).await;
        absorb("Logout", result)?;

        self.client
            .clear_cookies()
            .map_err(GatewayError::SessionReset)
    }
}
