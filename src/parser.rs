//! Status page parsing
//!
//! The gateway root page embeds the session in inline JavaScript
//! (`uid='...'`, `v4ip='...'`, `oltime=...`). Unauthenticated clients get the
//! portal's login page instead, which may still carry template values.

use crate::models::{Account, SessionStatus};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

/// Title text of the gateway's login page
pub const DEFAULT_PORTAL_MARKER: &str = "登录页";

static IP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:v4ip='|ss5=")([\d.]+)"#).expect("valid ip pattern"));
static UID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"uid='([^']+)'").expect("valid uid pattern"));
static OLTIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"oltime=(\d+)").expect("valid oltime pattern"));

/// Parses status documents, recognising the login page by marker text
#[derive(Debug, Clone)]
pub struct StatusParser {
    portal_markers: Vec<String>,
}

impl Default for StatusParser {
    fn default() -> Self {
        Self::new(vec![DEFAULT_PORTAL_MARKER.to_string()])
    }
}

impl StatusParser {
    pub fn new(portal_markers: Vec<String>) -> Self {
        Self { portal_markers }
    }

    /// Parse a status document. Never fails; missing or malformed fields
    /// keep their empty defaults.
    pub fn parse(&self, document: &str) -> SessionStatus {
        let mut status = SessionStatus {
            is_portal_redirect: self
                .portal_markers
                .iter()
                .any(|m| !m.is_empty() && document.contains(m.as_str())),
            ..SessionStatus::default()
        };

        status.current_ip = capture(&IP_RE, document);

        if let Some(uid) = capture(&UID_RE, document) {
            match Account::from_identifier(&uid) {
                Some(account) => {
                    status.account = Some(account);
                    status.is_authenticated = true;
                }
                None => status.unmatched_uid = Some(uid),
            }
        }

        if status.is_authenticated {
            status.online_time = capture(&OLTIME_RE, document)
                .and_then(|secs| secs.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or_default();
        }

        // The login page can carry leftover session markers
        if status.is_portal_redirect {
            status.is_authenticated = false;
        }

        status
    }
}

/// Parse with the default login-page marker
#[cfg(test)]
pub fn parse_status(document: &str) -> SessionStatus {
    StatusParser::default().parse(document)
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)?
        .get(1)
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{suffixed_account, Carrier};

    const LOGGED_IN_PAGE: &str = r#"
        <html><head><title>注销页</title></head>
        <script>
            uid='alice@xyw';pwd='';
            v4ip='10.20.30.40';
            time=123;flow=4567;oltime=3661;
        </script>
    "#;

    #[test]
    fn test_parse_authenticated_page() {
        let status = parse_status(LOGGED_IN_PAGE);
        assert!(status.is_authenticated);
        assert!(!status.is_portal_redirect);
        assert_eq!(status.login_account(), "alice");
        assert_eq!(status.carrier(), Some(Carrier::CampusNetwork));
        assert_eq!(status.current_ip.as_deref(), Some("10.20.30.40"));
        assert_eq!(status.online_time, Duration::from_secs(3661));
    }

    #[test]
    fn test_online_time_one_hour_one_minute_one_second() {
        let status = parse_status("uid='bob@zgyd'; oltime=3661;");
        assert_eq!(status.carrier(), Some(Carrier::ChinaMobile));
        assert_eq!(status.login_account(), "bob");
        assert_eq!(status.online_time, Duration::from_secs(60 * 60 + 60 + 1));
    }

    #[test]
    fn test_portal_marker_overrides_session_fields() {
        let html = r#"<title>登录页</title><script>uid='alice@xyw';v4ip='10.0.0.9';oltime=50;</script>"#;
        let status = parse_status(html);
        assert!(status.is_portal_redirect);
        assert!(!status.is_authenticated);
        assert_eq!(status.current_ip.as_deref(), Some("10.0.0.9"));
    }

    #[test]
    fn test_unknown_suffix_is_not_authenticated() {
        let status = parse_status("uid='carol@example';oltime=99;");
        assert!(!status.is_authenticated);
        assert!(status.account.is_none());
        assert_eq!(status.online_time, Duration::ZERO);
        assert_eq!(status.unmatched_uid.as_deref(), Some("carol@example"));
    }

    #[test]
    fn test_ss5_ip_form() {
        let status = parse_status(r#"var ss5="172.16.0.8";"#);
        assert_eq!(status.current_ip.as_deref(), Some("172.16.0.8"));
    }

    #[test]
    fn test_empty_document_defaults() {
        let status = parse_status("");
        assert_eq!(status, SessionStatus::default());
    }

    #[test]
    fn test_overflowing_oltime_degrades_to_zero() {
        let status = parse_status("uid='dave@ctc';oltime=99999999999999999999999;");
        assert!(status.is_authenticated);
        assert_eq!(status.online_time, Duration::ZERO);
    }

    #[test]
    fn test_custom_markers() {
        let parser = StatusParser::new(vec!["Login Page".to_string()]);
        let status = parser.parse("<title>Login Page</title> uid='erin@cucc'");
        assert!(status.is_portal_redirect);
        assert!(!status.is_authenticated);

        let status = parser.parse("<title>登录页</title> uid='erin@cucc'");
        assert!(!status.is_portal_redirect);
        assert!(status.is_authenticated);
    }

    #[test]
    fn test_uid_round_trips_through_account() {
        for uid in ["alice@xyw", "bob@zgyd", "carol@cucc", "dave@ctc"] {
            let status = parse_status(&format!("uid='{}';", uid));
            let account = status.account.unwrap();
            assert_eq!(suffixed_account(&account.name, account.carrier), uid);
        }
    }
}
