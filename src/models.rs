//! Data models for the SUDA_WiFi portal session

use crate::i18n::Language;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Upstream carrier an account is billed through.
///
/// The gateway identifies the carrier by a suffix appended to the bare
/// account name (`alice@xyw`). Table order is also the order suffixes are
/// scanned in when parsing a status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Carrier {
    #[value(name = "campus")]
    CampusNetwork,
    #[value(name = "mobile")]
    ChinaMobile,
    #[value(name = "unicom")]
    ChinaUnicom,
    #[value(name = "telecom")]
    ChinaTelecom,
}

impl Carrier {
    pub const ALL: [Carrier; 4] = [
        Carrier::CampusNetwork,
        Carrier::ChinaMobile,
        Carrier::ChinaUnicom,
        Carrier::ChinaTelecom,
    ];

    /// Account suffix token the gateway expects
    pub fn suffix(self) -> &'static str {
        match self {
            Carrier::CampusNetwork => "@xyw",
            Carrier::ChinaMobile => "@zgyd",
            Carrier::ChinaUnicom => "@cucc",
            Carrier::ChinaTelecom => "@ctc",
        }
    }

    /// Menu choice ("1".."4") shown in the interactive prompt
    pub fn choice(self) -> &'static str {
        match self {
            Carrier::CampusNetwork => "1",
            Carrier::ChinaMobile => "2",
            Carrier::ChinaUnicom => "3",
            Carrier::ChinaTelecom => "4",
        }
    }

    pub fn from_choice(choice: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.choice() == choice.trim())
    }

    pub fn display_name(self, language: Language) -> &'static str {
        match (self, language) {
            (Carrier::CampusNetwork, Language::English) => "Campus Network",
            (Carrier::ChinaMobile, Language::English) => "China Mobile",
            (Carrier::ChinaUnicom, Language::English) => "China Unicom",
            (Carrier::ChinaTelecom, Language::English) => "China Telecom",
            (Carrier::CampusNetwork, Language::Chinese) => "校园网",
            (Carrier::ChinaMobile, Language::Chinese) => "中国移动",
            (Carrier::ChinaUnicom, Language::Chinese) => "中国联通",
            (Carrier::ChinaTelecom, Language::Chinese) => "中国电信",
        }
    }
}

/// An authenticated account as reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Bare account name, carrier suffix stripped
    pub name: String,
    pub carrier: Carrier,
}

impl Account {
    /// Split a gateway account identifier on the first carrier suffix it ends with
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Carrier::ALL.into_iter().find_map(|carrier| {
            identifier.strip_suffix(carrier.suffix()).map(|name| Self {
                name: name.to_string(),
                carrier,
            })
        })
    }
}

/// Account name with the carrier suffix, as the gateway stores it
pub fn suffixed_account(name: &str, carrier: Carrier) -> String {
    format!("{}{}", name, carrier.suffix())
}

/// Session state reconstructed from one status-page fetch.
///
/// Never stored between polls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    /// Client address reported by the gateway, `None` when unknown
    pub current_ip: Option<String>,

    /// Carrier and bare account name, present only together
    pub account: Option<Account>,

    /// Time since authentication began
    #[serde(serialize_with = "serialize_secs")]
    pub online_time: Duration,

    pub is_authenticated: bool,

    /// The fetched document is the gateway's own login page
    pub is_portal_redirect: bool,

    /// Raw `uid` value that carried no known carrier suffix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmatched_uid: Option<String>,
}

impl SessionStatus {
    /// Status assumed when the gateway cannot be reached
    pub fn unreachable() -> Self {
        Self {
            is_authenticated: false,
            is_portal_redirect: true,
            ..Self::default()
        }
    }

    pub fn login_account(&self) -> &str {
        self.account.as_ref().map(|a| a.name.as_str()).unwrap_or("")
    }

    pub fn carrier(&self) -> Option<Carrier> {
        self.account.as_ref().map(|a| a.carrier)
    }

    pub fn current_ip_or<'a>(&'a self, unknown: &'a str) -> &'a str {
        self.current_ip.as_deref().unwrap_or(unknown)
    }
}

fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}

/// Format an online duration as `H:MM:SS`, prefixed with days past 24h
pub fn format_online_time(d: Duration) -> String {
    let total = d.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    match days {
        0 => format!("{}:{:02}:{:02}", hours, minutes, seconds),
        1 => format!("1 day, {}:{:02}:{:02}", hours, minutes, seconds),
        n => format!("{} days, {}:{:02}:{:02}", n, hours, minutes, seconds),
    }
}

/// Credentials and addressing for one login submission
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub account: String,
    pub carrier: Carrier,
    pub client_ip: String,
    pub password: String,
}

impl LoginRequest {
    pub fn full_account(&self) -> String {
        suffixed_account(&self.account, self.carrier)
    }
}

/// Result of a login once polling finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The gateway reported the session as authenticated
    Authenticated(SessionStatus),
    TimedOut,
}

/// Result of a logout once polling finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The gateway serves its login page again
    LoggedOut,
    TimedOut,
}
