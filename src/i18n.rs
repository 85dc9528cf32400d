//! User-facing text in English and Chinese

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    #[value(name = "en")]
    English,
    #[serde(rename = "zh")]
    #[value(name = "zh")]
    Chinese,
}

/// Every string the CLI prints or prompts with
pub struct Messages {
    pub banner: &'static str,
    pub checking_status: &'static str,
    pub already_logged_in: &'static str,
    pub not_logged_in: &'static str,
    pub current_ip: &'static str,
    pub login_account: &'static str,
    pub carrier: &'static str,
    pub online_time: &'static str,
    pub unknown: &'static str,
    pub confirm_logout: &'static str,
    pub logging_out: &'static str,
    pub logout_ok: &'static str,
    pub logout_failed: &'static str,
    pub logout_cancelled: &'static str,
    pub select_carrier: &'static str,
    pub carrier_prompt: &'static str,
    pub carrier_invalid: &'static str,
    pub account_prompt: &'static str,
    pub password_prompt: &'static str,
    pub device_ip: &'static str,
    pub ip_prompt: &'static str,
    pub logging_in: &'static str,
    pub login_ok: &'static str,
    pub login_failed: &'static str,
    pub update_notice: &'static str,
}

static ENGLISH: Messages = Messages {
    banner: "===== SUDA_WiFi Campus Network Login =====",
    checking_status: "Checking current login status...",
    already_logged_in: "Already logged in:",
    not_logged_in: "Not logged in, entering login process",
    current_ip: "Current IP",
    login_account: "Login Account",
    carrier: "Carrier",
    online_time: "Online Time",
    unknown: "Unknown",
    confirm_logout: "Do you want to logout? (y/n): ",
    logging_out: "Logging out...",
    logout_ok: "✅ Logout successful!",
    logout_failed: "❌ Logout failed, please try again",
    logout_cancelled: "Logout cancelled",
    select_carrier: "Please select carrier:",
    carrier_prompt: "Please enter your choice (1-4): ",
    carrier_invalid: "Invalid input, please select again (1-4): ",
    account_prompt: "Please enter account: ",
    password_prompt: "Please enter password: ",
    device_ip: "Current device IP",
    ip_prompt: "Please enter IP manually: ",
    logging_in: "Logging in...",
    login_ok: "===== Login Successful =====",
    login_failed: "❌ Login failed, please check your account, password, or carrier",
    update_notice: "===== New Version Notice =====\nA new version is available! Please visit to update:",
};

static CHINESE: Messages = Messages {
    banner: "===== SUDA_WiFi 校园网登录 =====",
    checking_status: "正在检查当前登录状态...",
    already_logged_in: "检测到已登录状态：",
    not_logged_in: "当前未登录，进入登录流程",
    current_ip: "当前IP",
    login_account: "登录账号",
    carrier: "运营商",
    online_time: "在线时长",
    unknown: "未知",
    confirm_logout: "是否需要注销？(y/n)：",
    logging_out: "正在执行注销...",
    logout_ok: "✅ 注销成功！",
    logout_failed: "❌ 注销失败，请重试",
    logout_cancelled: "已取消注销操作",
    select_carrier: "请选择运营商：",
    carrier_prompt: "请输入选项(1-4)：",
    carrier_invalid: "输入无效，请重新选择(1-4)：",
    account_prompt: "请输入账号：",
    password_prompt: "请输入密码：",
    device_ip: "当前设备IP",
    ip_prompt: "请手动输入IP：",
    logging_in: "正在登录...",
    login_ok: "===== 登录成功 =====",
    login_failed: "❌ 登录失败，请检查账号密码或运营商",
    update_notice: "===== 新版本提醒 =====\n检测到新版本！请访问以更新：",
};

impl Language {
    pub fn messages(self) -> &'static Messages {
        match self {
            Language::English => &ENGLISH,
            Language::Chinese => &CHINESE,
        }
    }

    /// Separator between a label and its value
    pub fn colon(self) -> &'static str {
        match self {
            Language::English => ": ",
            Language::Chinese => "：",
        }
    }
}
