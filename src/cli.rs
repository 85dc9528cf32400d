//! Command-line front end
//!
//! The interactive flow mirrors the portal's own page: show the session if
//! one exists and offer to log out, otherwise collect carrier, account,
//! password and address and log in. Subcommands do the same steps without
//! prompting.

use crate::gateway::Gateway;
use crate::i18n::{Language, Messages};
use crate::models::{format_online_time, Carrier, LoginOutcome, LogoutOutcome, SessionStatus};
use crate::session::{Clock, SessionReconciler};
use crate::utils;
use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};

/// Printing and prompting in one language
pub struct Console {
    language: Language,
}

impl Console {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    fn text(&self) -> &'static Messages {
        self.language.messages()
    }

    fn field(&self, label: &str, value: &str) {
        println!("{}{}{}", label, self.language.colon(), value);
    }

    fn prompt(&self, label: &str) -> Result<String> {
        print!("{}", label);
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            bail!("Input closed");
        }
        Ok(line.trim().to_string())
    }

    pub fn print_status(&self, status: &SessionStatus) {
        let text = self.text();
        self.field(text.current_ip, status.current_ip_or(text.unknown));
        self.field(text.login_account, status.login_account());
        self.field(
            text.carrier,
            status
                .carrier()
                .map(|c| c.display_name(self.language))
                .unwrap_or(""),
        );
        if status.is_authenticated {
            self.field(text.online_time, &format_online_time(status.online_time));
        }
    }

    pub fn banner(&self) {
        println!("{}", self.text().banner);
    }

    pub fn update_notice(&self, url: &str) {
        println!("\n{}\n{}", self.text().update_notice, url);
    }

    fn select_carrier(&self) -> Result<Carrier> {
        let text = self.text();
        println!("\n{}", text.select_carrier);
        for carrier in Carrier::ALL {
            println!("{}. {}", carrier.choice(), carrier.display_name(self.language));
        }

        let mut input = self.prompt(text.carrier_prompt)?;
        loop {
            if let Some(carrier) = Carrier::from_choice(&input) {
                return Ok(carrier);
            }
            input = self.prompt(text.carrier_invalid)?;
        }
    }

    /// Detected address, or one typed in when detection fails
    fn client_ip(&self) -> Result<String> {
        let text = self.text();
        match utils::local_ip() {
            Some(ip) => {
                println!("\n{}{}{}", text.device_ip, self.language.colon(), ip);
                Ok(ip.to_string())
            }
            None => {
                println!("\n{}{}{}", text.device_ip, self.language.colon(), text.unknown);
                loop {
                    let input = self.prompt(text.ip_prompt)?;
                    if let Some(ip) = utils::parse_ip(&input) {
                        return Ok(ip.to_string());
                    }
                }
            }
        }
    }
}

/// Interactive session: log out if logged in, log in otherwise
pub async fn run_interactive<G, C>(
    console: &Console,
    reconciler: &mut SessionReconciler<G, C>,
) -> Result<bool>
where
    G: Gateway,
    C: Clock,
{
    let text = console.text();

    println!("\n{}", text.checking_status);
    let status = reconciler.status().await?;

    if status.is_authenticated {
        println!("\n{}", text.already_logged_in);
        console.print_status(&status);

        let answer = console.prompt(&format!("\n{}", text.confirm_logout))?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("{}", text.logout_cancelled);
            return Ok(true);
        }

        let Some(carrier) = status.carrier() else {
            return Ok(true);
        };
        println!("{}", text.logging_out);
        let ip = status.current_ip_or("").to_string();
        match reconciler
            .logout(&ip, carrier, status.login_account())
            .await?
        {
            LogoutOutcome::LoggedOut => println!("{}", text.logout_ok),
            LogoutOutcome::TimedOut => println!("{}", text.logout_failed),
        }
        return Ok(true);
    }

    println!("\n{}", text.not_logged_in);
    let carrier = console.select_carrier()?;
    let account = console.prompt(&format!("\n{}", text.account_prompt))?;
    let password = console.prompt(text.password_prompt)?;
    let ip = console.client_ip()?;

    println!("\n{}", text.logging_in);
    report_login(
        console,
        reconciler.login(&account, carrier, &ip, &password).await?,
    );
    Ok(true)
}

pub async fn run_status<G, C>(
    console: &Console,
    reconciler: &SessionReconciler<G, C>,
    json: bool,
) -> Result<bool>
where
    G: Gateway,
    C: Clock,
{
    let status = reconciler.status().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let text = console.text();
        println!(
            "{}",
            if status.is_authenticated {
                text.already_logged_in
            } else {
                text.not_logged_in
            }
        );
        console.print_status(&status);
    }
    Ok(true)
}

pub async fn run_login<G, C>(
    console: &Console,
    reconciler: &SessionReconciler<G, C>,
    carrier: Carrier,
    account: &str,
    password: &str,
    ip: Option<&str>,
) -> Result<bool>
where
    G: Gateway,
    C: Clock,
{
    let ip = match ip {
        Some(ip) => ip.to_string(),
        None => utils::local_ip()
            .map(|ip| ip.to_string())
            .context("Could not detect the local IP address, pass --ip")?,
    };

    println!("{}", console.text().logging_in);
    let outcome = reconciler.login(account, carrier, &ip, password).await?;
    let confirmed = matches!(outcome, LoginOutcome::Authenticated(_));
    report_login(console, outcome);
    Ok(confirmed)
}

pub async fn run_logout<G, C>(
    console: &Console,
    reconciler: &mut SessionReconciler<G, C>,
    ip: Option<&str>,
) -> Result<bool>
where
    G: Gateway,
    C: Clock,
{
    let text = console.text();
    let status = reconciler.status().await?;
    let Some(carrier) = status.carrier().filter(|_| status.is_authenticated) else {
        println!("{}", text.not_logged_in);
        return Ok(false);
    };

    let ip = ip
        .map(str::to_string)
        .or_else(|| status.current_ip.clone())
        .unwrap_or_default();

    println!("{}", text.logging_out);
    let outcome = reconciler
        .logout(&ip, carrier, status.login_account())
        .await?;
    match outcome {
        LogoutOutcome::LoggedOut => println!("{}", text.logout_ok),
        LogoutOutcome::TimedOut => println!("{}", text.logout_failed),
    }
    Ok(outcome == LogoutOutcome::LoggedOut)
}

fn report_login(console: &Console, outcome: LoginOutcome) {
    let text = console.text();
    match outcome {
        LoginOutcome::Authenticated(status) => {
            println!("\n{}", text.login_ok);
            console.print_status(&status);
        }
        LoginOutcome::TimedOut => println!("\n{}", text.login_failed),
    }
}
