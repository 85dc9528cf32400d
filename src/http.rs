//! HTTP client with timeouts, browser headers and a resettable cookie jar

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy)]
pub struct HttpSettings {
    /// Whole-request timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Cookie-bearing client. Requests are sent once; the caller decides what a
/// failure means.
pub struct HttpClient {
    inner: Client,
    settings: HttpSettings,
}

impl HttpClient {
    pub fn new(settings: HttpSettings) -> reqwest::Result<Self> {
        Ok(Self {
            inner: build_client(settings)?,
            settings,
        })
    }

    pub async fn get(&self, url: &str) -> reqwest::Result<Response> {
        self.inner.get(url).send().await
    }

    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        url: &str,
        query: &Q,
    ) -> reqwest::Result<Response> {
        self.inner.get(url).query(query).send().await
    }

    /// POST a urlencoded form, with a query string and a Referer
    pub async fn post_form<Q, F>(
        &self,
        url: &str,
        query: &Q,
        form: &F,
        referer: &str,
    ) -> reqwest::Result<Response>
    where
        Q: Serialize + ?Sized,
        F: Serialize + ?Sized,
    {
        self.inner
            .post(url)
            .query(query)
            .header(REFERER, referer)
            .form(form)
            .send()
            .await
    }

    /// Drop every stored cookie by swapping in a freshly built client
    pub fn clear_cookies(&mut self) -> reqwest::Result<()> {
        self.inner = build_client(self.settings)?;
        tracing::debug!("HTTP session cookies cleared");
        Ok(())
    }
}

fn build_client(settings: HttpSettings) -> reqwest::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
    );

    Client::builder()
        .cookie_store(true)
        .timeout(settings.timeout)
        .connect_timeout(settings.connect_timeout)
        .default_headers(headers)
        .build()
}
