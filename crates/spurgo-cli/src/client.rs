use std::fs;

use reqwest::{Client, Method, Response, Url, header};
use serde::Deserialize;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("site URL is required (use --site or SPURGO_SITE_URL)")]
    MissingSite,
    #[error("admin token is required (use --token-file or SPURGO_ADMIN_TOKEN)")]
    MissingToken,
    #[error("failed to read token file: {0}")]
    TokenFile(std::io::Error),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error: {0}")]
    Server(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub client: Client,
    pub base: Url,
    pub token: String,
}

impl Ctx {
    pub fn new(site: &str, token: String) -> Result<Self, CliError> {
        let base = Url::parse(site)?.join("/")?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            base,
            token,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("spurgo-cli/", env!("CARGO_PKG_VERSION"))
    }

    pub fn url(&self, path: &str) -> Result<Url, CliError> {
        self.base.join(path).map_err(CliError::Url)
    }

    pub async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<serde_json::Value>,
    ) -> Result<T, CliError> {
        let resp = self.send(method, path, query, body).await?;
        Self::handle(resp).await
    }

    pub async fn request_unit(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<serde_json::Value>,
    ) -> Result<(), CliError> {
        let resp = self.send(method, path, query, body).await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CliError::Server(format!("status {status} body {text}")));
        }
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<serde_json::Value>,
    ) -> Result<Response, CliError> {
        let mut url = self.url(path)?;
        if let Some(q) = query {
            url.set_query(None);
            let mut qp = url.query_pairs_mut();
            for (k, v) in q {
                qp.append_pair(k, v);
            }
        }

        let mut req = self
            .client
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        if let Some(b) = body {
            req = req.json(&b);
        }

        Ok(req.send().await?)
    }

    async fn handle<T: for<'de> Deserialize<'de>>(resp: Response) -> Result<T, CliError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(CliError::Server(format!("status {status} body {text}")));
        }
        let val = serde_json::from_slice(&bytes)
            .map_err(|e| CliError::Server(format!("failed to parse body: {e}")))?;
        Ok(val)
    }
}

pub fn build_ctx_from_cli(cli: &Cli) -> Result<Ctx, CliError> {
    let site = cli.site.clone().ok_or(CliError::MissingSite)?;
    let token = if let Some(path) = &cli.token_file {
        fs::read_to_string(path)
            .map_err(CliError::TokenFile)?
            .trim()
            .to_string()
    } else {
        std::env::var("SPURGO_ADMIN_TOKEN")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(CliError::MissingToken)?
    };

    Ctx::new(&site, token)
}
