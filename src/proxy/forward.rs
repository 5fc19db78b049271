//! Forward one request to the backend and relay the answer.

use std::time::Duration;

use anyhow::{Context, Result};
use tiny_http::{Header, Request, Response, StatusCode};

use super::headers::{forwarded_for, is_skipped};
use crate::debug;

/// Shared forwarding client for every proxied request.
pub struct Forwarder {
    client: reqwest::blocking::Client,
    backend: String,
}

impl Forwarder {
    /// `backend` is a base URL such as `http://127.0.0.1:5000`.
    pub fn new(backend: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(2))
            .timeout(None)
            .build()
            .context("Failed to build proxy client")?;
        Ok(Self {
            client,
            backend: backend.into(),
        })
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Proxy `request`. Backend failures become a 502 for this request only.
    pub fn handle(&self, mut request: Request) -> Result<()> {
        let mut body = Vec::new();
        request
            .as_reader()
            .read_to_end(&mut body)
            .context("Failed to read request body")?;

        match self.send(&request, body) {
            Ok(upstream) => respond_upstream(request, upstream),
            Err(err) => {
                debug!("proxy"; "{} {} -> {:#}", request.method(), request.url(), err);
                respond_bad_gateway(request, &err)
            }
        }
    }

    fn send(&self, request: &Request, body: Vec<u8>) -> Result<reqwest::blocking::Response> {
        let method = reqwest::Method::from_bytes(request.method().to_string().as_bytes())
            .context("Unsupported method")?;
        let url = format!("{}{}", self.backend, request.url());

        let mut builder = self.client.request(method, &url);
        let mut existing_xff = None;
        let mut host = None;
        for header in request.headers() {
            let name = header.field.as_str().as_str();
            let value = header.value.as_str();
            if name.eq_ignore_ascii_case("x-forwarded-for") {
                existing_xff = Some(value);
                continue;
            }
            if name.eq_ignore_ascii_case("host") {
                host = Some(value);
            }
            if is_skipped(name) {
                continue;
            }
            builder = builder.header(name, value);
        }

        if let Some(addr) = request.remote_addr() {
            builder = builder.header(
                "X-Forwarded-For",
                forwarded_for(existing_xff, &addr.ip().to_string()),
            );
        }
        if let Some(host) = host {
            builder = builder.header("X-Forwarded-Host", host);
        }

        builder
            .body(body)
            .send()
            .with_context(|| format!("backend unreachable at {}", self.backend))
    }
}

fn respond_upstream(request: Request, upstream: reqwest::blocking::Response) -> Result<()> {
    let status = StatusCode(upstream.status().as_u16());
    let length = upstream
        .content_length()
        .and_then(|n| usize::try_from(n).ok());

    let headers: Vec<Header> = upstream
        .headers()
        .iter()
        .filter(|(name, _)| !is_skipped(name.as_str()))
        .filter_map(|(name, value)| Header::from_bytes(name.as_str(), value.as_bytes()).ok())
        .collect();

    let response = Response::new(status, headers, upstream, length, None);
    request.respond(response).context("Failed to send response")?;
    Ok(())
}

fn respond_bad_gateway(request: Request, err: &anyhow::Error) -> Result<()> {
    let body = format!("502 Bad Gateway\n\n{err:#}\n\nThe backend is not answering; it may be rebuilding.\n");
    let response = Response::from_string(body).with_status_code(StatusCode(502));
    request.respond(response).context("Failed to send response")?;
    Ok(())
}
