//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    BalanceResponse, CheckRate, Password, RateResponse, SendSms, SubmissionResult, Username,
    ValidationError,
};

const DEFAULT_SEND_ENDPOINT: &str = "http://127.0.0.1:1401/send";
const DEFAULT_BALANCE_ENDPOINT: &str = "http://127.0.0.1:1401/balance";
const DEFAULT_RATE_ENDPOINT: &str = "http://127.0.0.1:1401/rate";
const DEFAULT_PING_ENDPOINT: &str = "http://127.0.0.1:1401/ping";

/// Body the ping endpoint answers with when the HTTP API is up.
const PING_BODY: &str = "Jasmin/PONG";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;

    fn get<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }

    fn get<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.get(url).query(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Account credentials for the gateway's HTTP API.
///
/// Injected into [`GatewayClient`] at construction; request-building code
/// never sees raw credential strings. `Debug` output redacts the password.
pub struct Credentials {
    username: Username,
    password: Password,
}

impl Credentials {
    /// Create validated [`Credentials`].
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    /// The account username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    fn push_form_params(&self, params: &mut Vec<(String, String)>) {
        params.push((Username::FIELD.to_owned(), self.username.as_str().to_owned()));
        params.push((Password::FIELD.to_owned(), self.password.as_str().to_owned()));
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`GatewayClient`].
///
/// A gateway-side submission rejection is NOT an error here: it comes
/// back as [`SubmissionResult::Error`]. This type covers the round trip
/// itself:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - unparseable response bodies,
/// - validation failures in domain constructors.
pub enum GatewayError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the gateway.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`GatewayClient`].
///
/// Use this when you need to point the client at a non-default gateway
/// address or customize the timeout or user-agent.
pub struct GatewayClientBuilder {
    credentials: Credentials,
    send_endpoint: String,
    balance_endpoint: String,
    rate_endpoint: String,
    ping_endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl GatewayClientBuilder {
    /// Create a builder with the default endpoints and no timeout or
    /// user-agent override.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            send_endpoint: DEFAULT_SEND_ENDPOINT.to_owned(),
            balance_endpoint: DEFAULT_BALANCE_ENDPOINT.to_owned(),
            rate_endpoint: DEFAULT_RATE_ENDPOINT.to_owned(),
            ping_endpoint: DEFAULT_PING_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Derive all endpoint URLs from one base (`{base}/send`,
    /// `{base}/balance`, `{base}/rate`, `{base}/ping`).
    pub fn base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/');
        self.send_endpoint = format!("{base}/send");
        self.balance_endpoint = format!("{base}/balance");
        self.rate_endpoint = format!("{base}/rate");
        self.ping_endpoint = format!("{base}/ping");
        self
    }

    /// Override the send endpoint URL.
    pub fn send_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.send_endpoint = endpoint.into();
        self
    }

    /// Override the balance endpoint URL.
    pub fn balance_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.balance_endpoint = endpoint.into();
        self
    }

    /// Override the rate endpoint URL.
    pub fn rate_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.rate_endpoint = endpoint.into();
        self
    }

    /// Override the ping endpoint URL.
    pub fn ping_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.ping_endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`GatewayClient`].
    pub fn build(self) -> Result<GatewayClient, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| GatewayError::Transport(Box::new(err)))?;

        Ok(GatewayClient {
            credentials: self.credentials,
            send_endpoint: self.send_endpoint,
            balance_endpoint: self.balance_endpoint,
            rate_endpoint: self.rate_endpoint,
            ping_endpoint: self.ping_endpoint,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level client for the gateway's HTTP API.
///
/// This type orchestrates request validation, form encoding, and response
/// parsing. By default it targets a gateway on `127.0.0.1:1401`:
/// - `/send` for message submission (plain-text response),
/// - `/balance` and `/rate` for account queries (JSON responses),
/// - `/ping` for availability checks.
pub struct GatewayClient {
    credentials: Credentials,
    send_endpoint: String,
    balance_endpoint: String,
    rate_endpoint: String,
    ping_endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl GatewayClient {
    /// Create a client using the default endpoints.
    ///
    /// For more customization, use [`GatewayClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            send_endpoint: DEFAULT_SEND_ENDPOINT.to_owned(),
            balance_endpoint: DEFAULT_BALANCE_ENDPOINT.to_owned(),
            rate_endpoint: DEFAULT_RATE_ENDPOINT.to_owned(),
            ping_endpoint: DEFAULT_PING_ENDPOINT.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> GatewayClientBuilder {
        GatewayClientBuilder::new(credentials)
    }

    /// Submit one outbound message and classify the synchronous response.
    ///
    /// A gateway rejection (`Error "..."` body) is returned as
    /// [`SubmissionResult::Error`], not as a [`GatewayError`]: the caller
    /// always sees the outcome. The client performs no automatic retry —
    /// the gateway does not guarantee submission idempotency, so retrying
    /// is the caller's decision.
    ///
    /// Errors:
    /// - [`GatewayError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`GatewayError::Transport`] for connection-level failures,
    /// - [`GatewayError::Parse`] when the body carries neither marker.
    pub async fn send(&self, request: SendSms) -> Result<SubmissionResult, GatewayError> {
        let mut params = Vec::<(String, String)>::new();
        self.credentials.push_form_params(&mut params);
        params.extend(crate::transport::encode_send_form(&request));

        let response = self
            .http
            .post_form(&self.send_endpoint, params)
            .await
            .map_err(GatewayError::Transport)?;

        if !(200..=299).contains(&response.status) {
            return Err(http_status_error(response));
        }

        let result = crate::transport::decode_send_response(&response.body)
            .map_err(|err| GatewayError::Parse(Box::new(err)))?;

        // Content is never logged; the destination and outcome are enough
        // to correlate with gateway-side logs.
        match &result {
            SubmissionResult::Success { message_id } => {
                tracing::info!(
                    to = %request.to().raw(),
                    message_id = %message_id.as_str(),
                    "message accepted by gateway"
                );
            }
            SubmissionResult::Error { error_detail } => {
                tracing::warn!(
                    to = %request.to().raw(),
                    error_detail = %error_detail,
                    "message rejected by gateway"
                );
            }
        }

        Ok(result)
    }

    /// Submit one outbound message, folding every failure into
    /// [`SubmissionResult::Error`].
    ///
    /// This is the infallible view of [`GatewayClient::send`]: transport
    /// failures, HTTP errors, and unparseable bodies all surface as an
    /// error result rather than an `Err`, so no failure is ever silently
    /// discarded and the caller handles exactly one shape.
    pub async fn submit(&self, request: SendSms) -> SubmissionResult {
        match self.send(request).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "send round trip failed");
                SubmissionResult::Error {
                    error_detail: err.to_string(),
                }
            }
        }
    }

    /// Query the account balance and remaining message quota.
    pub async fn balance(&self) -> Result<BalanceResponse, GatewayError> {
        let mut params = Vec::<(String, String)>::new();
        self.credentials.push_form_params(&mut params);

        let response = self
            .http
            .get(&self.balance_endpoint, params)
            .await
            .map_err(GatewayError::Transport)?;

        if !(200..=299).contains(&response.status) {
            return Err(http_status_error(response));
        }

        crate::transport::decode_balance_json_response(&response.body)
            .map_err(|err| GatewayError::Parse(Box::new(err)))
    }

    /// Query the unit rate and part count for a prospective submission.
    pub async fn rate(&self, request: CheckRate) -> Result<RateResponse, GatewayError> {
        let mut params = Vec::<(String, String)>::new();
        self.credentials.push_form_params(&mut params);
        params.extend(crate::transport::encode_rate_form(&request));

        let response = self
            .http
            .get(&self.rate_endpoint, params)
            .await
            .map_err(GatewayError::Transport)?;

        if !(200..=299).contains(&response.status) {
            return Err(http_status_error(response));
        }

        crate::transport::decode_rate_json_response(&response.body)
            .map_err(|err| GatewayError::Parse(Box::new(err)))
    }

    /// Check that the gateway's HTTP API is reachable and answering.
    pub async fn ping(&self) -> Result<(), GatewayError> {
        let response = self
            .http
            .get(&self.ping_endpoint, Vec::new())
            .await
            .map_err(GatewayError::Transport)?;

        if !(200..=299).contains(&response.status) {
            return Err(http_status_error(response));
        }

        if response.body.trim() != PING_BODY {
            return Err(GatewayError::Parse(
                format!("unexpected ping body: {:?}", response.body).into(),
            ));
        }

        Ok(())
    }
}

fn http_status_error(response: HttpResponse) -> GatewayError {
    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    GatewayError::HttpStatus {
        status: response.status,
        body,
    }
}
