//! Authenticated GraphQL request pipeline.
//!
//! Every operation flows through three stages: decoration (bearer header
//! read from the token store at dispatch time), transport (plain JSON POST,
//! or multipart when a file is attached), and interception (an
//! authentication failure triggers at most one refresh-and-replay before
//! the error is surfaced). Refreshes are coalesced: concurrent failures
//! share a single in-flight refresh instead of racing their own.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use medica_model::auth::{RefreshRequest, RefreshResponse};
use medica_model::graphql::{GraphqlError, GraphqlResponse, code};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::error::{ClientError, RefreshError, Result};
use crate::ops::Operation;
use crate::store::{FileTokenStore, TokenStore, TokenStoreExt};

/// GraphQL client with authentication support.
#[derive(Clone)]
pub struct GraphqlClient {
    http: Client,
    endpoint: String,
    pub(crate) store: Arc<dyn TokenStore>,
    refresh_gate: Arc<Mutex<()>>,
}

impl fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("endpoint", &self.endpoint)
            .field("has_token", &self.store.access_token().is_some())
            .finish()
    }
}

/// Result of one transport round: either the extracted payload or an
/// authentication failure carrying the server's original errors plus the
/// access token the attempt was sent with.
enum Dispatched {
    Payload(Value),
    AuthFailure {
        errors: Vec<GraphqlError>,
        used_token: Option<String>,
    },
}

// Many users will configure "localhost:3001/graphql", which reqwest
// rejects. Add http:// when the scheme is missing and trim a trailing
// slash to prevent double slashes in derived URLs.
fn normalize(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme = if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
    {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    if with_scheme != raw {
        log::warn!(
            "[GraphqlClient] normalized endpoint from '{}' to '{}'",
            raw,
            with_scheme
        );
    }
    with_scheme
}

impl GraphqlClient {
    /// Creates a new client over the given configuration and an injected
    /// token store.
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Self {
        let endpoint = normalize(&config.server_url);
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        log::info!("[GraphqlClient] created for endpoint {}", endpoint);

        Self {
            http,
            endpoint,
            store,
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Creates a client backed by the default persistent store in the
    /// platform data directory.
    pub fn with_default_store(config: &ClientConfig) -> Result<Self> {
        let store = FileTokenStore::new()?;
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Normalized GraphQL endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The injected session store.
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    fn refresh_url(&self) -> String {
        format!("{}/refresh-token", self.endpoint)
    }

    /// Attaches the bearer header for the token read at dispatch time.
    /// Absence of a token is a valid anonymous-request state.
    fn authorize(
        &self,
        builder: RequestBuilder,
        token: Option<&str>,
    ) -> RequestBuilder {
        match token {
            Some(token) => {
                builder.header(AUTHORIZATION, format!("Bearer {token}"))
            }
            None => builder,
        }
    }

    /// Builds the outgoing request for an operation: a plain JSON POST, or a
    /// GraphQL multipart request (`operations` + `map` + file part) when an
    /// attachment is present.
    fn request_for(&self, operation: &Operation) -> Result<RequestBuilder> {
        let body = operation.request_body();
        let Some(file) = &operation.file else {
            return Ok(self.http.post(&self.endpoint).json(&body));
        };

        let operations = serde_json::to_string(&body)?;
        let map = serde_json::to_string(
            &serde_json::json!({ "0": [file.variable_path] }),
        )?;
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.mime_type)?;
        let form = reqwest::multipart::Form::new()
            .text("operations", operations)
            .text("map", map)
            .part("0", part);
        Ok(self.http.post(&self.endpoint).multipart(form))
    }

    /// Executes an operation through the full pipeline and decodes the root
    /// field into `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        operation: &Operation,
    ) -> Result<T> {
        let value = match self.dispatch(operation).await? {
            Dispatched::Payload(value) => value,
            Dispatched::AuthFailure { errors, used_token } => {
                self.recover(operation, errors, used_token).await?
            }
        };
        Ok(serde_json::from_value(value)?)
    }

    /// One transport round: decorate, send, classify the response.
    async fn dispatch(&self, operation: &Operation) -> Result<Dispatched> {
        log::debug!(
            "[GraphqlClient] POST {} ({})",
            self.endpoint,
            operation.name
        );

        let token = self.store.access_token();
        let request =
            self.authorize(self.request_for(operation)?, token.as_deref());
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                // Transient transport failures are forwarded unchanged and
                // never enter the refresh state machine.
                log::warn!("[GraphqlClient] network error: {}", e);
                return Err(e.into());
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // Some deployments short-circuit at the transport layer instead
            // of answering with a GraphQL error envelope.
            return Ok(Dispatched::AuthFailure {
                errors: Vec::new(),
                used_token: token,
            });
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ClientError::Http { status, body });
        }

        let envelope: GraphqlResponse = response.json().await?;
        if envelope.has_code(code::UNAUTHENTICATED) {
            return Ok(Dispatched::AuthFailure {
                errors: envelope.errors,
                used_token: token,
            });
        }
        if !envelope.errors.is_empty() {
            // Business errors pass through unchanged and never touch tokens.
            return Err(ClientError::Graphql(envelope.errors));
        }
        match envelope.take_field(operation.field) {
            Some(value) => Ok(Dispatched::Payload(value)),
            None => Err(ClientError::MissingData {
                field: operation.field,
            }),
        }
    }

    /// Refresh-and-replay for one failed operation. The replay happens at
    /// most once; a second authentication failure is terminal.
    async fn recover(
        &self,
        operation: &Operation,
        original: Vec<GraphqlError>,
        failed_with: Option<String>,
    ) -> Result<Value> {
        if self.store.refresh_token().is_none() {
            log::warn!(
                "[GraphqlClient] authentication failed with no refresh token stored"
            );
            self.store.clear_credentials();
            return Err(ClientError::Unauthenticated(original));
        }

        self.refresh_current_session(failed_with).await?;

        log::info!(
            "[GraphqlClient] session refreshed, replaying {}",
            operation.name
        );
        match self.dispatch(operation).await? {
            Dispatched::Payload(value) => Ok(value),
            Dispatched::AuthFailure { errors, .. } => {
                log::warn!(
                    "[GraphqlClient] replay of {} still unauthenticated",
                    operation.name
                );
                self.store.clear_credentials();
                Err(ClientError::Unauthenticated(errors))
            }
        }
    }

    /// At most one refresh call is in flight at a time. An operation that
    /// waited for the gate reuses the rotation that happened meanwhile
    /// instead of issuing its own call.
    async fn refresh_current_session(
        &self,
        failed_with: Option<String>,
    ) -> Result<()> {
        let _gate = self.refresh_gate.lock().await;
        let current = self.store.access_token();
        if current.is_some() && current != failed_with {
            log::debug!(
                "[GraphqlClient] credentials already rotated by a concurrent refresh"
            );
            return Ok(());
        }
        self.refresh_once().await
    }

    /// Explicit rotation of the session credential pair, sharing the same
    /// in-flight gate as the interceptor.
    pub(crate) async fn refresh_gated(&self) -> Result<()> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_once().await
    }

    /// Issues the dedicated refresh call and persists the rotated pair. Any
    /// failure clears the stored credentials before surfacing.
    async fn refresh_once(&self) -> Result<()> {
        let Some(refresh_token) = self.store.refresh_token() else {
            self.store.clear_credentials();
            return Err(RefreshError::TokenUnavailable.into());
        };

        log::info!(
            "[GraphqlClient] access token rejected, requesting refresh"
        );

        // Deliberately undecorated: the refresh endpoint authenticates by
        // the refresh token in the body alone.
        let response = self
            .http
            .post(self.refresh_url())
            .json(&RefreshRequest { refresh_token })
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.store.clear_credentials();
                return Err(RefreshError::Transport(e).into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            self.store.clear_credentials();
            return Err(RefreshError::Status(status).into());
        }

        let payload = match response.json::<RefreshResponse>().await {
            Ok(payload) => payload,
            Err(e) => {
                self.store.clear_credentials();
                return Err(RefreshError::Transport(e).into());
            }
        };

        match payload.into_credentials() {
            Some(credentials) => {
                self.store.save_credentials(&credentials);
                log::info!("[GraphqlClient] session credentials rotated");
                Ok(())
            }
            None => {
                log::warn!(
                    "[GraphqlClient] refresh response missing a token, clearing session"
                );
                self.store.clear_credentials();
                Err(RefreshError::IncompletePayload.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTokenStore;

    fn client_for(url: &str) -> GraphqlClient {
        let config = ClientConfig {
            server_url: url.to_string(),
            ..ClientConfig::default()
        };
        GraphqlClient::new(&config, Arc::new(MemoryTokenStore::new()))
    }

    #[test]
    fn normalize_adds_scheme_and_trims_slash() {
        assert_eq!(
            normalize("localhost:3001/graphql/"),
            "http://localhost:3001/graphql"
        );
        assert_eq!(
            normalize("https://api.example.com/graphql"),
            "https://api.example.com/graphql"
        );
        assert_eq!(
            normalize("  http://host/graphql  "),
            "http://host/graphql"
        );
    }

    #[test]
    fn refresh_url_derives_from_endpoint() {
        let client = client_for("localhost:3001/graphql/");
        assert_eq!(
            client.refresh_url(),
            "http://localhost:3001/graphql/refresh-token"
        );
    }
}
