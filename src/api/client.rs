use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use super::credentials::CredentialProvider;
use crate::model::{CardDraft, SignupPayload};

/// Base URL of the hosted bizcard service.
pub const DEFAULT_BASE_URL: &str = "https://monkfish-app-z9uza.ondigitalocean.app/bcard2";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected the request with status {status}")]
    Rejected { status: u16, message: Option<String> },
}

impl ApiError {
    /// The server-supplied `message`, when the rejection body carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RejectionBody {
    message: Option<String>,
}

/// Submission target for the card form, so tests can swap the network out.
#[async_trait]
pub trait CardGateway: Send + Sync {
    async fn create_card(&self, card: &CardDraft) -> Result<(), ApiError>;
}

/// Submission target for the signup form.
#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn create_user(&self, user: &SignupPayload) -> Result<(), ApiError>;
}

/// HTTP client for the bizcard REST API. Card creation carries a bearer
/// token from the injected credential provider; user creation is pre-login
/// and sends no auth header.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, credentials)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    async fn post_json<B>(&self, path: &str, body: &B, authorized: bool) -> Result<(), ApiError>
    where
        B: Serialize + Sync,
    {
        let url = format!("{}/{path}", self.base_url.trim_end_matches('/'));
        let mut request = self.http.post(&url).json(body);
        if authorized {
            if let Some(token) = self.credentials.bearer_token() {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await.map_err(|err| {
            error!(error = %err, %url, "request never reached the bizcard api");
            ApiError::Transport(err)
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<RejectionBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        warn!(status = status.as_u16(), %url, "bizcard api rejected the request");
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl CardGateway for ApiClient {
    async fn create_card(&self, card: &CardDraft) -> Result<(), ApiError> {
        self.post_json("cards", card, true).await
    }
}

#[async_trait]
impl UserGateway for ApiClient {
    async fn create_user(&self, user: &SignupPayload) -> Result<(), ApiError> {
        self.post_json("users", user, false).await
    }
}
