mod client;
mod credentials;

pub use client::{ApiClient, ApiError, CardGateway, DEFAULT_BASE_URL, UserGateway};
pub use credentials::{CredentialProvider, TOKEN_KEY, TokenStore};
