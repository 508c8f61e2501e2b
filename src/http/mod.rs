pub mod auth;
pub mod client;
pub mod request;
pub mod response;
pub mod types;

// Re-export commonly used types for convenient access
pub use auth::{AuthType, Credentials, OAuthConfig, apply_auth};
pub use client::{Client, PreparedRequest, REQUEST_TIMEOUT, execute};
pub use request::ApiRequest;
pub use response::Response;
pub use types::{BodyType, HttpMethod, KeyValuePair, Status};
