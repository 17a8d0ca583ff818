use crate::common::API_KEY_HEADER;
use async_trait::async_trait;
use reqwest::{header::HeaderValue, Request, Response};
use reqwest_middleware::{Middleware, Next};
use secrecy::{ExposeSecret, SecretString};
use task_local_extensions::Extensions;

/// Reqwest middleware to inject the service key into outgoing HTTP requests.
///
/// The hosted database expects the key twice: as the `apikey` header, which selects the project,
/// and as a bearer token, which selects the database role.
pub struct ApiKeyMiddleware {
    pub(crate) service_key: SecretString,
}

#[async_trait]
impl Middleware for ApiKeyMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let key = self.service_key.expose_secret();

        let mut api_key = HeaderValue::from_str(key)
            .map_err(|e| reqwest_middleware::Error::Middleware(e.into()))?;
        api_key.set_sensitive(true);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key))
            .map_err(|e| reqwest_middleware::Error::Middleware(e.into()))?;
        bearer.set_sensitive(true);

        req.headers_mut().insert(API_KEY_HEADER, api_key);
        req.headers_mut().insert("Authorization", bearer);

        next.run(req, extensions).await
    }
}
