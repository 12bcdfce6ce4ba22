use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::{json, Value};
use tracing::Instrument;

use crate::config::{ApiConfig, Credential};
use crate::session::{Session, UserIdentity};

use super::error::ApiError;
use super::resource::Resource;
use super::types::{lookup, EntityPayload, ListPage, ListQuery, StatsRange};

/// Header carrying the per-call correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The one pre-configured client every screen talks through.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds as u64))
            .timeout(Duration::from_secs(config.timeout_seconds as u64))
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET <list path>?keyword=&resultPerPage=&currentPage=&<filters>`
    pub async fn list(
        &self,
        credential: &Credential,
        resource: Resource,
        query: &ListQuery,
    ) -> Result<ListPage, ApiError> {
        let mut url = self.url(resource.list_path())?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());
        let builder = self.request(Method::GET, url, Some(credential));
        let body = self.send(builder, "list", resource.list_path()).await?;
        ListPage::from_envelope(resource, &body)
    }

    pub async fn get(
        &self,
        credential: &Credential,
        resource: Resource,
        id: &str,
    ) -> Result<EntityPayload, ApiError> {
        let path = resource.get_path(checked_id(id)?);
        let builder = self.request(Method::GET, self.url(&path)?, Some(credential));
        let body = self.send(builder, "get", &path).await?;
        EntityPayload::from_envelope(resource, body)
    }

    /// Send the full field set of an entity as one PUT.
    pub async fn update(
        &self,
        credential: &Credential,
        resource: Resource,
        id: &str,
        fields: &Value,
    ) -> Result<Value, ApiError> {
        let path = resource.update_path(checked_id(id)?).ok_or_else(|| {
            ApiError::InvalidRequest(format!("{} cannot be edited", resource.plural()))
        })?;
        let builder = self
            .request(Method::PUT, self.url(&path)?, Some(credential))
            .json(fields);
        self.send(builder, "update", &path).await
    }

    pub async fn delete(
        &self,
        credential: &Credential,
        resource: Resource,
        id: &str,
    ) -> Result<(), ApiError> {
        let path = resource.delete_path(checked_id(id)?).ok_or_else(|| {
            ApiError::InvalidRequest(format!("{} cannot be deleted", resource.plural()))
        })?;
        let builder = self.request(Method::DELETE, self.url(&path)?, Some(credential));
        self.send(builder, "delete", &path).await.map(|_| ())
    }

    /// Unlock a locked user account. Returns the server's message.
    pub async fn unlock_user(&self, credential: &Credential, id: &str) -> Result<String, ApiError> {
        let path = format!("/api/admin/unlock-user/{}", checked_id(id)?);
        let builder = self
            .request(Method::PUT, self.url(&path)?, Some(credential))
            .json(&json!({}));
        let body = self.send(builder, "unlock", &path).await?;
        Ok(body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("User unlocked successfully")
            .to_string())
    }

    /// Refund the paid amount of an auction to its seller/winner.
    pub async fn refund_payment(
        &self,
        credential: &Credential,
        auction_id: &str,
    ) -> Result<Value, ApiError> {
        let path = "/api/admin/refund-payment";
        let builder = self
            .request(Method::POST, self.url(path)?, Some(credential))
            .json(&json!({ "auctionId": checked_id(auction_id)? }));
        self.send(builder, "refund", path).await
    }

    pub async fn statistics(
        &self,
        credential: &Credential,
        range: StatsRange,
    ) -> Result<Value, ApiError> {
        let path = format!("/api/admin/statistics/{}", range.as_str());
        let builder = self.request(Method::GET, self.url(&path)?, Some(credential));
        self.send(builder, "statistics", &path).await
    }

    /// Intermediaries listed under the dashboard statistics.
    pub async fn intermediaries(&self, credential: &Credential) -> Result<Vec<Value>, ApiError> {
        let path = "/api/admin/intermediariesInfo";
        let builder = self.request(Method::GET, self.url(path)?, Some(credential));
        let body = self.send(builder, "intermediaries", path).await?;
        Ok(array_at(&body, "intermediaries"))
    }

    /// Clients brought in by one intermediary.
    pub async fn intermediary_clients(
        &self,
        credential: &Credential,
        intermediary_id: &str,
    ) -> Result<Vec<Value>, ApiError> {
        let path = format!("/api/admin/get-intermediary/{}", checked_id(intermediary_id)?);
        let builder = self.request(Method::GET, self.url(&path)?, Some(credential));
        let body = self.send(builder, "intermediary", &path).await?;
        Ok(array_at(&body, "intermediaryClients.user"))
    }

    /// Quotes raised by or on behalf of one user.
    pub async fn client_quotes(
        &self,
        credential: &Credential,
        user_id: &str,
    ) -> Result<Vec<Value>, ApiError> {
        let path = format!("/api/admin/get-clientQuotes/{}", checked_id(user_id)?);
        let builder = self.request(Method::GET, self.url(&path)?, Some(credential));
        let body = self.send(builder, "client_quotes", &path).await?;
        Ok(array_at(&body, "quote"))
    }

    pub async fn my_profile(&self, credential: &Credential) -> Result<EntityPayload, ApiError> {
        let path = "/api/user/myprofile";
        let builder = self.request(Method::GET, self.url(path)?, Some(credential));
        let body = self.send(builder, "profile", path).await?;
        EntityPayload::from_keyed("user", body)
    }

    /// Sign in. The only unauthenticated call.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::InvalidRequest(
                "email and password are required".to_string(),
            ));
        }
        let path = "/api/admin/login";
        let builder = self
            .request(Method::POST, self.url(path)?, None)
            .json(&json!({ "email": email.trim(), "password": password }));
        let body = self.send(builder, "login", path).await?;

        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::Decode {
                message: "login response has no token".to_string(),
            })?;
        let user: UserIdentity = body
            .get("user")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| ApiError::Decode {
                message: format!("login response has a malformed user: {}", e),
            })?
            .ok_or_else(|| ApiError::Decode {
                message: "login response has no user".to_string(),
            })?;

        Ok(Session::new(token, user))
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::InvalidRequest(format!("bad url for '{}': {}", path, e)))
    }

    fn request(&self, method: Method, url: Url, credential: Option<&Credential>) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match credential {
            Some(credential) => builder.header("Authorization", credential.header_value()),
            None => builder,
        }
    }

    /// Send, then normalize every outcome into `Ok(json) | Err(ApiError)`.
    async fn send(
        &self,
        builder: RequestBuilder,
        operation: &'static str,
        path: &str,
    ) -> Result<Value, ApiError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("api", %request_id, operation, path);

        async move {
            let response = builder
                .header(REQUEST_ID_HEADER, &request_id)
                .send()
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "request failed before a response");
                    ApiError::from_transport(e)
                })?;

            let status = response.status();
            let bytes = response.bytes().await.map_err(ApiError::from_transport)?;

            if !status.is_success() {
                let err = ApiError::from_status(status.as_u16(), &bytes);
                tracing::warn!(status = status.as_u16(), message = %err.user_message(), "request rejected");
                return Err(err);
            }

            tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "request completed");

            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
                message: e.to_string(),
            })
        }
        .instrument(span)
        .await
    }
}

/// The array at `path`, empty when the server left it out.
fn array_at(body: &Value, path: &str) -> Vec<Value> {
    lookup(body, path)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Reject ids that would escape their path segment.
fn checked_id(id: &str) -> Result<&str, ApiError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) || id.chars().any(char::is_whitespace) {
        return Err(ApiError::InvalidRequest(format!("invalid id '{}'", id)));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:4000/".to_string(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000");
    }

    #[test]
    fn ids_must_stay_in_their_segment() {
        assert!(checked_id("abc123").is_ok());
        assert!(checked_id("").is_err());
        assert!(checked_id("a/b").is_err());
        assert!(checked_id("a b").is_err());
    }

    #[tokio::test]
    async fn update_of_read_only_resource_is_rejected_locally() {
        let client = ApiClient::new(&ApiConfig::default()).unwrap();
        let err = client
            .update(&Credential::new("t"), Resource::Bid, "b1", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_request");
    }
}
