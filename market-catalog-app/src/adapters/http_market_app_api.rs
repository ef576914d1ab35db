//! Catalog API over HTTP
//!
//! Talks to the console `/market-apps` resource:
//! - `GET    /market-apps?page&limit[&search][&mode]` list
//! - `POST   /market-apps` publish
//! - `PATCH  /market-apps/{id}` update
//! - `DELETE /market-apps/{id}` delete
//! - `POST   /market-apps/{id}` copy into the caller's workspace

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;

use market_catalog_core::config::CatalogConfig;
use market_catalog_core::error::{CoreError, CoreResult};
use market_catalog_core::traits::MarketAppApi;
use market_catalog_core::types::{
    AppMode, CloneOutcome, CreateMarketAppRequest, ListQuery, MarketApp, MarketAppPage,
    UpdateMarketAppRequest, RESULT_SUCCESS,
};

use super::http_client::HttpUtils;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// `{ "result": ... }` acknowledgement
#[derive(Debug, Deserialize)]
struct ResultEnvelope {
    result: String,
    #[serde(default)]
    message: Option<String>,
}

impl ResultEnvelope {
    fn into_result(self) -> CoreResult<()> {
        if self.result == RESULT_SUCCESS {
            Ok(())
        } else {
            Err(CoreError::api(self.message.unwrap_or(self.result)))
        }
    }
}

/// Create/update answer: the saved entity, or only an acknowledgement
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MutationResponse {
    App(MarketApp),
    Envelope(ResultEnvelope),
}

/// HTTP implementation of [`MarketAppApi`]
#[derive(Debug, Clone)]
pub struct HttpMarketAppApi {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpMarketAppApi {
    /// Client with the configured base URL and request timeout
    pub fn new(config: &CatalogConfig) -> CoreResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CoreError::ConfigError(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(client, &config.api_base_url))
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn collection_url(&self) -> String {
        format!("{}/market-apps", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/market-apps/{}", self.base_url, urlencoding::encode(id))
    }

    /// List URL with the query string in the documented parameter order
    #[must_use]
    pub fn list_url(&self, query: &ListQuery) -> String {
        let params: Vec<String> = query
            .to_query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(&v)))
            .collect();
        format!("{}?{}", self.collection_url(), params.join("&"))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.bearer_token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and return the body of a 2xx response
    async fn send(&self, builder: RequestBuilder, method: &str, url: &str) -> CoreResult<String> {
        let (status, body) = HttpUtils::execute_request(builder, method, url).await?;
        HttpUtils::ensure_success(status, &body)?;
        Ok(body)
    }
}

/// Entity from a create/update body; `fallback` builds it when only an
/// acknowledgement came back
fn parse_mutation(
    body: &str,
    context: &str,
    fallback: impl FnOnce() -> CoreResult<MarketApp>,
) -> CoreResult<MarketApp> {
    if body.trim().is_empty() {
        return fallback();
    }
    match HttpUtils::parse_json::<MutationResponse>(body, context)? {
        MutationResponse::App(app) => Ok(app),
        MutationResponse::Envelope(envelope) => {
            envelope.into_result()?;
            fallback()
        }
    }
}

/// Delete acknowledgement; an empty body counts as success
fn parse_ack(body: &str, context: &str) -> CoreResult<()> {
    if body.trim().is_empty() {
        return Ok(());
    }
    HttpUtils::parse_json::<ResultEnvelope>(body, context)?.into_result()
}

/// The published entry as sent; the server assigns ID and creator
fn echo_created(request: &CreateMarketAppRequest) -> MarketApp {
    MarketApp {
        id: String::new(),
        name: request.name.clone(),
        description: request.description.clone(),
        mode: request.mode,
        tags: request.tags.clone(),
        creator: String::new(),
        important: request.important,
        updated_at: Utc::now(),
    }
}

/// The updated entry as sent; the mode is read back from the derived first tag
fn echo_updated(id: &str, request: &UpdateMarketAppRequest) -> CoreResult<MarketApp> {
    let tags = request.tags.clone().unwrap_or_default();
    let mode: AppMode = tags
        .first()
        .map(|t| t.trim_start_matches('#'))
        .ok_or_else(|| {
            CoreError::SerializationError(format!("Update of {id} acknowledged without tags"))
        })?
        .parse()?;
    Ok(MarketApp {
        id: id.to_string(),
        name: request.name.clone().unwrap_or_default(),
        description: request.description.clone().unwrap_or_default(),
        mode,
        tags,
        creator: String::new(),
        important: request.important.unwrap_or_default(),
        updated_at: Utc::now(),
    })
}

#[async_trait]
impl MarketAppApi for HttpMarketAppApi {
    async fn list_apps(&self, query: &ListQuery) -> CoreResult<MarketAppPage> {
        let url = self.list_url(query);
        let body = self.send(self.request(Method::GET, &url), "GET", &url).await?;
        HttpUtils::parse_json(&body, "list market apps")
    }

    async fn create_app(&self, request: &CreateMarketAppRequest) -> CoreResult<MarketApp> {
        let url = self.collection_url();
        let builder = self.request(Method::POST, &url).json(request);
        let body = self.send(builder, "POST", &url).await?;
        parse_mutation(&body, "create market app", || Ok(echo_created(request)))
    }

    async fn update_app(
        &self,
        id: &str,
        request: &UpdateMarketAppRequest,
    ) -> CoreResult<MarketApp> {
        let url = self.item_url(id);
        let builder = self.request(Method::PATCH, &url).json(request);
        let body = self.send(builder, "PATCH", &url).await?;
        parse_mutation(&body, "update market app", || echo_updated(id, request))
    }

    async fn delete_app(&self, id: &str) -> CoreResult<()> {
        let url = self.item_url(id);
        let body = self
            .send(self.request(Method::DELETE, &url), "DELETE", &url)
            .await?;
        parse_ack(&body, "delete market app")
    }

    async fn clone_to_workspace(&self, id: &str) -> CoreResult<CloneOutcome> {
        let url = self.item_url(id);
        let body = self.send(self.request(Method::POST, &url), "POST", &url).await?;
        HttpUtils::parse_json(&body, "copy market app")
    }
}
