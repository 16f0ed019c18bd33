//! [`DataStore`] implementation backed by the configurator REST API.

use crate::{
    envelope::ApiResponse,
    error::{ClientError, Result},
    requests::{CategoryBody, DeactivateBody, OptionBody, QuoteBody},
};
use async_trait::async_trait;
use configurator_catalog::{Category, ConfigOption, ConfiguratorSnapshot};
use configurator_core::{ApiConfig, CategoryId, ConfiguratorId, EditToken, OptionId};
use configurator_engine::{DataStore, QuoteReceipt, QuoteRequest, StoreError, StoreResult};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Data store talking to the configurator API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDataStore {
    client: Client,
    base_url: String,
}

impl HttpDataStore {
    /// Create a store for `base_url` with a request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a store from the `[api]` configuration section.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.timeout_secs)
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Send a request and decode the envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<ApiResponse<T>> {
        debug!(endpoint, "sending API request");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(endpoint, status = status.as_u16(), "API request failed");
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(|e| ClientError::ParseError {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn post_unit(&self, endpoint: &str, body: &impl serde::Serialize) -> StoreResult<()> {
        let request = self.client.post(self.url(endpoint)).json(body);
        self.send::<serde_json::Value>(request, endpoint)
            .await?
            .into_unit(endpoint)
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl DataStore for HttpDataStore {
    async fn fetch_configurator(
        &self,
        public_id: &ConfiguratorId,
    ) -> StoreResult<ConfiguratorSnapshot> {
        let endpoint = format!("/api/configurator/{public_id}");
        let request = self.client.get(self.url(&endpoint));

        let result = match self.send(request, &endpoint).await {
            Ok(response) => response.into_data(&endpoint),
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            if e.is_not_found() {
                StoreError::NotFound {
                    resource: "configurator",
                    id: public_id.to_string(),
                }
            } else {
                e.into()
            }
        })
    }

    async fn create_category(
        &self,
        token: &EditToken,
        configurator_id: &ConfiguratorId,
        category: &Category,
    ) -> StoreResult<Category> {
        let endpoint = "/api/category/create";
        let body = CategoryBody::create(token, configurator_id, category);
        let request = self.client.post(self.url(endpoint)).json(&body);

        let created: Category = self.send(request, endpoint).await?.into_data(endpoint)?;
        debug!(category_id = %created.id, "category created");
        Ok(created)
    }

    async fn update_category(&self, token: &EditToken, category: &Category) -> StoreResult<()> {
        self.post_unit("/api/category/update", &CategoryBody::update(token, category))
            .await
    }

    async fn delete_category(
        &self,
        token: &EditToken,
        category_id: &CategoryId,
    ) -> StoreResult<()> {
        self.post_unit(
            "/api/category/delete",
            &DeactivateBody::new(category_id.as_str(), token),
        )
        .await
    }

    async fn create_option(
        &self,
        token: &EditToken,
        category_id: &CategoryId,
        option: &ConfigOption,
    ) -> StoreResult<ConfigOption> {
        let endpoint = "/api/option/create";
        let body = OptionBody::create(token, category_id, option);
        let request = self.client.post(self.url(endpoint)).json(&body);

        let created: ConfigOption = self.send(request, endpoint).await?.into_data(endpoint)?;
        debug!(option_id = %created.id, "option created");
        Ok(created)
    }

    async fn update_option(
        &self,
        token: &EditToken,
        _category_id: &CategoryId,
        option: &ConfigOption,
    ) -> StoreResult<()> {
        let endpoint = "/api/option/update";
        let request = self
            .client
            .put(self.url(endpoint))
            .json(&OptionBody::update(token, option));

        self.send::<serde_json::Value>(request, endpoint)
            .await?
            .into_unit(endpoint)
            .map_err(StoreError::from)
    }

    async fn delete_option(
        &self,
        token: &EditToken,
        _category_id: &CategoryId,
        option_id: &OptionId,
    ) -> StoreResult<()> {
        self.post_unit(
            "/api/option/update",
            &DeactivateBody::new(option_id.as_str(), token),
        )
        .await
    }

    async fn submit_quote(&self, request: &QuoteRequest) -> StoreResult<QuoteReceipt> {
        let endpoint = "/api/quote/create";
        let http_request = self
            .client
            .post(self.url(endpoint))
            .json(&QuoteBody::new(request));

        Ok(self.send(http_request, endpoint).await?.into_data(endpoint)?)
    }

    fn store_id(&self) -> &str {
        "http"
    }
}
