use crate::domain::model::{ApiResponse, LayerId};
use crate::domain::ports::{ConfigProvider, GeoServerApi};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// reqwest client for the GeoServer WMS and REST endpoints.
#[derive(Debug, Clone)]
pub struct GeoServerClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    workspace: String,
}

impl GeoServerClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            base_url: config.endpoint().trim_end_matches('/').to_string(),
            username: config.username().to_string(),
            password: config.password().to_string(),
            workspace: config.workspace().to_string(),
        })
    }

    pub fn capabilities_url(&self) -> String {
        format!(
            "{}/geoserver/wms?request=GetCapabilities&service=wms&version=1.1.1",
            self.base_url
        )
    }

    pub fn layer_url(&self, layer: &LayerId) -> String {
        format!("{}/geoserver/rest/layers/{}", self.base_url, layer)
    }

    pub fn layer_group_url(&self, group: &LayerId) -> String {
        format!(
            "{}/geoserver/rest/workspaces/{}/layergroups/{}.json",
            self.base_url, self.workspace, group
        )
    }

    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl GeoServerApi for GeoServerClient {
    async fn get_capabilities(&self) -> Result<ApiResponse> {
        let url = self.capabilities_url();
        tracing::debug!("GET {}", url);
        // capabilities 不需要認證
        self.send(self.client.get(&url)).await
    }

    async fn delete_layer(&self, layer: &LayerId) -> Result<ApiResponse> {
        let url = self.layer_url(layer);
        tracing::debug!("DELETE {}", url);
        self.send(self.authenticated(self.client.delete(&url))).await
    }

    async fn delete_layer_group(&self, group: &LayerId) -> Result<ApiResponse> {
        let url = self.layer_group_url(group);
        tracing::debug!("DELETE {}", url);
        self.send(self.authenticated(self.client.delete(&url))).await
    }

    async fn get_layer(&self, layer: &LayerId) -> Result<ApiResponse> {
        let url = format!("{}.json", self.layer_url(layer));
        tracing::debug!("GET {}", url);
        self.send(self.authenticated(self.client.get(&url))).await
    }
}
