use crate::domain::model::{ApiResponse, LayerId};
use crate::domain::ports::GeoServerApi;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

pub fn layer_id(id: &str) -> LayerId {
    id.parse().expect("test ids are UUID-shaped")
}

/// GeoServer 假物件：每個端點依序回傳預先排好的回應
#[derive(Default)]
pub struct ScriptedGeoServer {
    capabilities: Mutex<VecDeque<ApiResponse>>,
    layer_deletes: Mutex<VecDeque<ApiResponse>>,
    group_deletes: Mutex<VecDeque<ApiResponse>>,
    layer_lookups: Mutex<VecDeque<ApiResponse>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGeoServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Once exhausted, capabilities come back clean.
    pub fn with_capabilities(self, responses: Vec<ApiResponse>) -> Self {
        *self.capabilities.lock().unwrap() = responses.into();
        self
    }

    pub fn with_layer_deletes(self, responses: Vec<ApiResponse>) -> Self {
        *self.layer_deletes.lock().unwrap() = responses.into();
        self
    }

    pub fn with_group_deletes(self, responses: Vec<ApiResponse>) -> Self {
        *self.group_deletes.lock().unwrap() = responses.into();
        self
    }

    pub fn with_layer_lookups(self, responses: Vec<ApiResponse>) -> Self {
        *self.layer_lookups.lock().unwrap() = responses.into();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn layer_delete_count(&self) -> usize {
        self.count_calls("DELETE layer ")
    }

    pub fn group_delete_count(&self) -> usize {
        self.count_calls("DELETE group ")
    }

    fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn next(&self, queue: &Mutex<VecDeque<ApiResponse>>, call: String) -> ApiResponse {
        let response = queue.lock().unwrap().pop_front();
        let response = response.unwrap_or_else(|| panic!("unexpected call: {}", call));
        self.calls.lock().unwrap().push(call);
        response
    }
}

#[async_trait]
impl GeoServerApi for ScriptedGeoServer {
    async fn get_capabilities(&self) -> Result<ApiResponse> {
        self.calls.lock().unwrap().push("GET capabilities".to_string());
        let next = self.capabilities.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| ApiResponse::new(200, "<WMT_MS_Capabilities/>")))
    }

    async fn delete_layer(&self, layer: &LayerId) -> Result<ApiResponse> {
        Ok(self.next(&self.layer_deletes, format!("DELETE layer {}", layer)))
    }

    async fn delete_layer_group(&self, group: &LayerId) -> Result<ApiResponse> {
        Ok(self.next(&self.group_deletes, format!("DELETE group {}", group)))
    }

    async fn get_layer(&self, layer: &LayerId) -> Result<ApiResponse> {
        Ok(self.next(&self.layer_lookups, format!("GET layer {}", layer)))
    }
}
