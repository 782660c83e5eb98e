//! Diagnoses recorded against a visit, under `/api/diagnoses`.

use serde::Serialize;
use serde_json::Value;

use super::item_path;
use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::http::HttpMethod;
use crate::query::Query;
use crate::types::{Diagnosis, ResourceId};

const BASE: &str = "/api/diagnoses";

/// `/api/diagnoses`: diagnoses recorded during a visit.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosisApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DiagnosisApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn get_by_visit(&self, visit_id: impl Into<ResourceId>) -> ApiResponse<Vec<Diagnosis>> {
        let visit_id: ResourceId = visit_id.into();
        let mut query = Query::new();
        query.push("visit_id", visit_id);
        self.client.get(&query.endpoint(BASE))
    }

    pub fn get_by_id(&self, id: impl Into<ResourceId>) -> ApiResponse<Diagnosis> {
        self.client.get(&item_path(BASE, id))
    }

    pub fn create<B: Serialize + ?Sized>(&self, record: &B) -> ApiResponse<Diagnosis> {
        self.client.send_json(HttpMethod::Post, BASE, record)
    }

    pub fn update<B: Serialize + ?Sized>(
        &self,
        id: impl Into<ResourceId>,
        record: &B,
    ) -> ApiResponse<Diagnosis> {
        self.client
            .send_json(HttpMethod::Put, &item_path(BASE, id), record)
    }

    pub fn delete(&self, id: impl Into<ResourceId>) -> ApiResponse<Value> {
        self.client.delete(&item_path(BASE, id))
    }
}
