//! Treatment plans recorded against a visit, under `/api/treatment-plans`.

use serde::Serialize;
use serde_json::Value;

use super::item_path;
use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::http::HttpMethod;
use crate::query::Query;
use crate::types::{TreatmentPlan, ResourceId};

const BASE: &str = "/api/treatment-plans";

/// `/api/treatment-plans`: treatment plans attached to a visit.
#[derive(Debug, Clone, Copy)]
pub struct TreatmentPlanApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TreatmentPlanApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn get_by_visit(&self, visit_id: impl Into<ResourceId>) -> ApiResponse<Vec<TreatmentPlan>> {
        let visit_id: ResourceId = visit_id.into();
        let mut query = Query::new();
        query.push("visit_id", visit_id);
        self.client.get(&query.endpoint(BASE))
    }

    pub fn get_by_id(&self, id: impl Into<ResourceId>) -> ApiResponse<TreatmentPlan> {
        self.client.get(&item_path(BASE, id))
    }

    pub fn create<B: Serialize + ?Sized>(&self, record: &B) -> ApiResponse<TreatmentPlan> {
        self.client.send_json(HttpMethod::Post, BASE, record)
    }

    pub fn update<B: Serialize + ?Sized>(
        &self,
        id: impl Into<ResourceId>,
        record: &B,
    ) -> ApiResponse<TreatmentPlan> {
        self.client
            .send_json(HttpMethod::Put, &item_path(BASE, id), record)
    }

    pub fn delete(&self, id: impl Into<ResourceId>) -> ApiResponse<Value> {
        self.client.delete(&item_path(BASE, id))
    }
}
