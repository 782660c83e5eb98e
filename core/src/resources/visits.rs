//! Clinical visit calls under `/api/visits`.
//!
//! # Design
//! `complete` is a bodiless `PATCH`; the backend owns the transition.

use serde::Serialize;
use serde_json::Value;

use super::item_path;
use crate::client::{ApiClient, RequestOptions};
use crate::envelope::ApiResponse;
use crate::http::HttpMethod;
use crate::query::{Query, QueryFilter};
use crate::types::{ResourceId, Visit, VisitStatus};

const BASE: &str = "/api/visits";
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitFilter {
    pub status: Option<VisitStatus>,
    pub patient_id: Option<ResourceId>,
    pub doctor_id: Option<ResourceId>,
}

impl QueryFilter for VisitFilter {
    fn apply(&self, query: &mut Query) {
        query.push_opt("status", self.status.map(VisitStatus::as_str));
        query.push_opt("patient_id", self.patient_id.as_ref());
        query.push_opt("doctor_id", self.doctor_id.as_ref());
    }
}

/// `/api/visits`.
#[derive(Debug, Clone, Copy)]
pub struct VisitApi<'a> {
    client: &'a ApiClient,
}

impl<'a> VisitApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn get_all(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        filter: &VisitFilter,
    ) -> ApiResponse<Vec<Visit>> {
        let mut query = Query::paged(page, limit, DEFAULT_LIMIT);
        filter.apply(&mut query);
        self.client.get(&query.endpoint(BASE))
    }

    pub fn get_by_id(&self, id: impl Into<ResourceId>) -> ApiResponse<Visit> {
        self.client.get(&item_path(BASE, id))
    }

    pub fn create<B: Serialize + ?Sized>(&self, visit: &B) -> ApiResponse<Visit> {
        self.client.send_json(HttpMethod::Post, BASE, visit)
    }

    pub fn update<B: Serialize + ?Sized>(
        &self,
        id: impl Into<ResourceId>,
        visit: &B,
    ) -> ApiResponse<Visit> {
        self.client
            .send_json(HttpMethod::Put, &item_path(BASE, id), visit)
    }

    /// Close the visit.
    pub fn complete(&self, id: impl Into<ResourceId>) -> ApiResponse<Visit> {
        let path = format!("{}/complete", item_path(BASE, id));
        self.client
            .request(&path, RequestOptions::new(HttpMethod::Patch))
    }

    pub fn delete(&self, id: impl Into<ResourceId>) -> ApiResponse<Value> {
        self.client.delete(&item_path(BASE, id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::storage::SessionStore;
    use crate::testing::StubTransport;

    use super::*;

    #[test]
    fn visit_filters_and_complete() {
        let stub = Arc::new(StubTransport::new());
        let client = ApiClient::new(
            "http://localhost:5000",
            stub.clone(),
            SessionStore::in_memory(),
        );

        let filter = VisitFilter {
            status: Some(VisitStatus::InProgress),
            patient_id: Some(ResourceId::Int(8)),
            doctor_id: None,
        };
        client.visits().get_all(None, None, &filter);
        client.visits().complete(31);

        let sent = stub.requests();
        assert_eq!(
            sent[0].url,
            "http://localhost:5000/api/visits?page=1&limit=10&status=IN_PROGRESS&patient_id=8"
        );
        assert_eq!(sent[1].method, HttpMethod::Patch);
        assert_eq!(sent[1].url, "http://localhost:5000/api/visits/31/complete");
        assert!(sent[1].body.is_none());
    }
}
