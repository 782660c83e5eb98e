//! Clinical findings recorded against a visit, under `/api/clinical-findings`.

use serde::Serialize;
use serde_json::Value;

use super::item_path;
use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::http::HttpMethod;
use crate::query::Query;
use crate::types::{ClinicalFinding, ResourceId};

const BASE: &str = "/api/clinical-findings";

/// `/api/clinical-findings`: vitals and examination findings of a visit.
#[derive(Debug, Clone, Copy)]
pub struct ClinicalFindingApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ClinicalFindingApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn get_by_visit(
        &self,
        visit_id: impl Into<ResourceId>,
    ) -> ApiResponse<Vec<ClinicalFinding>> {
        let visit_id: ResourceId = visit_id.into();
        let mut query = Query::new();
        query.push("visit_id", visit_id);
        self.client.get(&query.endpoint(BASE))
    }

    pub fn get_by_id(&self, id: impl Into<ResourceId>) -> ApiResponse<ClinicalFinding> {
        self.client.get(&item_path(BASE, id))
    }

    pub fn create<B: Serialize + ?Sized>(&self, record: &B) -> ApiResponse<ClinicalFinding> {
        self.client.send_json(HttpMethod::Post, BASE, record)
    }

    pub fn update<B: Serialize + ?Sized>(
        &self,
        id: impl Into<ResourceId>,
        record: &B,
    ) -> ApiResponse<ClinicalFinding> {
        self.client
            .send_json(HttpMethod::Put, &item_path(BASE, id), record)
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
    fn finding_paths() {
        let stub = Arc::new(StubTransport::new());
        let client = ApiClient::new(
            "http://localhost:5000",
            stub.clone(),
            SessionStore::in_memory(),
        );
        let findings = client.clinical_findings();

        findings.get_by_visit("v-1");
        findings.update(4, &serde_json::json!({ "value": "38.2", "unit": "C" }));
        findings.delete(4);

        let urls: Vec<_> = stub.requests().into_iter().map(|r| (r.method, r.url)).collect();
        assert_eq!(
            urls,
            vec![
                (
                    HttpMethod::Get,
                    "http://localhost:5000/api/clinical-findings?visit_id=v-1".to_string(),
                ),
                (HttpMethod::Put, "http://localhost:5000/api/clinical-findings/4".to_string()),
                (HttpMethod::Delete, "http://localhost:5000/api/clinical-findings/4".to_string()),
            ]
        );
    }
}
