//! Doctor directory calls under `/api/doctors`.
//!
//! # Design
//! Same paged-list shape as patients. A doctor's schedule is reachable
//! through the nested `/{id}/appointments` listing.

use serde::Serialize;
use serde_json::Value;

use super::item_path;
use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::http::HttpMethod;
use crate::query::{Query, QueryFilter};
use crate::types::{Appointment, Doctor, ResourceId};

const BASE: &str = "/api/doctors";
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorFilter {
    pub specialization: Option<String>,
    pub department: Option<String>,
    pub search: Option<String>,
}

impl QueryFilter for DoctorFilter {
    fn apply(&self, query: &mut Query) {
        query.push_opt("specialization", self.specialization.as_deref());
        query.push_opt("department", self.department.as_deref());
        query.push_opt("search", self.search.as_deref());
    }
}

/// `/api/doctors`.
#[derive(Debug, Clone, Copy)]
pub struct DoctorApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DoctorApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn get_all(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        filter: &DoctorFilter,
    ) -> ApiResponse<Vec<Doctor>> {
        let mut query = Query::paged(page, limit, DEFAULT_LIMIT);
        filter.apply(&mut query);
        self.client.get(&query.endpoint(BASE))
    }

    pub fn get_by_id(&self, id: impl Into<ResourceId>) -> ApiResponse<Doctor> {
        self.client.get(&item_path(BASE, id))
    }

    pub fn create<B: Serialize + ?Sized>(&self, doctor: &B) -> ApiResponse<Doctor> {
        self.client.send_json(HttpMethod::Post, BASE, doctor)
    }

    pub fn update<B: Serialize + ?Sized>(
        &self,
        id: impl Into<ResourceId>,
        doctor: &B,
    ) -> ApiResponse<Doctor> {
        self.client
            .send_json(HttpMethod::Put, &item_path(BASE, id), doctor)
    }

    pub fn delete(&self, id: impl Into<ResourceId>) -> ApiResponse<Value> {
        self.client.delete(&item_path(BASE, id))
    }

    pub fn get_appointments(
        &self,
        id: impl Into<ResourceId>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> ApiResponse<Vec<Appointment>> {
        let query = Query::paged(page, limit, DEFAULT_LIMIT);
        let path = format!("{}/appointments", item_path(BASE, id));
        self.client.get(&query.endpoint(&path))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::storage::SessionStore;
    use crate::testing::StubTransport;

    use super::*;

    fn client_with(stub: &Arc<StubTransport>) -> ApiClient {
        ApiClient::new("http://localhost:5000", stub.clone(), SessionStore::in_memory())
    }

    #[test]
    fn filter_fields_keep_declaration_order() {
        let stub = Arc::new(StubTransport::new());
        let filter = DoctorFilter {
            specialization: Some("Cardiology".to_string()),
            department: None,
            search: Some("lee".to_string()),
        };
        client_with(&stub).doctors().get_all(None, Some(5), &filter);
        assert_eq!(
            stub.last_request().url,
            "http://localhost:5000/api/doctors?page=1&limit=5&specialization=Cardiology&search=lee"
        );
    }

    #[test]
    fn doctor_appointments_are_paged() {
        let stub = Arc::new(StubTransport::new());
        client_with(&stub).doctors().get_appointments(3, Some(2), None);
        assert_eq!(
            stub.last_request().url,
            "http://localhost:5000/api/doctors/3/appointments?page=2&limit=10"
        );
    }

    #[test]
    fn doctor_payload_decodes_typed_fields() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(
            200,
            serde_json::json!({
                "success": true,
                "data": {
                    "id": 3,
                    "specialization": "Cardiology",
                    "consultation_fee": 75.5,
                    "rating": 4.8
                }
            }),
        );
        let doctor = client_with(&stub).doctors().get_by_id(3).data.unwrap();
        assert_eq!(doctor.specialization.as_deref(), Some("Cardiology"));
        assert_eq!(doctor.consultation_fee, Some(75.5));
        assert_eq!(doctor.extra["rating"], 4.8);
    }
}
