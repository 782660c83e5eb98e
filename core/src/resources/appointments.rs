//! Appointment scheduling calls under `/api/appointments`.
//!
//! # Design
//! Status transitions use dedicated `PATCH` endpoints rather than a full
//! update, so `update_status` and `cancel` send only the fields they change.

use serde::Serialize;
use serde_json::Value;

use super::item_path;
use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::http::HttpMethod;
use crate::query::{Query, QueryFilter};
use crate::types::{Appointment, AppointmentStatus, ResourceId};

const BASE: &str = "/api/appointments";
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub doctor_id: Option<ResourceId>,
    pub patient_id: Option<ResourceId>,
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
}

impl QueryFilter for AppointmentFilter {
    fn apply(&self, query: &mut Query) {
        query.push_opt("status", self.status.map(AppointmentStatus::as_str));
        query.push_opt("doctor_id", self.doctor_id.as_ref());
        query.push_opt("patient_id", self.patient_id.as_ref());
        query.push_opt("date", self.date.as_deref());
    }
}

#[derive(Serialize)]
struct StatusChange {
    status: AppointmentStatus,
}

#[derive(Serialize)]
struct Cancellation<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// `/api/appointments`.
#[derive(Debug, Clone, Copy)]
pub struct AppointmentApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AppointmentApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn get_all(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        filter: &AppointmentFilter,
    ) -> ApiResponse<Vec<Appointment>> {
        let mut query = Query::paged(page, limit, DEFAULT_LIMIT);
        filter.apply(&mut query);
        self.client.get(&query.endpoint(BASE))
    }

    pub fn get_by_id(&self, id: impl Into<ResourceId>) -> ApiResponse<Appointment> {
        self.client.get(&item_path(BASE, id))
    }

    pub fn create<B: Serialize + ?Sized>(&self, appointment: &B) -> ApiResponse<Appointment> {
        self.client.send_json(HttpMethod::Post, BASE, appointment)
    }

    pub fn update<B: Serialize + ?Sized>(
        &self,
        id: impl Into<ResourceId>,
        appointment: &B,
    ) -> ApiResponse<Appointment> {
        self.client
            .send_json(HttpMethod::Put, &item_path(BASE, id), appointment)
    }

    pub fn update_status(
        &self,
        id: impl Into<ResourceId>,
        status: AppointmentStatus,
    ) -> ApiResponse<Appointment> {
        let path = format!("{}/status", item_path(BASE, id));
        self.client
            .send_json(HttpMethod::Patch, &path, &StatusChange { status })
    }

    pub fn cancel(
        &self,
        id: impl Into<ResourceId>,
        reason: Option<&str>,
    ) -> ApiResponse<Appointment> {
        let path = format!("{}/cancel", item_path(BASE, id));
        self.client
            .send_json(HttpMethod::Patch, &path, &Cancellation { reason })
    }

    pub fn delete(&self, id: impl Into<ResourceId>) -> ApiResponse<Value> {
        self.client.delete(&item_path(BASE, id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::storage::SessionStore;
    use crate::testing::StubTransport;

    use super::*;

    fn client_with(stub: &Arc<StubTransport>) -> ApiClient {
        ApiClient::new("http://localhost:5000", stub.clone(), SessionStore::in_memory())
    }

    fn query_of(url: &str) -> Vec<(String, String)> {
        let query = url.split_once('?').map(|(_, q)| q).unwrap_or_default();
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    #[test]
    fn only_present_filters_are_sent() {
        let stub = Arc::new(StubTransport::new());
        let filter = AppointmentFilter {
            status: Some(AppointmentStatus::Scheduled),
            ..AppointmentFilter::default()
        };
        client_with(&stub).appointments().get_all(None, None, &filter);

        let pairs = query_of(&stub.last_request().url);
        let filters: Vec<_> = pairs
            .iter()
            .filter(|(k, _)| k != "page" && k != "limit")
            .cloned()
            .collect();
        assert_eq!(filters, vec![("status".to_string(), "SCHEDULED".to_string())]);
    }

    #[test]
    fn all_filters_are_encoded() {
        let stub = Arc::new(StubTransport::new());
        let filter = AppointmentFilter {
            status: Some(AppointmentStatus::NoShow),
            doctor_id: Some(ResourceId::Int(4)),
            patient_id: Some(ResourceId::from("p-9")),
            date: Some("2024-05-01".to_string()),
        };
        client_with(&stub).appointments().get_all(Some(3), Some(20), &filter);
        assert_eq!(
            stub.last_request().url,
            "http://localhost:5000/api/appointments?page=3&limit=20&status=NO_SHOW&doctor_id=4&patient_id=p-9&date=2024-05-01"
        );
    }

    #[test]
    fn update_status_patches_status_body() {
        let stub = Arc::new(StubTransport::new());
        client_with(&stub)
            .appointments()
            .update_status(12, AppointmentStatus::Confirmed);
        let req = stub.last_request();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, "http://localhost:5000/api/appointments/12/status");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "status": "CONFIRMED" }));
    }

    #[test]
    fn cancel_omits_missing_reason() {
        let stub = Arc::new(StubTransport::new());
        let client = client_with(&stub);
        client.appointments().cancel(12, None);
        client.appointments().cancel(12, Some("Patient request"));

        let sent = stub.requests();
        assert_eq!(sent[0].body.as_deref(), Some("{}"));
        let body: Value = serde_json::from_str(sent[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "reason": "Patient request" }));
        assert_eq!(sent[1].url, "http://localhost:5000/api/appointments/12/cancel");
    }
}
