//! Patient registry calls under `/api/patients`.
//!
//! # Design
//! Listing is paged with a default limit of 10; `PatientFilter` adds the
//! optional `search` and `gender` keys only when they carry a value.

use serde::Serialize;
use serde_json::Value;

use super::item_path;
use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::http::HttpMethod;
use crate::query::{Query, QueryFilter};
use crate::types::{Patient, ResourceId, Visit};

const BASE: &str = "/api/patients";
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFilter {
    /// Free-text match on name, email or phone.
    pub search: Option<String>,
    pub gender: Option<String>,
}

impl QueryFilter for PatientFilter {
    fn apply(&self, query: &mut Query) {
        query.push_opt("search", self.search.as_deref());
        query.push_opt("gender", self.gender.as_deref());
    }
}

/// `/api/patients`.
#[derive(Debug, Clone, Copy)]
pub struct PatientApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PatientApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn get_all(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        filter: &PatientFilter,
    ) -> ApiResponse<Vec<Patient>> {
        let mut query = Query::paged(page, limit, DEFAULT_LIMIT);
        filter.apply(&mut query);
        self.client.get(&query.endpoint(BASE))
    }

    pub fn get_by_id(&self, id: impl Into<ResourceId>) -> ApiResponse<Patient> {
        self.client.get(&item_path(BASE, id))
    }

    pub fn create<B: Serialize + ?Sized>(&self, patient: &B) -> ApiResponse<Patient> {
        self.client.send_json(HttpMethod::Post, BASE, patient)
    }

    pub fn update<B: Serialize + ?Sized>(
        &self,
        id: impl Into<ResourceId>,
        patient: &B,
    ) -> ApiResponse<Patient> {
        self.client
            .send_json(HttpMethod::Put, &item_path(BASE, id), patient)
    }

    pub fn delete(&self, id: impl Into<ResourceId>) -> ApiResponse<Value> {
        self.client.delete(&item_path(BASE, id))
    }

    /// Visit history of one patient.
    pub fn get_visits(&self, id: impl Into<ResourceId>) -> ApiResponse<Vec<Visit>> {
        self.client.get(&format!("{}/visits", item_path(BASE, id)))
    }
}
