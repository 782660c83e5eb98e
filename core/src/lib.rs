//! Synchronous API client core for the hospital-management backend.
//!
//! # Overview
//! Every call goes through one request primitive, `ApiClient::request`,
//! which composes the URL, attaches the JSON content type and the stored
//! bearer token, performs the round trip through a `Transport`, and folds
//! every outcome into an `ApiResponse<T>` envelope. Resource groups
//! (`client.patients()`, `client.appointments()`, ...) are thin wrappers
//! that build paths, query strings and bodies.
//!
//! # Design
//! - Requests and responses are plain data (`http`); only `Transport`
//!   touches the network, so the primitive is testable with a stub.
//! - Token and user snapshot live in an injected `KeyValueStore`.
//! - Failures are values tagged with an `ApiErrorKind`, never panics.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod query;
pub mod resources;
pub mod storage;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiClient, HealthReport, RequestOptions};
pub use config::ClientConfig;
pub use envelope::{ApiResponse, Pagination};
pub use error::{ApiError, ApiErrorKind, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resources::{
    AppointmentFilter, DoctorFilter, LabOrderFilter, PatientFilter, VisitFilter,
};
pub use storage::{DetachedStore, FileStore, KeyValueStore, MemoryStore, SessionStore, StoredUser};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Appointment, AppointmentStatus, ClinicalFinding, Diagnosis, Doctor, LabOrder, LabOrderStatus,
    LabResult, LabTest, LoginData, NewUser, Patient, ResourceId, Role, TreatmentPlan, User, Visit,
    VisitStatus,
};
