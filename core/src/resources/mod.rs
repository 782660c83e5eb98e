//! Resource call groups.
//!
//! Each group borrows the client and maps its operations onto endpoint
//! paths, query strings and JSON bodies. All of them delegate to
//! `ApiClient::request`, so every call returns an `ApiResponse`.

pub mod appointments;
pub mod auth;
pub mod clinical_findings;
pub mod diagnoses;
pub mod doctors;
pub mod patients;
pub mod treatment_plans;
pub mod visits;

use url::Url;

use crate::client::ApiClient;
use crate::types::ResourceId;

pub use appointments::{AppointmentApi, AppointmentFilter};
pub use auth::AuthApi;
pub use clinical_findings::ClinicalFindingApi;
pub use diagnoses::DiagnosisApi;
pub use doctors::{DoctorApi, DoctorFilter};
pub use lab_tests::{LabOrderFilter, LabTestApi};
pub use patients::{PatientApi, PatientFilter};
pub use treatment_plans::TreatmentPlanApi;
pub use visits::{VisitApi, VisitFilter};

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn patients(&self) -> PatientApi<'_> {
        PatientApi::new(self)
    }

    pub fn doctors(&self) -> DoctorApi<'_> {
        DoctorApi::new(self)
    }

    pub fn appointments(&self) -> AppointmentApi<'_> {
        AppointmentApi::new(self)
    }

    pub fn visits(&self) -> VisitApi<'_> {
        VisitApi::new(self)
    }

    pub fn diagnoses(&self) -> DiagnosisApi<'_> {
        DiagnosisApi::new(self)
    }

    pub fn clinical_findings(&self) -> ClinicalFindingApi<'_> {
        ClinicalFindingApi::new(self)
    }

    pub fn treatment_plans(&self) -> TreatmentPlanApi<'_> {
        TreatmentPlanApi::new(self)
    }

    pub fn lab_tests(&self) -> LabTestApi<'_> {
        LabTestApi::new(self)
    }
}

fn item_path(base: &str, id: impl Into<ResourceId>) -> String {
    match id.into() {
        ResourceId::Int(id) => format!("{base}/{id}"),
        ResourceId::Text(id) => format!("{base}/{}", path_segment(&id)),
    }
}

/// Percent-encode `raw` so it stays a single path segment.
fn path_segment(raw: &str) -> String {
    // `url` drops dot segments instead of encoding them.
    if raw == "." || raw == ".." {
        return raw.replace('.', "%2E");
    }
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return raw.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(raw);
    }
    url.path().trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_are_appended_verbatim() {
        assert_eq!(item_path("/api/patients", 42), "/api/patients/42");
    }

    #[test]
    fn text_ids_stay_one_segment() {
        assert_eq!(item_path("/api/patients", "p-17"), "/api/patients/p-17");
        assert_eq!(
            item_path("/api/patients", "7/visits?x=1"),
            "/api/patients/7%2Fvisits%3Fx=1"
        );
        assert_eq!(item_path("/api/patients", "a b#c"), "/api/patients/a%20b%23c");
        assert_eq!(item_path("/api/patients", ".."), "/api/patients/%2E%2E");
    }
}
