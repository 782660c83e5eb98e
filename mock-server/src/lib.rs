//! In-memory stand-in for the hospital backend.
//!
//! Serves `/health`, the auth endpoints, patients and appointments with the
//! same `{success, data, error, pagination}` envelope as the real service.
//! Every other route falls through to axum's empty 404.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SEED_EMAIL: &str = "admin@hospital.test";
pub const SEED_PASSWORD: &str = "admin123";
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Default)]
pub struct Db {
    users: Vec<SeedUser>,
    sessions: HashMap<String, Value>,
    patients: BTreeMap<i64, Value>,
    appointments: BTreeMap<i64, Value>,
    next_id: i64,
}

#[derive(Debug, Clone)]
struct SeedUser {
    password: String,
    profile: Value,
}

impl Db {
    fn seeded() -> Self {
        Self {
            users: vec![SeedUser {
                password: SEED_PASSWORD.to_string(),
                profile: json!({
                    "id": 1,
                    "email": SEED_EMAIL,
                    "role": "ADMIN",
                    "is_active": true
                }),
            }],
            next_id: 1,
            ..Self::default()
        }
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

pub type SharedDb = Arc<RwLock<Db>>;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<String>,
}

pub fn app() -> Router {
    let db: SharedDb = Arc::new(RwLock::new(Db::seeded()));
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/profile", get(profile))
        .route("/api/patients", get(list_patients).post(create_patient))
        .route(
            "/api/patients/{id}",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route(
            "/api/appointments",
            get(list_appointments).post(create_appointment),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock backend listening");
    }
    axum::serve(listener, app()).await
}

fn success(status: StatusCode, data: Value) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn authorize(db: &SharedDb, headers: &HeaderMap) -> Result<Value, Response> {
    let token = bearer(headers)
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Access token required"))?;
    db.read()
        .await
        .sessions
        .get(token)
        .cloned()
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
}

/// Slice `records` into the requested page and wrap it in the envelope.
fn paginate(records: Vec<Value>, params: &ListParams) -> Response {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let total = records.len();
    let skip = (page as usize - 1).saturating_mul(limit as usize);
    let data: Vec<Value> = records.into_iter().skip(skip).take(limit as usize).collect();
    Json(json!({
        "success": true,
        "data": data,
        "pagination": { "total": total, "page": page, "limit": limit }
    }))
    .into_response()
}

fn field_contains(record: &Value, field: &str, needle: &str) -> bool {
    record[field]
        .as_str()
        .is_some_and(|value| value.to_lowercase().contains(needle))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn login(State(db): State<SharedDb>, Json(input): Json<LoginRequest>) -> Response {
    let mut db = db.write().await;
    let Some(user) = db
        .users
        .iter()
        .find(|u| u.profile["email"] == input.email.as_str() && u.password == input.password)
        .map(|u| u.profile.clone())
    else {
        tracing::info!(email = %input.email, "rejected login");
        return failure(StatusCode::UNAUTHORIZED, "Invalid email or password");
    };
    let token = Uuid::new_v4().to_string();
    db.sessions.insert(token.clone(), user.clone());
    success(StatusCode::OK, json!({ "token": token, "user": user }))
}

async fn logout(State(db): State<SharedDb>, headers: HeaderMap) -> Response {
    if let Some(token) = bearer(&headers) {
        db.write().await.sessions.remove(token);
    }
    (StatusCode::OK, Json(json!({ "success": true, "message": "Logged out" }))).into_response()
}

async fn profile(State(db): State<SharedDb>, headers: HeaderMap) -> Response {
    match authorize(&db, &headers).await {
        Ok(user) => success(StatusCode::OK, user),
        Err(rejection) => rejection,
    }
}

async fn list_patients(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    if let Err(rejection) = authorize(&db, &headers).await {
        return rejection;
    }
    let needle = params.search.as_deref().unwrap_or_default().to_lowercase();
    let records: Vec<Value> = db
        .read()
        .await
        .patients
        .values()
        .filter(|p| {
            needle.is_empty()
                || ["first_name", "last_name", "email", "phone"]
                    .iter()
                    .any(|field| field_contains(p, field, &needle))
        })
        .cloned()
        .collect();
    paginate(records, &params)
}

async fn create_patient(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&db, &headers).await {
        return rejection;
    }
    let Value::Object(mut fields) = input else {
        return failure(StatusCode::BAD_REQUEST, "Patient payload must be an object");
    };
    if fields.get("first_name").and_then(Value::as_str).map_or(true, str::is_empty) {
        return failure(StatusCode::BAD_REQUEST, "first_name is required");
    }
    let mut db = db.write().await;
    let id = db.allocate_id();
    fields.insert("id".to_string(), json!(id));
    let patient = Value::Object(fields);
    db.patients.insert(id, patient.clone());
    success(StatusCode::CREATED, patient)
}

async fn get_patient(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(rejection) = authorize(&db, &headers).await {
        return rejection;
    }
    match db.read().await.patients.get(&id) {
        Some(patient) => success(StatusCode::OK, patient.clone()),
        None => failure(StatusCode::NOT_FOUND, "Patient not found"),
    }
}

async fn update_patient(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<Map<String, Value>>,
) -> Response {
    if let Err(rejection) = authorize(&db, &headers).await {
        return rejection;
    }
    let mut db = db.write().await;
    let Some(Value::Object(patient)) = db.patients.get_mut(&id) else {
        return failure(StatusCode::NOT_FOUND, "Patient not found");
    };
    for (key, value) in input {
        if key != "id" {
            patient.insert(key, value);
        }
    }
    success(StatusCode::OK, Value::Object(patient.clone()))
}

async fn delete_patient(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(rejection) = authorize(&db, &headers).await {
        return rejection;
    }
    match db.write().await.patients.remove(&id) {
        Some(_) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Patient deleted" })),
        )
            .into_response(),
        None => failure(StatusCode::NOT_FOUND, "Patient not found"),
    }
}

async fn list_appointments(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    if let Err(rejection) = authorize(&db, &headers).await {
        return rejection;
    }
    let records: Vec<Value> = db
        .read()
        .await
        .appointments
        .values()
        .filter(|a| match params.status.as_deref() {
            Some(status) => a["status"] == status,
            None => true,
        })
        .cloned()
        .collect();
    paginate(records, &params)
}

async fn create_appointment(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<Map<String, Value>>,
) -> Response {
    if let Err(rejection) = authorize(&db, &headers).await {
        return rejection;
    }
    if !input.contains_key("patient_id") || !input.contains_key("doctor_id") {
        return failure(
            StatusCode::BAD_REQUEST,
            "patient_id and doctor_id are required",
        );
    }
    let mut fields = input;
    fields
        .entry("status")
        .or_insert_with(|| json!("SCHEDULED"));
    let mut db = db.write().await;
    let id = db.allocate_id();
    fields.insert("id".to_string(), json!(id));
    let appointment = Value::Object(fields);
    db.appointments.insert(id, appointment.clone());
    success(StatusCode::CREATED, appointment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_db_has_admin_user() {
        let db = Db::seeded();
        assert_eq!(db.users.len(), 1);
        assert_eq!(db.users[0].profile["email"], SEED_EMAIL);
        assert_eq!(db.users[0].profile["role"], "ADMIN");
    }

    #[test]
    fn ids_are_sequential() {
        let mut db = Db::seeded();
        assert_eq!(db.allocate_id(), 1);
        assert_eq!(db.allocate_id(), 2);
    }

    #[test]
    fn bearer_requires_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(bearer(&headers), Some("abc"));
    }

    #[test]
    fn list_params_are_all_optional() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert!(params.page.is_none());
        assert!(params.status.is_none());
    }

    #[test]
    fn search_is_case_insensitive() {
        let record = json!({ "first_name": "Ada" });
        assert!(field_contains(&record, "first_name", "ada"));
        assert!(!field_contains(&record, "last_name", "ada"));
    }
}
