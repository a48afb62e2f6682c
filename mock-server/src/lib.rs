//! In-memory stand-in for the Notes REST service.
//!
//! Serves the six user and note operations under `/notes/api` with the same
//! form bodies, `x-auth-token` handling, JSON envelope and validation
//! messages as the hosted practice service, so the suites can run offline.
//! Checks run in the service's order: token, note id, field rules, then
//! conflicts and lookups.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{post, put},
    Form, Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Path prefix the hosted service lives under.
pub const API_PREFIX: &str = "/notes/api";

pub const CATEGORIES: [&str; 3] = ["Home", "Work", "Personal"];

const AUTH_HEADER: &str = "x-auth-token";

#[derive(Clone, Debug)]
struct User {
    id: String,
    name: String,
    email: String,
    password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
    pub user_id: String,
}

#[derive(Default)]
pub struct Store {
    users: HashMap<String, User>,
    tokens: HashMap<String, String>,
    notes: HashMap<String, Note>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordForm {
    #[serde(rename = "currentPassword", default)]
    pub current_password: String,
    #[serde(rename = "newPassword", default)]
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub completed: Option<String>,
}

/// Envelope response: `{ success, status, message, data? }`.
#[derive(Debug)]
pub struct Reply {
    status: StatusCode,
    message: &'static str,
    data: Option<Value>,
}

impl Reply {
    fn ok(status: StatusCode, message: &'static str, data: Value) -> Self {
        Self {
            status,
            message,
            data: Some(data),
        }
    }

    fn message(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            data: None,
        }
    }

    fn bad_request(message: &'static str) -> Self {
        Self::message(StatusCode::BAD_REQUEST, message)
    }

    fn note_not_found() -> Self {
        Self::message(
            StatusCode::NOT_FOUND,
            "No note was found with the provided ID, Maybe it was deleted",
        )
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": self.status.is_success(),
            "status": self.status.as_u16(),
            "message": self.message,
        });
        if let Some(data) = self.data {
            body["data"] = data;
        }
        (self.status, Json(body)).into_response()
    }
}

type ApiResult = Result<Reply, Reply>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/change-password", post(change_password))
        .route("/notes", post(create_note))
        .route("/notes/{id}", put(update_note).delete(delete_note))
        .with_state(db);
    Router::new()
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Ids look like the hosted service's: 24 lowercase hex characters.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

fn new_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(24);
    id
}

fn new_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn length_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

fn authenticate(store: &Store, headers: &HeaderMap) -> Result<User, Reply> {
    let token = headers
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            Reply::message(
                StatusCode::UNAUTHORIZED,
                "No authentication token specified in x-auth-token header",
            )
        })?;
    store
        .tokens
        .get(token)
        .and_then(|email| store.users.get(email))
        .cloned()
        .ok_or_else(|| {
            Reply::message(
                StatusCode::UNAUTHORIZED,
                "Access token is not valid or has expired, you will need to login",
            )
        })
}

fn check_note_id(id: &str) -> Result<(), Reply> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(Reply::bad_request("Note ID must be a valid ID"))
    }
}

fn check_note_fields(form: &NoteForm) -> Result<(), Reply> {
    if !length_between(&form.title, 4, 100) {
        return Err(Reply::bad_request(
            "Title must be between 4 and 100 characters",
        ));
    }
    if !length_between(&form.description, 4, 1000) {
        return Err(Reply::bad_request(
            "Description must be between 4 and 1000 characters",
        ));
    }
    if !CATEGORIES.contains(&form.category.as_str()) {
        return Err(Reply::bad_request(
            "Category must be one of the categories: Home, Work, Personal",
        ));
    }
    Ok(())
}

fn note_json(note: &Note) -> Value {
    serde_json::to_value(note).unwrap_or(Value::Null)
}

async fn register(State(db): State<Db>, Form(form): Form<RegisterForm>) -> ApiResult {
    if !length_between(&form.name, 4, 30) {
        return Err(Reply::bad_request(
            "User name must be between 4 and 30 characters",
        ));
    }
    if !is_valid_email(&form.email) {
        return Err(Reply::bad_request("A valid email address is required"));
    }
    if !length_between(&form.password, 6, 30) {
        return Err(Reply::bad_request(
            "Password must be between 6 and 30 characters",
        ));
    }

    let mut store = db.write().await;
    if store.users.contains_key(&form.email) {
        return Err(Reply::message(
            StatusCode::CONFLICT,
            "An account already exists with the same email address",
        ));
    }
    let user = User {
        id: new_id(),
        name: form.name,
        email: form.email,
        password: form.password,
    };
    let data = json!({ "id": user.id, "name": user.name, "email": user.email });
    store.users.insert(user.email.clone(), user);
    Ok(Reply::ok(
        StatusCode::CREATED,
        "User account created successfully",
        data,
    ))
}

async fn login(State(db): State<Db>, Form(form): Form<LoginForm>) -> ApiResult {
    if !is_valid_email(&form.email) {
        return Err(Reply::bad_request("A valid email address is required"));
    }
    if !length_between(&form.password, 6, 30) {
        return Err(Reply::bad_request(
            "Password must be between 6 and 30 characters",
        ));
    }

    let mut store = db.write().await;
    let user = store
        .users
        .get(&form.email)
        .filter(|user| user.password == form.password)
        .cloned()
        .ok_or_else(|| {
            Reply::message(
                StatusCode::UNAUTHORIZED,
                "Incorrect email address or password",
            )
        })?;
    let token = new_token();
    store.tokens.insert(token.clone(), user.email.clone());
    Ok(Reply::ok(
        StatusCode::OK,
        "Login successful",
        json!({ "id": user.id, "name": user.name, "email": user.email, "token": token }),
    ))
}

async fn change_password(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<ChangePasswordForm>,
) -> ApiResult {
    let mut store = db.write().await;
    let user = authenticate(&store, &headers)?;

    if !length_between(&form.current_password, 6, 30) {
        return Err(Reply::bad_request(
            "Current password must be between 6 and 30 characters",
        ));
    }
    if !length_between(&form.new_password, 6, 30) {
        return Err(Reply::bad_request(
            "New password must be between 6 and 30 characters",
        ));
    }
    if form.new_password == form.current_password {
        return Err(Reply::bad_request(
            "The new password should be different from the current password",
        ));
    }
    if form.current_password != user.password {
        return Err(Reply::bad_request("The current password is incorrect"));
    }

    if let Some(stored) = store.users.get_mut(&user.email) {
        stored.password = form.new_password;
    }
    Ok(Reply::message(
        StatusCode::OK,
        "The password was successfully updated",
    ))
}

async fn create_note(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<NoteForm>,
) -> ApiResult {
    let mut store = db.write().await;
    let user = authenticate(&store, &headers)?;
    check_note_fields(&form)?;

    let now = timestamp();
    let note = Note {
        id: new_id(),
        title: form.title,
        description: form.description,
        category: form.category,
        completed: false,
        created_at: now.clone(),
        updated_at: now,
        user_id: user.id,
    };
    let data = note_json(&note);
    store.notes.insert(note.id.clone(), note);
    Ok(Reply::ok(StatusCode::OK, "Note successfully created", data))
}

async fn update_note(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<NoteForm>,
) -> ApiResult {
    let mut store = db.write().await;
    let user = authenticate(&store, &headers)?;
    check_note_id(&id)?;
    check_note_fields(&form)?;
    let completed = match form.completed.as_deref() {
        Some("true") => true,
        Some("false") => false,
        _ => {
            return Err(Reply::bad_request(
                "Note completed status must be boolean",
            ))
        }
    };

    let note = store
        .notes
        .get_mut(&id)
        .filter(|note| note.user_id == user.id)
        .ok_or_else(Reply::note_not_found)?;
    note.title = form.title;
    note.description = form.description;
    note.category = form.category;
    note.completed = completed;
    note.updated_at = timestamp();
    Ok(Reply::ok(
        StatusCode::OK,
        "Note successfully Updated",
        note_json(note),
    ))
}

async fn delete_note(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult {
    let mut store = db.write().await;
    let user = authenticate(&store, &headers)?;
    check_note_id(&id)?;

    let owned = store
        .notes
        .get(&id)
        .is_some_and(|note| note.user_id == user.id);
    if !owned {
        return Err(Reply::note_not_found());
    }
    store.notes.remove(&id);
    Ok(Reply::message(StatusCode::OK, "Note successfully deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_valid() {
        for _ in 0..20 {
            let id = new_id();
            assert_eq!(id.len(), 24);
            assert!(is_valid_id(&id));
        }
    }

    #[test]
    fn id_validation_rejects_other_shapes() {
        assert!(is_valid_id("507f1f77bcf86cd799439011"));
        assert!(!is_valid_id("invalid-note-id-12345"));
        assert!(!is_valid_id("507f1f77bcf86cd79943901"));
        assert!(!is_valid_id("507f1f77bcf86cd79943901z"));
    }

    #[test]
    fn tokens_are_64_hex_chars() {
        let token = new_token();
        assert_eq!(token.len(), 64);
        assert!(token.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn lengths_count_characters_inclusively() {
        assert!(length_between("abcd", 4, 30));
        assert!(!length_between("abc", 4, 30));
        assert!(length_between(&"a".repeat(30), 4, 30));
        assert!(!length_between(&"a".repeat(31), 4, 30));
        assert!(length_between("ééé€", 4, 30));
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("testuser1700000001234@gmail.com"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@gmail.com"));
        assert!(!is_valid_email("user@localhost"));
    }

    #[test]
    fn reply_keeps_status() {
        let reply = Reply::message(StatusCode::NOT_FOUND, "gone");
        let response = reply.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn note_form_fields_default_to_empty() {
        let form: NoteForm = serde_json::from_str("{}").unwrap();
        assert!(form.title.is_empty());
        assert!(form.completed.is_none());
    }

    #[test]
    fn change_password_form_uses_camel_case() {
        let form: ChangePasswordForm =
            serde_json::from_str(r#"{"currentPassword":"a","newPassword":"b"}"#).unwrap();
        assert_eq!(form.current_password, "a");
        assert_eq!(form.new_password, "b");
    }
}
