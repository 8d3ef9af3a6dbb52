// src/user_management.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::errors::ApiError;
use crate::models::{IdResponse, StatusResponse, Team, User};
use crate::store;
use crate::validators;

// ─── REQUEST PAYLOADS ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DescribeUserRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub id: String,
    pub user: UserFields,
}

#[derive(Debug, Deserialize)]
pub struct UserFields {
    pub name: Option<String>,
    pub display_name: Option<String>,
}

/// Team listing returned by the user/teams endpoint.
#[derive(Debug, Serialize)]
pub struct TeamSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub creation_time: chrono::DateTime<Utc>,
}

// ─── ENDPOINTS ────────────────────────────────────────────────────────────────

/// POST /api/users/create/
/// Creates a user with a system-wide unique name.
pub async fn create_user(
    data: web::Data<AppState>,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("create_user payload: {:?}", payload);

    let name = validators::user_name(&payload.name)?;
    let display_name = validators::display_name(&payload.display_name, false)?;

    let mut users: Vec<User> = data.store.load_or_default(store::USERS)?;
    if users.iter().any(|u| u.name == name) {
        return Err(ApiError::validation("User name must be unique"));
    }

    let new_user = User {
        id: Uuid::new_v4().to_string(),
        display_name: if display_name.is_empty() {
            name.clone()
        } else {
            display_name
        },
        name,
        creation_time: Utc::now(),
    };

    users.push(new_user.clone());
    data.store.save(store::USERS, &users)?;

    info!("User created: {}", new_user.id);
    Ok(HttpResponse::Created().json(IdResponse { id: new_user.id }))
}

/// GET /api/users/list/
pub async fn list_users(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users: Vec<User> = data.store.load_or_default(store::USERS)?;
    Ok(HttpResponse::Ok().json(users))
}

/// POST /api/users/describe/
pub async fn describe_user(
    data: web::Data<AppState>,
    payload: web::Json<DescribeUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = validators::uuid_ref(&payload.id, "User ID")?;

    let users: Vec<User> = data.store.load_or_default(store::USERS)?;
    let user = users
        .iter()
        .find(|u| u.id == user_id)
        .ok_or_else(|| ApiError::not_found(format!("User with ID {} not found", user_id)))?;

    Ok(HttpResponse::Ok().json(user))
}

/// PUT /api/users/update/
/// Updates the display name. The user name is immutable.
pub async fn update_user(
    data: web::Data<AppState>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("update_user payload: {:?}", payload);

    let user_id = validators::uuid_ref(&payload.id, "User ID")?;

    let mut users: Vec<User> = data.store.load_or_default(store::USERS)?;
    let index = users
        .iter()
        .position(|u| u.id == user_id)
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(name) = payload.user.name.as_deref() {
        let name = name.trim();
        if !name.is_empty() && name != users[index].name {
            return Err(ApiError::validation("User name cannot be updated"));
        }
    }

    if let Some(display_name) = payload.user.display_name.as_deref() {
        let display_name = validators::display_name(display_name, true)?;
        if !display_name.is_empty() {
            users[index].display_name = display_name;
        }
    }

    data.store.save(store::USERS, &users)?;

    info!("User updated: {}", user_id);
    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}

/// POST /api/users/teams/
/// Lists the teams the user is a member of.
pub async fn get_user_teams(
    data: web::Data<AppState>,
    payload: web::Json<DescribeUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = validators::uuid_ref(&payload.id, "User ID")?;

    let users: Vec<User> = data.store.load_or_default(store::USERS)?;
    if !users.iter().any(|u| u.id == user_id) {
        return Err(ApiError::not_found(format!(
            "User with ID {} not found",
            user_id
        )));
    }

    let teams: Vec<Team> = data.store.load_or_default(store::TEAMS)?;
    let user_teams: Vec<TeamSummary> = teams
        .into_iter()
        .filter(|t| t.members.iter().any(|m| m == &user_id))
        .map(|t| TeamSummary {
            id: t.id,
            name: t.name,
            description: t.description,
            creation_time: t.creation_time,
        })
        .collect();

    debug!("Found {} teams for user {}", user_teams.len(), user_id);
    Ok(HttpResponse::Ok().json(user_teams))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::test_helpers::*;

    #[actix_web::test]
    async fn create_assigns_fresh_ids_and_defaults_display_name() {
        let tmp = tempdir().unwrap();
        let app = spawn_app!(tmp.path());

        let alice = create_entity!(&app, "/api/users/create/", json!({ "name": "alice" }));
        let bob = create_entity!(&app, "/api/users/create/", json!({ "name": "bob" }));
        assert_ne!(alice, bob);

        let resp = post_json!(&app, "/api/users/describe/", json!({ "id": alice }));
        let body = body_json!(resp);
        assert_eq!(body["name"], "alice");
        assert_eq!(body["display_name"], "alice");
        assert!(body["creation_time"].is_string());
    }

    #[actix_web::test]
    async fn duplicate_name_is_rejected() {
        let tmp = tempdir().unwrap();
        let app = spawn_app!(tmp.path());

        create_entity!(&app, "/api/users/create/", json!({ "name": "alice" }));

        let resp = post_json!(
            &app,
            "/api/users/create/",
            json!({ "name": "alice", "display_name": "Other Alice" })
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json!(resp);
        assert_eq!(body["error"], "User name must be unique");
    }

    #[actix_web::test]
    async fn invalid_name_charset_is_rejected() {
        let tmp = tempdir().unwrap();
        let app = spawn_app!(tmp.path());

        let resp = post_json!(&app, "/api/users/create/", json!({ "name": "alice smith" }));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn describe_round_trips_supplied_fields_and_is_idempotent() {
        let tmp = tempdir().unwrap();
        let app = spawn_app!(tmp.path());

        let id = create_entity!(
            &app,
            "/api/users/create/",
            json!({ "name": "alice", "display_name": "Alice" })
        );

        let resp = post_json!(&app, "/api/users/describe/", json!({ "id": id }));
        let first = body_json!(resp);
        assert_eq!(first["name"], "alice");
        assert_eq!(first["display_name"], "Alice");
        assert_eq!(first["id"], id.as_str());

        let resp = post_json!(&app, "/api/users/describe/", json!({ "id": id }));
        let second = body_json!(resp);
        assert_eq!(first, second);
    }

    #[actix_web::test]
    async fn update_changes_display_name_but_never_name() {
        let tmp = tempdir().unwrap();
        let app = spawn_app!(tmp.path());

        let id = create_entity!(&app, "/api/users/create/", json!({ "name": "alice" }));

        let resp = put_json!(
            &app,
            "/api/users/update/",
            json!({ "id": id, "user": { "display_name": "Alice Updated" } })
        );
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = put_json!(
            &app,
            "/api/users/update/",
            json!({ "id": id, "user": { "name": "alice2" } })
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json!(resp);
        assert_eq!(body["error"], "User name cannot be updated");

        let resp = post_json!(&app, "/api/users/describe/", json!({ "id": id }));
        let body = body_json!(resp);
        assert_eq!(body["name"], "alice");
        assert_eq!(body["display_name"], "Alice Updated");
    }

    #[actix_web::test]
    async fn update_allows_longer_display_name_than_create() {
        let tmp = tempdir().unwrap();
        let app = spawn_app!(tmp.path());

        let long = "d".repeat(100);

        let resp = post_json!(
            &app,
            "/api/users/create/",
            json!({ "name": "alice", "display_name": long })
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let id = create_entity!(&app, "/api/users/create/", json!({ "name": "bob" }));
        let resp = put_json!(
            &app,
            "/api/users/update/",
            json!({ "id": id, "user": { "display_name": long } })
        );
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn describe_unknown_id_is_404_and_malformed_id_is_400() {
        let tmp = tempdir().unwrap();
        let app = spawn_app!(tmp.path());

        let resp = post_json!(
            &app,
            "/api/users/describe/",
            json!({ "id": uuid::Uuid::new_v4().to_string() })
        );
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = post_json!(&app, "/api/users/describe/", json!({ "id": "not-a-uuid" }));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn list_is_idempotent() {
        let tmp = tempdir().unwrap();
        let app = spawn_app!(tmp.path());

        create_entity!(&app, "/api/users/create/", json!({ "name": "alice" }));
        create_entity!(&app, "/api/users/create/", json!({ "name": "bob" }));

        let resp = get_json!(&app, "/api/users/list/");
        let first = body_json!(resp);
        assert_eq!(first.as_array().unwrap().len(), 2);

        let resp = get_json!(&app, "/api/users/list/");
        let second = body_json!(resp);
        assert_eq!(first, second);
    }

    #[actix_web::test]
    async fn user_teams_lists_only_memberships() {
        let tmp = tempdir().unwrap();
        let app = spawn_app!(tmp.path());

        let alice = create_entity!(&app, "/api/users/create/", json!({ "name": "alice" }));
        let bob = create_entity!(&app, "/api/users/create/", json!({ "name": "bob" }));

        create_entity!(
            &app,
            "/api/teams/create/",
            json!({ "name": "dev_team", "description": "Dev", "admin": alice })
        );

        let resp = post_json!(&app, "/api/users/teams/", json!({ "id": alice }));
        let body = body_json!(resp);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "dev_team");

        let resp = post_json!(&app, "/api/users/teams/", json!({ "id": bob }));
        let body = body_json!(resp);
        assert!(body.as_array().unwrap().is_empty());
    }
}
