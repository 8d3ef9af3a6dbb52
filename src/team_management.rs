// src/team_management.rs

use std::collections::HashSet;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{debug, info};
use serde::Deserialize;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::config::MAX_TEAM_MEMBERS;
use crate::errors::ApiError;
use crate::models::{IdResponse, StatusResponse, Team, User};
use crate::store;
use crate::validators;

// ─── REQUEST PAYLOADS ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub admin: String,
}

#[derive(Debug, Deserialize)]
pub struct DescribeTeamRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub id: String,
    pub team: TeamFields,
}

#[derive(Debug, Deserialize)]
pub struct TeamFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub admin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TeamUsersRequest {
    pub id: String,
    pub users: Vec<String>,
}

fn find_team(teams: &[Team], team_id: &str) -> Result<usize, ApiError> {
    teams
        .iter()
        .position(|t| t.id == team_id)
        .ok_or_else(|| ApiError::not_found("Team not found"))
}

fn require_user_exists(users: &[User], user_id: &str, role: &str) -> Result<(), ApiError> {
    if users.iter().any(|u| u.id == user_id) {
        Ok(())
    } else {
        Err(ApiError::validation(format!("{} does not exist", role)))
    }
}

// ─── ENDPOINTS ────────────────────────────────────────────────────────────────

/// POST /api/teams/create/
/// Creates a team. The admin must resolve to an existing user and becomes
/// the first member.
pub async fn create_team(
    data: web::Data<AppState>,
    payload: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("create_team payload: {:?}", payload);

    let name = validators::entity_name(&payload.name, "Team name")?;
    let description = validators::description(&payload.description)?;
    let admin = validators::required(&payload.admin, "Admin user ID")?;

    let users: Vec<User> = data.store.load_or_default(store::USERS)?;
    require_user_exists(&users, &admin, "Admin user")?;

    let mut teams: Vec<Team> = data.store.load_or_default(store::TEAMS)?;
    if teams.iter().any(|t| t.name == name) {
        return Err(ApiError::validation("Team name must be unique"));
    }

    let new_team = Team {
        id: Uuid::new_v4().to_string(),
        name,
        description,
        members: vec![admin.clone()],
        admin,
        creation_time: Utc::now(),
    };

    teams.push(new_team.clone());
    data.store.save(store::TEAMS, &teams)?;

    info!("Team created: {}", new_team.id);
    Ok(HttpResponse::Created().json(IdResponse { id: new_team.id }))
}

/// GET /api/teams/list/
pub async fn list_teams(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let teams: Vec<Team> = data.store.load_or_default(store::TEAMS)?;
    Ok(HttpResponse::Ok().json(teams))
}

/// POST /api/teams/describe/
pub async fn describe_team(
    data: web::Data<AppState>,
    payload: web::Json<DescribeTeamRequest>,
) -> Result<HttpResponse, ApiError> {
    let team_id = validators::required(&payload.id, "Team ID")?;

    let teams: Vec<Team> = data.store.load_or_default(store::TEAMS)?;
    let index = find_team(&teams, &team_id)?;

    Ok(HttpResponse::Ok().json(&teams[index]))
}

/// PUT /api/teams/update/
/// Updates name, description or admin. A new admin is added to the members.
pub async fn update_team(
    data: web::Data<AppState>,
    payload: web::Json<UpdateTeamRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("update_team payload: {:?}", payload);

    let team_id = validators::required(&payload.id, "Team ID")?;

    let mut teams: Vec<Team> = data.store.load_or_default(store::TEAMS)?;
    let index = find_team(&teams, &team_id)?;

    if let Some(name) = payload.team.name.as_deref() {
        let name = validators::entity_name(name, "Team name")?;
        if teams.iter().any(|t| t.name == name && t.id != team_id) {
            return Err(ApiError::validation("Team name must be unique"));
        }
        teams[index].name = name;
    }

    if let Some(description) = payload.team.description.as_deref() {
        teams[index].description = validators::description(description)?;
    }

    if let Some(admin) = payload.team.admin.as_deref() {
        let admin = validators::required(admin, "Admin user ID")?;
        let users: Vec<User> = data.store.load_or_default(store::USERS)?;
        require_user_exists(&users, &admin, "Admin user")?;

        if !teams[index].members.iter().any(|m| m == &admin) {
            teams[index].members.push(admin.clone());
        }
        teams[index].admin = admin;
    }

    data.store.save(store::TEAMS, &teams)?;

    info!("Team updated: {}", team_id);
    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}

/// POST /api/teams/add_users/
/// Adds users to a team. Every id must resolve, duplicates are rejected and
/// the member count may never exceed the limit.
pub async fn add_users_to_team(
    data: web::Data<AppState>,
    payload: web::Json<TeamUsersRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("add_users_to_team payload: {:?}", payload);

    let team_id = validators::required(&payload.id, "Team ID")?;

    let users: Vec<User> = data.store.load_or_default(store::USERS)?;
    let existing: HashSet<&str> = users.iter().map(|u| u.id.as_str()).collect();
    for user_id in &payload.users {
        if !existing.contains(user_id.as_str()) {
            return Err(ApiError::validation(format!(
                "User {} does not exist",
                user_id
            )));
        }
    }

    let mut teams: Vec<Team> = data.store.load_or_default(store::TEAMS)?;
    let index = find_team(&teams, &team_id)?;

    let mut seen: HashSet<&str> = teams[index].members.iter().map(|m| m.as_str()).collect();
    for user_id in &payload.users {
        if !seen.insert(user_id.as_str()) {
            return Err(ApiError::validation(format!(
                "User {} is already a member of the team",
                user_id
            )));
        }
    }

    if teams[index].members.len() + payload.users.len() > MAX_TEAM_MEMBERS {
        return Err(ApiError::validation(format!(
            "Cannot add users: team would exceed {} member limit",
            MAX_TEAM_MEMBERS
        )));
    }

    teams[index].members.extend(payload.users.iter().cloned());
    data.store.save(store::TEAMS, &teams)?;

    info!("Added {} users to team {}", payload.users.len(), team_id);
    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}

/// POST /api/teams/remove_users/
/// Removes users from a team. The admin cannot be removed.
pub async fn remove_users_from_team(
    data: web::Data<AppState>,
    payload: web::Json<TeamUsersRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("remove_users_from_team payload: {:?}", payload);

    let team_id = validators::required(&payload.id, "Team ID")?;

    let mut teams: Vec<Team> = data.store.load_or_default(store::TEAMS)?;
    let index = find_team(&teams, &team_id)?;

    if payload.users.iter().any(|u| u == &teams[index].admin) {
        return Err(ApiError::validation("Cannot remove team admin from team"));
    }

    let removed: HashSet<&str> = payload.users.iter().map(|u| u.as_str()).collect();
    teams[index].members.retain(|m| !removed.contains(m.as_str()));

    data.store.save(store::TEAMS, &teams)?;

    info!("Removed users from team {}", team_id);
    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}

/// POST /api/teams/users/
/// Lists the member user records of a team. Member ids that no longer
/// resolve are skipped.
pub async fn list_team_users(
    data: web::Data<AppState>,
    payload: web::Json<DescribeTeamRequest>,
) -> Result<HttpResponse, ApiError> {
    let team_id = validators::required(&payload.id, "Team ID")?;

    let teams: Vec<Team> = data.store.load_or_default(store::TEAMS)?;
    let index = find_team(&teams, &team_id)?;

    let users: Vec<User> = data.store.load_or_default(store::USERS)?;
    let members: Vec<&User> = teams[index]
        .members
        .iter()
        .filter_map(|id| users.iter().find(|u| &u.id == id))
        .collect();

    Ok(HttpResponse::Ok().json(members))
}
