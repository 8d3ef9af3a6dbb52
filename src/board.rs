// src/board.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::errors::ApiError;
use crate::models::{Board, BoardStatus, IdResponse, StatusResponse, Task, TaskStatus, Team};
use crate::store;
use crate::validators;

// ─── REQUEST PAYLOADS ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub team_id: String,
}

#[derive(Debug, Deserialize)]
pub struct BoardIdRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBoardRequest {
    pub id: String,
    pub board: BoardFields,
}

/// The owning team is immutable, so it is not part of the update payload.
#[derive(Debug, Deserialize)]
pub struct BoardFields {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
    pub status: BoardStatus,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub out_file: String,
}

fn find_board(boards: &[Board], board_id: &str) -> Result<usize, ApiError> {
    boards
        .iter()
        .position(|b| b.id == board_id)
        .ok_or_else(|| ApiError::not_found("Board not found"))
}

// ─── ENDPOINTS ────────────────────────────────────────────────────────────────

/// POST /api/boards/create/
/// Creates an OPEN board for a team. Board names are unique per team.
pub async fn create_board(
    data: web::Data<AppState>,
    payload: web::Json<CreateBoardRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("create_board payload: {:?}", payload);

    let name = validators::entity_name(&payload.name, "Board name")?;
    let description = validators::description(&payload.description)?;
    let team_id = validators::required(&payload.team_id, "Team ID")?;

    let teams: Vec<Team> = data.store.load_or_default(store::TEAMS)?;
    if !teams.iter().any(|t| t.id == team_id) {
        return Err(ApiError::validation("Team ID does not exist"));
    }

    let mut boards: Vec<Board> = data.store.load_or_default(store::BOARDS)?;
    if boards
        .iter()
        .any(|b| b.team_id == team_id && b.name == name)
    {
        return Err(ApiError::validation(
            "Board name must be unique within the team",
        ));
    }

    let new_board = Board {
        id: Uuid::new_v4().to_string(),
        name,
        description,
        team_id,
        status: BoardStatus::Open,
        creation_time: Utc::now(),
        end_time: None,
    };

    boards.push(new_board.clone());
    data.store.save(store::BOARDS, &boards)?;

    info!("Board created: {}", new_board.id);
    Ok(HttpResponse::Created().json(IdResponse { id: new_board.id }))
}

/// POST /api/boards/list/
/// Lists the boards of a team.
pub async fn list_boards(
    data: web::Data<AppState>,
    payload: web::Json<BoardIdRequest>,
) -> Result<HttpResponse, ApiError> {
    let team_id = validators::required(&payload.id, "Team ID")?;

    let boards: Vec<Board> = data.store.load_or_default(store::BOARDS)?;
    let team_boards: Vec<BoardSummary> = boards
        .into_iter()
        .filter(|b| b.team_id == team_id)
        .map(|b| BoardSummary {
            id: b.id,
            name: b.name,
            status: b.status,
        })
        .collect();

    Ok(HttpResponse::Ok().json(team_boards))
}

/// POST /api/boards/describe/
pub async fn describe_board(
    data: web::Data<AppState>,
    payload: web::Json<BoardIdRequest>,
) -> Result<HttpResponse, ApiError> {
    let board_id = validators::required(&payload.id, "Board ID")?;

    let boards: Vec<Board> = data.store.load_or_default(store::BOARDS)?;
    let index = find_board(&boards, &board_id)?;

    Ok(HttpResponse::Ok().json(&boards[index]))
}

/// PUT /api/boards/update/
/// Updates name or description. The owning team cannot change.
pub async fn update_board(
    data: web::Data<AppState>,
    payload: web::Json<UpdateBoardRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("update_board payload: {:?}", payload);

    let board_id = validators::required(&payload.id, "Board ID")?;

    let mut boards: Vec<Board> = data.store.load_or_default(store::BOARDS)?;
    let index = find_board(&boards, &board_id)?;

    if let Some(name) = payload.board.name.as_deref() {
        let name = validators::entity_name(name, "Board name")?;
        let team_id = boards[index].team_id.clone();
        if boards
            .iter()
            .any(|b| b.team_id == team_id && b.name == name && b.id != board_id)
        {
            return Err(ApiError::validation(
                "Board name must be unique within the team",
            ));
        }
        boards[index].name = name;
    }

    if let Some(description) = payload.board.description.as_deref() {
        boards[index].description = validators::description(description)?;
    }

    data.store.save(store::BOARDS, &boards)?;

    info!("Board updated: {}", board_id);
    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}

/// POST /api/boards/close/
/// Closes a board once every task on it is COMPLETE. Closed is terminal.
pub async fn close_board(
    data: web::Data<AppState>,
    payload: web::Json<BoardIdRequest>,
) -> Result<HttpResponse, ApiError> {
    let board_id = validators::required(&payload.id, "Board ID")?;

    let mut boards: Vec<Board> = data.store.load_or_default(store::BOARDS)?;
    let index = find_board(&boards, &board_id)?;

    if boards[index].status == BoardStatus::Closed {
        return Err(ApiError::validation("Board is already closed"));
    }

    let tasks: Vec<Task> = data.store.load_or_default(store::TASKS)?;
    let incomplete = tasks
        .iter()
        .filter(|t| t.board_id == board_id && t.status != TaskStatus::Complete)
        .count();
    if incomplete > 0 {
        return Err(ApiError::validation(
            "Cannot close board: not all tasks are complete",
        ));
    }

    boards[index].status = BoardStatus::Closed;
    boards[index].end_time = Some(Utc::now());
    data.store.save(store::BOARDS, &boards)?;

    info!("Board closed: {}", board_id);
    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}

/// POST /api/boards/export/
/// Renders a text summary of a board and its tasks into the export
/// directory. Read-only with respect to stored state.
pub async fn export_board(
    data: web::Data<AppState>,
    payload: web::Json<BoardIdRequest>,
) -> Result<HttpResponse, ApiError> {
    let board_id = validators::required(&payload.id, "Board ID")?;

    let boards: Vec<Board> = data.store.load_or_default(store::BOARDS)?;
    let index = find_board(&boards, &board_id)?;
    let board = &boards[index];

    let tasks: Vec<Task> = data.store.load_or_default(store::TASKS)?;
    let board_tasks: Vec<&Task> = tasks.iter().filter(|t| t.board_id == board_id).collect();

    let safe_name: String = board
        .name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let id_prefix: String = board.id.chars().take(8).collect();
    let filename = format!("board_{}_{}.txt", safe_name.trim_end(), id_prefix);
    let filepath = data.config.export_dir.join(&filename);

    let content = render_board_export(board, &board_tasks);
    store::write_text_file(&filepath, &content)?;

    info!("Board {} exported to {}", board_id, filepath.display());
    Ok(HttpResponse::Ok().json(ExportResponse { out_file: filename }))
}

fn render_board_export(board: &Board, tasks: &[&Task]) -> String {
    let rule = "=".repeat(60);
    let mut lines = Vec::new();

    lines.push(rule.clone());
    lines.push(format!("BOARD EXPORT: {}", board.name));
    lines.push(rule.clone());
    lines.push(format!(
        "Description: {}",
        if board.description.is_empty() {
            "N/A"
        } else {
            &board.description
        }
    ));
    lines.push(format!("Team ID: {}", board.team_id));
    lines.push(format!("Status: {}", board.status));
    lines.push(format!("Created: {}", board.creation_time.to_rfc3339()));
    if let Some(end_time) = board.end_time {
        lines.push(format!("Closed: {}", end_time.to_rfc3339()));
    }
    lines.push(String::new());

    let mut open = 0;
    let mut in_progress = 0;
    let mut complete = 0;
    for task in tasks {
        match task.status {
            TaskStatus::Open => open += 1,
            TaskStatus::InProgress => in_progress += 1,
            TaskStatus::Complete => complete += 1,
        }
    }

    lines.push("TASK SUMMARY:".to_string());
    lines.push("-".repeat(20));
    lines.push(format!("Total Tasks: {}", tasks.len()));
    lines.push(format!("Open: {}", open));
    lines.push(format!("In Progress: {}", in_progress));
    lines.push(format!("Complete: {}", complete));
    lines.push(String::new());

    if tasks.is_empty() {
        lines.push("No tasks found for this board.".to_string());
    } else {
        lines.push("TASK DETAILS:".to_string());
        lines.push("-".repeat(30));
        for (i, task) in tasks.iter().enumerate() {
            lines.push(format!("{}. {} [{}]", i + 1, task.title, task.status));
            lines.push(format!("   ID: {}", task.id));
            lines.push(format!(
                "   Description: {}",
                if task.description.is_empty() {
                    "N/A"
                } else {
                    &task.description
                }
            ));
            lines.push(format!(
                "   Assigned to: {}",
                task.assignee.as_deref().unwrap_or("unassigned")
            ));
            lines.push(format!("   Created: {}", task.creation_time.to_rfc3339()));
            lines.push(String::new());
        }
    }

    lines.push(rule.clone());
    lines.push(format!("Export generated on: {}", Utc::now().to_rfc3339()));
    lines.push(rule);

    lines.join("\n")
}
