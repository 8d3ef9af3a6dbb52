// src/task.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{debug, info};
use serde::Deserialize;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::errors::ApiError;
use crate::models::{Board, BoardStatus, IdResponse, StatusResponse, Task, TaskStatus, User};
use crate::store;
use crate::validators;

// ─── REQUEST PAYLOADS ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub board_id: String,
    /// Optional assignee.
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksRequest {
    pub board_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub id: String,
    pub status: String,
}

// ─── ENDPOINTS ────────────────────────────────────────────────────────────────

/// POST /api/tasks/create/
/// Creates a task on an OPEN board. Titles are unique within the board.
pub async fn create_task(
    data: web::Data<AppState>,
    payload: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("create_task payload: {:?}", payload);

    let title = validators::entity_name(&payload.title, "Task title")?;
    let description = validators::description(&payload.description)?;
    let board_id = validators::required(&payload.board_id, "Board ID")?;

    let boards: Vec<Board> = data.store.load_or_default(store::BOARDS)?;
    let board = boards
        .iter()
        .find(|b| b.id == board_id)
        .ok_or_else(|| ApiError::validation("Board does not exist"))?;
    if board.status != BoardStatus::Open {
        return Err(ApiError::validation("Can only add tasks to OPEN boards"));
    }

    let assignee = match payload.user_id.as_deref() {
        Some(user_id) => {
            let user_id = validators::required(user_id, "User ID")?;
            let users: Vec<User> = data.store.load_or_default(store::USERS)?;
            if !users.iter().any(|u| u.id == user_id) {
                return Err(ApiError::validation("Assignee user does not exist"));
            }
            Some(user_id)
        }
        None => None,
    };

    let mut tasks: Vec<Task> = data.store.load_or_default(store::TASKS)?;
    if tasks
        .iter()
        .any(|t| t.board_id == board_id && t.title == title)
    {
        return Err(ApiError::validation(
            "Task title must be unique within the board",
        ));
    }

    let new_task = Task {
        id: Uuid::new_v4().to_string(),
        title,
        description,
        board_id,
        assignee,
        status: TaskStatus::Open,
        creation_time: Utc::now(),
    };

    tasks.push(new_task.clone());
    data.store.save(store::TASKS, &tasks)?;

    info!("Task created: {}", new_task.id);
    Ok(HttpResponse::Created().json(IdResponse { id: new_task.id }))
}

/// POST /api/tasks/list/
/// Lists the tasks of a board.
pub async fn list_tasks(
    data: web::Data<AppState>,
    payload: web::Json<ListTasksRequest>,
) -> Result<HttpResponse, ApiError> {
    let board_id = validators::required(&payload.board_id, "Board ID")?;

    let tasks: Vec<Task> = data.store.load_or_default(store::TASKS)?;
    let board_tasks: Vec<&Task> = tasks.iter().filter(|t| t.board_id == board_id).collect();

    Ok(HttpResponse::Ok().json(board_tasks))
}

/// PUT /api/tasks/update_status/
/// Sets the task status. Any enumerated value may move to any other.
pub async fn update_task_status(
    data: web::Data<AppState>,
    payload: web::Json<UpdateTaskStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("update_task_status payload: {:?}", payload);

    let task_id = validators::required(&payload.id, "Task ID")?;
    let status = validators::task_status(&payload.status)?;

    let mut tasks: Vec<Task> = data.store.load_or_default(store::TASKS)?;
    let index = tasks
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    tasks[index].status = status;
    data.store.save(store::TASKS, &tasks)?;

    info!("Task {} status set to {}", task_id, status);
    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}
