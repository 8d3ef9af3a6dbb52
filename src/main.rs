// src/main.rs

mod app_state;
mod board;
mod config;
mod errors;
mod models;
mod store;
mod task;
mod team_management;
#[cfg(test)]
mod test_helpers;
mod user_management;
mod validators;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{error, http, web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use log::info;

use crate::app_state::AppState;
use crate::board::{
    close_board, create_board, describe_board, export_board, list_boards, update_board,
};
use crate::errors::ErrorBody;
use crate::task::{create_task, list_tasks, update_task_status};
use crate::team_management::{
    add_users_to_team, create_team, describe_team, list_team_users, list_teams,
    remove_users_from_team, update_team,
};
use crate::user_management::{
    create_user, describe_user, get_user_teams, list_users, update_user,
};

/// Malformed request bodies get the same `{error: ...}` shape as every
/// other failure instead of the default plain-text response.
pub(crate) fn json_error_handler(
    err: error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    let body = ErrorBody {
        error: format!("Invalid JSON format: {}", err),
    };
    error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

pub(crate) fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // USERS
            .service(
                web::scope("/users")
                    .route("/create/", web::post().to(create_user))
                    .route("/list/", web::get().to(list_users))
                    .route("/describe/", web::post().to(describe_user))
                    .route("/update/", web::put().to(update_user))
                    .route("/teams/", web::post().to(get_user_teams)),
            )
            // TEAMS
            .service(
                web::scope("/teams")
                    .route("/create/", web::post().to(create_team))
                    .route("/list/", web::get().to(list_teams))
                    .route("/describe/", web::post().to(describe_team))
                    .route("/update/", web::put().to(update_team))
                    .route("/add_users/", web::post().to(add_users_to_team))
                    .route("/remove_users/", web::post().to(remove_users_from_team))
                    .route("/users/", web::post().to(list_team_users)),
            )
            // BOARDS
            .service(
                web::scope("/boards")
                    .route("/create/", web::post().to(create_board))
                    .route("/list/", web::post().to(list_boards))
                    .route("/describe/", web::post().to(describe_board))
                    .route("/update/", web::put().to(update_board))
                    .route("/close/", web::post().to(close_board))
                    .route("/export/", web::post().to(export_board)),
            )
            // TASKS
            .service(
                web::scope("/tasks")
                    .route("/create/", web::post().to(create_task))
                    .route("/list/", web::post().to(list_tasks))
                    .route("/update_status/", web::put().to(update_task_status)),
            ),
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = config::Config::from_env();
    let store = store::FileStore::new(&config.data_dir).map_err(std::io::Error::other)?;

    let bind_addr = config.bind_addr.clone();
    let state = AppState { store, config };

    info!("Server running at http://{}", bind_addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&state.config.frontend_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::ACCEPT])
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .configure(api_routes)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
