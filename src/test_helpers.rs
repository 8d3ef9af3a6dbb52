// src/test_helpers.rs
//
// Shared helpers for endpoint tests. Each test gets its own tempdir-backed
// AppState, so collections never leak between tests.

macro_rules! spawn_app {
    ($dir:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(crate::app_state::test_state($dir)))
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(crate::json_error_handler),
                )
                .configure(crate::api_routes),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        actix_web::test::call_service($app, req).await
    }};
}

macro_rules! put_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = actix_web::test::TestRequest::put()
            .uri($uri)
            .set_json($body)
            .to_request();
        actix_web::test::call_service($app, req).await
    }};
}

macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let req = actix_web::test::TestRequest::get().uri($uri).to_request();
        actix_web::test::call_service($app, req).await
    }};
}

macro_rules! body_json {
    ($resp:expr) => {{
        let value: serde_json::Value = actix_web::test::read_body_json($resp).await;
        value
    }};
}

/// POST a create payload, assert 201, return the new id.
macro_rules! create_entity {
    ($app:expr, $uri:expr, $body:expr) => {{
        let resp = post_json!($app, $uri, $body);
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        let body = body_json!(resp);
        body["id"].as_str().unwrap().to_string()
    }};
}

pub(crate) use {body_json, create_entity, get_json, post_json, put_json, spawn_app};
