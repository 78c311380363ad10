mod common;

use actix_web::{App, http::StatusCode, test, web};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;

use timecard_be::handlers::clients;
use timecard_be::services::AuthService;

macro_rules! client_app {
    ($config:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($config.clone()))
                .app_data(web::Data::new(AuthService::new($config.clone())))
                .service(
                    web::scope("/api/v1/clients")
                        .route("", web::get().to(clients::list_clients))
                        .route("", web::post().to(clients::create_client))
                        .route("/{slug}", web::get().to(clients::get_client))
                        .route("/{slug}", web::put().to(clients::update_client))
                        .route("/{slug}/activate", web::post().to(clients::activate_client))
                        .route(
                            "/{slug}/deactivate",
                            web::post().to(clients::deactivate_client),
                        ),
                ),
        )
        .await
    };
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn admin_creates_a_client_with_slug() {
    let config = common::setup().await;
    let admin = common::seed_employee(true).await;
    let token = common::token_for(&config, &admin);
    let app = client_app!(config);

    let req = test::TestRequest::post()
        .uri("/api/v1/clients")
        .insert_header(common::bearer(&token))
        .set_json(&json!({ "name": "ACME Corp." }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], json!("ACME Corp."));
    assert_eq!(body["data"]["slug"], json!("acme-corp"));
    assert_eq!(body["data"]["isActive"], json!(true));
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn renaming_keeps_the_slug() {
    let config = common::setup().await;
    let admin = common::seed_employee(true).await;
    let client = common::seed_client("ACME Corp.").await;
    let token = common::token_for(&config, &admin);
    let app = client_app!(config);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/clients/{}", client.slug))
        .insert_header(common::bearer(&token))
        .set_json(&json!({ "name": "ACME Holdings" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], json!("ACME Holdings"));
    assert_eq!(body["data"]["slug"], json!("acme-corp"));
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn deactivated_clients_leave_the_default_listing() {
    let config = common::setup().await;
    let admin = common::seed_employee(true).await;
    let client = common::seed_client("Globex").await;
    let token = common::token_for(&config, &admin);
    let app = client_app!(config);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/clients/{}/deactivate", client.slug))
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/clients")
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/clients?all=true")
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn creating_clients_requires_admin() {
    let config = common::setup().await;
    let employee = common::seed_employee(false).await;
    let token = common::token_for(&config, &employee);
    let app = client_app!(config);

    let req = test::TestRequest::post()
        .uri("/api/v1/clients")
        .insert_header(common::bearer(&token))
        .set_json(&json!({ "name": "Initech" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
