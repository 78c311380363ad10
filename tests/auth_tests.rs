mod common;

use actix_web::{App, http::StatusCode, test, web};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;

use timecard_be::database::repositories::employee as employee_repo;
use timecard_be::handlers::auth;
use timecard_be::services::AuthService;

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn login_returns_token_and_employee() {
    let config = common::setup().await;
    let employee = common::seed_employee(false).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(AuthService::new(config.clone())))
            .service(web::scope("/api/v1/auth").route("/login", web::post().to(auth::login))),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(&json!({
            "email": employee.email,
            "password": common::TEST_PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["employee"]["email"], json!(employee.email));
    assert_eq!(body["data"]["employee"]["slug"], json!(employee.slug));
    // The hash must never leave the server.
    assert!(body["data"]["employee"].get("passwordHash").is_none());
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn login_rejects_a_wrong_password() {
    let config = common::setup().await;
    let employee = common::seed_employee(false).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(AuthService::new(config.clone())))
            .service(web::scope("/api/v1/auth").route("/login", web::post().to(auth::login))),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(&json!({
            "email": employee.email,
            "password": "not-the-password",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn login_rejects_a_deactivated_account() {
    let config = common::setup().await;
    let employee = common::seed_employee(false).await;
    employee_repo::set_active(employee.id, false)
        .await
        .expect("deactivate");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(AuthService::new(config.clone())))
            .service(web::scope("/api/v1/auth").route("/login", web::post().to(auth::login))),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(&json!({
            "email": employee.email,
            "password": common::TEST_PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn me_returns_the_authenticated_employee() {
    let config = common::setup().await;
    let employee = common::seed_employee(false).await;
    let token = common::token_for(&config, &employee);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(AuthService::new(config.clone())))
            .service(web::scope("/api/v1/auth").route("/me", web::get().to(auth::me))),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["slug"], json!(employee.slug));
    assert_eq!(body["data"]["isAdmin"], json!(false));
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn me_without_a_token_is_unauthorized() {
    let config = common::setup().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(AuthService::new(config)))
            .service(web::scope("/api/v1/auth").route("/me", web::get().to(auth::me))),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
