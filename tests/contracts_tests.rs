mod common;

use actix_web::{App, http::StatusCode, test, web};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;

use timecard_be::database::repositories::employee as employee_repo;
use timecard_be::handlers::employees;
use timecard_be::services::AuthService;

macro_rules! contract_app {
    ($config:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($config.clone()))
                .app_data(web::Data::new(AuthService::new($config.clone())))
                .service(
                    web::scope("/api/v1")
                        .service(
                            web::scope("/employees")
                                .route(
                                    "/{slug}/contracts",
                                    web::get().to(employees::list_contracts),
                                )
                                .route(
                                    "/{slug}/contracts",
                                    web::post().to(employees::create_contract),
                                ),
                        )
                        .service(
                            web::scope("/contracts")
                                .route("/{id}", web::get().to(employees::get_contract))
                                .route("/{id}", web::put().to(employees::update_contract))
                                .route("/{id}", web::delete().to(employees::delete_contract)),
                        ),
                ),
        )
        .await
    };
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn create_contract_for_an_employee() {
    let config = common::setup().await;
    let admin = common::seed_employee(true).await;
    let employee = common::seed_employee(false).await;
    let token = common::token_for(&config, &admin);
    let app = contract_app!(config);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/employees/{}/contracts", employee.slug))
        .insert_header(common::bearer(&token))
        .set_json(&json!({
            "name": "B2B 2024",
            "contractType": "contract_for_service",
            "signDate": "2023-12-20",
            "startDate": "2024-01-01",
            "endDate": "2024-12-31",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], json!("B2B 2024"));
    assert_eq!(body["data"]["employeeId"], json!(employee.id));
    assert_eq!(body["data"]["startDate"], json!("2024-01-01"));
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn overlapping_contracts_are_rejected() {
    let config = common::setup().await;
    let admin = common::seed_employee(true).await;
    let employee = common::seed_employee(false).await;
    common::seed_contract(
        employee.id,
        common::day(2024, 1, 1),
        Some(common::day(2024, 6, 30)),
    )
    .await;
    let token = common::token_for(&config, &admin);
    let app = contract_app!(config);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/employees/{}/contracts", employee.slug))
        .insert_header(common::bearer(&token))
        .set_json(&json!({
            "name": "Second",
            "contractType": "permanent",
            "signDate": "2024-02-01",
            "startDate": "2024-03-01",
            "endDate": null,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        json!("Dates overlap the existing contract \"Employment\"")
    );
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn an_open_ended_contract_blocks_later_starts() {
    let config = common::setup().await;
    let admin = common::seed_employee(true).await;
    let employee = common::seed_employee(false).await;
    common::seed_contract(employee.id, common::day(2024, 1, 1), None).await;
    let token = common::token_for(&config, &admin);
    let app = contract_app!(config);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/employees/{}/contracts", employee.slug))
        .insert_header(common::bearer(&token))
        .set_json(&json!({
            "name": "Later",
            "contractType": "permanent",
            "signDate": "2025-01-01",
            "startDate": "2025-06-01",
            "endDate": "2025-12-31",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn touching_intervals_do_not_overlap() {
    let config = common::setup().await;
    let admin = common::seed_employee(true).await;
    let employee = common::seed_employee(false).await;
    common::seed_contract(
        employee.id,
        common::day(2024, 1, 1),
        Some(common::day(2024, 3, 15)),
    )
    .await;
    let token = common::token_for(&config, &admin);
    let app = contract_app!(config);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/employees/{}/contracts", employee.slug))
        .insert_header(common::bearer(&token))
        .set_json(&json!({
            "name": "Follow-up",
            "contractType": "permanent",
            "signDate": "2024-03-01",
            "startDate": "2024-03-16",
            "endDate": null,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn an_update_may_keep_its_own_dates_but_not_take_anothers() {
    let config = common::setup().await;
    let admin = common::seed_employee(true).await;
    let employee = common::seed_employee(false).await;
    let first = common::seed_contract(
        employee.id,
        common::day(2024, 1, 1),
        Some(common::day(2024, 6, 30)),
    )
    .await;
    let second = common::seed_contract(
        employee.id,
        common::day(2024, 7, 1),
        Some(common::day(2024, 12, 31)),
    )
    .await;
    let token = common::token_for(&config, &admin);
    let app = contract_app!(config);

    // Same dates, new name: the contract does not conflict with itself.
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/contracts/{}", first.id))
        .insert_header(common::bearer(&token))
        .set_json(&json!({
            "name": "Renamed",
            "contractType": "permanent",
            "signDate": "2024-01-01",
            "startDate": "2024-01-01",
            "endDate": "2024-06-30",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], json!("Renamed"));

    // Moving onto the other contract's dates is still an overlap.
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/contracts/{}", second.id))
        .insert_header(common::bearer(&token))
        .set_json(&json!({
            "name": "Clash",
            "contractType": "permanent",
            "signDate": "2024-01-01",
            "startDate": "2024-05-01",
            "endDate": "2024-12-31",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn a_future_sign_date_is_rejected() {
    let config = common::setup().await;
    let admin = common::seed_employee(true).await;
    let employee = common::seed_employee(false).await;
    let token = common::token_for(&config, &admin);
    let app = contract_app!(config);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/employees/{}/contracts", employee.slug))
        .insert_header(common::bearer(&token))
        .set_json(&json!({
            "name": "Backdated the wrong way",
            "contractType": "permanent",
            "signDate": "2091-01-01",
            "startDate": "2091-01-01",
            "endDate": null,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("Sign date 2091-01-01 is in the future"));
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn contracts_for_an_inactive_employee_are_rejected() {
    let config = common::setup().await;
    let admin = common::seed_employee(true).await;
    let employee = common::seed_employee(false).await;
    employee_repo::set_active(employee.id, false)
        .await
        .expect("deactivate");
    let token = common::token_for(&config, &admin);
    let app = contract_app!(config);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/employees/{}/contracts", employee.slug))
        .insert_header(common::bearer(&token))
        .set_json(&json!({
            "name": "Too late",
            "contractType": "permanent",
            "signDate": "2024-01-01",
            "startDate": "2024-01-01",
            "endDate": null,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn reading_contracts_requires_admin() {
    let config = common::setup().await;
    let employee = common::seed_employee(false).await;
    common::seed_contract(employee.id, common::day(2024, 1, 1), None).await;
    let token = common::token_for(&config, &employee);
    let app = contract_app!(config);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/employees/{}/contracts", employee.slug))
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn delete_then_fetch_is_not_found() {
    let config = common::setup().await;
    let admin = common::seed_employee(true).await;
    let employee = common::seed_employee(false).await;
    let contract = common::seed_contract(employee.id, common::day(2024, 1, 1), None).await;
    let token = common::token_for(&config, &admin);
    let app = contract_app!(config);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/contracts/{}", contract.id))
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/contracts/{}", contract.id))
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
