use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use timecard_be::database::init_database;
use timecard_be::handlers::{approvals, auth, clients, employees, projects, time_reports};
use timecard_be::middleware::RequestIdMiddleware;
use timecard_be::{AuthService, Config};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Timecard API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting Timecard API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    let auth_service = AuthService::new(config.clone());

    let config_data = web::Data::new(config.clone());
    let auth_service_data = web::Data::new(auth_service);

    let client_base_url = config.client_base_url.clone();
    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .app_data(auth_service_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/auth")
                            .route("/login", web::post().to(auth::login))
                            .route("/me", web::get().to(auth::me)),
                    )
                    .service(
                        web::scope("/employees")
                            .route("", web::get().to(employees::list_employees))
                            .route("", web::post().to(employees::create_employee))
                            .route("/{slug}", web::get().to(employees::get_employee))
                            .route("/{slug}", web::put().to(employees::update_employee))
                            .route(
                                "/{slug}/activate",
                                web::post().to(employees::activate_employee),
                            )
                            .route(
                                "/{slug}/deactivate",
                                web::post().to(employees::deactivate_employee),
                            )
                            .route("/{slug}/contracts", web::get().to(employees::list_contracts))
                            .route(
                                "/{slug}/contracts",
                                web::post().to(employees::create_contract),
                            )
                            .route("/{slug}/rates", web::get().to(employees::list_rates))
                            .route("/{slug}/rates", web::post().to(employees::create_rate)),
                    )
                    .service(
                        web::scope("/contracts")
                            .route("/{id}", web::get().to(employees::get_contract))
                            .route("/{id}", web::put().to(employees::update_contract))
                            .route("/{id}", web::delete().to(employees::delete_contract)),
                    )
                    .service(
                        web::scope("/rates")
                            .route("/{id}", web::get().to(employees::get_rate))
                            .route("/{id}", web::put().to(employees::update_rate))
                            .route("/{id}", web::delete().to(employees::delete_rate)),
                    )
                    .service(
                        web::scope("/clients")
                            .route("", web::get().to(clients::list_clients))
                            .route("", web::post().to(clients::create_client))
                            .route("/{slug}", web::get().to(clients::get_client))
                            .route("/{slug}", web::put().to(clients::update_client))
                            .route("/{slug}/activate", web::post().to(clients::activate_client))
                            .route(
                                "/{slug}/deactivate",
                                web::post().to(clients::deactivate_client),
                            ),
                    )
                    .service(
                        web::scope("/projects")
                            .route("", web::get().to(projects::list_projects))
                            .route("", web::post().to(projects::create_project))
                            .route("/{slug}", web::get().to(projects::get_project))
                            .route("/{slug}", web::put().to(projects::update_project))
                            .route(
                                "/{slug}/activate",
                                web::post().to(projects::activate_project),
                            )
                            .route(
                                "/{slug}/deactivate",
                                web::post().to(projects::deactivate_project),
                            ),
                    )
                    .service(
                        web::scope("/time-reports")
                            .route("", web::get().to(time_reports::list_reports))
                            .route("", web::post().to(time_reports::create_report))
                            .route(
                                "/open-months",
                                web::get().to(time_reports::open_months_for_employee),
                            )
                            .route("/{id}", web::get().to(time_reports::get_report))
                            .route("/{id}/entries", web::put().to(time_reports::save_entries)),
                    )
                    .service(
                        web::scope("/approvals")
                            .route("", web::get().to(approvals::approval_queue))
                            .route("/{id}", web::get().to(approvals::get_approval_item))
                            .route("/{id}/approve", web::post().to(approvals::approve_record))
                            .route("/{id}/reject", web::post().to(approvals::reject_record)),
                    ),
            )
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
