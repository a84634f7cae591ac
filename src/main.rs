mod api;
mod jobs;
mod middleware;
mod models;
mod services;
mod state;
mod store;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use services::auth_service::JwtVerifier;
use services::telegram_service::TelegramNotifier;
use state::AppState;
use store::mongo::{MongoReminderStore, MongoUserStore};
use store::MongoDB;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3001".to_string());

    // Required configuration — the process fails fast when any is absent
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let bot_token = env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");
    let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

    log::info!("🚀 Starting Reminder Service...");

    // Initialize MongoDB connection
    let db = MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    log::info!("✅ MongoDB connected successfully");

    let state = AppState {
        users: Arc::new(MongoUserStore::new(db.clone())),
        reminders: Arc::new(MongoReminderStore::new(db.clone())),
        verifier: Arc::new(JwtVerifier::new(jwt_secret)),
        notifier: Arc::new(TelegramNotifier::new(bot_token.clone())),
        bot_token,
    };
    let state_data = web::Data::new(state.clone());

    // 📅 Start reminder scheduler
    log::info!("📅 Starting background jobs...");
    jobs::reminder_scheduler::start_reminder_scheduler(state.clone()).await;
    log::info!("✅ Background jobs started");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        // The bot backend serves browser clients from arbitrary origins
        // with credentials, so the CORS layer echoes every origin.
        let cors = Cors::permissive();

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check (GET and HEAD — uptime pingers use both)
            .route("/", web::get().to(api::health::home))
            .route("/", web::head().to(api::health::home))
            // Telegram webhook: the path segment is the secret, no bearer auth
            .route(
                "/webhook/{token}",
                web::post().to(api::webhook::telegram_webhook),
            )
            // Protected API — bearer token verified by the auth middleware
            .service(
                web::scope("")
                    .wrap(middleware::AuthMiddleware)
                    .route("/registerUser", web::post().to(api::users::register_user))
                    .route("/getUser", web::get().to(api::users::get_user))
                    .route("/addReminder", web::post().to(api::reminders::add_reminder))
                    .route("/getReminders", web::get().to(api::reminders::get_reminders))
                    .route(
                        "/deleteReminder/{id}",
                        web::delete().to(api::reminders::delete_reminder),
                    ),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
