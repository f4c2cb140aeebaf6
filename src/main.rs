//! Contacts API Server
//!
//! Binds the HTTP server with every endpoint enabled. Configuration comes
//! from the environment (and a `.env` file when present); optional
//! integrations such as SMTP delivery and avatar hosting degrade gracefully
//! when unconfigured.

use std::net::SocketAddr;

use dotenv::dotenv;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use contacts_api::{
    api::{create_router, AppState},
    config::AppConfig,
    database::create_pool,
    service::{
        AvatarService, ContactService, Mailer, RateLimiter, TokenService, UserService,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv().ok();

    env_logger::init();

    log::info!("🚀 Starting Contacts API v{}", contacts_api::VERSION);

    // Load configuration from environment
    let config = AppConfig::from_env()?;
    config.validate()?;

    log::info!("✅ Configuration loaded and validated");

    let database_pool = create_pool(&config.database).await?;

    log::info!("🔄 Running database migrations...");
    sqlx::migrate!("./migrations").run(&database_pool).await?;
    log::info!("✅ Database migrations completed");

    // Core services
    let user_service = UserService::new(database_pool.clone());
    let contact_service = ContactService::new(database_pool.clone());
    let token_service = TokenService::with_ttl(
        config.auth.secret_key.clone(),
        chrono::Duration::minutes(config.auth.access_token_expire_minutes),
    );
    let rate_limiter = RateLimiter::new(&config.rate_limit);

    // Optional integrations
    let mailer = Mailer::start(config.mail.clone(), &config.server.base_url)?;
    let avatar = AvatarService::new(config.cloudinary.clone());

    log::info!("✅ Services initialized");
    log::info!("   - Mail delivery: {}", config.mail.is_some());
    log::info!("   - Avatar hosting: {}", config.cloudinary.is_some());
    log::info!(
        "   - Rate limit: {} requests per {}s",
        config.rate_limit.max_requests,
        config.rate_limit.window_seconds
    );

    let app_state = AppState {
        user_service,
        contact_service,
        token_service,
        mailer,
        avatar,
        rate_limiter,
    };

    let app = create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .into_inner(),
    );

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    log::info!("🌐 Listening on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
