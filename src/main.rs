use std::{sync::Arc, time::Duration};

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use portfolio_site::{
    db::mysql::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    mail::{smtp::SmtpContactNotifier, ContactNotifier, DisabledNotifier},
    middlewares::cors::cors_policy,
    routes::configure_routes,
    settings::{AppConfig, LogFormat},
    shared_repos::SharedRepositories,
    site::client::HttpContentSource,
    AppState,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

const LIMITER_EVICTION_INTERVAL: Duration = Duration::from_secs(30);

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn build_notifier(config: &AppConfig) -> Arc<dyn ContactNotifier> {
    match &config.smtp {
        Some(smtp) => match SmtpContactNotifier::new(smtp) {
            Ok(notifier) => {
                tracing::info!(host = %smtp.host, "Contact notifications go through SMTP");
                Arc::new(notifier)
            }
            Err(e) => {
                tracing::error!("SMTP setup failed, notifications disabled: {}", e);
                Arc::new(DisabledNotifier)
            }
        },
        None => {
            tracing::warn!("SMTP is not configured; contact notifications are disabled");
            Arc::new(DisabledNotifier)
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to create database connection pool")?;

    if config.run_migrations {
        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
    }

    let source = HttpContentSource::new(&config.content_api_url(), config.loader_timeout())
        .map_err(|e| anyhow::anyhow!("Invalid content API URL: {}", e))?;

    let app_state = web::Data::new(AppState::new(
        &config,
        SharedRepositories::new(pool),
        build_notifier(&config),
        Arc::new(source),
    ));

    let eviction = app_state.contact_limiter.spawn_eviction(LIMITER_EVICTION_INTERVAL);

    let server_addr = config.server_addr();
    let api_base = config.api_base_path.clone();
    let origins = config.cors_origins();

    tracing::info!(
        "🚀 Starting {} v{} on {} (content API at {})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        api_base
    );

    let server = HttpServer::new(move || {
        let api_base = api_base.clone();
        App::new()
            .app_data(app_state.clone())
            .wrap(cors_policy(&origins))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(move |cfg| configure_routes(cfg, &api_base))
    })
    .workers(config.worker_count)
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run();

    let result = tokio::select! {
        res = server => res.context("Server error"),
        _ = shutdown_signal() => Ok(()),
    };

    eviction.abort();
    result
}
