use actix_web::{get, http::header, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    sync::{atomic::{AtomicI64, Ordering}, RwLock},
    time::Duration,
};
use sysinfo::System;
use tracing::{instrument, warn};

use crate::{constants::START_TIME, repositories::system::DiagnosticTable, AppState};

const HEALTH_CACHE_SECS: i64 = 5;

#[derive(Serialize, Clone, Default)]
struct SystemInfo {
    os: String,
    kernel: String,
    hostname: String,
    cpu_count: usize,
    memory_total: String,
}

#[derive(Serialize, Clone, Default)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    database: String,
    version: String,
    memory_usage: String,
    system: SystemInfo,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_STATUS: Lazy<RwLock<HealthCheckResponse>> = Lazy::new(||
    RwLock::new(HealthCheckResponse::default())
);

async fn build_health_response(state: &web::Data<AppState>) -> HealthCheckResponse {
    let now_utc = Utc::now();
    let uptime_secs = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;
    let human_uptime = format_duration(Duration::from_secs(uptime_secs));

    let mut sys = System::new_all();
    sys.refresh_all();

    let system_info = SystemInfo {
        os: System::name().unwrap_or_else(|| "Unknown".to_string()),
        kernel: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
        hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        cpu_count: sys.cpus().len(),
        memory_total: format!("{:.2} GB", sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0),
    };

    let db_status = match state.system_repo.check_connection().await {
        Ok(_) => "OK",
        Err(e) => {
            warn!(error = %e, "Health check could not reach the database");
            "Unavailable"
        }
    };

    let memory_usage = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or("Unknown".to_string(), |p| {
            format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0)
        });

    HealthCheckResponse {
        status: if db_status == "OK" { "healthy" } else { "degraded" }.to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        memory_usage,
        database: db_status.to_string(),
        system: system_info,
    }
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();
    let last = LAST_CHECK.load(Ordering::Relaxed);

    if now - last > HEALTH_CACHE_SECS {
        let response = build_health_response(&state).await;

        if let Ok(mut cache) = CACHED_STATUS.write() {
            *cache = response.clone();
            LAST_CHECK.store(now, Ordering::Relaxed);
        }

        HttpResponse::Ok().json(response)
    } else {
        match CACHED_STATUS.read() {
            Ok(response) => HttpResponse::Ok().json(response.clone()),
            Err(e) => {
                warn!("HealthCheck cache lock poisoned: {}", e);
                let response = build_health_response(&state).await;
                HttpResponse::Ok().json(response)
            }
        }
    }
}

#[derive(Serialize)]
struct ConnectionReport {
    success: bool,
    message: String,
    tables: BTreeMap<&'static str, TableReport>,
}

#[derive(Serialize)]
struct TableReport {
    rows: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Database reachability plus row counts of the about tables.
#[instrument(skip(state))]
pub async fn test_connection(state: web::Data<AppState>) -> HttpResponse {
    if let Err(e) = state.system_repo.check_connection().await {
        warn!(error = %e, "Connection diagnostics failed");
        return HttpResponse::ServiceUnavailable().json(ConnectionReport {
            success: false,
            message: "Database connection failed".to_string(),
            tables: BTreeMap::new(),
        });
    }

    let mut tables = BTreeMap::new();
    for table in DiagnosticTable::ALL {
        let report = match state.system_repo.count_rows(table).await {
            Ok(rows) => TableReport { rows: Some(rows), error: None },
            Err(e) => {
                warn!(table = table.table_name(), error = %e, "Could not count rows");
                TableReport { rows: None, error: Some("Table not readable".to_string()) }
            }
        };
        tables.insert(table.table_name(), report);
    }

    HttpResponse::Ok().json(ConnectionReport {
        success: true,
        message: "Database connection successful".to_string(),
        tables,
    })
}

/// The site root lands on the home page.
#[get("/")]
pub async fn root_redirect() -> impl Responder {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/home.html"))
        .finish()
}
