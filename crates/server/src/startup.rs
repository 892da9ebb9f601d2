use std::path::Path;
use std::sync::Arc;

use adapters::http::server::run_http_server;
use adapters::http::state::{AppState, PagingDefaults};
use adapters::storage::redb_audit_store::RedbAuditStore;
use adapters::storage::redb_customer_store::RedbCustomerRepository;
use adapters::storage::ring_audit_store::RingAuditStore;
use anyhow::Context;
use application::audit_interceptor::AuditInterceptor;
use application::audit_publisher::AuditEventPublisher;
use application::audit_query_service::AuditQueryService;
use application::customer_service_impl::CustomerAppService;
use domain::audit::action::ActionTable;
use infrastructure::config::ServiceConfig;
use infrastructure::constants::GRACEFUL_SHUTDOWN_TIMEOUT;
use infrastructure::logging::init_logging;
use infrastructure::metrics::ServiceMetrics;
use ports::secondary::audit_repository::{AuditEventRepository, OrderedAuditStore};
use ports::secondary::customer_repository::CustomerRepository;
use ports::secondary::metrics_port::MetricsPort;
use tracing::info;

use crate::cli::Cli;

/// Run the service startup sequence and block until shutdown.
pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    // ── 1. Load config ──────────────────────────────────────────────
    let config = ServiceConfig::load(Path::new(&cli.config))
        .with_context(|| format!("failed to load config from {}", cli.config))?;

    // ── 2. Initialize logging ───────────────────────────────────────
    // CLI flags take precedence over the config file
    let log_level = cli.log_level.unwrap_or(config.server.log_level);
    let log_format = cli.log_format.unwrap_or(config.server.log_format);
    init_logging(log_level, log_format)?;

    let _root_span = tracing::span!(
        tracing::Level::INFO,
        "service",
        service.name = "trailkeeper",
        service.version = env!("CARGO_PKG_VERSION"),
    )
    .entered();

    info!(
        config_path = %cli.config,
        log_level = log_level.as_str(),
        log_format = log_format.as_str(),
        "trailkeeper starting"
    );

    // ── 3. Wire stores and services ─────────────────────────────────
    let metrics = Arc::new(ServiceMetrics::new());
    let app_state = build_state(&config, metrics)?;

    // ── 4. Cancellation token ───────────────────────────────────────
    let cancel_token = crate::shutdown::create_shutdown_token();

    // ── 5. Spawn HTTP API server ────────────────────────────────────
    let http_bind = config.server.bind_address.clone();
    let http_port = config.server.http_port;
    let swagger_ui = config.server.swagger_ui;
    let http_shutdown = cancel_token.clone();
    let http_cancel = cancel_token.clone();
    let http_handle = tokio::spawn(async move {
        if let Err(e) = run_http_server(
            app_state,
            &http_bind,
            http_port,
            swagger_ui,
            http_shutdown.cancelled_owned(),
        )
        .await
        {
            tracing::error!(error = %e, "HTTP API server failed");
            http_cancel.cancel();
        }
    });

    // ── 6. Ready, wait for cancellation ─────────────────────────────
    info!("trailkeeper ready, waiting for shutdown signal");
    cancel_token.cancelled().await;

    // ── 7. Drain ────────────────────────────────────────────────────
    info!("draining HTTP connections");
    if tokio::time::timeout(GRACEFUL_SHUTDOWN_TIMEOUT, http_handle)
        .await
        .is_err()
    {
        tracing::warn!(
            timeout_secs = GRACEFUL_SHUTDOWN_TIMEOUT.as_secs(),
            "HTTP server did not drain in time"
        );
    }

    info!("trailkeeper stopped");
    Ok(())
}

/// Open both stores and build the services behind the HTTP API.
///
/// Fails when the durable audit store cannot be opened: the service does
/// not run without an audit trail.
pub fn build_state(
    config: &ServiceConfig,
    metrics: Arc<ServiceMetrics>,
) -> anyhow::Result<Arc<AppState>> {
    let audit_path = Path::new(&config.audit.storage_path);
    ensure_parent_dir(audit_path)?;
    let durable = Arc::new(
        RedbAuditStore::open(audit_path).map_err(|e| {
            anyhow::anyhow!(
                "audit store unavailable at {}, refusing to start: {e}",
                audit_path.display()
            )
        })?,
    );

    let customer_path = Path::new(&config.customers.storage_path);
    ensure_parent_dir(customer_path)?;
    let customers: Arc<dyn CustomerRepository> = Arc::new(
        RedbCustomerRepository::open(customer_path)
            .map_err(|e| anyhow::anyhow!("customer store unavailable: {e}"))?,
    );

    let ring = Arc::new(RingAuditStore::new(config.audit.ring_capacity));
    info!(
        capacity = ring.capacity(),
        "live audit cache initialized"
    );

    let port: Arc<dyn MetricsPort> = Arc::clone(&metrics) as Arc<dyn MetricsPort>;

    let publisher = Arc::new(
        AuditEventPublisher::new(
            Arc::clone(&durable) as Arc<dyn AuditEventRepository>,
            Arc::clone(&port),
        )
        .with_live_cache(Arc::clone(&ring) as Arc<dyn AuditEventRepository>),
    );
    let interceptor = Arc::new(AuditInterceptor::new(
        Arc::clone(&publisher),
        ActionTable::customers(),
    ));
    info!(
        operations = interceptor.actions().len(),
        "audit interceptor initialized"
    );

    let customer_svc = Arc::new(CustomerAppService::new(
        customers,
        interceptor,
        publisher,
        Arc::clone(&port),
    ));
    let query_svc = Arc::new(
        AuditQueryService::new(durable as Arc<dyn OrderedAuditStore>, port)
            .with_live_cache(ring as Arc<dyn AuditEventRepository>),
    );

    let paging = PagingDefaults {
        audit_page_size: config.audit.page_size,
        customer_page_size: config.customers.page_size,
        max_page_size: config.audit.max_page_size,
    };

    Ok(Arc::new(
        AppState::new(metrics, query_svc, customer_svc).with_paging(paging),
    ))
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}
