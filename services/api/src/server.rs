use crate::cli::ServeArgs;
use crate::infra::{load_directory, spawn_ticker, AppState, TICK_PERIOD};
use crate::routes::with_wizard_routes;
use admission_wizard::config::AppConfig;
use admission_wizard::error::AppError;
use admission_wizard::telemetry;
use admission_wizard::workflows::wizard::{SystemClock, TracingPresenter, WizardController};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = Arc::new(load_directory(&config.wizard, None)?);
    let wizard = Arc::new(Mutex::new(WizardController::new(
        Arc::new(SystemClock::new()),
        TracingPresenter,
        directory,
        config.wizard.clone(),
    )));
    spawn_ticker(wizard.clone(), TICK_PERIOD);

    let app = with_wizard_routes(wizard)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admission fee wizard ready");

    axum::serve(listener, app).await?;
    Ok(())
}
