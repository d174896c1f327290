use std::process;
use std::sync::Arc;

use spurgo::{
    application::{
        dispatcher::PurgeDispatcher,
        error::AppError,
        history::HistoryService,
        repos::{EdgeSettingsRepo, HistoryRepo},
        settings::EdgeSettingsService,
    },
    config,
    infra::{
        edge::{EdgePurgeClient, TeoEdgeClient, UnavailableClient},
        error::InfraError,
        http::{self, AdminState},
        store::FileStore,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    // Serve is the only command today; parsing still validates its overrides.
    let config::Command::Serve(_) = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;
    run_serve(settings).await
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let store = Arc::new(
        FileStore::new(&settings.storage.data_dir).map_err(|err| AppError::from(InfraError::Io(err)))?,
    );
    let settings_repo: Arc<dyn EdgeSettingsRepo> = store.clone();
    let history_repo: Arc<dyn HistoryRepo> = store;

    let client: Arc<dyn EdgePurgeClient> =
        match TeoEdgeClient::new(&settings.edge, settings_repo.clone()) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                warn!(
                    target = "spurgo::startup",
                    error = %err,
                    "edge purge client unavailable; purges will fail until configuration is fixed"
                );
                Arc::new(UnavailableClient::new(err.to_string()))
            }
        };

    let site_host = settings
        .site
        .base_url
        .as_ref()
        .and_then(|url| url.host_str())
        .map(str::to_string);
    let edge_settings = EdgeSettingsService::new(settings_repo, site_host);
    let history = HistoryService::new(history_repo);
    let purge_dispatcher = Arc::new(PurgeDispatcher::new(
        client,
        edge_settings.clone(),
        history.clone(),
    ));

    let state = AdminState {
        dispatcher: purge_dispatcher,
        history,
        settings: edge_settings,
        admin_token: settings.admin.token.clone(),
    };

    if state.admin_token.is_none() {
        warn!(
            target = "spurgo::startup",
            "no admin token configured; webhook and admin routes will reject every request"
        );
    }

    let router = http::build_router(state);
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::Io(err)))?;
    info!(target = "spurgo::startup", addr = %settings.server.addr, "listening");

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
