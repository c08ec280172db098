use std::{process, sync::Arc, time::Duration};

use prepstack::{
    application::{
        error::AppError,
        experiences::ExperienceService,
        progress::ProgressService,
        questions::QuestionService,
        repos::{ExperiencesRepo, HealthRepo, ProgressRepo, QuestionsRepo, SubjectsRepo, SubtopicsRepo},
        subjects::SubjectService,
        subtopics::SubtopicService,
    },
    cache::{CacheBackend, CacheClient, CacheInvalidator, CacheState, MemoryBackend, RemoteBackend},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AppState},
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
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let (state, cache_state) = build_application_state(repositories, &settings)?;

    let router = http::build_router(state, cache_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "prepstack::server",
        addr = %settings.server.addr,
        "listening"
    );

    serve_http(listener, router, settings.server.graceful_shutdown).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let database_url = require_database_url(&settings)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::migration(err.to_string())))?;

    info!(target = "prepstack::migrate", "migrations applied");
    Ok(())
}

fn require_database_url(settings: &config::Settings) -> Result<&str, AppError> {
    settings
        .database
        .url
        .as_deref()
        .ok_or_else(|| AppError::from(InfraError::configuration("database url is not configured")))
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = require_database_url(settings)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::migration(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_application_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<(AppState, CacheState), AppError> {
    let backend: Arc<dyn CacheBackend> = match settings.cache.remote() {
        Some((url, token)) => {
            let remote = RemoteBackend::new(url, token)
                .map_err(|err| AppError::unexpected(format!("invalid cache endpoint: {err}")))?;
            info!(target = "prepstack::cache", backend = "remote", "cache backend selected");
            Arc::new(remote)
        }
        None => {
            info!(target = "prepstack::cache", backend = "memory", "cache backend selected");
            Arc::new(MemoryBackend::new(&settings.cache))
        }
    };

    let client = CacheClient::new(backend, &settings.cache);
    let invalidator = CacheInvalidator::new(client.clone());

    let subjects_repo: Arc<dyn SubjectsRepo> = repositories.clone();
    let subtopics_repo: Arc<dyn SubtopicsRepo> = repositories.clone();
    let questions_repo: Arc<dyn QuestionsRepo> = repositories.clone();
    let experiences_repo: Arc<dyn ExperiencesRepo> = repositories.clone();
    let progress_repo: Arc<dyn ProgressRepo> = repositories.clone();
    let health_repo: Arc<dyn HealthRepo> = repositories;

    let state = AppState {
        subjects: SubjectService::new(subjects_repo, invalidator.clone()),
        subtopics: SubtopicService::new(subtopics_repo, invalidator.clone()),
        questions: QuestionService::new(questions_repo, invalidator.clone()),
        experiences: ExperienceService::new(experiences_repo, invalidator),
        progress: ProgressService::new(progress_repo),
        health: health_repo,
    };

    Ok((state, CacheState { client }))
}

async fn serve_http(
    listener: tokio::net::TcpListener,
    router: axum::Router,
    grace: Duration,
) -> Result<(), AppError> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let mut drain_rx = shutdown_rx.clone();
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            let _ = drain_rx.changed().await;
            info!(
                target = "prepstack::server",
                "shutdown signal received; draining connections"
            );
        },
    );

    let mut watchdog_rx = shutdown_rx;
    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = async {
            let _ = watchdog_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                target = "prepstack::server",
                grace_seconds = grace.as_secs(),
                "graceful shutdown window elapsed; exiting"
            );
        }
    }

    Ok(())
}
