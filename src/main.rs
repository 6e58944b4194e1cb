//! Dengue Predictor - CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dengue_predictor::{
    cases::{self, ingest::load_cases, ingest_cases, CaseStore},
    chat::ChatService,
    cli::{Args, Commands, Config, PredictArgs},
    doctor::Doctor,
    gateway::start_gateway,
    llm::build_generator,
    model::{Classifier, LogisticRegression},
    prediction::{assess, PredictionService},
    server::{start_server, AppState},
    telemetry::init_tracing,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.clone()).context("Failed to load configuration")?;

    init_tracing(args.verbosity(), &config.logging.level);

    match args.command {
        Commands::Serve { host, port } => run_serve(config, host, port).await,
        Commands::Gateway { port, backend_url } => {
            let mut gateway = config.gateway.clone();
            if let Some(port) = port {
                gateway.port = port;
            }
            if let Some(url) = backend_url {
                gateway.backend_url = url;
            }
            start_gateway(&gateway).await
        }
        Commands::Predict(predict) => run_predict(&config, &predict),
        Commands::Ingest { file } => run_ingest(&config, file).await,
        Commands::Doctor => run_doctor(config).await,
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// Load the classifier; a missing or broken model leaves the service running
/// with `/predict` answering 500.
fn load_classifier(config: &Config) -> Option<Arc<dyn Classifier>> {
    let path = config.model_path();
    match LogisticRegression::load(&path) {
        Ok(model) => {
            let info = model.info();
            info!(path = %path.display(), features = info.features, version = %info.version, "Model loaded");
            Some(Arc::new(model))
        }
        Err(error) => {
            warn!(%error, path = %path.display(), "Model not loaded; predictions unavailable");
            None
        }
    }
}

async fn connect_cases(config: &Config) -> Option<Arc<dyn CaseStore>> {
    match cases::connect_store(&config.vector_db).await {
        Ok(Some(store)) => {
            info!(backend = store.backend(), collection = %config.vector_db.collection, "Case store connected");
            Some(store)
        }
        Ok(None) => {
            info!("Case store disabled");
            None
        }
        Err(error) => {
            error!(%error, url = %config.vector_db.url, "Case store unavailable; cases will not be logged");
            None
        }
    }
}

async fn run_serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let classifier = load_classifier(&config);
    let generator = build_generator(&config.ai)?;
    if generator.is_none() {
        warn!("GOOGLE_API_KEY not set; AI assistant disabled");
    }
    let case_store = connect_cases(&config).await;

    let state = Arc::new(AppState::new(
        PredictionService::new(classifier, case_store.clone()),
        ChatService::new(generator, config.chat.max_history),
        case_store,
    ));

    start_server(state, &config.server_addr(), config.server.static_dir.as_deref()).await
}

fn run_predict(config: &Config, args: &PredictArgs) -> Result<()> {
    let path = config.model_path();
    let model = LogisticRegression::load(&path)
        .with_context(|| format!("Failed to load model from {}", path.display()))?;

    let record = args.to_request().into_record()?;
    let response = assess(&model, &record)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn run_ingest(config: &Config, file: PathBuf) -> Result<()> {
    let path = config.model_path();
    let model = LogisticRegression::load(&path)
        .with_context(|| format!("Failed to load model from {}", path.display()))?;

    let mut vector_db = config.vector_db.clone();
    vector_db.enabled = true;
    let store = cases::connect_store(&vector_db)
        .await?
        .context("Case store is not configured")?;

    let rows = load_cases(&file)
        .with_context(|| format!("Failed to read cases from {}", file.display()))?;
    let report = ingest_cases(store.as_ref(), &model, rows).await?;

    println!(
        "{} {} of {} cases stored ({} skipped)",
        "✓".green(),
        report.stored,
        report.total,
        report.skipped
    );
    Ok(())
}

async fn run_doctor(config: Config) -> Result<()> {
    let doctor = Doctor::new(config);
    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    if Doctor::overall_status(&checks) {
        println!("{}", "All critical checks passed".green());
        Ok(())
    } else {
        println!("{}", "Some checks failed".red());
        std::process::exit(1);
    }
}
