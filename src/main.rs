use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use mayday::translate::{Translator, TranslatorConfig, DEFAULT_TRANSLATE_URL};
use mayday::web::{self, AppState};
use mayday::Pipeline;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the serialized pipeline artifact
    #[arg(short, long, env = "TRIAGE_MODEL", default_value = "model.json")]
    model: PathBuf,

    /// Address the web interface listens on
    #[arg(short, long, env = "TRIAGE_LISTEN", default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Base URL of the translation service
    #[arg(long, env = "TRIAGE_TRANSLATE_URL", default_value = DEFAULT_TRANSLATE_URL)]
    translate_url: String,

    /// Seconds before an unanswered translation request falls back to the
    /// original text
    #[arg(long, default_value_t = 10)]
    translate_timeout: u64,

    /// Classify the raw input without calling the translation service
    #[arg(long)]
    no_translate: bool,

    /// Class label rendered as urgent, compared case-insensitively
    #[arg(long, default_value = "request")]
    urgent_label: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mayday::init_logger();
    let args = Args::parse();

    let pipeline = Pipeline::load(&args.model).with_context(|| {
        format!(
            "Cannot start without the pipeline artifact at {}",
            args.model.display()
        )
    })?;
    let info = pipeline.info();
    info!(
        "Pipeline ready: {} vocabulary terms, classes {:?}",
        info.vocabulary_size, info.classes
    );
    if !info
        .classes
        .iter()
        .any(|class| class.eq_ignore_ascii_case(&args.urgent_label))
    {
        warn!(
            "Urgent label '{}' is not among the artifact's classes {:?}; every message will render as not urgent",
            args.urgent_label, info.classes
        );
    }

    let translator = if args.no_translate {
        info!("Translation disabled, classifying raw input");
        None
    } else {
        info!("Translation service: {}", args.translate_url);
        Some(Translator::new(TranslatorConfig {
            base_url: args.translate_url.clone(),
            timeout: Duration::from_secs(args.translate_timeout),
            ..TranslatorConfig::default()
        })?)
    };

    let state = Arc::new(AppState {
        pipeline,
        translator,
        urgent_label: args.urgent_label,
    });
    let app = web::router(state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("Failed to bind {}", args.listen))?;
    info!("Listening on http://{}", args.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
