use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use courier_mail_service::config::Settings;
use courier_mail_service::mailer::Mailer;
use courier_mail_service::server::{create_app, AppState};
use courier_mail_service::template::TemplateStore;
use courier_mail_service::transport::SmtpMailTransport;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Load configuration
    let settings = Settings::new()?;
    tracing::info!("Configuration loaded");

    // Load email templates
    let templates = TemplateStore::from_directory(&settings.templates.dir)
        .with_context(|| format!("failed to load templates from {}", settings.templates.dir))?;
    tracing::info!(
        count = templates.len(),
        dir = %settings.templates.dir,
        "Email templates loaded"
    );

    // Build the pooled SMTP transport
    let transport =
        Arc::new(SmtpMailTransport::new(&settings.smtp).context("failed to build SMTP transport")?);
    tracing::info!(
        host = %settings.smtp.host,
        port = settings.smtp.port,
        pool_max_size = settings.smtp.pool_max_size,
        "SMTP transport ready"
    );

    let mailer = Arc::new(Mailer::new(
        Arc::new(templates),
        transport,
        &settings.sender,
        &settings.retry,
    ));

    // Create application state and Axum app
    let state = AppState::new(settings.clone(), mailer);
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
