mod api;
mod middleware;
mod proxy;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use koreanow_openai::OpenAiClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    proxy::ChatDefaults,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = koreanow_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let backend = match config.openai_api_key.as_deref() {
        Some(key) => Some(Arc::new(OpenAiClient::with_base_url(
            key,
            &config.openai_base_url,
        )?)),
        None => {
            tracing::warn!("OPENAI_API_KEY not set; chat requests will be answered with 500");
            None
        }
    };

    let defaults = ChatDefaults {
        model: config.chat_model.clone(),
        ..ChatDefaults::default()
    };
    let app = build_app(AppState {
        backend,
        defaults: Arc::new(defaults),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "chat proxy listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
