//! Reusable ParkWatch Pass server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! metrics recorder, wiring of the booking/scan/chat/feedback services,
//! REST API, idle-session eviction and graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{error, info, warn};

use crate::application::{
    start_session_eviction_task, BookingWorkflow, ChatbotService, FeedbackService, ScanSimulator,
    SessionRegistry, SharedSessionRegistry,
};
use crate::config::{AppConfig, ConfigError};
use crate::domain::ports::TextGenerator;
use crate::infrastructure::{DisabledGenerator, GeminiGenerator, InMemoryCatalog, SeededRandom};
use crate::interfaces::http::{create_api_router, ParkWatchState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the server.
#[derive(Default)]
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running ParkWatch Pass server.
///
/// # Examples
///
/// ```rust,no_run
/// use parkwatch::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     // ... wait for shutdown signal ...
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Live booking sessions.
    pub sessions: SharedSessionRegistry,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Port the REST API is listening on.
    pub port: u16,

    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
    eviction_task: JoinHandle<()>,
}

impl ServerHandle {
    /// Start the server with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus metrics recorder
    /// 2. Build the catalog, session registry and services from config
    /// 3. Start the idle-session eviction task
    /// 4. Start the REST API server (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let config = opts.config;
        config.validate()?;

        info!("Starting ParkWatch Pass...");

        let prometheus_handle = prometheus_handle();

        let sessions = SessionRegistry::shared();
        let state = build_state(&config, sessions.clone())?;

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── Background tasks ───────────────────────────────────
        let eviction_task = start_session_eviction_task(
            sessions.clone(),
            shutdown_signal.clone(),
            Duration::from_secs(config.booking.session_sweep_interval_secs),
            Duration::from_secs(config.booking.session_idle_timeout_secs),
        );

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(state, prometheus_handle);

        let addr = config.address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();
        info!("REST API server listening on http://{}", addr);
        info!("Swagger UI available at http://{}/docs/", addr);

        let api_shutdown = shutdown_signal.notified();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 ParkWatch Pass started.");

        Ok(Self {
            sessions,
            config,
            port,
            shutdown,
            api_task,
            eviction_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to fully stop after shutdown has been triggered.
    ///
    /// Gives up after `server.shutdown_timeout` seconds.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");

        let Self {
            shutdown,
            api_task,
            eviction_task,
            sessions,
            ..
        } = self;

        let finished = shutdown
            .shutdown_with_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
                if let Err(e) = eviction_task.await {
                    error!("Session eviction task panicked: {}", e);
                }
            })
            .await;
        if !finished {
            warn!("Server tasks did not stop in time");
        }

        info!(
            open_sessions = sessions.count(),
            "👋 ParkWatch Pass shutdown complete"
        );
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down ParkWatch Pass...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global metrics recorder can only be installed once per process;
/// a restart within the same process reuses it. `None` if installation failed.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
                None
            }
        })
        .clone()
}

/// Wire catalog, generator and services from config.
pub fn build_state(
    config: &AppConfig,
    sessions: SharedSessionRegistry,
) -> Result<ParkWatchState, Box<dyn std::error::Error>> {
    let mut catalog = InMemoryCatalog::standard();
    for (location_id, spots) in &config.booking.occupied_spots {
        catalog = catalog.try_with_occupied(location_id, spots).map_err(|e| {
            ConfigError::Invalid(format!("booking.occupied_spots.{}: {}", location_id, e))
        })?;
    }
    info!(locations = catalog.len(), "Location catalog loaded");

    let generator: Arc<dyn TextGenerator> = match config.chatbot_api_key() {
        Some(key) => {
            info!(model = config.chatbot.model.as_str(), "Chatbot backed by hosted model");
            Arc::new(GeminiGenerator::new(
                &config.chatbot.base_url,
                &config.chatbot.model,
                key,
                Duration::from_secs(config.chatbot.timeout_secs),
            )?)
        }
        None => {
            warn!("No chatbot API key configured; chatbot will answer with a fallback message");
            Arc::new(DisabledGenerator)
        }
    };

    let workflow = Arc::new(BookingWorkflow::new(
        sessions,
        Arc::new(catalog),
        Duration::from_millis(config.booking.payment_delay_ms),
    ));
    let scanner = Arc::new(ScanSimulator::new(
        Arc::new(SeededRandom::new(config.scanner.seed)),
        Duration::from_millis(config.scanner.delay_ms),
        config.scanner.success_probability,
    ));
    let chatbot = Arc::new(ChatbotService::new(
        generator,
        config.chatbot.max_history_turns,
    ));
    let feedback = Arc::new(FeedbackService::new(Duration::from_millis(
        config.feedback.delay_ms,
    )));

    Ok(ParkWatchState::new(workflow, scanner, chatbot, feedback))
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_honours_occupied_spots_from_config() {
        let config = AppConfig::from_toml("[booking.occupied_spots]\npw_a1 = [\"a1\", \"C3\"]").unwrap();
        let state = build_state(&config, SessionRegistry::shared()).unwrap();
        let board = state.workflow.spot_board("pw_a1").unwrap();
        let occupied: Vec<String> = board
            .rows
            .iter()
            .flatten()
            .filter(|s| s.occupied)
            .map(|s| s.spot.to_string())
            .collect();
        assert_eq!(occupied, vec!["A1", "C3"]);
    }

    #[test]
    fn occupied_spot_typos_are_rejected() {
        for toml in [
            "[booking.occupied_spots]\npw_zz = [\"A1\"]",
            "[booking.occupied_spots]\npw_a1 = [\"Q9\"]",
        ] {
            let config = AppConfig::from_toml(toml).unwrap();
            assert!(build_state(&config, SessionRegistry::shared()).is_err());
        }
    }

    #[tokio::test]
    async fn start_and_shutdown() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        let reserved = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        config.server.port = reserved.local_addr().unwrap().port();
        drop(reserved);

        let handle = ServerHandle::start(ServerOptions { config }).await.unwrap();
        assert!(handle.is_running());
        assert!(handle.sessions.is_empty());
        handle.shutdown().await;
    }
}
