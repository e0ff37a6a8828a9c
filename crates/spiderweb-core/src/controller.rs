// ── Controller abstraction ──
//
// Full lifecycle management for a backend session. Handles authentication,
// the initial fetch waterfall, alert polling, command routing, and reactive
// data streaming through the DataStore.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use spiderweb_api::{ApiClient, TlsMode, TransportConfig};

use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::{AuthCredentials, BackendConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{Alert, CoreDevice, CoreSite, EndSite, Link, Network};
use crate::orchestrator;
use crate::store::{CollectionStatus, DataStore};
use crate::stream::EntityStream;

const COMMAND_CHANNEL_SIZE: usize = 64;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Manages the full session
/// lifecycle: authentication, the initial topology waterfall, background
/// alert polling, command routing, and reactive entity streaming.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: BackendConfig,
    store: Arc<DataStore>,
    client: ApiClient,
    connection_state: watch::Sender<ConnectionState>,
    command_tx: Mutex<mpsc::Sender<CommandEnvelope>>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    /// Whether the command processor task is draining the channel. When it
    /// is not (oneshot CLI mode), `execute()` dispatches directly.
    processor_running: AtomicBool,
    cancel: CancellationToken,
    /// Child token for the current session -- cancelled on logout,
    /// replaced on reconnect (avoids permanent cancellation).
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a new Controller from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to authenticate and start
    /// background tasks.
    pub fn new(config: BackendConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = ApiClient::new(config.url.clone(), &transport)?;

        let store = Arc::new(DataStore::new());
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                store,
                client,
                connection_state,
                command_tx: Mutex::new(command_tx),
                command_rx: Mutex::new(Some(command_rx)),
                processor_running: AtomicBool::new(false),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    /// Access the underlying DataStore.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect to the backend: authenticate, run the initial fetch
    /// waterfall, and spawn background tasks (alert poll, command
    /// processor).
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        // Fresh child token for this session (supports reconnect).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        if let Err(e) = self.authenticate().await {
            let _ = self.inner.connection_state.send(ConnectionState::Failed);
            return Err(e);
        }

        // Initial data load. Per-collection failures land in the status
        // cells; only auth expiry is fatal here.
        if let Err(e) = orchestrator::run(&self.inner.client, &self.inner.store).await {
            let _ = self.inner.connection_state.send(ConnectionState::Failed);
            return Err(e);
        }

        // Spawn background tasks
        let mut handles = self.inner.task_handles.lock().await;

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let ctrl = self.clone();
            self.inner.processor_running.store(true, Ordering::Release);
            handles.push(tokio::spawn(command_processor_task(ctrl, rx)));
        }

        let interval = self.inner.config.alert_poll_interval;
        if !interval.is_zero() {
            let ctrl = self.clone();
            let cancel = child.clone();
            handles.push(tokio::spawn(alert_poll_task(ctrl, interval, cancel)));
        }

        let _ = self.inner.connection_state.send(ConnectionState::Connected);
        info!("connected to backend");
        Ok(())
    }

    /// Perform only the login exchange and hand back the issued session
    /// token (for the CLI to cache). No data is fetched.
    pub async fn login(config: BackendConfig) -> Result<secrecy::SecretString, CoreError> {
        let AuthCredentials::Credentials { username, password } = &config.auth else {
            return Err(CoreError::Config {
                message: "login requires username/password credentials".into(),
            });
        };
        let transport = build_transport(&config);
        let client = ApiClient::new(config.url.clone(), &transport)?;
        let token = client.login(username, password).await?;
        Ok(token)
    }

    /// Lightweight fire-and-forget mode for single CLI invocations:
    /// authenticate and load data, but spawn no background tasks.
    pub async fn oneshot(config: BackendConfig) -> Result<Self, CoreError> {
        let ctrl = Self::new(config)?;
        ctrl.authenticate().await?;
        orchestrator::run(&ctrl.inner.client, &ctrl.inner.store).await?;
        let _ = ctrl.inner.connection_state.send(ConnectionState::Connected);
        Ok(ctrl)
    }

    /// Explicit user retry: restart the fetch waterfall from stage 1.
    /// Already-populated collections stay visible while stages re-run.
    pub async fn retry(&self) -> Result<(), CoreError> {
        info!("user retry -- restarting fetch waterfall");
        orchestrator::run(&self.inner.client, &self.inner.store).await
    }

    /// End the session: cancel background tasks, discard the session
    /// token, and reset every collection to its initial empty/idle state.
    pub async fn logout(&self) {
        self.inner.cancel_child.lock().await.cancel();
        for handle in self.inner.task_handles.lock().await.drain(..) {
            handle.abort();
        }
        self.inner.processor_running.store(false, Ordering::Release);

        // Fresh command channel so a later reconnect gets a processor.
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        *self.inner.command_tx.lock().await = command_tx;
        *self.inner.command_rx.lock().await = Some(command_rx);

        self.inner.client.logout();
        self.inner.store.reset();
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        info!("logged out, store reset");
    }

    /// Authenticate per the configured credentials. Token auth installs
    /// the stored token; credential auth performs the login exchange.
    async fn authenticate(&self) -> Result<(), CoreError> {
        match &self.inner.config.auth {
            AuthCredentials::Token(token) => {
                self.inner.client.set_token(token.clone());
                debug!("installed stored session token");
            }
            AuthCredentials::Credentials { username, password } => {
                self.inner.client.login(username, password).await?;
                debug!("session authentication successful");
            }
        }
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Execute a mutation. Routed through the command channel when the
    /// processor is running (TUI mode); dispatched inline otherwise.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        if self.inner.processor_running.load(Ordering::Acquire) {
            let (response_tx, response_rx) = oneshot::channel();
            let sender = self.inner.command_tx.lock().await.clone();
            sender
                .send(CommandEnvelope {
                    command,
                    response_tx,
                })
                .await
                .map_err(|_| CoreError::Internal("command channel closed".into()))?;
            response_rx
                .await
                .map_err(|_| CoreError::Internal("command dropped without response".into()))?
        } else {
            self.dispatch(command).await
        }
    }

    /// Perform one command against the backend + store. Mutations are
    /// pessimistic: backend first, then a scoped re-fetch of the affected
    /// stage so derived data refreshes.
    async fn dispatch(&self, command: Command) -> Result<CommandResult, CoreError> {
        let client = &self.inner.client;
        let store = &self.inner.store;

        match command {
            Command::AddCoreSite(req) => {
                client.add_core_site(&(&req).into()).await?;
                orchestrator::refetch_core_sites(client, store, &req.network_id).await?;
                Ok(CommandResult::Ok)
            }
            Command::DeleteCoreSite { id, network_id } => {
                client.delete_core_site(&(&id).into()).await?;
                orchestrator::refetch_core_sites(client, store, &network_id).await?;
                Ok(CommandResult::Ok)
            }
            Command::AddCoreDevice(req) => {
                client.add_core_device(&(&req).into()).await?;
                orchestrator::refetch_core_devices(client, store, &req.core_site_id).await?;
                Ok(CommandResult::Ok)
            }
            Command::DeleteCoreDevice { id, core_site_id } => {
                client.delete_core_device(&(&id).into()).await?;
                orchestrator::refetch_core_devices(client, store, &core_site_id).await?;
                Ok(CommandResult::Ok)
            }
            Command::ToggleAlertFavorite { id } => match store.toggle_alert_favorite(&id) {
                Some(is_favorite) => Ok(CommandResult::Favorite { id, is_favorite }),
                None => Err(CoreError::NotFound {
                    entity_type: "alert".into(),
                    identifier: id.to_string(),
                }),
            },
            Command::RefreshAlerts => {
                orchestrator::load_alerts(client, store, false).await?;
                Ok(CommandResult::Ok)
            }
            Command::Reload => {
                orchestrator::run(client, store).await?;
                Ok(CommandResult::Ok)
            }
        }
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    pub fn networks(&self) -> EntityStream<Network> {
        self.inner.store.subscribe_networks()
    }

    pub fn core_sites(&self) -> EntityStream<CoreSite> {
        self.inner.store.subscribe_core_sites()
    }

    pub fn core_devices(&self) -> EntityStream<CoreDevice> {
        self.inner.store.subscribe_core_devices()
    }

    pub fn links(&self) -> EntityStream<Link> {
        self.inner.store.subscribe_links()
    }

    pub fn end_sites(&self) -> EntityStream<EndSite> {
        self.inner.store.subscribe_end_sites()
    }

    pub fn alerts(&self) -> EntityStream<Alert> {
        self.inner.store.subscribe_alerts()
    }

    pub fn statuses(&self) -> [watch::Receiver<CollectionStatus>; 6] {
        let store = &self.inner.store;
        [
            store.subscribe_networks_status(),
            store.subscribe_core_sites_status(),
            store.subscribe_core_devices_status(),
            store.subscribe_links_status(),
            store.subscribe_end_sites_status(),
            store.subscribe_alerts_status(),
        ]
    }
}

// ── Background tasks ────────────────────────────────────────────────

/// Drains the command channel, dispatching each mutation in turn. A single
/// consumer keeps backend writes serialized.
async fn command_processor_task(ctrl: Controller, mut rx: mpsc::Receiver<CommandEnvelope>) {
    while let Some(envelope) = rx.recv().await {
        let result = ctrl.dispatch(envelope.command).await;
        // Receiver may have given up (e.g. view unmounted); that's fine.
        let _ = envelope.response_tx.send(result);
    }
    debug!("command processor stopped");
}

/// Re-fetches alerts on a fixed interval for the lifetime of the session.
async fn alert_poll_task(ctrl: Controller, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick completes immediately; the initial load already
    // fetched alerts, so skip it.
    ticker.tick().await;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) =
                    orchestrator::load_alerts(&ctrl.inner.client, &ctrl.inner.store, false).await
                {
                    warn!(error = %e, "alert poll failed");
                }
            }
        }
    }
    debug!("alert poll task stopped");
}

// ── Helpers ─────────────────────────────────────────────────────────

fn build_transport(config: &BackendConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}
