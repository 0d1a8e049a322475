//! Refresh controller
//!
//! Owns the current view state and is the only component that runs the
//! whole pipeline: select candidates, build the graph, lay it out. Every
//! successful run publishes a new immutable, versioned [`ViewState`]; a
//! failed run publishes nothing, so readers keep seeing the last good state.

use super::debounce::Debouncer;
use crate::error::ExplorerResult;
use crate::graph::{GraphBuilder, GraphSnapshot};
use crate::layout::{CircularLayout, Layout, LayoutEngine, Viewport};
use crate::notice::{LogNotifier, Notifier};
use crate::render::GraphStats;
use crate::selector::{CorpusSelector, Selection};
use crate::storage::DocumentStore;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// One published version of the explorer's state
#[derive(Debug, Clone)]
pub struct ViewState {
    /// 0 before the first successful refresh, then 1, 2, ...
    pub version: u64,
    pub snapshot: GraphSnapshot,
    pub layout: Layout,
    pub stats: GraphStats,
    /// How the candidates were picked; `None` before the first refresh
    pub selection: Option<Selection>,
}

impl ViewState {
    fn initial(viewport: Viewport) -> Self {
        Self {
            version: 0,
            snapshot: GraphSnapshot::empty(),
            layout: Layout::new(viewport),
            stats: GraphStats::default(),
            selection: None,
        }
    }
}

/// Result of a refresh request
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The pipeline ran and published this state
    Published(Arc<ViewState>),
    /// Another refresh was in flight; it will run once more when done
    Coalesced,
}

/// Clears the in-flight flag even if the refresh future is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct RefreshController {
    store: Arc<dyn DocumentStore>,
    selector: CorpusSelector,
    builder: GraphBuilder,
    layout_engine: Arc<dyn LayoutEngine>,
    notifier: Arc<dyn Notifier>,
    folder: RwLock<String>,
    viewport: RwLock<Viewport>,
    state: watch::Sender<Arc<ViewState>>,
    next_version: AtomicU64,
    in_flight: AtomicBool,
    rerun: AtomicBool,
    pipeline_runs: AtomicU64,
}

impl std::fmt::Debug for RefreshController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshController")
            .field("folder", &self.folder())
            .field("version", &self.current().version)
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish()
    }
}

impl RefreshController {
    pub fn new(store: Arc<dyn DocumentStore>, folder: impl Into<String>) -> Self {
        let viewport = Viewport::default();
        let (state, _) = watch::channel(Arc::new(ViewState::initial(viewport)));
        Self {
            store,
            selector: CorpusSelector::new(),
            builder: GraphBuilder::new(),
            layout_engine: Arc::new(CircularLayout),
            notifier: Arc::new(LogNotifier),
            folder: RwLock::new(folder.into()),
            viewport: RwLock::new(viewport),
            state,
            next_version: AtomicU64::new(1),
            in_flight: AtomicBool::new(false),
            rerun: AtomicBool::new(false),
            pipeline_runs: AtomicU64::new(0),
        }
    }

    pub fn with_builder(mut self, builder: GraphBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_layout_engine(mut self, engine: Arc<dyn LayoutEngine>) -> Self {
        self.layout_engine = engine;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_viewport(self, viewport: Viewport) -> Self {
        *self.viewport.write().unwrap_or_else(PoisonError::into_inner) = viewport;
        self
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn folder(&self) -> String {
        self.folder
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Takes effect on the next refresh
    pub fn set_folder(&self, folder: impl Into<String>) {
        *self.folder.write().unwrap_or_else(PoisonError::into_inner) = folder.into();
    }

    pub fn viewport(&self) -> Viewport {
        *self.viewport.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change the drawing area and re-lay the current snapshot without a rescan
    pub fn set_viewport(&self, viewport: Viewport) -> Arc<ViewState> {
        *self.viewport.write().unwrap_or_else(PoisonError::into_inner) = viewport;
        let current = self.current();
        let layout = self.layout_engine.layout(&current.snapshot, viewport);
        let state = Arc::new(ViewState {
            version: self.next_version.fetch_add(1, Ordering::AcqRel),
            snapshot: current.snapshot.clone(),
            layout,
            stats: current.stats,
            selection: current.selection,
        });
        self.state.send_replace(Arc::clone(&state));
        state
    }

    /// The latest published state
    pub fn current(&self) -> Arc<ViewState> {
        Arc::clone(&self.state.borrow())
    }

    /// Receiver that sees every newly published state
    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewState>> {
        self.state.subscribe()
    }

    /// Number of pipeline executions so far, successful or not
    pub fn pipeline_runs(&self) -> u64 {
        self.pipeline_runs.load(Ordering::Acquire)
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run the pipeline and publish its result.
    ///
    /// Not re-entrant: a call made while another refresh is running returns
    /// [`RefreshOutcome::Coalesced`] at once, and the running refresh goes
    /// around once more when it finishes. Any number of coalesced calls
    /// collapse into that one extra run.
    pub async fn refresh(&self) -> ExplorerResult<RefreshOutcome> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            self.rerun.store(true, Ordering::Release);
            debug!("refresh already running, coalescing");
            return Ok(RefreshOutcome::Coalesced);
        }

        loop {
            let guard = InFlight(&self.in_flight);
            let result = self.run_pipeline().await;
            drop(guard);

            let again = self.rerun.swap(false, Ordering::AcqRel);
            if !again || self.in_flight.swap(true, Ordering::AcqRel) {
                return result.map(RefreshOutcome::Published);
            }
            debug!("re-running refresh for coalesced triggers");
        }
    }

    async fn run_pipeline(&self) -> ExplorerResult<Arc<ViewState>> {
        self.pipeline_runs.fetch_add(1, Ordering::AcqRel);
        self.notifier.notify("Scanning MOCs...");

        match self.build_state().await {
            Ok(state) => {
                self.notifier
                    .notify(&format!("Found {} MOCs", state.snapshot.node_count()));
                info!(
                    version = state.version,
                    mocs = state.stats.total_mocs,
                    links = state.stats.total_links,
                    orphans = state.stats.orphans,
                    "published MOC graph"
                );
                self.state.send_replace(Arc::clone(&state));
                Ok(state)
            }
            Err(e) => {
                error!(error = %e, "MOC refresh failed, keeping previous graph");
                self.notifier.notify(&format!("Error scanning MOCs: {e}"));
                Err(e)
            }
        }
    }

    async fn build_state(&self) -> ExplorerResult<Arc<ViewState>> {
        let folder = self.folder();
        let candidates = self.selector.select(self.store.as_ref(), &folder).await?;
        let index = self.store.link_index().await?;
        let snapshot = self
            .builder
            .build(self.store.as_ref(), &candidates.documents, &index)
            .await;
        let layout = self.layout_engine.layout(&snapshot, self.viewport());
        let stats = GraphStats::from_snapshot(&snapshot);

        Ok(Arc::new(ViewState {
            version: self.next_version.fetch_add(1, Ordering::AcqRel),
            snapshot,
            layout,
            stats,
            selection: Some(candidates.selection),
        }))
    }

    /// Prefix whose changes should trigger a refresh: the configured folder
    /// when it exists, else the whole store
    pub async fn watch_prefix(&self) -> ExplorerResult<String> {
        let folder = self.folder();
        if !folder.is_empty() && self.store.folder_exists(&folder).await? {
            Ok(folder)
        } else {
            Ok(String::new())
        }
    }

    /// Refresh after every burst of changes, once `quiet` passes without
    /// another change. Stops when the returned handle is dropped.
    pub async fn spawn_auto_refresh(
        self: &Arc<Self>,
        quiet: Duration,
    ) -> ExplorerResult<AutoRefresh> {
        let prefix = self.watch_prefix().await?;
        let mut changes = self.store.watch(&prefix)?;
        let debouncer = Arc::new(Debouncer::new(quiet));
        info!(prefix = %prefix, quiet_ms = quiet.as_millis() as u64, "auto-refresh enabled");

        let controller = Arc::clone(self);
        let scheduler = Arc::clone(&debouncer);
        let task = tokio::spawn(async move {
            while let Some(change) = changes.recv().await {
                debug!(path = %change.path, kind = ?change.kind, "MOC changed");
                let controller = Arc::clone(&controller);
                scheduler.schedule(move || async move {
                    if let Err(e) = controller.refresh().await {
                        debug!(error = %e, "auto-refresh failed");
                    }
                });
            }
            debug!("change stream closed, auto-refresh stopped");
        });

        Ok(AutoRefresh { task, debouncer })
    }
}

/// Handle to a running auto-refresh; dropping it stops watching and
/// cancels any pending refresh
#[derive(Debug)]
pub struct AutoRefresh {
    task: JoinHandle<()>,
    debouncer: Arc<Debouncer>,
}

impl AutoRefresh {
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn stop(self) {}
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.task.abort();
        self.debouncer.cancel();
    }
}
