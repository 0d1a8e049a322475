//! Explorer panel
//!
//! The command surface a host shell drives: lifecycle hooks, toolbar
//! commands (refresh, filter, search) and pointer events. The view keeps
//! only presentation state; the graph itself is owned by the
//! [`RefreshController`] and read one published version at a time.

use crate::config::Settings;
use crate::error::{ExplorerError, ExplorerResult};
use crate::graph::NodeId;
use crate::layout::Point;
use crate::refresh::{AutoRefresh, RefreshController, RefreshOutcome, ViewState};
use crate::render::{GraphStats, Interaction, Scene, SceneStyle, Tooltip, TypeFilter, ViewFilter};
use std::sync::Arc;
use tracing::{debug, warn};

/// View type identifier registered with the host
pub const VIEW_TYPE: &str = "moc-explorer-view";
/// Panel title
pub const DISPLAY_TEXT: &str = "MOC Explorer";

fn filter_for(settings: &Settings) -> ViewFilter {
    ViewFilter::default().with_minimum_connections(settings.minimum_connections as usize)
}

pub struct ExplorerView {
    controller: Arc<RefreshController>,
    settings: Settings,
    filter: ViewFilter,
    interaction: Interaction,
    auto_refresh: Option<AutoRefresh>,
    open: bool,
}

impl std::fmt::Debug for ExplorerView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerView")
            .field("open", &self.open)
            .field("filter", &self.filter)
            .field("auto_refresh", &self.auto_refresh.is_some())
            .finish()
    }
}

impl ExplorerView {
    pub fn new(controller: Arc<RefreshController>, settings: Settings) -> Self {
        let settings = settings.normalized();
        controller.set_folder(settings.moc_folder_path.clone());
        Self {
            controller,
            filter: filter_for(&settings),
            settings,
            interaction: Interaction::new(),
            auto_refresh: None,
            open: false,
        }
    }

    pub fn view_type(&self) -> &'static str {
        VIEW_TYPE
    }

    pub fn display_text(&self) -> &'static str {
        DISPLAY_TEXT
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    pub fn controller(&self) -> &Arc<RefreshController> {
        &self.controller
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.auto_refresh.is_some()
    }

    /// Initial scan, then auto-refresh when enabled. A failed scan is
    /// reported but does not keep auto-refresh from starting.
    pub async fn on_open(&mut self) -> ExplorerResult<RefreshOutcome> {
        self.open = true;
        let outcome = self.controller.refresh().await;
        if self.settings.auto_refresh {
            self.start_auto_refresh().await?;
        }
        outcome
    }

    pub fn on_close(&mut self) {
        self.open = false;
        self.auto_refresh = None;
        self.interaction.hover_leave();
        debug!("explorer view closed");
    }

    pub async fn refresh(&self) -> ExplorerResult<RefreshOutcome> {
        self.controller.refresh().await
    }

    async fn start_auto_refresh(&mut self) -> ExplorerResult<()> {
        self.auto_refresh = None;
        let handle = self
            .controller
            .spawn_auto_refresh(self.settings.debounce())
            .await?;
        self.auto_refresh = Some(handle);
        Ok(())
    }

    pub fn filter_by_type(&mut self, type_filter: TypeFilter) {
        self.filter.type_filter = type_filter;
        self.interaction.hover_leave();
        self.controller
            .notifier()
            .notify(&format!("Filtering by: {type_filter}"));
    }

    pub fn search(&mut self, query: &str) {
        self.filter.set_search(query);
        self.controller
            .notifier()
            .notify(&format!("Searching for: {query}"));
    }

    /// Latest published state
    pub fn state(&self) -> Arc<ViewState> {
        self.controller.current()
    }

    /// What to draw for the latest state under the current filter
    pub fn scene(&self) -> Scene {
        let state = self.controller.current();
        Scene::build(
            &state.snapshot,
            &state.layout,
            &self.filter,
            &SceneStyle::from(&self.settings),
        )
    }

    /// Statistics of the whole latest snapshot, regardless of filters
    pub fn stats(&self) -> GraphStats {
        self.controller.current().stats
    }

    /// Open the document behind a node
    pub async fn click(&self, id: &NodeId) -> ExplorerResult<()> {
        let state = self.controller.current();
        let node = state
            .snapshot
            .node(id)
            .ok_or_else(|| ExplorerError::MocNotFound(id.to_string()))?;
        self.controller.store().open_document(&node.path).await?;
        Ok(())
    }

    /// Click at a screen position; returns the node opened, if any
    pub async fn click_at(&self, point: Point) -> ExplorerResult<Option<NodeId>> {
        let Some(id) = self.scene().node_at(point).map(|m| m.id.clone()) else {
            return Ok(None);
        };
        self.click(&id).await?;
        Ok(Some(id))
    }

    /// Open a MOC by path or name
    pub async fn open_by_name(&self, path_or_name: &str) -> ExplorerResult<()> {
        let state = self.controller.current();
        let node = state
            .snapshot
            .find(path_or_name)
            .ok_or_else(|| ExplorerError::MocNotFound(path_or_name.to_string()))?;
        self.controller.store().open_document(&node.path).await?;
        Ok(())
    }

    /// Show the tooltip of a visible node, replacing any other
    pub fn hover_enter(&mut self, id: &NodeId) -> Option<&Tooltip> {
        let scene = self.scene();
        let marker = scene.marker(id)?;
        Some(self.interaction.hover_enter(marker))
    }

    pub fn hover_leave(&mut self) -> Option<Tooltip> {
        self.interaction.hover_leave()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.interaction.tooltip()
    }

    /// Apply new settings. A folder change rescans; auto-refresh restarts
    /// when the open view's watch options changed.
    pub async fn update_settings(&mut self, settings: Settings) -> ExplorerResult<()> {
        let settings = settings.normalized();
        let previous = std::mem::replace(&mut self.settings, settings);
        self.filter.minimum_connections = self.settings.minimum_connections as usize;

        let folder_changed = previous.moc_folder_path != self.settings.moc_folder_path;
        if folder_changed {
            self.controller
                .set_folder(self.settings.moc_folder_path.clone());
        }
        if !self.open {
            return Ok(());
        }

        let watch_changed = folder_changed
            || previous.auto_refresh != self.settings.auto_refresh
            || previous.refresh_debounce_ms != self.settings.refresh_debounce_ms;
        if watch_changed {
            if self.settings.auto_refresh {
                self.start_auto_refresh().await?;
            } else {
                self.auto_refresh = None;
            }
        }
        if folder_changed {
            if let Err(e) = self.controller.refresh().await {
                warn!(error = %e, "rescan after folder change failed");
            }
        }
        Ok(())
    }
}
