//! Auto-refresh against a real vault on disk

mod common;

use common::mutual_pair_vault;
use moc_explorer::{ExplorerView, RefreshController, Settings, ViewState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;

fn watching_settings() -> Settings {
    Settings {
        moc_folder_path: "Atlas/Maps".to_string(),
        auto_refresh: true,
        refresh_debounce_ms: 100,
        ..Settings::default()
    }
}

async fn wait_for(
    updates: &mut watch::Receiver<Arc<ViewState>>,
    done: impl Fn(&ViewState) -> bool,
) -> Arc<ViewState> {
    timeout(Duration::from_secs(5), async {
        loop {
            {
                let state = updates.borrow_and_update();
                if done(&state) {
                    return Arc::clone(&state);
                }
            }
            updates.changed().await.expect("controller dropped");
        }
    })
    .await
    .expect("no refresh within 5s")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn new_moc_shows_up_after_quiet_period() {
    let vault = mutual_pair_vault();
    let controller = Arc::new(RefreshController::new(Arc::new(vault.store()), ""));
    let mut view = ExplorerView::new(Arc::clone(&controller), watching_settings());
    view.on_open().await.unwrap();
    assert!(view.is_auto_refreshing());
    assert_eq!(view.state().snapshot.node_count(), 3);

    let mut updates = controller.subscribe();
    vault.write("Atlas/Maps/D.md", "# D\n\nLinks to [[A]].\n");

    let state = wait_for(&mut updates, |s| s.snapshot.node_count() == 4).await;
    let a = state.snapshot.find("A").unwrap();
    assert_eq!(a.inlinks(), ["Atlas/Maps/B.md", "Atlas/Maps/D.md"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deleted_moc_disappears() {
    let vault = mutual_pair_vault();
    let controller = Arc::new(RefreshController::new(Arc::new(vault.store()), ""));
    let mut view = ExplorerView::new(Arc::clone(&controller), watching_settings());
    view.on_open().await.unwrap();

    let mut updates = controller.subscribe();
    std::fs::remove_file(vault.root().join("Atlas/Maps/B.md")).unwrap();

    let state = wait_for(&mut updates, |s| s.snapshot.node_count() == 2).await;
    assert_eq!(state.snapshot.link_count(), 0);
    assert_eq!(state.stats.orphans, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn changes_outside_the_folder_are_ignored() {
    let vault = mutual_pair_vault();
    let controller = Arc::new(RefreshController::new(Arc::new(vault.store()), ""));
    let mut view = ExplorerView::new(Arc::clone(&controller), watching_settings());
    view.on_open().await.unwrap();
    let runs = controller.pipeline_runs();

    vault.write("Notes/tomorrow.md", "[[A]]");
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(controller.pipeline_runs(), runs);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn closing_the_view_stops_watching() {
    let vault = mutual_pair_vault();
    let controller = Arc::new(RefreshController::new(Arc::new(vault.store()), ""));
    let mut view = ExplorerView::new(Arc::clone(&controller), watching_settings());
    view.on_open().await.unwrap();
    view.on_close();
    assert!(!view.is_auto_refreshing());
    let runs = controller.pipeline_runs();

    vault.write("Atlas/Maps/D.md", "[[A]]");
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(controller.pipeline_runs(), runs);
    assert_eq!(controller.current().snapshot.node_count(), 3);
}
