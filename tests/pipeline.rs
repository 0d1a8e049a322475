//! End-to-end pipeline tests over on-disk vaults

mod common;

use common::{mutual_pair_vault, TestVault};
use moc_explorer::notice::RecordingNotifier;
use moc_explorer::render::svg;
use moc_explorer::{
    Category, ExplorerView, MocType, RefreshController, RefreshOutcome, Selection, Settings,
    ViewState,
};
use std::sync::Arc;

fn settings(folder: &str) -> Settings {
    Settings {
        moc_folder_path: folder.to_string(),
        auto_refresh: false,
        ..Settings::default()
    }
}

fn view_for(vault: &TestVault, settings: Settings) -> (ExplorerView, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let controller = RefreshController::new(Arc::new(vault.store()), "")
        .with_notifier(notifier.clone());
    (ExplorerView::new(Arc::new(controller), settings), notifier)
}

async fn scan(view: &mut ExplorerView) -> Arc<ViewState> {
    match view.on_open().await.expect("refresh") {
        RefreshOutcome::Published(state) => state,
        RefreshOutcome::Coalesced => panic!("nothing else should be refreshing"),
    }
}

#[tokio::test]
async fn mutual_pair_with_orphan() {
    let vault = mutual_pair_vault();
    let (mut view, notifier) = view_for(&vault, settings("Atlas/Maps"));
    let state = scan(&mut view).await;

    assert_eq!(state.selection, Some(Selection::Folder));
    assert_eq!(state.snapshot.node_count(), 3);

    let mut edges: Vec<_> = state
        .snapshot
        .links
        .iter()
        .map(|l| (l.source.as_str(), l.target.as_str(), l.strength))
        .collect();
    edges.sort();
    assert_eq!(
        edges,
        vec![
            ("Atlas/Maps/A.md", "Atlas/Maps/B.md", 1),
            ("Atlas/Maps/B.md", "Atlas/Maps/A.md", 1),
        ]
    );

    let c = state.snapshot.find("C").unwrap();
    assert_eq!(c.connections(), 0);
    assert_eq!(state.stats.orphans, 1);
    assert_eq!(state.stats.average_display(), "1.3");

    // Atlas/Maps/* is two folders deep, so these are sub MOCs
    let a = state.snapshot.find("A").unwrap();
    assert_eq!((a.moc_type, a.category), (MocType::Sub, Category::General));

    assert_eq!(
        notifier.messages(),
        vec!["Scanning MOCs...".to_string(), "Found 3 MOCs".to_string()]
    );
}

#[tokio::test]
async fn missing_folder_uses_name_heuristic() {
    let vault = TestVault::new()
        .with("Project MOC.md", "[[unrelated]]")
        .with("unrelated.md", "plain note");
    let (mut view, _) = view_for(&vault, settings("Atlas/Maps"));
    let state = scan(&mut view).await;

    assert_eq!(state.selection, Some(Selection::Heuristic));
    let names: Vec<_> = state.snapshot.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Project MOC"]);
    // The outlink to a non-MOC note dangles: no edge
    assert_eq!(state.snapshot.link_count(), 0);
}

#[tokio::test]
async fn node_radius_is_clamped_by_max_node_size() {
    let links: String = (1..=20).map(|i| format!("[[Note {i}]]\n")).collect();
    let vault = TestVault::new().with("Maps/Hub.md", &links);
    let (mut view, _) = view_for(
        &vault,
        Settings {
            max_node_size: 30,
            ..settings("Maps")
        },
    );
    scan(&mut view).await;

    let scene = view.scene();
    let hub = scene.marker(&"Maps/Hub.md".into()).unwrap();
    assert_eq!(hub.connections, 20);
    assert_eq!(hub.radius, 30.0);
}

#[tokio::test]
async fn unreadable_notes_are_skipped_not_fatal() {
    let vault = mutual_pair_vault();
    std::fs::write(vault.root().join("Atlas/Maps/Broken.md"), [0xff, 0xfe, 0xfd]).unwrap();
    let (mut view, _) = view_for(&vault, settings("Atlas/Maps"));
    let state = scan(&mut view).await;

    assert_eq!(state.snapshot.node_count(), 3);
    assert_eq!(state.snapshot.skipped, vec!["Atlas/Maps/Broken.md".to_string()]);
}

#[tokio::test]
async fn links_resolve_by_path_alias_and_heading() {
    let vault = TestVault::new()
        .with("Maps/Writing MOC.md", "[[Maps/PKM MOC|knowledge]] and [tools](PKM%20MOC.md#Tools)")
        .with("Maps/PKM MOC.md", "Up: [[Writing MOC#Drafts]]")
        .with("Maps/Home.md", "![[Writing MOC]] is embedded, not linked");
    let (mut view, _) = view_for(&vault, settings("Maps"));
    let state = scan(&mut view).await;

    let writing = state.snapshot.find("Writing MOC").unwrap();
    assert_eq!(writing.outlinks(), ["PKM MOC.md", "Maps/PKM MOC"]);
    assert_eq!(writing.inlinks(), ["Maps/PKM MOC.md"]);

    let pkm = state.snapshot.find("PKM MOC").unwrap();
    assert_eq!(pkm.outlinks(), ["Writing MOC"]);
    assert_eq!(pkm.inlinks(), ["Maps/Writing MOC.md"]);

    let mut edges: Vec<_> = state
        .snapshot
        .links
        .iter()
        .map(|l| (l.source.as_str(), l.target.as_str()))
        .collect();
    edges.sort();
    assert_eq!(
        edges,
        vec![
            ("Maps/PKM MOC.md", "Maps/Writing MOC.md"),
            ("Maps/Writing MOC.md", "Maps/PKM MOC.md"),
            ("Maps/Writing MOC.md", "Maps/PKM MOC.md"),
        ]
    );

    let home = state.snapshot.find("Home").unwrap();
    assert!(home.is_orphan());
    assert_eq!(home.moc_type, MocType::System);
}

#[tokio::test]
async fn every_inlink_between_mocs_has_an_edge() {
    let vault = TestVault::new()
        .with("Maps/A MOC.md", "See [[B MOC#Section]].")
        .with("Maps/B MOC.md", "Back to [A](A%20MOC.md) and [[C MOC|alias]]")
        .with("Maps/C MOC.md", "");
    let (mut view, _) = view_for(&vault, settings("Maps"));
    let state = scan(&mut view).await;

    assert_eq!(state.snapshot.link_count(), 3);
    for node in &state.snapshot.nodes {
        for source in node.inlinks() {
            assert!(
                state
                    .snapshot
                    .links
                    .iter()
                    .any(|l| l.source.as_str() == source && l.target == node.id),
                "{source} links to {} but has no edge",
                node.id
            );
        }
    }
}

#[tokio::test]
async fn repeated_scans_are_identical() {
    let vault = mutual_pair_vault()
        .with("Atlas/Maps/Writing MOC.md", "[[A]] [[B]] [[Missing]]")
        .with("Atlas/Home.md", "[[Writing MOC]]");
    let (mut view, _) = view_for(&vault, settings("Atlas"));
    let first = scan(&mut view).await;
    let second = match view.refresh().await.unwrap() {
        RefreshOutcome::Published(state) => state,
        RefreshOutcome::Coalesced => panic!("unexpected coalesce"),
    };

    assert_eq!(second.version, first.version + 1);
    let summary = |s: &ViewState| {
        let mut nodes: Vec<_> = s
            .snapshot
            .nodes
            .iter()
            .map(|n| (n.id.to_string(), n.moc_type, n.category))
            .collect();
        nodes.sort_by(|a, b| a.0.cmp(&b.0));
        let mut links: Vec<_> = s
            .snapshot
            .links
            .iter()
            .map(|l| (l.source.to_string(), l.target.to_string(), l.strength))
            .collect();
        links.sort();
        (nodes, links)
    };
    assert_eq!(summary(&first), summary(&second));
    assert_eq!(first.layout, second.layout);
}

#[tokio::test]
async fn svg_and_json_outputs() {
    let vault = mutual_pair_vault();
    let (mut view, _) = view_for(&vault, settings("Atlas/Maps"));
    let state = scan(&mut view).await;

    let svg = svg::render(&view.scene());
    // The orphan is hidden by the default minimumConnections of 1
    assert_eq!(svg.matches("<circle ").count(), 2);
    assert_eq!(svg.matches("<line ").count(), 2);
    assert!(svg.contains("<title>A\nType: sub\nCategory: general\nConnections: 2"));

    let json = serde_json::to_value(&state.snapshot).unwrap();
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert!(nodes.iter().all(|n| n["type"] == "sub"));
}
