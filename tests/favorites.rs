mod common;

use bookexplorer::app::UNKNOWN_AUTHOR_TYPE;
use bookexplorer::{FavoritesController, FavoritesState, FavoritesStore, JsonFavoritesStore};
use common::{author_credit, credit_with_role, detail, Call, Endpoint, MockCatalog};
use async_trait::async_trait;
use bookexplorer::Result;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

fn catalog() -> MockCatalog {
    MockCatalog::new()
        .with_detail(detail("OL1W", "Dune", vec![11], vec![author_credit("H")]))
        .with_detail(detail("OL2W", "Emma", vec![22], vec![author_credit("J")]))
        .with_detail(detail("OL3W", "Ulysses", vec![], vec![author_credit("U")]))
        .with_author("H", "Frank Herbert")
        .with_author("J", "Jane Austen")
        .with_author("U", "James Joyce")
}

async fn store_with(keys: &[&str]) -> Arc<JsonFavoritesStore> {
    let store = Arc::new(JsonFavoritesStore::ephemeral());
    for key in keys {
        store.toggle(key).await.unwrap();
    }
    store
}

async fn wait_resolved(controller: &FavoritesController, at_least: u64) -> FavoritesState {
    let mut rx = controller.subscribe();
    let state = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.resolved >= at_least),
    )
    .await
    .expect("favorites never resolved")
    .unwrap()
    .clone();
    state
}

#[tokio::test]
async fn resolves_every_favorite_in_key_order() {
    let catalog = catalog().shared();
    let store = store_with(&["OL2W", "OL1W"]).await;
    let controller = FavoritesController::new(catalog.clone(), store);

    controller.load_favorite_books();
    let state = wait_resolved(&controller, 1).await;

    let titles: Vec<&str> = state.books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune", "Emma"]);
    assert_eq!(state.books[0].authors, vec!["Frank Herbert"]);
    assert_eq!(state.books[0].cover_id, Some(11));
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn empty_favorites_publish_an_empty_list() {
    let catalog = catalog().shared();
    let controller = FavoritesController::new(catalog.clone(), store_with(&[]).await);

    controller.load_favorite_books();
    let state = wait_resolved(&controller, 1).await;

    assert!(state.books.is_empty());
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn one_failed_favorite_does_not_hide_the_others() {
    let catalog = catalog().failing("/works/OL2W").shared();
    let store = store_with(&["OL1W", "OL2W", "OL3W"]).await;
    let controller = FavoritesController::new(catalog.clone(), store);

    controller.load_favorite_books();
    let state = wait_resolved(&controller, 1).await;

    let keys: Vec<&str> = state.books.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["/works/OL1W", "/works/OL3W"]);
    assert!(state.error.is_some());
    assert!(!state.loading);
}

#[tokio::test]
async fn missing_cover_defaults_to_zero() {
    let catalog = catalog().shared();
    let controller = FavoritesController::new(catalog.clone(), store_with(&["OL3W"]).await);

    controller.load_favorite_books();
    let state = wait_resolved(&controller, 1).await;

    assert_eq!(state.books[0].cover_id, Some(0));
    assert_eq!(state.books[0].cover_url("https://covers.example", bookexplorer::domain::CoverSize::Small), None);
}

#[tokio::test]
async fn non_author_credit_flags_an_error_but_keeps_the_book() {
    let catalog = MockCatalog::new()
        .with_detail(detail(
            "OL9W",
            "The Hobbit",
            vec![5],
            vec![author_credit("T"), credit_with_role("L", "/type/illustrator_role")],
        ))
        .with_author("T", "J. R. R. Tolkien")
        .shared();
    let controller = FavoritesController::new(catalog.clone(), store_with(&["OL9W"]).await);

    controller.load_favorite_books();
    let state = wait_resolved(&controller, 1).await;

    assert_eq!(state.books.len(), 1);
    assert_eq!(state.books[0].authors, vec!["J. R. R. Tolkien"]);
    assert_eq!(state.error.as_deref(), Some(UNKNOWN_AUTHOR_TYPE));
    assert!(!catalog.calls().contains(&Call::Author("/authors/L".to_string())));
}

#[tokio::test]
async fn failed_author_lookup_only_drops_the_name() {
    let catalog = catalog().failing("/authors/H").shared();
    let controller = FavoritesController::new(catalog.clone(), store_with(&["OL1W"]).await);

    controller.load_favorite_books();
    let state = wait_resolved(&controller, 1).await;

    assert_eq!(state.books.len(), 1);
    assert!(state.books[0].authors.is_empty());
    assert_eq!(state.books[0].author_line(), "Unknown author");
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn toggling_refreshes_the_list() {
    let catalog = catalog().shared();
    let store = store_with(&[]).await;
    let controller = FavoritesController::new(catalog.clone(), store);

    controller.load_favorite_books();
    wait_resolved(&controller, 1).await;

    assert!(controller.toggle_favorite("OL1W").await.unwrap());
    let state = wait_resolved(&controller, 2).await;
    assert_eq!(state.books.len(), 1);
    assert!(controller.is_favorite("/works/OL1W").await.unwrap());

    assert!(!controller.toggle_favorite("/works/OL1W").await.unwrap());
    let state = wait_resolved(&controller, 3).await;
    assert!(state.books.is_empty());
    assert!(!controller.is_favorite("OL1W").await.unwrap());
}

#[tokio::test]
async fn toggle_twice_is_a_no_op() {
    let store = store_with(&["OL1W", "OL2W"]).await;
    let before = store.snapshot();

    store.toggle("OL3W").await.unwrap();
    store.toggle("OL3W").await.unwrap();

    assert_eq!(store.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn change_mid_resolution_restarts_with_latest_snapshot() {
    let catalog = catalog()
        .with_delay(Endpoint::Detail, Duration::from_millis(100))
        .shared();
    let store = store_with(&["OL1W", "OL2W"]).await;
    let controller = FavoritesController::new(catalog.clone(), store.clone());

    controller.load_favorite_books();
    tokio::time::sleep(Duration::from_millis(50)).await;
    store.toggle("OL2W").await.unwrap();

    let state = wait_resolved(&controller, 1).await;
    let keys: Vec<&str> = state.books.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["/works/OL1W"]);
    assert_eq!(state.resolved, 1);
}

#[tokio::test]
async fn first_favorite_failing_leaves_the_second() {
    let catalog = catalog().failing("/works/OL1W").shared();
    let controller = FavoritesController::new(catalog.clone(), store_with(&["/works/OL1W", "/works/OL2W"]).await);

    controller.load_favorite_books();
    let state = wait_resolved(&controller, 1).await;

    let keys: Vec<&str> = state.books.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["/works/OL2W"]);
    assert!(state.error.is_some());
}

/// Store whose change feed can be shut down from the test.
struct ClosableStore {
    sender: Mutex<Option<watch::Sender<BTreeSet<String>>>>,
    receiver: watch::Receiver<BTreeSet<String>>,
}

impl ClosableStore {
    fn with(keys: &[&str]) -> Self {
        let (sender, receiver) = watch::channel(keys.iter().map(|k| k.to_string()).collect());
        Self {
            sender: Mutex::new(Some(sender)),
            receiver,
        }
    }

    fn close(&self) {
        self.sender.lock().unwrap().take();
    }
}

#[async_trait]
impl FavoritesStore for ClosableStore {
    fn subscribe(&self) -> watch::Receiver<BTreeSet<String>> {
        self.receiver.clone()
    }

    fn snapshot(&self) -> BTreeSet<String> {
        self.receiver.borrow().clone()
    }

    async fn toggle(&self, key: &str) -> Result<bool> {
        Ok(!self.receiver.borrow().contains(key))
    }

    async fn is_favorite(&self, key: &str) -> Result<bool> {
        Ok(self.receiver.borrow().contains(key))
    }
}

#[tokio::test(start_paused = true)]
async fn store_closing_mid_resolution_stops_loading() {
    let catalog = catalog()
        .with_delay(Endpoint::Detail, Duration::from_millis(100))
        .shared();
    let store = Arc::new(ClosableStore::with(&["/works/OL1W"]));
    let controller = FavoritesController::new(catalog.clone(), store.clone());

    controller.load_favorite_books();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(controller.state().loading);

    store.close();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let state = controller.state();
    assert!(!state.loading);
    assert_eq!(state.resolved, 0);
}
