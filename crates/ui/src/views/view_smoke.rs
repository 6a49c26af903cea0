use std::sync::Arc;

use async_trait::async_trait;
use storage::repository::{
    AuthRepository, CatalogRepository, FavoriteRepository, InMemoryRepository, ProgressRepository,
    Registration, Storage, StorageError, UserRepository,
};
use stream_core::model::{
    ContentId, ContentItem, ContentKind, ContentOrder, Credentials, Progress, ProgressRecord,
    Session, UserProfile,
};
use stream_core::time::fixed_now;

use super::test_harness::{
    ViewKind, setup_app_harness, setup_view_harness, setup_view_harness_with_hint,
};
use crate::vm::CONTINUE_WATCHING_TITLE;

struct FailingCatalog;

#[async_trait]
impl CatalogRepository for FailingCatalog {
    async fn list_content(
        &self,
        _order: ContentOrder,
        _kind: Option<ContentKind>,
    ) -> Result<Vec<ContentItem>, StorageError> {
        Err(StorageError::Connection("catalog unavailable".into()))
    }

    async fn featured_content(&self, _limit: u32) -> Result<Vec<ContentItem>, StorageError> {
        Err(StorageError::Connection("catalog unavailable".into()))
    }

    async fn get_content(&self, _id: ContentId) -> Result<Option<ContentItem>, StorageError> {
        Err(StorageError::Connection("catalog unavailable".into()))
    }
}

struct BrokenAuth;

#[async_trait]
impl AuthRepository for BrokenAuth {
    async fn sign_up(
        &self,
        _credentials: &Credentials,
        _name: &str,
    ) -> Result<Registration, StorageError> {
        Err(StorageError::Connection("session store unavailable".into()))
    }

    async fn sign_in(&self, _credentials: &Credentials) -> Result<Session, StorageError> {
        Err(StorageError::Connection("session store unavailable".into()))
    }

    async fn sign_out(&self) -> Result<(), StorageError> {
        Err(StorageError::Connection("session store unavailable".into()))
    }

    async fn current_session(&self) -> Result<Option<Session>, StorageError> {
        Err(StorageError::Connection("session store unavailable".into()))
    }
}

async fn signed_in_repo() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    let creds = Credentials::new("maya@example.com", "popcorn").unwrap();
    let registration = repo.sign_up(&creds, "Maya").await.expect("sign up");
    let profile = UserProfile::new(
        registration.user_id,
        registration.email,
        "Maya",
        fixed_now(),
    )
    .unwrap();
    repo.insert_profile(&profile).await.expect("insert profile");
    repo
}

fn seed_titles(repo: &InMemoryRepository) {
    let titles = [
        (1, "Harbor Lights", "Drama", ContentKind::Movie, 8.1),
        (2, "Last Orbit", "Sci-Fi", ContentKind::Series, 8.7),
        (3, "Small Hours", "Drama", ContentKind::Series, 7.2),
    ];
    for (id, title, category, kind, rating) in titles {
        let mut item = ContentItem::new(ContentId::new(id), title, category, kind, fixed_now())
            .with_rating(rating)
            .with_image_url(format!("https://img.example/{id}.jpg"));
        if id == 2 {
            item = item.featured();
        }
        repo.upsert_content(item).expect("upsert content");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn landing_view_smoke_renders_plans() {
    let mut harness = setup_view_harness(ViewKind::Landing, &Storage::in_memory());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Movies, series and more."), "missing hero in {html}");
    for plan in ["Basic", "Standard", "Premium"] {
        assert!(html.contains(plan), "missing plan {plan} in {html}");
    }
    assert!(html.contains("Get Started"), "missing call to action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_sign_in_form_and_hint() {
    let mut harness = setup_view_harness_with_hint(
        ViewKind::Login,
        &Storage::in_memory(),
        Some("Demo account: demo@cinestream.local".to_owned()),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("type=\"email\""), "missing email field in {html}");
    assert!(html.contains("type=\"password\""), "missing password field in {html}");
    assert!(html.contains("Sign up now"), "missing mode switch in {html}");
    assert!(html.contains("demo@cinestream.local"), "missing hint in {html}");
    assert!(!html.contains("placeholder=\"Name\""), "name field shown on sign in: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_rows() {
    let repo = signed_in_repo().await;
    seed_titles(&repo);
    let session = repo.current_session().await.unwrap().expect("session");
    repo.upsert_progress(&ProgressRecord::new(
        session.user_id,
        ContentId::new(3),
        Progress::new(45).unwrap(),
        fixed_now(),
    ))
    .await
    .unwrap();
    repo.add_favorite(session.user_id, ContentId::new(2), fixed_now())
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Dashboard, &Storage::from_memory(repo));
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Maya"), "missing user name in {html}");
    assert!(html.contains(CONTINUE_WATCHING_TITLE), "missing continue row in {html}");
    assert!(html.contains("Sci-Fi"), "missing category row in {html}");
    assert!(html.contains("width: 45%"), "missing progress bar in {html}");
    assert!(html.contains("★ 8.7"), "missing rating in {html}");
    assert!(html.contains("In My List"), "missing favorite hero in {html}");
    assert!(html.contains("Sign Out"), "missing sign out in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_empty_state() {
    let repo = signed_in_repo().await;
    let mut harness = setup_view_harness(ViewKind::Dashboard, &Storage::from_memory(repo));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No titles yet"), "missing empty state in {html}");
    assert!(!html.contains("Retry"), "empty catalog rendered as error: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_error_with_retry() {
    let repo = signed_in_repo().await;
    let mut storage = Storage::from_memory(repo);
    storage.catalog = Arc::new(FailingCatalog);

    let mut harness = setup_view_harness(ViewKind::Dashboard, &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("We couldn&#39;t load the catalog right now.")
            || html.contains("We couldn't load the catalog right now."),
        "missing catalog error in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
    assert!(!html.contains("No titles yet"), "error rendered as empty: {html}");
}

fn is_login_page(html: &str) -> bool {
    html.contains("type=\"password\"") && !html.contains("Sign Out")
}

#[tokio::test(flavor = "current_thread")]
async fn guarded_dashboard_redirects_signed_out_viewer_to_login() {
    let repo = InMemoryRepository::new();
    seed_titles(&repo);
    let mut harness = setup_app_harness("/dashboard", &Storage::from_memory(repo));
    harness.follow_redirects().await;
    let html = harness.render();
    assert!(is_login_page(&html), "expected login form in {html}");
    assert!(!html.contains("Last Orbit"), "catalog leaked to signed-out viewer: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn guarded_login_sends_signed_in_viewer_to_dashboard() {
    let repo = signed_in_repo().await;
    seed_titles(&repo);
    let mut harness = setup_app_harness("/login", &Storage::from_memory(repo));
    harness.follow_redirects().await;
    let html = harness.render();
    assert!(html.contains("Sign Out"), "expected dashboard in {html}");
    assert!(html.contains("Last Orbit"), "missing dashboard rows in {html}");
    assert!(!html.contains("type=\"password\""), "login form still shown: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn guarded_dashboard_fails_closed_when_session_check_errors() {
    let repo = signed_in_repo().await;
    seed_titles(&repo);
    let mut storage = Storage::from_memory(repo);
    storage.auth = Arc::new(BrokenAuth);

    let mut harness = setup_app_harness("/dashboard", &storage);
    harness.follow_redirects().await;
    let html = harness.render();
    assert!(is_login_page(&html), "expected login form in {html}");
    assert!(!html.contains("Last Orbit"), "dashboard rendered without a session: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn guarded_landing_stays_public() {
    let mut harness = setup_app_harness("/", &Storage::in_memory());
    harness.follow_redirects().await;
    let html = harness.render();
    assert!(html.contains("Movies, series and more."), "missing landing page in {html}");
}
