//! Builders for router-level tests. Everything runs against the in-memory
//! store with outbound integrations switched off.

use axum::http::{header, HeaderName, HeaderValue};
use axum_test::TestServer;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use std::sync::Arc;

use crate::core::app::{api_router, AppDeps};
use crate::core::config::LedgerConfig;
use crate::core::middleware::{SharedSecret, ADMIN_KEY_HEADER};
use crate::features::submissions::models::{Category, NewSubmission, Submission, SubmissionStatus};
use crate::modules::notifier::DiscordNotifier;
use crate::modules::store::{BoardStore, MemoryBoardStore};
use crate::shared::validation::ContentFilter;

pub const TEST_ADMIN_KEY: &str = "test-admin-key";
pub const TEST_QUEUE_TOKEN: &str = "test-queue-token";

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryBoardStore>,
}

pub fn test_app() -> TestApp {
    test_app_with(LedgerConfig::default(), ContentFilter::default())
}

pub fn test_app_with(ledger: LedgerConfig, filter: ContentFilter) -> TestApp {
    let store = Arc::new(MemoryBoardStore::new());
    let router = api_router(AppDeps {
        store: store.clone(),
        filter,
        notifier: DiscordNotifier::disabled(),
        ledger,
        image_generator: None,
        image_store: None,
        admin_key: SharedSecret::new(TEST_ADMIN_KEY),
        queue_token: SharedSecret::new(TEST_QUEUE_TOKEN),
    });

    TestApp {
        server: TestServer::new(router).unwrap(),
        store,
    }
}

pub fn admin_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(ADMIN_KEY_HEADER),
        HeaderValue::from_static(TEST_ADMIN_KEY),
    )
}

pub fn queue_auth_header() -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", TEST_QUEUE_TOKEN)).unwrap(),
    )
}

pub fn fake_title() -> String {
    Sentence(3..5).fake::<String>().chars().take(80).collect()
}

pub fn fake_content() -> String {
    Sentence(6..10).fake::<String>().chars().take(400).collect()
}

/// Insert a submission and move it straight to `status`
pub async fn seed_submission(store: &MemoryBoardStore, status: SubmissionStatus) -> Submission {
    let submission = store
        .insert_submission(NewSubmission {
            category: Category::Rumor,
            title: fake_title(),
            content: fake_content(),
            barrio: Some("Centro".to_string()),
            imagen_url: None,
        })
        .await
        .unwrap();

    if status == SubmissionStatus::Pending {
        return submission;
    }

    store
        .update_status(submission.id, SubmissionStatus::Pending, status, None)
        .await
        .unwrap()
        .unwrap()
}
