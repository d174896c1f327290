//! Purge dispatch: maps content lifecycle transitions onto edge purge
//! operations and records every attempt.

use std::sync::Arc;

use metrics::counter;
use tracing::{error, info};

use crate::application::history::HistoryService;
use crate::application::settings::EdgeSettingsService;
use crate::domain::content::{ContentRef, ContentStatus};
use crate::domain::error::PurgeError;
use crate::domain::purge::{PurgeKind, PurgeReceipt};
use crate::infra::edge::EdgePurgeClient;

/// Decides which purge operation a content lifecycle transition requires and
/// submits it through the edge client.
///
/// Automatic (webhook-triggered) dispatch never propagates errors back to the
/// platform: a failed purge must not block the content save that caused it.
/// Manual operations return the failure so the admin surface can show it;
/// either way every attempt lands in history.
pub struct PurgeDispatcher {
    client: Arc<dyn EdgePurgeClient>,
    settings: EdgeSettingsService,
    history: HistoryService,
}

impl PurgeDispatcher {
    pub fn new(
        client: Arc<dyn EdgePurgeClient>,
        settings: EdgeSettingsService,
        history: HistoryService,
    ) -> Self {
        Self {
            client,
            settings,
            history,
        }
    }

    /// Webhook entry point. Infallible by contract.
    ///
    /// Rules, first match wins:
    /// 1. first publish (non-published -> published): host purge, invalidate;
    /// 2. republish (published -> published): url purge of the permalink;
    /// 3. anything else, or non-post content: complete no-op.
    pub async fn on_status_transition(
        &self,
        new_status: ContentStatus,
        old_status: ContentStatus,
        content: &ContentRef,
    ) {
        if !content.kind.is_post() {
            return;
        }

        if new_status.is_published() && !old_status.is_published() {
            self.first_publish(content).await;
        } else if new_status.is_published() && old_status.is_published() {
            self.republish(content).await;
        }
        // Every other transition is deliberately invisible: no purge, no
        // history record, no log line.
    }

    /// Manual single-URL purge from the admin surface; always recorded.
    pub async fn purge_url(&self, url: &str) -> Result<PurgeReceipt, PurgeError> {
        self.attempt(PurgeKind::Url, vec![url.to_string()]).await
    }

    /// Manual site-wide purge; always recorded.
    pub async fn purge_all(&self) -> Result<PurgeReceipt, PurgeError> {
        self.attempt(PurgeKind::All, Vec::new()).await
    }

    /// First publish: the whole host goes stale, not just one URL.
    async fn first_publish(&self, content: &ContentRef) {
        let host = match self.settings.load().await {
            Ok(record) => self
                .settings
                .resolve_purge_host(&record)
                .ok_or(PurgeError::MissingHost),
            Err(err) => Err(PurgeError::unavailable(format!(
                "failed to load edge settings: {err}"
            ))),
        };

        let result = match host {
            Ok(host) => self.attempt(PurgeKind::Host, vec![host]).await,
            Err(err) => {
                // Still a purge attempt from the operator's point of view;
                // it must show up in history rather than vanish.
                counter!("spurgo_purge_attempt_total").increment(1);
                counter!("spurgo_purge_failure_total").increment(1);
                self.history
                    .record(PurgeKind::Host, "", false, err.to_string())
                    .await;
                Err(err)
            }
        };

        match result {
            Ok(receipt) => info!(
                target = "spurgo::dispatch",
                content_id = %content.id,
                request_id = %receipt.request_id,
                "first publish: host purge submitted"
            ),
            Err(err) => error!(
                target = "spurgo::dispatch",
                content_id = %content.id,
                error = %err,
                "first publish: host purge failed"
            ),
        }
    }

    /// Republish of already-public content: only its URL goes stale.
    async fn republish(&self, content: &ContentRef) {
        let targets: Vec<String> = content.permalink.clone().into_iter().collect();
        match self.attempt(PurgeKind::Url, targets).await {
            Ok(receipt) => info!(
                target = "spurgo::dispatch",
                content_id = %content.id,
                request_id = %receipt.request_id,
                "republish: url purge submitted"
            ),
            Err(err) => error!(
                target = "spurgo::dispatch",
                content_id = %content.id,
                error = %err,
                "republish: url purge failed"
            ),
        }
    }

    /// Submit one purge and write exactly one history record for it.
    async fn attempt(
        &self,
        kind: PurgeKind,
        targets: Vec<String>,
    ) -> Result<PurgeReceipt, PurgeError> {
        counter!("spurgo_purge_attempt_total").increment(1);
        let label = match kind {
            PurgeKind::All => "all".to_string(),
            _ => targets.join(", "),
        };

        let result = match kind {
            PurgeKind::Url => self.client.purge_urls(targets).await,
            PurgeKind::Host => self.client.purge_hosts(targets).await,
            PurgeKind::All => self.client.purge_all().await,
        };

        match &result {
            Ok(receipt) => {
                self.history
                    .record(kind, label, true, success_message(receipt))
                    .await;
            }
            Err(err) => {
                counter!("spurgo_purge_failure_total").increment(1);
                self.history.record(kind, label, false, err.to_string()).await;
            }
        }

        result
    }
}

fn success_message(receipt: &PurgeReceipt) -> String {
    if receipt.request_id.is_empty() {
        "purge task submitted".to_string()
    } else {
        format!("purge task submitted (request {})", receipt.request_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::content::ContentKind;
    use crate::domain::settings::EdgeSettingsRecord;
    use crate::infra::store::MemoryStore;

    #[derive(Debug, Clone, PartialEq)]
    enum Issued {
        Urls(Vec<String>),
        Hosts(Vec<String>),
        All,
    }

    #[derive(Default)]
    struct RecordingClient {
        issued: Mutex<Vec<Issued>>,
        fail_with: Mutex<Option<String>>,
    }

    impl RecordingClient {
        fn fail_next(&self, message: &str) {
            *self.fail_with.lock().expect("lock") = Some(message.to_string());
        }

        fn calls(&self) -> Vec<Issued> {
            self.issued.lock().expect("lock").clone()
        }

        fn outcome(&self) -> Result<PurgeReceipt, PurgeError> {
            match self.fail_with.lock().expect("lock").take() {
                Some(message) => Err(PurgeError::api(message)),
                None => Ok(PurgeReceipt {
                    request_id: "req-1".to_string(),
                    task_id: "task-1".to_string(),
                }),
            }
        }
    }

    #[async_trait]
    impl EdgePurgeClient for RecordingClient {
        async fn purge_urls(&self, urls: Vec<String>) -> Result<PurgeReceipt, PurgeError> {
            self.issued.lock().expect("lock").push(Issued::Urls(urls));
            self.outcome()
        }

        async fn purge_hosts(&self, hosts: Vec<String>) -> Result<PurgeReceipt, PurgeError> {
            self.issued.lock().expect("lock").push(Issued::Hosts(hosts));
            self.outcome()
        }

        async fn purge_all(&self) -> Result<PurgeReceipt, PurgeError> {
            self.issued.lock().expect("lock").push(Issued::All);
            self.outcome()
        }
    }

    struct Fixture {
        client: Arc<RecordingClient>,
        dispatcher: PurgeDispatcher,
        history: HistoryService,
    }

    fn fixture(default_host: &str, site_host: Option<&str>) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        store.set_settings(EdgeSettingsRecord {
            secret_id: "id".to_string(),
            secret_key: "key".to_string(),
            zone_id: "zone-1".to_string(),
            default_host: default_host.to_string(),
        });

        let client = Arc::new(RecordingClient::default());
        let history = HistoryService::new(store.clone());
        let settings = EdgeSettingsService::new(store, site_host.map(String::from));
        let dispatcher = PurgeDispatcher::new(client.clone(), settings, history.clone());

        Fixture {
            client,
            dispatcher,
            history,
        }
    }

    fn post(permalink: &str) -> ContentRef {
        ContentRef {
            id: "42".to_string(),
            kind: ContentKind::Post,
            permalink: Some(permalink.to_string()),
        }
    }

    #[tokio::test]
    async fn first_publish_issues_one_host_purge_of_the_default_host() {
        let fx = fixture("cdn.example.com", None);

        fx.dispatcher
            .on_status_transition(
                ContentStatus::Published,
                ContentStatus::Draft,
                &post("https://example.com/a"),
            )
            .await;

        assert_eq!(
            fx.client.calls(),
            vec![Issued::Hosts(vec!["cdn.example.com".to_string()])]
        );

        let records = fx.history.recent(None).await.expect("history");
        assert_eq!(records.len(), 1);
        assert!(records[0].success);
        assert_eq!(records[0].kind, PurgeKind::Host);
        assert_eq!(records[0].target, "cdn.example.com");
    }

    #[tokio::test]
    async fn first_publish_falls_back_to_the_site_host() {
        let fx = fixture("", Some("example.com"));

        fx.dispatcher
            .on_status_transition(
                ContentStatus::Published,
                ContentStatus::Pending,
                &post("https://example.com/a"),
            )
            .await;

        assert_eq!(
            fx.client.calls(),
            vec![Issued::Hosts(vec!["example.com".to_string()])]
        );
    }

    #[tokio::test]
    async fn first_publish_without_any_host_records_the_failure() {
        let fx = fixture("", None);

        fx.dispatcher
            .on_status_transition(
                ContentStatus::Published,
                ContentStatus::Draft,
                &post("https://example.com/a"),
            )
            .await;

        assert!(fx.client.calls().is_empty());

        let records = fx.history.recent(None).await.expect("history");
        assert_eq!(records.len(), 1);
        assert!(!records[0].success);
        assert_eq!(records[0].kind, PurgeKind::Host);
    }

    #[tokio::test]
    async fn republish_issues_one_url_purge_of_the_permalink() {
        let fx = fixture("cdn.example.com", None);

        fx.dispatcher
            .on_status_transition(
                ContentStatus::Published,
                ContentStatus::Published,
                &post("https://example.com/a"),
            )
            .await;

        assert_eq!(
            fx.client.calls(),
            vec![Issued::Urls(vec!["https://example.com/a".to_string()])]
        );

        let records = fx.history.recent(None).await.expect("history");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, PurgeKind::Url);
        assert_eq!(records[0].target, "https://example.com/a");
    }

    #[tokio::test]
    async fn other_transitions_are_ignored_entirely() {
        let fx = fixture("cdn.example.com", None);
        let content = post("https://example.com/a");

        for (new_status, old_status) in [
            (ContentStatus::Draft, ContentStatus::Draft),
            (ContentStatus::Draft, ContentStatus::Published),
            (ContentStatus::Trashed, ContentStatus::Published),
            (ContentStatus::Pending, ContentStatus::Draft),
            (ContentStatus::Unknown, ContentStatus::Unknown),
        ] {
            fx.dispatcher
                .on_status_transition(new_status, old_status, &content)
                .await;
        }

        assert!(fx.client.calls().is_empty());
        assert!(fx.history.recent(None).await.expect("history").is_empty());
    }

    #[tokio::test]
    async fn non_post_content_is_ignored() {
        let fx = fixture("cdn.example.com", None);
        let page = ContentRef {
            id: "7".to_string(),
            kind: ContentKind::Page,
            permalink: Some("https://example.com/about".to_string()),
        };

        fx.dispatcher
            .on_status_transition(ContentStatus::Published, ContentStatus::Draft, &page)
            .await;

        assert!(fx.client.calls().is_empty());
        assert!(fx.history.recent(None).await.expect("history").is_empty());
    }

    #[tokio::test]
    async fn failed_automatic_purge_is_swallowed_and_recorded() {
        let fx = fixture("cdn.example.com", None);
        fx.client.fail_next("remote rejected the task");

        fx.dispatcher
            .on_status_transition(
                ContentStatus::Published,
                ContentStatus::Published,
                &post("https://example.com/a"),
            )
            .await;

        let records = fx.history.recent(None).await.expect("history");
        assert_eq!(records.len(), 1);
        assert!(!records[0].success);
        assert!(records[0].message.contains("remote rejected the task"));
    }

    #[tokio::test]
    async fn manual_purge_all_records_a_success_labeled_all() {
        let fx = fixture("cdn.example.com", None);

        let receipt = fx.dispatcher.purge_all().await.expect("purge all");
        assert_eq!(receipt.request_id, "req-1");
        assert_eq!(fx.client.calls(), vec![Issued::All]);

        let records = fx.history.recent(None).await.expect("history");
        assert_eq!(records.len(), 1);
        assert!(records[0].success);
        assert_eq!(records[0].kind, PurgeKind::All);
        assert_eq!(records[0].target, "all");
    }

    #[tokio::test]
    async fn manual_purge_url_failure_returns_the_error_and_records_it() {
        let fx = fixture("cdn.example.com", None);
        fx.client.fail_next("zone is suspended");

        let result = fx.dispatcher.purge_url("https://example.com/a").await;
        assert!(matches!(result, Err(PurgeError::Api { .. })));

        let records = fx.history.recent(None).await.expect("history");
        assert_eq!(records.len(), 1);
        assert!(!records[0].success);
        assert_eq!(records[0].target, "https://example.com/a");
    }
}
