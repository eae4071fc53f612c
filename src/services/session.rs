// 浏览会话 - 对外暴露的操作入口
//
// 管理已挂载的分类聚合器与唯一的搜索控制器。获取失败在这里记录日志后吞掉，
// 调用方拿到的始终是最新快照（失败原因见 last_error）。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

use super::{AggregationSnapshot, PaginationAggregator, SearchDebouncer, SearchVisibilityController};
use crate::external::CatalogClient;
use crate::models::{CategoryConfig, CategoryRegistry, MediaItem, SearchSnapshot, Visibility};

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("未知分类: {0}")]
    UnknownCategory(String),
}

/// 浏览会话
pub struct CatalogSession {
    client: Arc<dyn CatalogClient>,
    registry: CategoryRegistry,
    mounted: Mutex<HashMap<String, Arc<PaginationAggregator>>>,
    search: SearchVisibilityController,
}

impl CatalogSession {
    pub fn new(client: Arc<dyn CatalogClient>, registry: CategoryRegistry, debounce_window: Duration) -> Self {
        let debouncer = Arc::new(SearchDebouncer::new(client.clone(), debounce_window));
        Self {
            client,
            registry,
            mounted: Mutex::new(HashMap::new()),
            search: SearchVisibilityController::new(debouncer),
        }
    }

    fn mounted(&self) -> MutexGuard<'_, HashMap<String, Arc<PaginationAggregator>>> {
        self.mounted.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn categories(&self) -> impl Iterator<Item = &CategoryConfig> {
        self.registry.iter()
    }

    /// 挂载分类视图；已挂载时返回现有聚合器
    pub fn mount(&self, key: &str) -> Result<Arc<PaginationAggregator>, SessionError> {
        let config = self
            .registry
            .get(key)
            .ok_or_else(|| SessionError::UnknownCategory(key.to_string()))?;

        let mut mounted = self.mounted();
        let aggregator = mounted.entry(key.to_string()).or_insert_with(|| {
            tracing::debug!("Mounting category '{}'", key);
            Arc::new(PaginationAggregator::new(config.clone(), self.client.clone()))
        });
        Ok(aggregator.clone())
    }

    /// 卸载分类视图，丢弃其聚合状态
    pub fn unmount(&self, key: &str) -> bool {
        let removed = self.mounted().remove(key).is_some();
        if removed {
            tracing::debug!("Unmounted category '{}'", key);
        }
        removed
    }

    pub fn is_mounted(&self, key: &str) -> bool {
        self.mounted().contains_key(key)
    }

    /// 当前快照，未挂载时先挂载
    pub fn snapshot(&self, key: &str) -> Result<AggregationSnapshot, SessionError> {
        Ok(self.mount(key)?.snapshot())
    }

    /// 加载分类的下一页
    pub async fn load_more(&self, key: &str) -> Result<AggregationSnapshot, SessionError> {
        let aggregator = self.mount(key)?;
        if let Err(e) = aggregator.load_more().await {
            tracing::error!("Load more for '{}' failed: {}", key, e);
        }
        Ok(aggregator.snapshot())
    }

    /// 立即搜索；失败时返回现有结果
    pub async fn search(&self, text: &str) -> Vec<MediaItem> {
        let debouncer = self.search.debouncer();
        match debouncer.search(text).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!("Search failed: {}", e);
                debouncer.results()
            }
        }
    }

    pub fn input(&self, text: &str) {
        self.search.input(text);
    }

    pub fn toggle_search_visibility(&self) -> Visibility {
        self.search.toggle()
    }

    pub fn commit_search(&self) {
        self.search.commit();
    }

    pub fn cancel_search(&self) {
        self.search.cancel();
    }

    pub fn search_state(&self) -> SearchSnapshot {
        self.search.snapshot()
    }

    pub fn subscribe_results(&self) -> watch::Receiver<Vec<MediaItem>> {
        self.search.debouncer().subscribe()
    }

    /// 页面导航：清空搜索结果并取消尚未触发的搜索
    pub fn navigate(&self) {
        self.search.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{CatalogError, RawPage, RawRecord};
    use crate::models::ListingQuery;
    use crate::services::DEFAULT_DEBOUNCE_WINDOW;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubClient {
        fetches: AtomicUsize,
        fail: AtomicBool,
    }

    #[async_trait]
    impl CatalogClient for StubClient {
        async fn fetch_page(&self, query: &ListingQuery, page: u32) -> Result<RawPage, CatalogError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(CatalogError::fetch(Some(500), "server error"));
            }
            let base = if query.kind_hint() == Some(crate::models::MediaKind::Series) { 1000 } else { 0 };
            Ok(RawPage {
                page: Some(page),
                results: (0..3)
                    .map(|i| RawRecord {
                        id: Some(base + page as u64 * 10 + i),
                        title: Some(format!("item {}", i)),
                        media_type: Some("movie".to_string()),
                        ..RawRecord::default()
                    })
                    .collect(),
                total_pages: None,
            })
        }

        async fn search(&self, _text: &str) -> Result<RawPage, CatalogError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(CatalogError::fetch(None, "offline"));
            }
            Ok(RawPage {
                page: Some(1),
                results: vec![RawRecord {
                    id: Some(1),
                    media_type: Some("movie".to_string()),
                    title: Some("Found".to_string()),
                    ..RawRecord::default()
                }],
                total_pages: Some(1),
            })
        }
    }

    fn session() -> (Arc<StubClient>, CatalogSession) {
        let client = Arc::new(StubClient::default());
        let session = CatalogSession::new(client.clone(), CategoryRegistry::builtin(), DEFAULT_DEBOUNCE_WINDOW);
        (client, session)
    }

    #[tokio::test]
    async fn test_unknown_category() {
        let (_client, session) = session();
        let err = session.load_more("documentaries").await.unwrap_err();
        assert_eq!(err, SessionError::UnknownCategory("documentaries".to_string()));
    }

    #[tokio::test]
    async fn test_categories_are_independent() {
        let (_client, session) = session();

        session.load_more("movies").await.unwrap();
        session.load_more("movies").await.unwrap();
        let series = session.load_more("series").await.unwrap();

        assert_eq!(session.snapshot("movies").unwrap().cursor, 3);
        assert_eq!(series.cursor, 2);
        assert_eq!(series.items.len(), 3);
    }

    #[tokio::test]
    async fn test_unmount_discards_state() {
        let (_client, session) = session();

        session.load_more("korean-movies").await.unwrap();
        assert!(session.unmount("korean-movies"));
        assert!(!session.is_mounted("korean-movies"));
        assert!(!session.unmount("korean-movies"));

        let fresh = session.snapshot("korean-movies").unwrap();
        assert!(fresh.items.is_empty());
        assert_eq!(fresh.cursor, 1);
    }

    #[tokio::test]
    async fn test_load_failure_is_swallowed() {
        let (client, session) = session();

        session.load_more("movies").await.unwrap();
        client.fail.store(true, Ordering::SeqCst);
        let snapshot = session.load_more("movies").await.unwrap();

        assert_eq!(snapshot.items.len(), 3);
        assert_eq!(snapshot.cursor, 2);
        assert!(snapshot.last_error.unwrap().contains("server error"));
    }

    #[tokio::test]
    async fn test_search_failure_returns_previous_results() {
        let (client, session) = session();

        assert_eq!(session.search("found").await.len(), 1);
        client.fail.store(true, Ordering::SeqCst);
        assert_eq!(session.search("found again").await.len(), 1);
        assert!(session.search("  ").await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigate_clears_search() {
        let (_client, session) = session();

        session.toggle_search_visibility();
        session.input("found");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(session.search_state().results.len(), 1);

        session.navigate();
        assert!(session.search_state().results.is_empty());
    }
}
