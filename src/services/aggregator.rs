// 分页聚合器
//
// 按游标逐页请求分类列表，经过归一化和去重后追加到已有列表。
// 同一个聚合器同时最多只有一个请求在进行中。

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::{Deduplicator, ItemNormalizer};
use crate::external::{CatalogClient, CatalogError};
use crate::models::{CategoryConfig, MediaItem};

/// 聚合状态，由聚合器独占
#[derive(Debug)]
struct AggregationState {
    items: Vec<MediaItem>,
    dedup: Deduplicator,
    /// 下一次要请求的页码，从 1 开始
    cursor: u32,
    pending: bool,
    last_error: Option<String>,
}

impl Default for AggregationState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            dedup: Deduplicator::new(),
            cursor: 1,
            pending: false,
            last_error: None,
        }
    }
}

/// 聚合状态快照
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregationSnapshot {
    pub category: String,
    pub title: String,
    pub items: Vec<MediaItem>,
    pub cursor: u32,
    pub pending: bool,
    /// 最近一次加载失败的原因，成功加载后清除
    pub last_error: Option<String>,
}

/// 分页聚合器
pub struct PaginationAggregator {
    config: CategoryConfig,
    client: Arc<dyn CatalogClient>,
    state: Mutex<AggregationState>,
}

impl PaginationAggregator {
    pub fn new(config: CategoryConfig, client: Arc<dyn CatalogClient>) -> Self {
        Self {
            config,
            client,
            state: Mutex::new(AggregationState::default()),
        }
    }

    pub fn config(&self) -> &CategoryConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, AggregationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 加载下一页
    ///
    /// 已有请求在进行中时直接返回当前列表，不发起新请求。
    /// 失败时列表与游标保持不变，错误返回给调用方。
    pub async fn load_more(&self) -> Result<Vec<MediaItem>, CatalogError> {
        let cursor = {
            let mut state = self.lock();
            if state.pending {
                tracing::debug!("Load already in flight for '{}', skipping", self.config.key);
                return Ok(state.items.clone());
            }
            state.pending = true;
            state.cursor
        };
        let _pending = PendingGuard { state: &self.state };

        let result = self.fetch_cursor(cursor).await;

        let mut state = self.lock();
        match result {
            Ok(batch) => {
                let received = batch.len();
                let fresh = state.dedup.filter(batch);
                let added = fresh.len();
                state.items.extend(fresh);
                state.cursor = cursor + 1;
                state.last_error = None;
                tracing::info!(
                    "Loaded '{}' page {}: {} received, {} new, {} total",
                    self.config.key,
                    cursor,
                    received,
                    added,
                    state.items.len()
                );
                Ok(state.items.clone())
            }
            Err(e) => {
                tracing::warn!("Failed to load '{}' page {}: {}", self.config.key, cursor, e);
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// 请求游标所在页；组合分类按声明顺序请求每个查询，任一失败则整体失败
    async fn fetch_cursor(&self, cursor: u32) -> Result<Vec<MediaItem>, CatalogError> {
        let mut batch = Vec::new();
        for query in &self.config.queries {
            let page = self.client.fetch_page(query, cursor).await?;
            batch.extend(ItemNormalizer::normalize_batch(&page.results, query.kind_hint()));
        }
        Ok(batch)
    }

    pub fn items(&self) -> Vec<MediaItem> {
        self.lock().items.clone()
    }

    pub fn cursor(&self) -> u32 {
        self.lock().cursor
    }

    pub fn is_pending(&self) -> bool {
        self.lock().pending
    }

    pub fn snapshot(&self) -> AggregationSnapshot {
        let state = self.lock();
        AggregationSnapshot {
            category: self.config.key.clone(),
            title: self.config.title.clone(),
            items: state.items.clone(),
            cursor: state.cursor,
            pending: state.pending,
            last_error: state.last_error.clone(),
        }
    }
}

/// 离开作用域时清除 pending，加载 future 被中途丢弃时同样生效
struct PendingGuard<'a> {
    state: &'a Mutex<AggregationState>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.pending = false;
    }
}
