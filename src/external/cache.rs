use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::{Deserialize, Serialize};

use super::{CatalogClient, CatalogError, RawPage};
use crate::models::ListingQuery;

/// 单个缓存的最大条目数
const MAX_ENTRIES: u64 = 1_000;

/// TMDB 响应缓存
///
/// 只缓存成功的响应。缓存命中不会绕过聚合器的去重与游标逻辑。
#[derive(Clone)]
pub struct CatalogCache {
    listing_cache: Cache<String, RawPage>,
    search_cache: Cache<String, RawPage>,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            listing_cache: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ttl)
                .build(),
            search_cache: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// 生成列表缓存键
    fn listing_key(query: &ListingQuery, page: u32) -> String {
        let filters: Vec<String> = query
            .filters
            .query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("listing:{}:{}:{}", query.endpoint.path(), filters.join("&"), page)
    }

    /// 生成搜索缓存键
    fn search_key(text: &str) -> String {
        format!("search:{}", text)
    }

    /// 清空所有缓存
    pub fn clear_all(&self) {
        self.listing_cache.invalidate_all();
        self.search_cache.invalidate_all();
    }

    /// 获取缓存统计信息
    pub async fn stats(&self) -> CacheStats {
        self.listing_cache.run_pending_tasks().await;
        self.search_cache.run_pending_tasks().await;
        CacheStats {
            listing_cache_size: self.listing_cache.entry_count(),
            search_cache_size: self.search_cache.entry_count(),
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheStats {
    pub listing_cache_size: u64,
    pub search_cache_size: u64,
}

/// 带缓存的目录客户端
pub struct CachedCatalog<C> {
    inner: C,
    cache: CatalogCache,
}

impl<C: CatalogClient> CachedCatalog<C> {
    pub fn new(inner: C, cache: CatalogCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }
}

#[async_trait]
impl<C: CatalogClient> CatalogClient for CachedCatalog<C> {
    async fn fetch_page(&self, query: &ListingQuery, page: u32) -> Result<RawPage, CatalogError> {
        let key = CatalogCache::listing_key(query, page);
        if let Some(cached) = self.cache.listing_cache.get(&key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        let fresh = self.inner.fetch_page(query, page).await?;
        self.cache.listing_cache.insert(key, fresh.clone()).await;
        Ok(fresh)
    }

    async fn search(&self, text: &str) -> Result<RawPage, CatalogError> {
        let key = CatalogCache::search_key(text);
        if let Some(cached) = self.cache.search_cache.get(&key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        let fresh = self.inner.search(text).await?;
        self.cache.search_cache.insert(key, fresh.clone()).await;
        Ok(fresh)
    }
}
