pub mod cache;
pub mod error;
pub mod tmdb;

use std::sync::Arc;

use async_trait::async_trait;

pub use cache::{CacheStats, CachedCatalog, CatalogCache};
pub use error::CatalogError;
pub use tmdb::{RawPage, RawRecord, TmdbClient, DEFAULT_LANGUAGE, TMDB_BASE_URL};

use crate::models::ListingQuery;

/// 目录接口
///
/// 每次调用对应一次参数化查询，返回一页原始结果。
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// 请求列表接口的某一页
    async fn fetch_page(&self, query: &ListingQuery, page: u32) -> Result<RawPage, CatalogError>;

    /// 多类型搜索，结果中每条记录带有自己的 media_type
    async fn search(&self, text: &str) -> Result<RawPage, CatalogError>;
}

#[async_trait]
impl<C: CatalogClient + ?Sized> CatalogClient for Arc<C> {
    async fn fetch_page(&self, query: &ListingQuery, page: u32) -> Result<RawPage, CatalogError> {
        (**self).fetch_page(query, page).await
    }

    async fn search(&self, text: &str) -> Result<RawPage, CatalogError> {
        (**self).search(text).await
    }
}

/// 未配置 API key 时使用的客户端，所有请求都失败
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredClient;

#[async_trait]
impl CatalogClient for UnconfiguredClient {
    async fn fetch_page(&self, _query: &ListingQuery, _page: u32) -> Result<RawPage, CatalogError> {
        Err(CatalogError::NotConfigured)
    }

    async fn search(&self, _text: &str) -> Result<RawPage, CatalogError> {
        Err(CatalogError::NotConfigured)
    }
}
