// 应用配置
//
// 从环境变量（支持 .env）读取运行配置，并可从 JSON 文件加载自定义分类：
// - TMDB_API_KEY / TMDB_BASE_URL / TMDB_LANGUAGE
// - SEARCH_DEBOUNCE_MS / CATALOG_CACHE_TTL_SECS
// - CATEGORIES_FILE
// - HOST / PORT

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::fs;

use crate::external::{
    CachedCatalog, CatalogCache, CatalogClient, TmdbClient, UnconfiguredClient, DEFAULT_LANGUAGE, TMDB_BASE_URL,
};
use crate::models::{CategoryConfig, CategoryRegistry};

const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_CACHE_TTL_SECS: u64 = 600;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无效的配置值 {key}={value}")]
    InvalidValue { key: String, value: String },

    #[error("无效的 URL: {0}")]
    InvalidUrl(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
}

/// 运行配置
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// 未配置时所有目录请求都会失败
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub language: String,
    pub debounce_window: Duration,
    pub cache_ttl: Duration,
    pub categories_file: Option<PathBuf>,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_base_url: TMDB_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            debounce_window: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            categories_file: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    /// 从进程环境变量读取
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取，空字符串视为未设置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let tmdb_base_url = get("TMDB_BASE_URL").unwrap_or(defaults.tmdb_base_url);
        url::Url::parse(&tmdb_base_url).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", tmdb_base_url, e)))?;

        let debounce_ms = parse_or("SEARCH_DEBOUNCE_MS", get("SEARCH_DEBOUNCE_MS"), DEFAULT_DEBOUNCE_MS)?;
        let cache_ttl_secs = parse_or("CATALOG_CACHE_TTL_SECS", get("CATALOG_CACHE_TTL_SECS"), DEFAULT_CACHE_TTL_SECS)?;
        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;

        Ok(Self {
            tmdb_api_key: get("TMDB_API_KEY"),
            tmdb_base_url,
            language: get("TMDB_LANGUAGE").unwrap_or(defaults.language),
            debounce_window: Duration::from_millis(debounce_ms),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            categories_file: get("CATEGORIES_FILE").map(PathBuf::from),
            host: get("HOST").unwrap_or(defaults.host),
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 按配置构建目录客户端
    ///
    /// 缓存 TTL 为 0 时不启用缓存；未配置 API key 时返回总是失败的客户端。
    pub fn catalog_client(&self) -> (Arc<dyn CatalogClient>, Option<CatalogCache>) {
        let Some(api_key) = self.tmdb_api_key.clone() else {
            tracing::warn!("TMDB_API_KEY not set, catalog requests will fail");
            return (Arc::new(UnconfiguredClient), None);
        };

        let tmdb = TmdbClient::new(api_key)
            .with_base_url(self.tmdb_base_url.clone())
            .with_language(self.language.clone());
        if self.cache_ttl.is_zero() {
            tracing::info!("Catalog cache disabled");
            return (Arc::new(tmdb), None);
        }

        let cache = CatalogCache::new(self.cache_ttl);
        (Arc::new(CachedCatalog::new(tmdb, cache.clone())), Some(cache))
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

/// 从 JSON 文件读取自定义分类（JSON 数组）
pub async fn read_categories(path: &Path) -> Result<Vec<CategoryConfig>, ConfigError> {
    let content = fs::read_to_string(path).await?;
    let categories: Vec<CategoryConfig> = serde_json::from_str(&content)?;
    Ok(categories)
}

/// 构建分类注册表
///
/// - 未指定文件或文件不存在：只使用内置分类
/// - 文件读取或解析失败：记录警告，只使用内置分类
/// - 校验失败的单个分类被跳过
pub async fn load_registry(path: Option<&Path>) -> CategoryRegistry {
    let registry = CategoryRegistry::builtin();
    let path = match path {
        Some(path) if path.exists() => path,
        Some(path) => {
            tracing::info!("分类文件不存在，使用内置分类: {:?}", path);
            return registry;
        }
        None => return registry,
    };

    match read_categories(path).await {
        Ok(categories) => {
            let valid: Vec<CategoryConfig> = categories
                .into_iter()
                .filter(|category| match category.validate() {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!("跳过无效分类: {}", e);
                        false
                    }
                })
                .collect();
            tracing::info!("成功加载 {} 个自定义分类: {:?}", valid.len(), path);
            registry.with_overrides(valid)
        }
        Err(e) => {
            tracing::warn!("分类文件无效，使用内置分类: {}", e);
            registry
        }
    }
}
