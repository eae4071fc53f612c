use serde::{Deserialize, Serialize};

use super::MediaKind;

/// Netflix 在 TMDB 中的观看渠道 ID
pub const NETFLIX_PROVIDER_ID: u32 = 8;

/// 默认排序
pub const DEFAULT_SORT_BY: &str = "popularity.desc";

/// 列表接口
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    DiscoverMovie,
    DiscoverTv,
    TrendingAll,
    TrendingMovie,
    TrendingTv,
    PopularMovie,
}

impl Endpoint {
    /// 相对于 API 根地址的路径
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::DiscoverMovie => "/discover/movie",
            Endpoint::DiscoverTv => "/discover/tv",
            Endpoint::TrendingAll => "/trending/all/day",
            Endpoint::TrendingMovie => "/trending/movie/day",
            Endpoint::TrendingTv => "/trending/tv/day",
            Endpoint::PopularMovie => "/movie/popular",
        }
    }

    /// 由接口推断的媒体类型；混合列表返回 None，由记录自带的 media_type 决定
    pub fn kind_hint(&self) -> Option<MediaKind> {
        match self {
            Endpoint::DiscoverMovie | Endpoint::TrendingMovie | Endpoint::PopularMovie => {
                Some(MediaKind::Movie)
            }
            Endpoint::DiscoverTv | Endpoint::TrendingTv => Some(MediaKind::Series),
            Endpoint::TrendingAll => None,
        }
    }

    /// 只有 discover 接口接受筛选参数
    pub fn accepts_filters(&self) -> bool {
        matches!(self, Endpoint::DiscoverMovie | Endpoint::DiscoverTv)
    }
}

/// 列表的固定筛选条件
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingFilters {
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// ISO 3166-1 国家代码
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_origin_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_watch_providers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_video: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_null_first_air_dates: Option<bool>,
}

fn default_sort_by() -> String {
    DEFAULT_SORT_BY.to_string()
}

impl Default for ListingFilters {
    fn default() -> Self {
        Self {
            sort_by: default_sort_by(),
            watch_region: None,
            with_origin_country: None,
            with_watch_providers: None,
            include_video: None,
            include_null_first_air_dates: None,
        }
    }
}

impl ListingFilters {
    /// 某国家 Netflix 上的内容
    pub fn netflix_in(region: &str) -> Self {
        Self {
            watch_region: Some(region.to_string()),
            with_watch_providers: Some(NETFLIX_PROVIDER_ID),
            ..Self::default()
        }
    }

    /// 某国家出品且在该国 Netflix 上的内容
    pub fn netflix_origin(country: &str) -> Self {
        Self {
            with_origin_country: Some(country.to_string()),
            ..Self::netflix_in(country)
        }
    }

    /// 转换为查询参数（不含 api_key/page/language/include_adult）
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("sort_by", self.sort_by.clone())];
        if let Some(ref region) = self.watch_region {
            pairs.push(("watch_region", region.clone()));
        }
        if let Some(ref country) = self.with_origin_country {
            pairs.push(("with_origin_country", country.clone()));
        }
        if let Some(provider) = self.with_watch_providers {
            pairs.push(("with_watch_providers", provider.to_string()));
        }
        if let Some(include_video) = self.include_video {
            pairs.push(("include_video", include_video.to_string()));
        }
        if let Some(include_null) = self.include_null_first_air_dates {
            pairs.push(("include_null_first_air_dates", include_null.to_string()));
        }
        pairs
    }
}

/// 单个接口的查询模板
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingQuery {
    pub endpoint: Endpoint,
    #[serde(default)]
    pub filters: ListingFilters,
    /// 覆盖接口推断的媒体类型
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
}

impl ListingQuery {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            filters: ListingFilters::default(),
            kind: None,
        }
    }

    pub fn with_filters(endpoint: Endpoint, filters: ListingFilters) -> Self {
        Self {
            endpoint,
            filters,
            kind: None,
        }
    }

    pub fn kind_hint(&self) -> Option<MediaKind> {
        self.kind.or_else(|| self.endpoint.kind_hint())
    }
}

/// 分类配置
///
/// 描述一个分类视图的固定查询，在视图实例的生命周期内不可变。
/// 组合分类（如 Netflix 电影 + 剧集）包含多个查询，每次加载按声明顺序请求同一页。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryConfig {
    pub key: String,
    pub title: String,
    pub queries: Vec<ListingQuery>,
}

impl CategoryConfig {
    pub fn new(key: &str, title: &str, queries: Vec<ListingQuery>) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            queries,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.key.trim().is_empty() {
            return Err("category key must not be empty".to_string());
        }
        if self.queries.is_empty() {
            return Err(format!("category '{}' has no queries", self.key));
        }
        Ok(())
    }

    pub fn all_movies() -> Self {
        let filters = ListingFilters {
            include_video: Some(false),
            ..ListingFilters::default()
        };
        Self::new(
            "movies",
            "Movies",
            vec![ListingQuery::with_filters(Endpoint::DiscoverMovie, filters)],
        )
    }

    pub fn korean_movies() -> Self {
        Self::new(
            "korean-movies",
            "Korean Movies",
            vec![ListingQuery::with_filters(
                Endpoint::DiscoverMovie,
                ListingFilters::netflix_origin("KR"),
            )],
        )
    }

    pub fn indian_movies() -> Self {
        Self::new(
            "indian-movies",
            "Indian Movies",
            vec![ListingQuery::with_filters(
                Endpoint::DiscoverMovie,
                ListingFilters::netflix_origin("IN"),
            )],
        )
    }

    pub fn all_series() -> Self {
        let filters = ListingFilters {
            include_null_first_air_dates: Some(false),
            ..ListingFilters::default()
        };
        Self::new(
            "series",
            "TV Shows",
            vec![ListingQuery::with_filters(Endpoint::DiscoverTv, filters)],
        )
    }

    pub fn korean_series() -> Self {
        Self::new(
            "korean-series",
            "Korean TV Shows",
            vec![ListingQuery::with_filters(
                Endpoint::DiscoverTv,
                ListingFilters::netflix_origin("KR"),
            )],
        )
    }

    pub fn indian_series() -> Self {
        Self::new(
            "indian-series",
            "Indian TV Shows",
            vec![ListingQuery::with_filters(
                Endpoint::DiscoverTv,
                ListingFilters::netflix_origin("IN"),
            )],
        )
    }

    /// Netflix 电影与剧集的组合列表
    pub fn netflix() -> Self {
        Self::new(
            "netflix",
            "Netflix Movies and TV Shows",
            vec![
                ListingQuery::with_filters(Endpoint::DiscoverMovie, ListingFilters::netflix_in("US")),
                ListingQuery::with_filters(Endpoint::DiscoverTv, ListingFilters::netflix_in("US")),
            ],
        )
    }

    /// 仅 Netflix 美区电影
    pub fn netflix_movies() -> Self {
        Self::new(
            "netflix-movies",
            "Netflix Movies",
            vec![ListingQuery::with_filters(Endpoint::DiscoverMovie, ListingFilters::netflix_in("US"))],
        )
    }

    pub fn trending() -> Self {
        Self::new("trending", "Trending", vec![ListingQuery::new(Endpoint::TrendingAll)])
    }

    pub fn trending_movies() -> Self {
        Self::new(
            "trending-movies",
            "Trending Movies",
            vec![ListingQuery::new(Endpoint::TrendingMovie)],
        )
    }

    pub fn trending_series() -> Self {
        Self::new(
            "trending-series",
            "Trending TV Shows",
            vec![ListingQuery::new(Endpoint::TrendingTv)],
        )
    }

    pub fn popular_movies() -> Self {
        Self::new(
            "popular-movies",
            "Popular Movies",
            vec![ListingQuery::new(Endpoint::PopularMovie)],
        )
    }
}

/// 分类注册表，保持声明顺序
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<CategoryConfig>,
}

impl CategoryRegistry {
    /// 内置分类
    pub fn builtin() -> Self {
        Self {
            categories: vec![
                CategoryConfig::all_movies(),
                CategoryConfig::korean_movies(),
                CategoryConfig::indian_movies(),
                CategoryConfig::all_series(),
                CategoryConfig::korean_series(),
                CategoryConfig::indian_series(),
                CategoryConfig::netflix(),
                CategoryConfig::netflix_movies(),
                CategoryConfig::trending(),
                CategoryConfig::trending_movies(),
                CategoryConfig::trending_series(),
                CategoryConfig::popular_movies(),
            ],
        }
    }

    /// 合并自定义分类：同 key 替换内置分类，新 key 追加到末尾
    pub fn with_overrides(mut self, extra: Vec<CategoryConfig>) -> Self {
        for category in extra {
            match self.categories.iter_mut().find(|c| c.key == category.key) {
                Some(existing) => *existing = category,
                None => self.categories.push(category),
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryConfig> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
