use async_trait::async_trait;
use reqwest::{Client, Request, Response};
use serde::{Deserialize, Serialize};

use super::{CatalogClient, CatalogError};
use crate::models::ListingQuery;

/// TMDB 默认 API 地址
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// 默认语言
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// TMDB API客户端
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: TMDB_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 构建列表请求
    pub fn listing_request(&self, query: &ListingQuery, page: u32) -> Result<Request, CatalogError> {
        let url = format!("{}{}", self.base_url, query.endpoint.path());

        let mut params: Vec<(&str, String)> = vec![
            ("api_key", self.api_key.clone()),
            ("page", page.to_string()),
            ("language", self.language.clone()),
            ("include_adult", "false".to_string()),
        ];
        if query.endpoint.accepts_filters() {
            params.extend(query.filters.query_pairs());
        }

        Ok(self.client.get(&url).query(&params).build()?)
    }

    /// 构建多类型搜索请求
    pub fn search_request(&self, text: &str) -> Result<Request, CatalogError> {
        let url = format!("{}/search/multi", self.base_url);

        Ok(self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", text),
                ("include_adult", "false"),
                ("language", self.language.as_str()),
            ])
            .build()?)
    }

    async fn execute(&self, request: Request) -> Result<RawPage, CatalogError> {
        let response = self.client.execute(request).await?;
        let response = Self::check_status(response).await?;
        let page: RawPage = response.json().await?;
        Ok(page)
    }

    async fn check_status(response: Response) -> Result<Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // TMDB 错误体形如 {"status_code":7,"status_message":"Invalid API key"}
        let message = match response.json::<TmdbErrorBody>().await {
            Ok(body) => body.status_message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        Err(CatalogError::fetch(Some(status.as_u16()), message))
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn fetch_page(&self, query: &ListingQuery, page: u32) -> Result<RawPage, CatalogError> {
        tracing::debug!("Fetching {} page {}", query.endpoint.path(), page);
        let request = self.listing_request(query, page)?;
        self.execute(request).await
    }

    async fn search(&self, text: &str) -> Result<RawPage, CatalogError> {
        tracing::debug!("Searching TMDB for {:?}", text);
        let request = self.search_request(text)?;
        self.execute(request).await
    }
}

/// TMDB 分页响应
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct RawPage {
    #[serde(default)]
    pub page: Option<u32>,
    pub results: Vec<RawRecord>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// TMDB 原始记录
///
/// 电影使用 `title`/`release_date`，剧集使用 `name`/`first_air_date`；
/// 混合列表（trending/all、search/multi）中带有 `media_type`。
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    status_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryConfig;
    use std::collections::HashMap;

    fn query_map(request: &Request) -> HashMap<String, String> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_listing_request_discover_filters() {
        let client = TmdbClient::new("secret".to_string());
        let category = CategoryConfig::indian_movies();

        let request = client.listing_request(&category.queries[0], 3).unwrap();
        assert_eq!(request.url().path(), "/3/discover/movie");

        let params = query_map(&request);
        assert_eq!(params["api_key"], "secret");
        assert_eq!(params["page"], "3");
        assert_eq!(params["language"], "en-US");
        assert_eq!(params["include_adult"], "false");
        assert_eq!(params["sort_by"], "popularity.desc");
        assert_eq!(params["watch_region"], "IN");
        assert_eq!(params["with_origin_country"], "IN");
        assert_eq!(params["with_watch_providers"], "8");
    }

    #[test]
    fn test_listing_request_trending_skips_filters() {
        let client = TmdbClient::new("secret".to_string()).with_language("fr-FR");
        let category = CategoryConfig::trending();

        let request = client.listing_request(&category.queries[0], 1).unwrap();
        assert_eq!(request.url().path(), "/3/trending/all/day");

        let params = query_map(&request);
        assert_eq!(params["language"], "fr-FR");
        assert!(!params.contains_key("sort_by"));
    }

    #[test]
    fn test_search_request() {
        let client = TmdbClient::new("secret".to_string())
            .with_base_url("http://localhost:9000/3/");

        let request = client.search_request("star wars").unwrap();
        assert_eq!(request.url().host_str(), Some("localhost"));
        assert_eq!(request.url().path(), "/3/search/multi");

        let params = query_map(&request);
        assert_eq!(params["query"], "star wars");
        assert_eq!(params["include_adult"], "false");
    }

    #[test]
    fn test_raw_page_parsing() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 1, "media_type": "movie", "title": "A", "release_date": "2020-01-01", "vote_average": 7.5},
                {"id": 2, "media_type": "tv", "name": "B", "first_air_date": "", "vote_average": null},
                {"id": 3, "media_type": "person", "name": "C", "profile_path": "/c.jpg"}
            ],
            "total_pages": 10,
            "total_results": 200
        }"#;

        let page: RawPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 3);
        assert_eq!(page.results[0].title.as_deref(), Some("A"));
        assert_eq!(page.results[1].vote_average, None);
        assert_eq!(page.total_pages, Some(10));
    }

    #[test]
    fn test_raw_page_requires_results() {
        let parsed = serde_json::from_str::<RawPage>(r#"{"page": 1}"#);
        assert!(parsed.is_err());
    }
}
