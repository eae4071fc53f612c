// 影视目录浏览核心库
//
// 本库提供目录浏览的核心功能，包括：
// - TMDB 接口集成与响应缓存
// - 分页聚合与去重
// - 搜索防抖与搜索框显示控制
// - HTTP API 路由

pub mod api;
pub mod config;
pub mod external;
pub mod models;
pub mod services;
