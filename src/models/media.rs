use serde::{Deserialize, Serialize};

/// TMDB 图片服务地址
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// 统一后的媒体条目
///
/// 电影与剧集在 TMDB 中的字段形态不同（`title`/`name`、`release_date`/`first_air_date`），
/// 经过归一化后统一为此结构。同一个聚合列表中 `id` 唯一。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub year: Option<i32>,
    /// 评分，上游缺失时为 None（展示为 "N/A"）
    pub rating: Option<f32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

impl MediaItem {
    /// 评分展示文本，保留一位小数
    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(rating) => format!("{:.1}", rating),
            None => "N/A".to_string(),
        }
    }

    /// 构建封面图 URL
    pub fn poster_url(&self, size: ImageSize) -> Option<String> {
        self.poster_path.as_deref().map(|path| build_image_url(path, size))
    }

    /// 构建背景图 URL
    pub fn backdrop_url(&self, size: ImageSize) -> Option<String> {
        self.backdrop_path.as_deref().map(|path| build_image_url(path, size))
    }

    /// 详情页路径，如 `/movie/550`、`/tv/1399`
    pub fn detail_path(&self) -> String {
        format!("/{}/{}", self.kind.as_tmdb_str(), self.id)
    }
}

/// 媒体类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl MediaKind {
    /// TMDB 中使用的类型标识
    pub fn as_tmdb_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }

    /// 从 TMDB 的 `media_type` 字段解析，`person` 等其它类型返回 None
    pub fn from_tmdb(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Series),
            _ => None,
        }
    }
}

/// 图片尺寸枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W92,
    W154,
    W185,
    W200,
    W342,
    W500,
    W780,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W92 => "w92",
            ImageSize::W154 => "w154",
            ImageSize::W185 => "w185",
            ImageSize::W200 => "w200",
            ImageSize::W342 => "w342",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::Original => "original",
        }
    }
}

/// 构建图片URL
pub fn build_image_url(path: &str, size: ImageSize) -> String {
    format!("{}/{}{}", TMDB_IMAGE_BASE, size.as_str(), path)
}
