// 条目归一化 - 将 TMDB 原始记录转换为统一的 MediaItem

use crate::external::{CatalogError, RawRecord};
use crate::models::{MediaItem, MediaKind};

/// 转换器：将 TMDB 原始记录转换为内部数据模型
pub struct ItemNormalizer;

impl ItemNormalizer {
    /// 归一化单条记录
    ///
    /// - 标题取 `title`（电影）或 `name`（剧集）
    /// - 年份取 `release_date` 或 `first_air_date` 的前 4 位数字
    /// - 类型优先使用记录自带的 `media_type`，否则使用调用方提供的 `hint`
    /// - 评分缺失时为 None
    pub fn normalize(raw: &RawRecord, hint: Option<MediaKind>) -> Result<MediaItem, CatalogError> {
        let id = raw
            .id
            .ok_or_else(|| CatalogError::Parse("record without id".to_string()))?;

        let kind = match raw.media_type.as_deref() {
            Some(media_type) => MediaKind::from_tmdb(media_type).ok_or_else(|| {
                CatalogError::Parse(format!("unsupported media type '{}' for record {}", media_type, id))
            })?,
            None => hint.ok_or_else(|| {
                CatalogError::Parse(format!("cannot infer media type for record {}", id))
            })?,
        };

        let title = raw
            .title
            .as_ref()
            .or(raw.name.as_ref())
            .cloned()
            .ok_or_else(|| CatalogError::Parse(format!("record {} has no title", id)))?;

        let date = non_empty(raw.release_date.as_deref()).or(non_empty(raw.first_air_date.as_deref()));

        Ok(MediaItem {
            id,
            kind,
            title,
            year: parse_year(date),
            rating: raw.vote_average,
            poster_path: raw.poster_path.clone(),
            backdrop_path: raw.backdrop_path.clone(),
        })
    }

    /// 归一化一批记录，无法转换的记录记录日志后跳过，保持原有顺序
    pub fn normalize_batch(records: &[RawRecord], hint: Option<MediaKind>) -> Vec<MediaItem> {
        records
            .iter()
            .filter_map(|raw| match Self::normalize(raw, hint) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::debug!("Skipping record: {}", e);
                    None
                }
            })
            .collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// 取日期字符串的前 4 位数字作为年份
fn parse_year(date: Option<&str>) -> Option<i32> {
    let prefix = date?.get(..4)?;
    if prefix.bytes().all(|b| b.is_ascii_digit()) {
        prefix.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_record() -> RawRecord {
        RawRecord {
            id: Some(27205),
            title: Some("Inception".to_string()),
            release_date: Some("2010-07-15".to_string()),
            vote_average: Some(8.4),
            poster_path: Some("/inception.jpg".to_string()),
            ..RawRecord::default()
        }
    }

    fn series_record() -> RawRecord {
        RawRecord {
            id: Some(1399),
            name: Some("Game of Thrones".to_string()),
            first_air_date: Some("2011-04-17".to_string()),
            backdrop_path: Some("/got.jpg".to_string()),
            ..RawRecord::default()
        }
    }

    #[test]
    fn test_normalize_movie_with_hint() {
        let item = ItemNormalizer::normalize(&movie_record(), Some(MediaKind::Movie)).unwrap();
        assert_eq!(item.id, 27205);
        assert_eq!(item.kind, MediaKind::Movie);
        assert_eq!(item.title, "Inception");
        assert_eq!(item.year, Some(2010));
        assert_eq!(item.rating, Some(8.4));
        assert_eq!(item.poster_path.as_deref(), Some("/inception.jpg"));
    }

    #[test]
    fn test_normalize_series_shape() {
        let item = ItemNormalizer::normalize(&series_record(), Some(MediaKind::Series)).unwrap();
        assert_eq!(item.title, "Game of Thrones");
        assert_eq!(item.year, Some(2011));
        assert_eq!(item.rating, None);
        assert_eq!(item.rating_label(), "N/A");
        assert_eq!(item.backdrop_path.as_deref(), Some("/got.jpg"));
    }

    #[test]
    fn test_explicit_media_type_wins_over_hint() {
        let mut raw = series_record();
        raw.media_type = Some("tv".to_string());
        let item = ItemNormalizer::normalize(&raw, Some(MediaKind::Movie)).unwrap();
        assert_eq!(item.kind, MediaKind::Series);
    }

    #[test]
    fn test_missing_kind_is_an_error() {
        assert!(ItemNormalizer::normalize(&movie_record(), None).is_err());
    }

    #[test]
    fn test_person_records_are_rejected() {
        let raw = RawRecord {
            id: Some(287),
            media_type: Some("person".to_string()),
            name: Some("Brad Pitt".to_string()),
            ..RawRecord::default()
        };
        assert!(matches!(
            ItemNormalizer::normalize(&raw, None),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_year_parsing() {
        assert_eq!(parse_year(Some("1999-10-15")), Some(1999));
        assert_eq!(parse_year(Some("2024")), Some(2024));
        assert_eq!(parse_year(Some("")), None);
        assert_eq!(parse_year(Some("19")), None);
        assert_eq!(parse_year(Some("TBA-01-01")), None);
        assert_eq!(parse_year(None), None);
    }

    #[test]
    fn test_empty_release_date_falls_back_to_air_date() {
        let raw = RawRecord {
            id: Some(1),
            name: Some("Show".to_string()),
            release_date: Some(String::new()),
            first_air_date: Some("2005-03-01".to_string()),
            ..RawRecord::default()
        };
        let item = ItemNormalizer::normalize(&raw, Some(MediaKind::Series)).unwrap();
        assert_eq!(item.year, Some(2005));
    }

    #[test]
    fn test_normalize_batch_skips_bad_records() {
        let records = vec![
            movie_record(),
            RawRecord {
                id: Some(2),
                media_type: Some("person".to_string()),
                name: Some("Someone".to_string()),
                ..RawRecord::default()
            },
            RawRecord::default(),
            RawRecord {
                id: Some(3),
                title: Some("Tenet".to_string()),
                ..RawRecord::default()
            },
        ];

        let items = ItemNormalizer::normalize_batch(&records, Some(MediaKind::Movie));
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![27205, 3]);
    }
}
