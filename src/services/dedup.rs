use std::collections::HashSet;

use crate::models::MediaItem;

/// 去重器
///
/// 每个聚合器独占一个实例。成员集合只在 `filter` 中增长，不会淘汰。
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<u64>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只保留首次出现的条目，保持输入顺序
    pub fn filter(&mut self, batch: Vec<MediaItem>) -> Vec<MediaItem> {
        batch
            .into_iter()
            .filter(|item| self.seen.insert(item.id))
            .collect()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.seen.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;
    use proptest::prelude::*;

    fn item(id: u64) -> MediaItem {
        MediaItem {
            id,
            kind: MediaKind::Movie,
            title: format!("movie {}", id),
            year: None,
            rating: None,
            poster_path: None,
            backdrop_path: None,
        }
    }

    fn ids(items: &[MediaItem]) -> Vec<u64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_filter_drops_seen_ids() {
        let mut dedup = Deduplicator::new();
        let first = dedup.filter(vec![item(1), item(2)]);
        let second = dedup.filter(vec![item(2), item(3)]);

        assert_eq!(ids(&first), vec![1, 2]);
        assert_eq!(ids(&second), vec![3]);
        assert_eq!(dedup.len(), 3);
        assert!(dedup.contains(2));
    }

    #[test]
    fn test_filter_dedups_within_batch() {
        let mut dedup = Deduplicator::new();
        let kept = dedup.filter(vec![item(5), item(4), item(5), item(4), item(6)]);
        assert_eq!(ids(&kept), vec![5, 4, 6]);
    }

    #[test]
    fn test_first_seen_wins() {
        let mut dedup = Deduplicator::new();
        let mut series = item(9);
        series.kind = MediaKind::Series;
        let kept = dedup.filter(vec![item(9), series]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].kind, MediaKind::Movie);
    }

    proptest! {
        #[test]
        fn prop_output_is_unique_and_ordered(batches in prop::collection::vec(prop::collection::vec(0u64..50, 0..20), 0..10)) {
            let mut dedup = Deduplicator::new();
            let mut all = Vec::new();
            for batch in batches {
                let kept = dedup.filter(batch.iter().copied().map(item).collect());
                // 保留下来的条目是输入的子序列
                let mut input = batch.iter();
                for id in ids(&kept) {
                    prop_assert!(input.any(|candidate| *candidate == id));
                }
                all.extend(ids(&kept));
            }

            let unique: HashSet<u64> = all.iter().copied().collect();
            prop_assert_eq!(unique.len(), all.len());
            prop_assert_eq!(dedup.len(), all.len());
        }
    }
}
