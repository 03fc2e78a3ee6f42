/// 第 `part_index` 片（从 1 开始）。0 或越界返回空切片。
pub fn partition<T>(sorted: &[T], part_index: usize, part_size: usize) -> &[T] {
    if part_index == 0 || part_size == 0 {
        return &[];
    }
    let start = (part_index - 1).saturating_mul(part_size);
    if start >= sorted.len() {
        return &[];
    }
    let end = start.saturating_add(part_size).min(sorted.len());
    &sorted[start..end]
}

/// 分片数量，空列表也算一片（回退页）
pub fn part_count(total: usize, part_size: usize) -> usize {
    if part_size == 0 {
        return 1;
    }
    total.div_ceil(part_size).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_slices() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(partition(&items, 1, 10), &items[0..10]);
        assert_eq!(partition(&items, 3, 10), &[21, 22, 23, 24, 25]);
        assert!(partition(&items, 4, 10).is_empty());
        assert!(partition(&items, 0, 10).is_empty());
        assert!(partition(&items, usize::MAX, 10).is_empty());
    }

    #[test]
    fn test_partition_is_idempotent() {
        let items: Vec<u32> = (0..100).collect();
        assert_eq!(partition(&items, 2, 30), partition(&items, 2, 30));
    }

    #[test]
    fn test_part_count() {
        assert_eq!(part_count(0, 10_000), 1);
        assert_eq!(part_count(10_000, 10_000), 1);
        assert_eq!(part_count(10_001, 10_000), 2);
    }

    #[test]
    fn test_every_item_lands_in_one_part() {
        let items: Vec<u32> = (0..47).collect();
        let size = 10;
        let mut seen = Vec::new();
        for part in 1..=part_count(items.len(), size) {
            seen.extend_from_slice(partition(&items, part, size));
        }
        assert_eq!(seen, items);
    }
}
