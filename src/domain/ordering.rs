//! 显式排序键
//!
//! Chapter 与 AudioTrack 的先后顺序只由 `order` 字段决定，列表位置不可信。

/// 带显式排序键的实体
pub trait Ordered {
    fn order(&self) -> u32;

    fn set_order(&mut self, order: u32);
}

/// 按显示顺序（列表位置）重新编号：order = index
///
/// 每次插入或删除后调用，保证 order 从 0 开始且连续。幂等。
pub fn renumber<T: Ordered>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_order(index as u32);
    }
}

/// 按 order 升序返回引用（稳定排序，不修改原列表）
pub fn sorted_by_order<T: Ordered>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| item.order());
    sorted
}

/// 同一列表中出现不止一次的 order（升序，每个只列一次）
pub fn duplicate_orders<T: Ordered>(items: &[T]) -> Vec<u32> {
    let mut orders: Vec<u32> = items.iter().map(|item| item.order()).collect();
    orders.sort_unstable();

    let mut duplicates: Vec<u32> = orders
        .windows(2)
        .filter(|pair| pair[0] == pair[1])
        .map(|pair| pair[0])
        .collect();
    duplicates.dedup();
    duplicates
}

/// 先按 order 排好列表位置，再重新编号
pub(crate) fn normalize<T: Ordered>(items: &mut Vec<T>) {
    items.sort_by_key(|item| item.order());
    renumber(items);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        order: u32,
    }

    impl Ordered for Item {
        fn order(&self) -> u32 {
            self.order
        }

        fn set_order(&mut self, order: u32) {
            self.order = order;
        }
    }

    fn items(spec: &[(&'static str, u32)]) -> Vec<Item> {
        spec.iter()
            .map(|(name, order)| Item {
                name,
                order: *order,
            })
            .collect()
    }

    #[test]
    fn test_renumber_assigns_list_position() {
        let mut list = items(&[("a", 7), ("b", 2), ("c", 2)]);
        renumber(&mut list);
        let orders: Vec<u32> = list.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_renumber_is_idempotent() {
        let mut once = items(&[("a", 4), ("b", 9), ("c", 1)]);
        renumber(&mut once);
        let mut twice = once.clone();
        renumber(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sorted_by_order_ignores_position() {
        let list = items(&[("c", 2), ("a", 0), ("b", 1)]);
        let names: Vec<&str> = sorted_by_order(&list).iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_orders() {
        let list = items(&[("a", 0), ("b", 2), ("c", 0), ("d", 2), ("e", 0), ("f", 1)]);
        assert_eq!(duplicate_orders(&list), vec![0, 2]);
        assert!(duplicate_orders(&items(&[("a", 1), ("b", 0)])).is_empty());
    }

    #[test]
    fn test_normalize_keeps_relative_order() {
        let mut list = items(&[("c", 10), ("a", 3), ("b", 5)]);
        normalize(&mut list);
        let names: Vec<&str> = list.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(list[2].order, 2);
    }
}
