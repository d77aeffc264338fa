//! Tie-aware top-2 selection over download counts.

use crate::client::Item;

/// All items sharing one download count.
///
/// An empty group stands for "no such rank": its count reads as zero and it
/// reports no members. Output never contains a synthetic item.
#[derive(Debug, Clone, Default)]
pub struct RankGroup {
    items: Vec<Item>,
}

impl RankGroup {
    pub fn empty() -> Self {
        Self::default()
    }

    fn of(item: Item) -> Self {
        Self { items: vec![item] }
    }

    fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Shared download count of the members, 0 when empty.
    pub fn downloads(&self) -> u64 {
        self.items.first().map(Item::downloads).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

/// Single linear pass over the result items, keeping every item tied at the
/// highest count in `top1` and every item tied at the second-highest
/// distinct count in `top2`. Members keep their input order.
///
/// Branch order matters: the top1 equality check runs before the top2
/// checks, so a count can never land in both groups. The equality branches
/// additionally require the group to be nonempty, since an empty group's
/// count reads as zero and a zero-download item (the source query excludes
/// them, but a decoded response is not re-validated) must rank below both
/// groups rather than join one.
pub fn top_two(items: Vec<Item>) -> (RankGroup, RankGroup) {
    let mut top1 = RankGroup::empty();
    let mut top2 = RankGroup::empty();

    for item in items {
        let d = item.downloads();
        let t1 = top1.downloads();
        let t2 = top2.downloads();

        if d > t1 {
            top1 = RankGroup::of(item);
        } else if d == t1 && !top1.is_empty() {
            top1.push(item);
        } else if d > t2 && d != t1 {
            top2 = RankGroup::of(item);
        } else if d == t2 && d != t1 && !top2.is_empty() {
            top2.push(item);
        }
        // anything else ranks below both groups and is dropped
    }

    (top1, top2)
}
