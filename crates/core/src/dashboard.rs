//! Reshapes the catalog and a user's progress into dashboard rows.
//!
//! Everything here is a pure function of its inputs and is recomputed on every
//! load; nothing is cached between renders.

use std::collections::{HashMap, HashSet};

use crate::model::{ContentId, ContentItem, Progress, ProgressRecord};

/// Items sharing one category, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<ContentItem>,
}

/// Category name to items, iterated in order of each category's first appearance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryGroups {
    groups: Vec<CategoryGroup>,
}

impl CategoryGroups {
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&[ContentItem]> {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.items.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.category.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryGroup> {
        self.groups.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<CategoryGroup> {
        self.groups
    }
}

impl<'a> IntoIterator for &'a CategoryGroups {
    type Item = &'a CategoryGroup;
    type IntoIter = std::slice::Iter<'a, CategoryGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Partition `content` by category, keeping input order inside each group.
#[must_use]
pub fn group_by_category(content: &[ContentItem]) -> CategoryGroups {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for item in content {
        let slot = *index.entry(item.category.as_str()).or_insert_with(|| {
            groups.push(CategoryGroup {
                category: item.category.clone(),
                items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].items.push(item.clone());
    }

    CategoryGroups { groups }
}

/// Items the user started but has not finished, in catalog order.
///
/// An item qualifies when any progress record for its id is strictly between
/// 0 and 100. Records pointing at ids missing from `content` are ignored.
#[must_use]
pub fn continue_watching(content: &[ContentItem], progress: &[ProgressRecord]) -> Vec<ContentItem> {
    let watching: HashSet<ContentId> = progress
        .iter()
        .filter(|p| p.progress.is_in_progress())
        .map(|p| p.content_id)
        .collect();

    content
        .iter()
        .filter(|item| watching.contains(&item.id))
        .cloned()
        .collect()
}

/// Progress shown on a card for `content_id`.
///
/// The first in-progress record wins, so an item in the continue-watching row
/// always carries a partial bar. Otherwise the first record for the id, if any.
#[must_use]
pub fn progress_for(content_id: ContentId, progress: &[ProgressRecord]) -> Option<Progress> {
    let mut records = progress.iter().filter(|p| p.content_id == content_id);
    let first = records.next()?.progress;
    if first.is_in_progress() {
        return Some(first);
    }
    records
        .map(|p| p.progress)
        .find(|p| p.is_in_progress())
        .or(Some(first))
}

/// Everything the dashboard renders, derived from one pair of snapshots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dashboard {
    content: Vec<ContentItem>,
    progress: Vec<ProgressRecord>,
    continue_watching: Vec<ContentItem>,
    by_category: CategoryGroups,
}

impl Dashboard {
    #[must_use]
    pub fn build(content: Vec<ContentItem>, progress: Vec<ProgressRecord>) -> Self {
        let by_category = group_by_category(&content);
        let continue_watching = continue_watching(&content, &progress);
        Self {
            content,
            progress,
            continue_watching,
            by_category,
        }
    }

    #[must_use]
    pub fn content(&self) -> &[ContentItem] {
        &self.content
    }

    #[must_use]
    pub fn progress(&self) -> &[ProgressRecord] {
        &self.progress
    }

    #[must_use]
    pub fn continue_watching(&self) -> &[ContentItem] {
        &self.continue_watching
    }

    #[must_use]
    pub fn by_category(&self) -> &CategoryGroups {
        &self.by_category
    }

    #[must_use]
    pub fn progress_for(&self, content_id: ContentId) -> Option<Progress> {
        progress_for(content_id, &self.progress)
    }

    /// First catalog item flagged as featured.
    #[must_use]
    pub fn featured(&self) -> Option<&ContentItem> {
        self.content.iter().find(|item| item.featured)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentKind, UserId};
    use crate::time::fixed_now;

    fn item(id: u64, category: &str) -> ContentItem {
        ContentItem::new(
            ContentId::new(id),
            format!("Title {id}"),
            category,
            ContentKind::Movie,
            fixed_now(),
        )
    }

    fn record(content_id: u64, percent: i64) -> ProgressRecord {
        ProgressRecord::new(
            UserId::random(),
            ContentId::new(content_id),
            Progress::new(percent).unwrap(),
            fixed_now(),
        )
    }

    fn ids(items: &[ContentItem]) -> Vec<u64> {
        items.iter().map(|i| i.id.value()).collect()
    }

    fn sample() -> Vec<ContentItem> {
        vec![item(1, "Action"), item(2, "Action"), item(3, "Drama")]
    }

    #[test]
    fn groups_and_continue_watching_for_partial_progress() {
        let content = sample();
        let progress = vec![record(1, 40)];

        let groups = group_by_category(&content);
        assert_eq!(groups.len(), 2);
        assert_eq!(ids(groups.get("Action").unwrap()), vec![1, 2]);
        assert_eq!(ids(groups.get("Drama").unwrap()), vec![3]);

        assert_eq!(ids(&continue_watching(&content, &progress)), vec![1]);
    }

    #[test]
    fn completed_items_are_not_continued() {
        let progress = vec![record(1, 100)];
        assert!(continue_watching(&sample(), &progress).is_empty());
    }

    #[test]
    fn unstarted_items_are_not_continued() {
        let progress = vec![record(2, 0)];
        assert!(continue_watching(&sample(), &progress).is_empty());
    }

    #[test]
    fn progress_for_unknown_content_is_ignored() {
        let progress = vec![record(9, 50)];
        assert!(continue_watching(&sample(), &progress).is_empty());
    }

    #[test]
    fn any_qualifying_record_is_enough() {
        let progress = vec![record(3, 100), record(3, 20)];
        assert_eq!(ids(&continue_watching(&sample(), &progress)), vec![3]);
    }

    #[test]
    fn continue_watching_keeps_catalog_order() {
        let progress = vec![record(3, 10), record(1, 10)];
        assert_eq!(ids(&continue_watching(&sample(), &progress)), vec![1, 3]);
    }

    #[test]
    fn grouping_is_a_partition() {
        let content = vec![
            item(5, "Drama"),
            item(1, "Action"),
            item(4, "Comedy"),
            item(2, "Drama"),
            item(3, "Action"),
        ];
        let groups = group_by_category(&content);

        let keys: Vec<&str> = groups.categories().collect();
        assert_eq!(keys, vec!["Drama", "Action", "Comedy"]);

        let mut seen: Vec<u64> = groups.iter().flat_map(|g| ids(&g.items)).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);

        assert_eq!(ids(groups.get("Drama").unwrap()), vec![5, 2]);
        assert_eq!(ids(groups.get("Action").unwrap()), vec![1, 3]);
        assert!(groups.get("Horror").is_none());
    }

    #[test]
    fn empty_inputs() {
        assert!(group_by_category(&[]).is_empty());
        assert!(continue_watching(&[], &[record(1, 50)]).is_empty());

        let groups = group_by_category(&sample());
        assert!(continue_watching(&sample(), &[]).is_empty());
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn continue_watching_is_deterministic() {
        let content = sample();
        let progress = vec![record(2, 70), record(1, 5), record(9, 50)];
        let first = continue_watching(&content, &progress);
        let second = continue_watching(&content, &progress);
        assert_eq!(first, second);
    }

    #[test]
    fn progress_for_returns_first_match() {
        let progress = vec![record(1, 30), record(1, 60)];
        assert_eq!(
            progress_for(ContentId::new(1), &progress),
            Some(Progress::new(30).unwrap())
        );
        assert_eq!(progress_for(ContentId::new(2), &progress), None);
    }

    #[test]
    fn progress_for_prefers_the_record_that_continues_watching() {
        let content = sample();
        for progress in [
            vec![record(1, 100), record(1, 40)],
            vec![record(1, 0), record(1, 40)],
        ] {
            assert_eq!(ids(&continue_watching(&content, &progress)), vec![1]);
            assert_eq!(
                progress_for(ContentId::new(1), &progress),
                Some(Progress::new(40).unwrap())
            );
        }

        let finished_only = vec![record(1, 100), record(1, 0)];
        assert_eq!(
            progress_for(ContentId::new(1), &finished_only),
            Some(Progress::COMPLETE)
        );
    }

    #[test]
    fn dashboard_bundles_derived_rows() {
        let mut content = sample();
        content[2] = content[2].clone().featured();
        let dashboard = Dashboard::build(content, vec![record(2, 55)]);

        assert_eq!(ids(dashboard.continue_watching()), vec![2]);
        assert_eq!(dashboard.by_category().len(), 2);
        assert_eq!(dashboard.featured().map(|f| f.id), Some(ContentId::new(3)));
        assert_eq!(
            dashboard.progress_for(ContentId::new(2)),
            Some(Progress::new(55).unwrap())
        );
        assert!(!dashboard.is_empty());
        assert!(Dashboard::default().featured().is_none());
    }
}
