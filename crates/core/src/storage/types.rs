use std::sync::Arc;

use crate::checklist::{Finding, FindingFilter};

/// A finite, read-only view over findings matching a filter.
///
/// The set holds a snapshot of the findings table taken when it was listed,
/// so later mutations do not show up in it. Matching is lazy: records are
/// tested as [`iter`](FindingSet::iter) advances, and every call to `iter`
/// starts again from the first match.
#[derive(Debug, Clone)]
pub struct FindingSet {
    records: Arc<Vec<Finding>>,
    filter: FindingFilter,
}

impl FindingSet {
    /// Wraps a snapshot of findings, ordered by id.
    pub fn new(records: Arc<Vec<Finding>>, filter: FindingFilter) -> Self {
        Self { records, filter }
    }

    pub fn iter(&self) -> FindingIter<'_> {
        FindingIter {
            inner: self.records.iter(),
            filter: &self.filter,
        }
    }

    pub fn filter(&self) -> &FindingFilter {
        &self.filter
    }

    /// Number of matching findings.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Collects the matching findings.
    pub fn to_vec(&self) -> Vec<Finding> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a FindingSet {
    type Item = &'a Finding;
    type IntoIter = FindingIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the findings of a [`FindingSet`].
#[derive(Debug, Clone)]
pub struct FindingIter<'a> {
    inner: std::slice::Iter<'a, Finding>,
    filter: &'a FindingFilter,
}

impl<'a> Iterator for FindingIter<'a> {
    type Item = &'a Finding;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.inner.find(|finding| filter.matches(finding))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::checklist::{BestPracticeId, FindingId, QuestionId};

    fn finding(id: i64, status: bool) -> Finding {
        Finding {
            id: FindingId(id),
            question_id: QuestionId(1),
            best_practice_id: BestPracticeId(1),
            violated_resource_count: 1,
            violated_resource_service: "IAM".to_string(),
            violated_resource_description: format!("Resource {id}"),
            implementation_status: status,
            created_at: Utc::now(),
            version: 1,
        }
    }

    fn snapshot() -> Arc<Vec<Finding>> {
        Arc::new(vec![finding(1, false), finding(2, true), finding(3, false)])
    }

    #[test]
    fn test_iter_yields_matches_in_order() {
        let set = FindingSet::new(snapshot(), FindingFilter::new().with_status(false));

        let ids: Vec<FindingId> = set.iter().map(|f| f.id).collect();

        assert_eq!(ids, vec![FindingId(1), FindingId(3)]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_iter_is_restartable() {
        let set = FindingSet::new(snapshot(), FindingFilter::new());

        let mut first = set.iter();
        assert_eq!(first.next().map(|f| f.id), Some(FindingId(1)));

        let second: Vec<FindingId> = set.iter().map(|f| f.id).collect();
        assert_eq!(second, vec![FindingId(1), FindingId(2), FindingId(3)]);
    }

    #[test]
    fn test_empty_set() {
        let set = FindingSet::new(snapshot(), FindingFilter::new().with_service("S3"));
        assert!(set.is_empty());
        assert!(set.to_vec().is_empty());
    }

    #[test]
    fn test_into_iterator_for_reference() {
        let set = FindingSet::new(snapshot(), FindingFilter::new().with_status(true));
        let mut count = 0;
        for finding in &set {
            assert!(finding.implementation_status);
            count += 1;
        }
        assert_eq!(count, 1);
    }
}
