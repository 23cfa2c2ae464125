//! State manager for the issues browser.
//!
//! Owns the query-label -> items mapping and the current-issue pointer,
//! and fires a change event for each. Fetching runs on a background
//! thread reporting through an mpsc channel; `poll` drains it on the
//! UI thread once per frame.

use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::api::ApiClient;
use crate::event::EventEmitter;
use crate::issues::models::{CurrentIssue, Issue, IssueItem, Milestone, MilestoneGroup};
use crate::settings::SavedQuery;

/// Ordered label -> items mapping. Labels keep insertion order, which
/// is what the tree shows.
#[derive(Default)]
pub struct IssueCollection {
    entries: Vec<(String, Vec<IssueItem>)>,
}

impl IssueCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace the items for a label. Replacing keeps the
    /// label's position.
    pub fn insert(&mut self, label: impl Into<String>, items: Vec<IssueItem>) {
        let label = label.into();
        if let Some(entry) = self.entries.iter_mut().find(|(l, _)| *l == label) {
            entry.1 = items;
        } else {
            self.entries.push((label, items));
        }
    }

    pub fn get(&self, label: &str) -> Option<&[IssueItem]> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, items)| items.as_slice())
    }

    pub fn first_label(&self) -> Option<&str> {
        self.entries.first().map(|(l, _)| l.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[IssueItem])> {
        self.entries
            .iter()
            .map(|(l, items)| (l.as_str(), items.as_slice()))
    }
}

type FetchResult = Result<Vec<(String, Vec<IssueItem>)>, String>;

/// Central state: the issue collection, the current issue, and the two
/// change events the tree adapter subscribes to.
pub struct StateManager {
    collection: IssueCollection,
    current_issue: Option<CurrentIssue>,
    pub on_did_change_issue_data: Rc<EventEmitter>,
    pub on_did_change_current_issue: Rc<EventEmitter>,
    fetch_rx: Option<Receiver<FetchResult>>,
    fetching: bool,
    last_error: Option<String>,
}

impl StateManager {
    pub fn new() -> Self {
        Self {
            collection: IssueCollection::new(),
            current_issue: None,
            on_did_change_issue_data: EventEmitter::new(),
            on_did_change_current_issue: EventEmitter::new(),
            fetch_rx: None,
            fetching: false,
            last_error: None,
        }
    }

    pub fn issue_collection(&self) -> &IssueCollection {
        &self.collection
    }

    pub fn current_issue(&self) -> Option<&CurrentIssue> {
        self.current_issue.as_ref()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the whole collection and notify.
    ///
    /// Listeners must not call back into the state manager.
    pub fn set_issue_collection(&mut self, entries: Vec<(String, Vec<IssueItem>)>) {
        let mut collection = IssueCollection::new();
        for (label, items) in entries {
            collection.insert(label, items);
        }
        self.collection = collection;
        self.on_did_change_issue_data.fire();
    }

    /// Set or clear the current issue and notify.
    pub fn set_current_issue(&mut self, current: Option<CurrentIssue>) {
        self.current_issue = current;
        self.on_did_change_current_issue.fire();
    }

    /// Kick off a background fetch of all saved queries. No-op while a
    /// fetch is already in flight.
    pub fn refresh(&mut self, queries: &[SavedQuery], auth_token: Option<String>) {
        if self.fetching {
            return;
        }
        self.fetching = true;

        let (tx, rx) = mpsc::channel();
        self.fetch_rx = Some(rx);

        let queries = queries.to_vec();
        tracing::info!("refreshing {} saved queries", queries.len());
        std::thread::spawn(move || {
            let api = ApiClient::new(auth_token);
            let _ = tx.send(fetch_all(&api, &queries));
        });
    }

    /// Drain the fetch channel. Call once per frame on the UI thread.
    pub fn poll(&mut self) {
        let Some(rx) = &self.fetch_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(entries)) => {
                tracing::info!("fetch finished: {} queries", entries.len());
                self.fetching = false;
                self.fetch_rx = None;
                self.last_error = None;
                self.set_issue_collection(entries);
            }
            Ok(Err(e)) => {
                tracing::warn!("fetch failed: {}", e);
                self.fetching = false;
                self.fetch_rx = None;
                self.last_error = Some(e);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.fetching = false;
                self.fetch_rx = None;
            }
        }
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch_all(api: &ApiClient, queries: &[SavedQuery]) -> FetchResult {
    let mut entries = Vec::with_capacity(queries.len());
    for query in queries {
        let issues = api.search_issues(&query.query)?;
        let items = if query.group_by_milestone {
            group_by_milestone(issues)
        } else {
            issues.into_iter().map(IssueItem::Issue).collect()
        };
        entries.push((query.label.clone(), items));
    }
    Ok(entries)
}

/// Bucket issues into milestone groups, keeping the first-seen order of
/// milestone titles. Issues without a milestone land in a trailing
/// "No milestone" group.
pub fn group_by_milestone(issues: Vec<Issue>) -> Vec<IssueItem> {
    let mut groups: Vec<MilestoneGroup> = Vec::new();
    let mut unmilestoned: Vec<Issue> = Vec::new();

    for issue in issues {
        match issue.milestone.clone() {
            Some(milestone) => {
                if let Some(group) = groups.iter_mut().find(|g| g.milestone.title == milestone.title)
                {
                    group.issues.push(issue);
                } else {
                    groups.push(MilestoneGroup {
                        milestone,
                        issues: vec![issue],
                    });
                }
            }
            None => unmilestoned.push(issue),
        }
    }

    if !unmilestoned.is_empty() {
        groups.push(MilestoneGroup {
            milestone: Milestone {
                title: "No milestone".to_string(),
                due_on: None,
            },
            issues: unmilestoned,
        });
    }

    groups.into_iter().map(IssueItem::Milestone).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::models::test_issue;
    use std::cell::Cell;

    fn with_milestone(number: i64, title: &str, milestone: &str) -> Issue {
        let mut issue = test_issue(number, title);
        issue.milestone = Some(Milestone {
            title: milestone.to_string(),
            due_on: None,
        });
        issue
    }

    #[test]
    fn collection_preserves_insertion_order() {
        let mut collection = IssueCollection::new();
        collection.insert("Zebra", vec![]);
        collection.insert("Apple", vec![]);
        collection.insert("Mango", vec![]);

        let labels: Vec<&str> = collection.labels().collect();
        assert_eq!(labels, vec!["Zebra", "Apple", "Mango"]);
        assert_eq!(collection.first_label(), Some("Zebra"));
    }

    #[test]
    fn collection_replace_keeps_position() {
        let mut collection = IssueCollection::new();
        collection.insert("A", vec![]);
        collection.insert("B", vec![]);
        collection.insert("A", vec![IssueItem::Issue(test_issue(1, "one"))]);

        let labels: Vec<&str> = collection.labels().collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(collection.get("A").unwrap().len(), 1);
    }

    #[test]
    fn collection_missing_label_is_none() {
        let collection = IssueCollection::new();
        assert!(collection.get("nope").is_none());
        assert!(collection.first_label().is_none());
    }

    #[test]
    fn grouping_keeps_first_seen_milestone_order() {
        let issues = vec![
            with_milestone(1, "a", "v2.0"),
            with_milestone(2, "b", "v1.0"),
            with_milestone(3, "c", "v2.0"),
        ];
        let items = group_by_milestone(issues);
        assert_eq!(items.len(), 2);

        let titles: Vec<&str> = items
            .iter()
            .map(|item| match item {
                IssueItem::Milestone(g) => g.milestone.title.as_str(),
                IssueItem::Issue(_) => panic!("expected milestone group"),
            })
            .collect();
        assert_eq!(titles, vec!["v2.0", "v1.0"]);

        match &items[0] {
            IssueItem::Milestone(g) => {
                let numbers: Vec<i64> = g.issues.iter().map(|i| i.number).collect();
                assert_eq!(numbers, vec![1, 3]);
            }
            IssueItem::Issue(_) => unreachable!(),
        }
    }

    #[test]
    fn grouping_puts_unmilestoned_issues_last() {
        let issues = vec![test_issue(1, "loose"), with_milestone(2, "b", "v1.0")];
        let items = group_by_milestone(issues);
        assert_eq!(items.len(), 2);
        match &items[1] {
            IssueItem::Milestone(g) => {
                assert_eq!(g.milestone.title, "No milestone");
                assert_eq!(g.issues[0].number, 1);
            }
            IssueItem::Issue(_) => panic!("expected milestone group"),
        }
    }

    #[test]
    fn setters_fire_their_events() {
        let mut state = StateManager::new();
        let data_count = std::rc::Rc::new(Cell::new(0));
        let current_count = std::rc::Rc::new(Cell::new(0));

        let c = std::rc::Rc::clone(&data_count);
        let _d1 = state
            .on_did_change_issue_data
            .subscribe(move || c.set(c.get() + 1));
        let c = std::rc::Rc::clone(&current_count);
        let _d2 = state
            .on_did_change_current_issue
            .subscribe(move || c.set(c.get() + 1));

        state.set_issue_collection(vec![("All".into(), vec![])]);
        assert_eq!(data_count.get(), 1);
        assert_eq!(current_count.get(), 0);

        state.set_current_issue(Some(CurrentIssue::new(test_issue(9, "now"))));
        state.set_current_issue(None);
        assert_eq!(current_count.get(), 2);
        assert_eq!(data_count.get(), 1);
    }
}
