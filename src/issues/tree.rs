//! Tree-data adapter projecting the state manager into the sidebar tree.
//!
//! The adapter answers two queries — `tree_item` (display projection)
//! and `children` (lazy child enumeration) — and re-fires a single
//! tree-changed event whenever the state manager reports any change.
//! It holds no data of its own beyond the remembered first query label.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{EventEmitter, Subscriptions};
use crate::issues::models::IssueItem;
use crate::issues::state::StateManager;
use crate::theme;

pub const CONTEXT_QUERY: &str = "query";
pub const CONTEXT_ISSUE: &str = "issue";
pub const CONTEXT_CURRENT_ISSUE: &str = "currentissue";

/// The three node shapes the tree can hold.
#[derive(Debug, Clone)]
pub enum TreeNode {
    /// Placeholder for a saved query label (top grouping level).
    Query(String),
    Milestone(crate::issues::models::MilestoneGroup),
    Issue(crate::issues::models::Issue),
}

impl From<IssueItem> for TreeNode {
    fn from(item: IssueItem) -> Self {
        match item {
            IssueItem::Issue(issue) => TreeNode::Issue(issue),
            IssueItem::Milestone(group) => TreeNode::Milestone(group),
        }
    }
}

/// Whether a node can expand, and whether it starts expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapsibleState {
    /// Leaf-like: no children indicator at all.
    None,
    Collapsed,
    Expanded,
}

/// Transient display projection of a node. Recomputed on every call,
/// never stored.
#[derive(Debug, Clone)]
pub struct TreeItem {
    pub label: String,
    pub collapsible_state: CollapsibleState,
    pub icon: Option<theme::IconPair>,
    pub context_value: Option<&'static str>,
}

/// The tree-data provider for the issues sidebar.
pub struct IssuesTreeData {
    state: Rc<RefCell<StateManager>>,
    tree_changed: Rc<EventEmitter>,
    /// Label of the first query in the collection, remembered on each
    /// multi-query root listing so only that query expands by default.
    first_label: Option<String>,
}

impl IssuesTreeData {
    /// Subscribes to both state-manager events for the lifetime of
    /// `subscriptions`; each re-fires this adapter's tree-changed event
    /// with whole-tree scope.
    pub fn new(state: Rc<RefCell<StateManager>>, subscriptions: &mut Subscriptions) -> Self {
        let tree_changed = EventEmitter::new();
        {
            let st = state.borrow();
            let emitter = Rc::clone(&tree_changed);
            subscriptions.push(st.on_did_change_issue_data.subscribe(move || emitter.fire()));
            let emitter = Rc::clone(&tree_changed);
            subscriptions.push(
                st.on_did_change_current_issue
                    .subscribe(move || emitter.fire()),
            );
        }
        Self {
            state,
            tree_changed,
            first_label: None,
        }
    }

    /// Fired whenever the visible tree must be re-queried from the root.
    pub fn on_did_change_tree_data(&self) -> &Rc<EventEmitter> {
        &self.tree_changed
    }

    /// Display projection for a node. Pure apart from reading the
    /// current-issue pointer.
    pub fn tree_item(&self, node: &TreeNode) -> TreeItem {
        match node {
            TreeNode::Query(label) => TreeItem {
                label: label.clone(),
                collapsible_state: if self.first_label.as_deref() == Some(label.as_str()) {
                    CollapsibleState::Expanded
                } else {
                    CollapsibleState::Collapsed
                },
                icon: None,
                context_value: Some(CONTEXT_QUERY),
            },
            TreeNode::Milestone(group) => TreeItem {
                label: group.milestone.title.clone(),
                collapsible_state: if group.issues.is_empty() {
                    CollapsibleState::None
                } else {
                    CollapsibleState::Expanded
                },
                icon: None,
                context_value: None,
            },
            TreeNode::Issue(issue) => {
                let is_current = self
                    .state
                    .borrow()
                    .current_issue()
                    .map(|c| c.issue.number == issue.number)
                    .unwrap_or(false);
                let label = if is_current {
                    format!("✓ {}: {}", issue.number, issue.title)
                } else {
                    format!("{}: {}", issue.number, issue.title)
                };
                TreeItem {
                    label,
                    collapsible_state: CollapsibleState::None,
                    icon: Some(theme::icon::ISSUE),
                    context_value: Some(if is_current {
                        CONTEXT_CURRENT_ISSUE
                    } else {
                        CONTEXT_ISSUE
                    }),
                }
            }
        }
    }

    /// Child enumeration. `None` asks for the root level.
    ///
    /// Missing lookups degrade to an empty list; nothing here fails.
    pub fn children(&mut self, node: Option<&TreeNode>) -> Vec<TreeNode> {
        let state = Rc::clone(&self.state);
        let st = state.borrow();
        match node {
            None => {
                let collection = st.issue_collection();
                // A single query shows its items directly, no label level
                if collection.len() == 1 {
                    return collection
                        .iter()
                        .next()
                        .map(|(_, items)| items.iter().cloned().map(TreeNode::from).collect())
                        .unwrap_or_default();
                }
                self.first_label = collection.first_label().map(str::to_string);
                collection
                    .labels()
                    .map(|label| TreeNode::Query(label.to_string()))
                    .collect()
            }
            Some(TreeNode::Query(label)) => st
                .issue_collection()
                .get(label)
                .map(|items| items.iter().cloned().map(TreeNode::from).collect())
                .unwrap_or_default(),
            Some(TreeNode::Milestone(group)) => {
                group.issues.iter().cloned().map(TreeNode::Issue).collect()
            }
            Some(TreeNode::Issue(_)) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::models::{test_issue, CurrentIssue, Milestone, MilestoneGroup};
    use std::cell::Cell;

    fn shared_state() -> Rc<RefCell<StateManager>> {
        Rc::new(RefCell::new(StateManager::new()))
    }

    fn adapter(state: &Rc<RefCell<StateManager>>) -> (IssuesTreeData, Subscriptions) {
        let mut subs = Subscriptions::new();
        let tree = IssuesTreeData::new(Rc::clone(state), &mut subs);
        (tree, subs)
    }

    fn group(title: &str, issues: Vec<crate::issues::models::Issue>) -> MilestoneGroup {
        MilestoneGroup {
            milestone: Milestone {
                title: title.to_string(),
                due_on: None,
            },
            issues,
        }
    }

    #[test]
    fn single_query_flattens_away_the_label_level() {
        let state = shared_state();
        state.borrow_mut().set_issue_collection(vec![(
            "Only".into(),
            vec![
                IssueItem::Issue(test_issue(1, "one")),
                IssueItem::Issue(test_issue(2, "two")),
            ],
        )]);
        let (mut tree, _subs) = adapter(&state);

        let roots = tree.children(None);
        assert_eq!(roots.len(), 2);
        assert!(matches!(&roots[0], TreeNode::Issue(i) if i.number == 1));
        assert!(matches!(&roots[1], TreeNode::Issue(i) if i.number == 2));
    }

    #[test]
    fn multiple_queries_list_placeholders_in_order() {
        let state = shared_state();
        state.borrow_mut().set_issue_collection(vec![
            ("A".into(), vec![]),
            ("B".into(), vec![]),
        ]);
        let (mut tree, _subs) = adapter(&state);

        let roots = tree.children(None);
        assert_eq!(roots.len(), 2);
        let labels: Vec<&str> = roots
            .iter()
            .map(|n| match n {
                TreeNode::Query(l) => l.as_str(),
                _ => panic!("expected query placeholder"),
            })
            .collect();
        assert_eq!(labels, vec!["A", "B"]);

        for node in &roots {
            assert_eq!(tree.tree_item(node).context_value, Some(CONTEXT_QUERY));
        }
    }

    #[test]
    fn only_first_query_label_expands_by_default() {
        let state = shared_state();
        state.borrow_mut().set_issue_collection(vec![
            ("A".into(), vec![]),
            ("B".into(), vec![]),
        ]);
        let (mut tree, _subs) = adapter(&state);
        let roots = tree.children(None);

        assert_eq!(
            tree.tree_item(&roots[0]).collapsible_state,
            CollapsibleState::Expanded
        );
        assert_eq!(
            tree.tree_item(&roots[1]).collapsible_state,
            CollapsibleState::Collapsed
        );
    }

    #[test]
    fn query_placeholder_children_come_from_the_collection() {
        let state = shared_state();
        state.borrow_mut().set_issue_collection(vec![
            ("A".into(), vec![IssueItem::Issue(test_issue(10, "ten"))]),
            ("B".into(), vec![]),
        ]);
        let (mut tree, _subs) = adapter(&state);

        let children = tree.children(Some(&TreeNode::Query("A".into())));
        assert_eq!(children.len(), 1);
        assert!(matches!(&children[0], TreeNode::Issue(i) if i.number == 10));

        // Unknown labels degrade to empty, not an error
        let missing = tree.children(Some(&TreeNode::Query("nope".into())));
        assert!(missing.is_empty());
    }

    #[test]
    fn current_issue_gets_checkmark_and_context_tag() {
        let state = shared_state();
        state
            .borrow_mut()
            .set_current_issue(Some(CurrentIssue::new(test_issue(42, "current"))));
        let (tree, _subs) = adapter(&state);

        let current = tree.tree_item(&TreeNode::Issue(test_issue(42, "current")));
        assert_eq!(current.label, "✓ 42: current");
        assert_eq!(current.context_value, Some(CONTEXT_CURRENT_ISSUE));

        let other = tree.tree_item(&TreeNode::Issue(test_issue(43, "other")));
        assert_eq!(other.label, "43: other");
        assert_eq!(other.context_value, Some(CONTEXT_ISSUE));
        assert!(other.icon.is_some());
    }

    #[test]
    fn empty_milestone_group_is_leaf_like() {
        let state = shared_state();
        let (tree, _subs) = adapter(&state);

        let empty = tree.tree_item(&TreeNode::Milestone(group("v1.0", vec![])));
        assert_eq!(empty.collapsible_state, CollapsibleState::None);
        assert_eq!(empty.label, "v1.0");

        let full = tree.tree_item(&TreeNode::Milestone(group(
            "v1.1",
            vec![test_issue(1, "a")],
        )));
        assert_eq!(full.collapsible_state, CollapsibleState::Expanded);
    }

    #[test]
    fn milestone_children_are_its_issues() {
        let state = shared_state();
        let (mut tree, _subs) = adapter(&state);

        let children = tree.children(Some(&TreeNode::Milestone(group(
            "v1.0",
            vec![test_issue(1, "a"), test_issue(2, "b")],
        ))));
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn issue_leaf_has_no_children() {
        let state = shared_state();
        let (mut tree, _subs) = adapter(&state);
        assert!(tree
            .children(Some(&TreeNode::Issue(test_issue(1, "a"))))
            .is_empty());
    }

    #[test]
    fn each_upstream_event_fires_one_whole_tree_invalidation() {
        let state = shared_state();
        let (tree, _subs) = adapter(&state);

        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _d = tree
            .on_did_change_tree_data()
            .subscribe(move || c.set(c.get() + 1));

        state
            .borrow_mut()
            .set_issue_collection(vec![("A".into(), vec![])]);
        assert_eq!(count.get(), 1);

        state
            .borrow_mut()
            .set_current_issue(Some(CurrentIssue::new(test_issue(1, "a"))));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn subscriptions_teardown_detaches_the_adapter() {
        let state = shared_state();
        let (tree, subs) = adapter(&state);

        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _d = tree
            .on_did_change_tree_data()
            .subscribe(move || c.set(c.get() + 1));

        drop(subs);
        state
            .borrow_mut()
            .set_issue_collection(vec![("A".into(), vec![])]);
        assert_eq!(count.get(), 0);
    }
}
