//! Issues browser: models, state manager, tree adapter, panel widget.
//!
//! The sidebar projects saved searches into a three-level tree:
//! query label -> milestone/issue groups -> issues. The state manager
//! owns the data and the change events; the tree adapter only projects.

pub mod models;
pub mod state;
pub mod tree;
pub mod widget;

pub use models::{CurrentIssue, Issue, IssueItem, Milestone, MilestoneGroup};
pub use state::{IssueCollection, StateManager};
pub use tree::{IssuesTreeData, TreeNode};
pub use widget::render_issues_panel;
