//! Sidebar panel rendering the issues tree.
//!
//! Walks the tree-data adapter (`children`/`tree_item`) and maps
//! container nodes to `CollapsingHeader`s whose default-open state
//! comes from the adapter's collapsible state.

use crate::issues::models::Issue;
use crate::issues::tree::{
    CollapsibleState, IssuesTreeData, TreeNode, CONTEXT_CURRENT_ISSUE, CONTEXT_ISSUE,
};
use crate::theme;
use eframe::egui::{self, RichText, ScrollArea, Ui};

/// Interaction produced by the tree panel, handled by the app.
#[derive(Debug, Clone)]
pub enum IssueAction {
    Select(Issue),
    StartWorking(Issue),
    StopWorking,
}

/// Render the issues tree. Returns at most one action per frame.
pub fn render_issues_panel(
    ui: &mut Ui,
    tree: &mut IssuesTreeData,
    selected: Option<i64>,
) -> Option<IssueAction> {
    let roots = tree.children(None);
    if roots.is_empty() {
        ui.label(
            RichText::new("No issues loaded")
                .color(theme::text::MUTED)
                .italics(),
        );
        return None;
    }

    let mut action = None;
    ScrollArea::vertical()
        .id_salt("issues_tree_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for node in &roots {
                render_node(ui, tree, node, "", selected, &mut action);
            }
        });
    action
}

fn render_node(
    ui: &mut Ui,
    tree: &mut IssuesTreeData,
    node: &TreeNode,
    path: &str,
    selected: Option<i64>,
    action: &mut Option<IssueAction>,
) {
    let item = tree.tree_item(node);
    match item.collapsible_state {
        CollapsibleState::None => render_leaf(ui, node, &item, selected, action),
        open_state => {
            // Salt with the full path so identical milestone titles under
            // different queries keep separate expand state
            let child_path = format!("{}/{}", path, item.label);
            egui::CollapsingHeader::new(&item.label)
                .id_salt(child_path.as_str())
                .default_open(open_state == CollapsibleState::Expanded)
                .show(ui, |ui| {
                    for child in tree.children(Some(node)) {
                        render_node(ui, tree, &child, &child_path, selected, action);
                    }
                });
        }
    }
}

fn render_leaf(
    ui: &mut Ui,
    node: &TreeNode,
    item: &crate::issues::tree::TreeItem,
    selected: Option<i64>,
    action: &mut Option<IssueAction>,
) {
    let TreeNode::Issue(issue) = node else {
        // Empty milestone group: heading with no children indicator
        ui.label(RichText::new(&item.label).color(theme::text::MUTED));
        return;
    };

    ui.horizontal(|ui| {
        let dark = ui.visuals().dark_mode;
        let icon_color = item
            .icon
            .map(|pair| pair.for_dark_mode(dark))
            .unwrap_or(theme::text::MUTED);
        ui.colored_label(icon_color, "◉");

        let is_current = item.context_value == Some(CONTEXT_CURRENT_ISSUE);
        let text = if is_current {
            RichText::new(&item.label).color(theme::state::SELECTED)
        } else {
            RichText::new(&item.label)
        };

        let response = ui.selectable_label(selected == Some(issue.number), text);
        if response.clicked() {
            *action = Some(IssueAction::Select(issue.clone()));
        }
        response.context_menu(|ui| match item.context_value {
            Some(CONTEXT_CURRENT_ISSUE) => {
                if ui.button("Stop working on this issue").clicked() {
                    *action = Some(IssueAction::StopWorking);
                    ui.close_menu();
                }
            }
            Some(CONTEXT_ISSUE) => {
                if ui.button("Start working on this issue").clicked() {
                    *action = Some(IssueAction::StartWorking(issue.clone()));
                    ui.close_menu();
                }
            }
            _ => {}
        });
    });
}
