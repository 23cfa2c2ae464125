//! Issue and milestone records as returned by the GitHub search API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A label attached to an issue.
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
    /// Hex color without the leading `#`, e.g. `"d73a4a"`.
    #[serde(default)]
    pub color: String,
}

impl Label {
    /// Parse the API hex color, falling back to gray on bad input.
    pub fn color32(&self) -> egui::Color32 {
        let hex = self.color.trim_start_matches('#');
        // Slice only ASCII input; a multibyte string of byte length 6
        // would not split on char boundaries
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return egui::Color32::from_rgb(r, g, b);
            }
        }
        egui::Color32::from_rgb(156, 163, 175)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Assignee {
    pub login: String,
}

/// A milestone as embedded in an issue payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Milestone {
    pub title: String,
    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,
}

/// A single issue from a search result.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: i64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// State badge color.
    pub fn state_color(&self) -> egui::Color32 {
        match self.state.as_str() {
            "open" => egui::Color32::from_rgb(34, 197, 94),    // Green
            "closed" => egui::Color32::from_rgb(168, 85, 247), // Purple
            _ => egui::Color32::from_rgb(156, 163, 175),       // Light gray
        }
    }

    pub fn milestone_title(&self) -> Option<&str> {
        self.milestone.as_ref().map(|m| m.title.as_str())
    }

    /// Compact relative age like `"3d ago"` for list rows.
    pub fn updated_relative(&self, now: DateTime<Utc>) -> Option<String> {
        let updated = self.updated_at?;
        let mins = (now - updated).num_minutes().max(0);
        Some(if mins < 60 {
            format!("{}m ago", mins)
        } else if mins < 60 * 24 {
            format!("{}h ago", mins / 60)
        } else {
            format!("{}d ago", mins / (60 * 24))
        })
    }
}

/// A milestone heading together with its issues, in result order.
#[derive(Debug, Clone)]
pub struct MilestoneGroup {
    pub milestone: Milestone,
    pub issues: Vec<Issue>,
}

/// What a saved query stores per entry: either a bare issue or a
/// milestone group wrapping several.
#[derive(Debug, Clone)]
pub enum IssueItem {
    Issue(Issue),
    Milestone(MilestoneGroup),
}

/// The issue the user is actively working on.
///
/// Matched against tree rows by number only; titles may drift between
/// refreshes without dropping the highlight.
#[derive(Debug, Clone)]
pub struct CurrentIssue {
    pub issue: Issue,
    /// Working branch checked out for this issue, if any.
    pub branch: Option<String>,
}

impl CurrentIssue {
    pub fn new(issue: Issue) -> Self {
        Self {
            issue,
            branch: None,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_issue(number: i64, title: &str) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        state: "open".to_string(),
        labels: Vec::new(),
        assignee: None,
        milestone: None,
        html_url: String::new(),
        updated_at: None,
    }
}
