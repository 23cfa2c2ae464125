//! Main application state and UI.

use crate::api::ApiClient;
use crate::event::Subscriptions;
use crate::issues::models::{CurrentIssue, Issue};
use crate::issues::state::StateManager;
use crate::issues::tree::IssuesTreeData;
use crate::issues::widget::{render_issues_panel, IssueAction};
use crate::settings::Settings;
use crate::theme;
use eframe::egui::{self, Color32, RichText};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Main browser application
pub struct BrowserApp {
    // API client (health checks; fetching runs through the state manager)
    api: ApiClient,
    api_connected: bool,
    api_error: Option<String>,

    // Issue state and the tree adapter over it
    state: Rc<RefCell<StateManager>>,
    tree: IssuesTreeData,
    // Keeps the adapter's event registrations alive until teardown
    _subscriptions: Subscriptions,
    tree_dirty: Rc<Cell<bool>>,

    // UI state
    selected: Option<Issue>,

    // Settings persistence
    settings: Settings,
    settings_dirty: bool,
    last_settings_save: Instant,
    last_refresh: Instant,
}

impl BrowserApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        // Load saved settings
        let settings = Settings::load();

        let state = Rc::new(RefCell::new(StateManager::new()));
        let mut subscriptions = Subscriptions::new();
        let tree = IssuesTreeData::new(Rc::clone(&state), &mut subscriptions);

        // Whole-tree invalidations from the adapter just schedule a repaint;
        // the next frame re-queries the tree from the root
        let tree_dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&tree_dirty);
        subscriptions.push(tree.on_did_change_tree_data().subscribe(move || {
            flag.set(true);
        }));

        let mut app = Self {
            api: ApiClient::new(settings.auth_token.clone()),
            api_connected: false,
            api_error: None,
            state,
            tree,
            _subscriptions: subscriptions,
            tree_dirty,
            selected: None,
            settings,
            settings_dirty: false,
            last_settings_save: Instant::now(),
            last_refresh: Instant::now(),
        };

        // Check API connection and load initial data
        app.check_api();
        if app.api_connected {
            app.refresh_issues();
        }

        app
    }

    fn check_api(&mut self) {
        match self.api.health() {
            Ok(true) => {
                self.api_connected = true;
                self.api_error = None;
            }
            Ok(false) => {
                self.api_connected = false;
                self.api_error = Some("API unhealthy".to_string());
            }
            Err(e) => {
                self.api_connected = false;
                self.api_error = Some(e);
            }
        }
    }

    fn refresh_issues(&mut self) {
        self.last_refresh = Instant::now();
        self.state
            .borrow_mut()
            .refresh(&self.settings.queries, self.settings.auth_token.clone());
    }

    /// Mark settings as needing to be saved
    fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Save settings if dirty and enough time has passed (debounce)
    fn maybe_save_settings(&mut self) {
        if self.settings_dirty && self.last_settings_save.elapsed().as_secs() >= 2 {
            self.settings.save();
            self.settings_dirty = false;
            self.last_settings_save = Instant::now();
        }
    }

    fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Issues");
        ui.add_space(10.0);

        // API status
        ui.horizontal(|ui| {
            if self.api_connected {
                ui.colored_label(theme::state::SUCCESS, "● Connected");
            } else {
                ui.colored_label(theme::state::ERROR, "● Disconnected");
                if ui.button("Retry").clicked() {
                    self.check_api();
                    if self.api_connected {
                        self.refresh_issues();
                    }
                }
            }

            if self.state.borrow().is_fetching() {
                ui.spinner();
            } else if ui.button("⟳ Refresh").clicked() {
                self.refresh_issues();
            }
        });

        if let Some(ref err) = self.api_error {
            ui.colored_label(Color32::RED, format!("Error: {}", err));
        }
        if let Some(err) = self.state.borrow().last_error() {
            ui.colored_label(Color32::RED, format!("Error: {}", err));
        }

        ui.add_space(10.0);
        ui.separator();

        let selected_number = self.selected.as_ref().map(|i| i.number);
        let action = render_issues_panel(ui, &mut self.tree, selected_number);
        match action {
            Some(IssueAction::Select(issue)) => self.selected = Some(issue),
            Some(IssueAction::StartWorking(issue)) => {
                self.selected = Some(issue.clone());
                self.state
                    .borrow_mut()
                    .set_current_issue(Some(CurrentIssue::new(issue)));
            }
            Some(IssueAction::StopWorking) => {
                self.state.borrow_mut().set_current_issue(None);
            }
            None => {}
        }
    }

    fn render_detail(&mut self, ui: &mut egui::Ui) {
        let Some(issue) = self.selected.clone() else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Select an issue to see its details")
                        .color(theme::text::MUTED),
                );
            });
            return;
        };

        ui.add_space(8.0);
        ui.heading(format!("#{}  {}", issue.number, issue.title));
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.colored_label(issue.state_color(), &issue.state);
            if let Some(ref assignee) = issue.assignee {
                ui.label(
                    RichText::new(format!("assigned to {}", assignee.login))
                        .color(theme::text::SECONDARY),
                );
            }
            if let Some(title) = issue.milestone_title() {
                ui.label(RichText::new(format!("milestone {}", title)).color(theme::text::SECONDARY));
            }
            if let Some(age) = issue.updated_relative(chrono::Utc::now()) {
                ui.label(RichText::new(format!("updated {}", age)).color(theme::text::MUTED));
            }
        });

        if !issue.labels.is_empty() {
            ui.add_space(6.0);
            ui.horizontal_wrapped(|ui| {
                for label in &issue.labels {
                    ui.colored_label(label.color32(), format!("[{}]", label.name));
                }
            });
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        let is_current = self
            .state
            .borrow()
            .current_issue()
            .map(|c| c.issue.number == issue.number)
            .unwrap_or(false);

        ui.horizontal(|ui| {
            if is_current {
                ui.colored_label(theme::state::SELECTED, "✓ You are working on this issue");
                if ui.button("Stop working").clicked() {
                    self.state.borrow_mut().set_current_issue(None);
                }
            } else if ui.button("Start working").clicked() {
                self.state
                    .borrow_mut()
                    .set_current_issue(Some(CurrentIssue::new(issue.clone())));
            }

            if !issue.html_url.is_empty() && ui.button("Open in browser").clicked() {
                ui.ctx().open_url(egui::OpenUrl::new_tab(&issue.html_url));
            }
        });
    }
}

impl eframe::App for BrowserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain any finished background fetch; firing change events here
        // flips the tree-dirty flag through the adapter
        self.state.borrow_mut().poll();

        if self.tree_dirty.take() {
            ctx.request_repaint();
        }

        // Periodic refresh
        if self.api_connected
            && refresh_due(self.last_refresh.elapsed().as_secs(), self.settings.refresh_mins)
        {
            self.refresh_issues();
        }

        self.maybe_save_settings();

        let panel = egui::SidePanel::left("issues_panel")
            .resizable(true)
            .default_width(self.settings.sidebar_width)
            .show(ctx, |ui| {
                self.render_sidebar(ui);
            });

        let width = panel.response.rect.width();
        if (width - self.settings.sidebar_width).abs() > 1.0 {
            self.settings.sidebar_width = width;
            self.mark_settings_dirty();
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::bg::DETAIL))
            .show(ctx, |ui| {
                self.render_detail(ui);
            });

        // Keep polling while a fetch is in flight
        if self.state.borrow().is_fetching() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Force save settings on exit
        if self.settings_dirty {
            self.settings.save();
        }
    }
}

/// Whether the periodic refresh interval has elapsed. Zero disables it.
/// Saturates so a hand-edited settings file cannot overflow the math.
fn refresh_due(elapsed_secs: u64, refresh_mins: u64) -> bool {
    refresh_mins > 0 && elapsed_secs >= refresh_mins.saturating_mul(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_due_after_interval() {
        assert!(!refresh_due(299, 5));
        assert!(refresh_due(300, 5));
    }

    #[test]
    fn zero_interval_disables_refresh() {
        assert!(!refresh_due(u64::MAX, 0));
    }

    #[test]
    fn absurd_interval_saturates_instead_of_overflowing() {
        // u64::MAX minutes would overflow a plain multiply in debug builds
        assert!(!refresh_due(1_000_000, u64::MAX));
        assert!(refresh_due(u64::MAX, u64::MAX));
    }
}
