use std::sync::Arc;
use std::time::Instant;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::source::RecordSource;
use crate::theme::ThemeColors;
use crate::tree::builder::{FlatRecord, NodeKind};
use crate::tree::state::TreeState;

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    /// Inline filter editing; the tree shows matches and their ancestors.
    Filter,
    /// Fuzzy finder overlay over every materialized node.
    Search,
    /// Keybinding help overlay.
    Help,
}

/// A single fuzzy finder hit.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Text shown in the overlay list ("label  path").
    pub display: String,
    pub path: String,
    pub id: Option<String>,
    pub kind: NodeKind,
    pub score: i64,
    /// Byte indices into `display` that matched, for highlighting.
    pub match_indices: Vec<usize>,
}

/// State for the fuzzy finder overlay.
#[derive(Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub cursor_position: usize,
    pub results: Vec<SearchResult>,
    pub selected_index: usize,
}

/// Main application state.
pub struct App {
    pub tree_state: TreeState,
    pub source: Arc<dyn RecordSource>,
    pub theme: ThemeColors,
    pub use_icons: bool,
    pub mode: AppMode,
    pub search_state: SearchState,
    /// `(text, is_error, created)`; expires after a few seconds.
    pub status_message: Option<(String, bool, Instant)>,
    pub should_quit: bool,
    pub watcher_active: bool,
    /// Display name of the records source (file name).
    pub source_name: String,
}

impl App {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        records: &[FlatRecord],
        source: Arc<dyn RecordSource>,
        theme: ThemeColors,
        use_icons: bool,
        sorted: bool,
        lazy: bool,
        watcher_active: bool,
        source_name: String,
    ) -> Self {
        let tree_state = TreeState::new(records, sorted, lazy);
        Self {
            tree_state,
            source,
            theme,
            use_icons,
            mode: AppMode::Normal,
            search_state: SearchState::default(),
            status_message: None,
            should_quit: false,
            watcher_active,
            source_name,
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Navigation ───────────────────────────────────────────────────────

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        let len = self.tree_state.flat_items.len();
        if len > 0 && self.tree_state.selected_index < len - 1 {
            self.tree_state.selected_index += 1;
        }
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        if self.tree_state.selected_index > 0 {
            self.tree_state.selected_index -= 1;
        }
    }

    /// Jump to the first item.
    pub fn select_first(&mut self) {
        self.tree_state.selected_index = 0;
    }

    /// Jump to the last item.
    pub fn select_last(&mut self) {
        let len = self.tree_state.flat_items.len();
        if len > 0 {
            self.tree_state.selected_index = len - 1;
        }
    }

    /// Expand the selected folder. Returns the folder path when the
    /// children still need to be fetched (lazy mode).
    pub fn expand_selected(&mut self) -> Option<String> {
        self.tree_state.expand_selected()
    }

    /// Collapse the selected folder, or jump to the parent item.
    pub fn collapse_selected(&mut self) {
        self.tree_state.collapse_selected();
    }

    // ── Record loading ───────────────────────────────────────────────────

    /// Replace the forest with a freshly fetched record set, keeping the
    /// selection on the same node where possible. Returns folder paths
    /// that need a follow-up child fetch.
    pub fn handle_records_loaded(&mut self, records: &[FlatRecord]) -> Vec<String> {
        let anchor = self
            .tree_state
            .flat_items
            .get(self.tree_state.selected_index)
            .map(|item| (item.id.clone(), item.path.clone()));

        let pending = self.tree_state.rebuild(records);

        if let Some((id, path)) = anchor {
            if let Some(index) = self.tree_state.find_index(id.as_deref(), &path) {
                self.tree_state.selected_index = index;
            }
        }
        if !self.tree_state.is_filtering {
            self.clamp_selection();
        }
        pending
    }

    /// Merge a fetched child batch into its parent folder. Returns
    /// further folder paths that need fetching.
    pub fn handle_children_loaded(
        &mut self,
        parent_path: &str,
        records: &[FlatRecord],
    ) -> Vec<String> {
        self.tree_state.apply_children(parent_path, records)
    }

    /// A fetch failed: release the in-flight marker so the node can be
    /// retried, and surface the error.
    pub fn handle_load_failed(&mut self, parent_path: Option<&str>, message: &str) {
        if let Some(path) = parent_path {
            self.tree_state.abort_load(path);
        }
        self.set_error(format!("Load failed: {message}"));
    }

    fn clamp_selection(&mut self) {
        let len = self.tree_state.flat_items.len();
        if len == 0 {
            self.tree_state.selected_index = 0;
        } else if self.tree_state.selected_index >= len {
            self.tree_state.selected_index = len - 1;
        }
    }

    // ── Inline filter ────────────────────────────────────────────────────

    /// Enter filter mode, keeping any previous query.
    pub fn open_filter(&mut self) {
        self.mode = AppMode::Filter;
        self.tree_state.apply_filter();
    }

    /// Leave filter mode but keep the filter applied.
    pub fn confirm_filter(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Leave filter mode and clear the filter.
    pub fn clear_filter(&mut self) {
        self.mode = AppMode::Normal;
        self.tree_state.filter_query.clear();
        self.tree_state.apply_filter();
    }

    pub fn filter_input_char(&mut self, c: char) {
        self.tree_state.filter_query.push(c);
        self.tree_state.apply_filter();
    }

    pub fn filter_delete_char(&mut self) {
        self.tree_state.filter_query.pop();
        self.tree_state.apply_filter();
    }

    // ── Fuzzy finder ─────────────────────────────────────────────────────

    /// Open the fuzzy finder overlay with a fresh query.
    pub fn open_search(&mut self) {
        self.mode = AppMode::Search;
        self.search_state = SearchState::default();
        self.update_search_results();
    }

    /// Close the overlay without moving the selection.
    pub fn close_search(&mut self) {
        self.mode = AppMode::Normal;
        self.search_state = SearchState::default();
    }

    pub fn search_input_char(&mut self, c: char) {
        self.search_state
            .query
            .insert(self.search_state.cursor_position, c);
        self.search_state.cursor_position += c.len_utf8();
        self.update_search_results();
    }

    pub fn search_delete_char(&mut self) {
        if self.search_state.cursor_position > 0 {
            let byte_pos = self.search_state.cursor_position;
            if let Some(prev) = self.search_state.query[..byte_pos].chars().next_back() {
                self.search_state.cursor_position -= prev.len_utf8();
                self.search_state
                    .query
                    .remove(self.search_state.cursor_position);
            }
        }
        self.update_search_results();
    }

    pub fn search_select_next(&mut self) {
        let len = self.search_state.results.len();
        if len > 0 && self.search_state.selected_index < len - 1 {
            self.search_state.selected_index += 1;
        }
    }

    pub fn search_select_previous(&mut self) {
        if self.search_state.selected_index > 0 {
            self.search_state.selected_index -= 1;
        }
    }

    /// Re-rank every materialized node against the query.
    pub fn update_search_results(&mut self) {
        let matcher = SkimMatcherV2::default();
        let entries = self.tree_state.collect_entries();

        let mut results: Vec<SearchResult> = Vec::new();
        for (path, label, id, kind) in entries {
            let display = if path.is_empty() {
                label.clone()
            } else {
                format!("{label}  {path}")
            };
            if self.search_state.query.is_empty() {
                results.push(SearchResult {
                    display,
                    path,
                    id,
                    kind,
                    score: 0,
                    match_indices: Vec::new(),
                });
            } else if let Some((score, indices)) =
                matcher.fuzzy_indices(&display, &self.search_state.query)
            {
                results.push(SearchResult {
                    display,
                    path,
                    id,
                    kind,
                    score,
                    match_indices: indices,
                });
            }
        }
        results.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.path.cmp(&b.path)));

        self.search_state.results = results;
        self.search_state.selected_index = 0;
    }

    /// Jump to the highlighted result: expand its ancestor chain, select
    /// it, and close the overlay. In lazy mode some ancestors may not be
    /// materialized yet; only loaded nodes are searchable.
    pub fn accept_search(&mut self) {
        let Some(result) = self
            .search_state
            .results
            .get(self.search_state.selected_index)
        else {
            self.close_search();
            return;
        };
        let (path, id) = (result.path.clone(), result.id.clone());

        self.tree_state.reveal_path(&path);
        if let Some(index) = self.tree_state.find_index(id.as_deref(), &path) {
            self.tree_state.selected_index = index;
        }
        self.close_search();
    }

    // ── Help overlay ─────────────────────────────────────────────────────

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Normal,
            _ => AppMode::Help,
        };
    }

    // ── Status messages ──────────────────────────────────────────────────

    /// Set an informational status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, false, Instant::now()));
    }

    /// Set an error status message with current timestamp.
    pub fn set_error(&mut self, msg: String) {
        self.status_message = Some((msg, true, Instant::now()));
    }

    /// Clear the status message once it has been shown for a few seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, _, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }
}
