//! View state over the record forest: selection, scrolling, expansion,
//! inline filtering, and application of lazily fetched child batches.
//!
//! Nodes themselves stay pure data; expansion and load-tracking flags
//! live in side-sets keyed by node path so a full rebuild can restore
//! the visible state without touching node shapes.

use std::collections::HashSet;

use crate::tree::builder::{
    build_tree, count_leaves, count_nodes, find_node, find_node_mut, merge_children, sort_forest,
    FlatRecord, KeyKind, NodeKind, TreeNode,
};

/// A flattened representation of a visible tree node for rendering.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub label: String,
    pub path: String,
    pub id: Option<String>,
    pub kind: NodeKind,
    pub value_type: Option<String>,
    pub depth: usize,
    pub is_expanded: bool,
    pub is_loading: bool,
    pub can_expand: bool,
    pub is_last_sibling: bool,
}

/// State for the tree view.
pub struct TreeState {
    pub roots: Vec<TreeNode>,
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    /// Folder paths currently expanded.
    pub expanded: HashSet<String>,
    /// Folder paths whose child batch has been fetched (lazy mode).
    pub loaded: HashSet<String>,
    /// Folder paths with an in-flight child fetch; at most one per node.
    pub loading: HashSet<String>,
    /// Current inline filter query string.
    pub filter_query: String,
    /// Whether the tree is currently being filtered.
    pub is_filtering: bool,
    /// Apply the deterministic sibling order after builds and merges.
    pub sorted: bool,
    /// Children are fetched on demand instead of built upfront.
    pub lazy: bool,
}

impl TreeState {
    /// Build the initial state from a full (or, in lazy mode, root-level)
    /// record set. Root folders start expanded in eager mode.
    pub fn new(records: &[FlatRecord], sorted: bool, lazy: bool) -> Self {
        let mut roots = build_tree(records);
        if sorted {
            sort_forest(&mut roots);
        }

        let mut expanded = HashSet::new();
        if !lazy {
            for root in roots.iter().filter(|r| r.is_folder()) {
                expanded.insert(root.path.clone());
            }
        }

        let mut state = Self {
            roots,
            flat_items: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            expanded,
            loaded: HashSet::new(),
            loading: HashSet::new(),
            filter_query: String::new(),
            is_filtering: false,
            sorted,
            lazy,
        };
        state.flatten();
        state
    }

    /// Drop the forest and rebuild it wholesale from a fresh record set.
    ///
    /// The expanded set survives so the visible shape is restored; load
    /// tracking resets because every child batch is stale after a
    /// reload. Returns the folder paths that need a child fetch to
    /// honor the restored expansion (lazy mode only).
    pub fn rebuild(&mut self, records: &[FlatRecord]) -> Vec<String> {
        self.roots = build_tree(records);
        if self.sorted {
            sort_forest(&mut self.roots);
        }
        self.loaded.clear();
        self.loading.clear();
        self.flatten();
        let pending = self.pending_expansions();
        for path in &pending {
            self.loading.insert(path.clone());
        }
        pending
    }

    /// Merge a fetched child batch into the folder at `parent_path`.
    ///
    /// Returns further folder paths that were expanded before a reload
    /// and now became reachable, so the caller can keep fetching. A
    /// vanished parent (removed by a concurrent rebuild) is a normal
    /// outcome and leaves the forest untouched.
    pub fn apply_children(&mut self, parent_path: &str, records: &[FlatRecord]) -> Vec<String> {
        self.loading.remove(parent_path);
        self.loaded.insert(parent_path.to_string());

        if let Some(node) = find_node_mut(&mut self.roots, parent_path, KeyKind::Path) {
            let batch: Vec<TreeNode> = records.iter().map(TreeNode::from_record).collect();
            merge_children(node, batch);
            if self.sorted {
                sort_forest(&mut node.children);
            }
        }
        self.flatten();

        let pending = self.pending_expansions();
        for path in &pending {
            self.loading.insert(path.clone());
        }
        pending
    }

    /// Forget an in-flight fetch that failed; the node can be expanded
    /// again to retry.
    pub fn abort_load(&mut self, parent_path: &str) {
        self.loading.remove(parent_path);
        self.flatten();
    }

    /// Expanded folders whose children are neither loaded nor being
    /// loaded. Only meaningful in lazy mode.
    pub fn pending_expansions(&self) -> Vec<String> {
        if !self.lazy {
            return Vec::new();
        }
        let mut pending = Vec::new();
        let mut stack: Vec<&TreeNode> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            if node.is_folder()
                && self.expanded.contains(&node.path)
                && !self.loaded.contains(&node.path)
                && !self.loading.contains(&node.path)
            {
                pending.push(node.path.clone());
            }
            stack.extend(node.children.iter());
        }
        pending
    }

    /// Rebuild the flat items list from the forest.
    pub fn flatten(&mut self) {
        if self.is_filtering {
            self.apply_filter();
            return;
        }
        self.flat_items.clear();
        let roots = std::mem::take(&mut self.roots);
        let last = roots.len().saturating_sub(1);
        for (i, root) in roots.iter().enumerate() {
            self.flatten_node(root, 0, i == last);
        }
        self.roots = roots;
        self.clamp_selection();
    }

    fn flatten_node(&mut self, node: &TreeNode, depth: usize, is_last: bool) {
        let is_expanded = node.is_folder() && self.expanded.contains(&node.path);
        self.flat_items.push(self.item_for(node, depth, is_last, is_expanded));

        if is_expanded {
            let last = node.children.len().saturating_sub(1);
            for (i, child) in node.children.iter().enumerate() {
                self.flatten_node(child, depth + 1, i == last);
            }
        }
    }

    fn item_for(&self, node: &TreeNode, depth: usize, is_last: bool, is_expanded: bool) -> FlatItem {
        let can_expand = node.is_folder()
            && (!node.children.is_empty() || (self.lazy && !self.loaded.contains(&node.path)));
        FlatItem {
            label: node.label.clone(),
            path: node.path.clone(),
            id: node.id.clone(),
            kind: node.kind,
            value_type: node.value_type.clone(),
            depth,
            is_expanded,
            is_loading: self.loading.contains(&node.path),
            can_expand,
            is_last_sibling: is_last,
        }
    }

    fn clamp_selection(&mut self) {
        if !self.flat_items.is_empty() && self.selected_index >= self.flat_items.len() {
            self.selected_index = self.flat_items.len() - 1;
        }
    }

    /// Expand the selected folder. Returns `Some(path)` when a child
    /// fetch is needed to fill it (lazy mode, not yet loaded); the
    /// caller owns dispatching the fetch. A folder with a fetch already
    /// in flight is left alone.
    pub fn expand_selected(&mut self) -> Option<String> {
        let item = self.flat_items.get(self.selected_index)?;
        if item.kind != NodeKind::Folder || item.is_expanded {
            return None;
        }
        let path = item.path.clone();
        if self.loading.contains(&path) {
            return None;
        }
        self.expanded.insert(path.clone());
        let needs_fetch = self.lazy && !self.loaded.contains(&path);
        if needs_fetch {
            self.loading.insert(path.clone());
        }
        self.flatten();
        needs_fetch.then_some(path)
    }

    /// Collapse the selected folder, or jump to the parent item when the
    /// selection is a leaf or an already-collapsed folder.
    pub fn collapse_selected(&mut self) {
        let Some(item) = self.flat_items.get(self.selected_index) else {
            return;
        };

        if item.kind == NodeKind::Folder && item.is_expanded {
            self.expanded.remove(&item.path);
            self.flatten();
            return;
        }

        // Jump to the nearest shallower item above the selection.
        let depth = item.depth;
        if depth == 0 {
            return;
        }
        for i in (0..self.selected_index).rev() {
            if self.flat_items[i].depth < depth {
                self.selected_index = i;
                return;
            }
        }
    }

    /// Whether the selected folder is currently expanded.
    pub fn selected_is_expanded(&self) -> bool {
        self.flat_items
            .get(self.selected_index)
            .map(|i| i.is_expanded)
            .unwrap_or(false)
    }

    /// Resolve the selected item back to its node in the forest. Leaves
    /// resolve by id (several leaves may share a path), folders by path.
    pub fn selected_node(&self) -> Option<&TreeNode> {
        let item = self.flat_items.get(self.selected_index)?;
        match &item.id {
            Some(id) => find_node(&self.roots, id, KeyKind::Id),
            None => find_node(&self.roots, &item.path, KeyKind::Path),
        }
    }

    /// Update the scroll offset to ensure the selected item is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    /// Find the flat index of a node, by id for leaves and path for
    /// folders.
    pub fn find_index(&self, id: Option<&str>, path: &str) -> Option<usize> {
        self.flat_items.iter().position(|item| match id {
            Some(id) => item.id.as_deref() == Some(id),
            None => item.kind == NodeKind::Folder && item.path == path,
        })
    }

    /// Expand every ancestor level of a dot-path (the path itself
    /// included, so a leaf hanging under the folder at its own path
    /// becomes visible) and re-flatten.
    pub fn reveal_path(&mut self, path: &str) {
        let mut prefix = String::new();
        for segment in crate::tree::builder::path_segments(path) {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);
            if find_node(&self.roots, &prefix, KeyKind::Path)
                .map(|n| n.is_folder())
                .unwrap_or(false)
            {
                self.expanded.insert(prefix.clone());
            }
        }
        self.flatten();
    }

    /// Apply the inline filter: rebuild flat_items showing only matches
    /// and their ancestor folders. Case-insensitive substring match on
    /// the label.
    pub fn apply_filter(&mut self) {
        if self.filter_query.is_empty() {
            self.is_filtering = false;
            self.flatten();
            return;
        }

        self.is_filtering = true;
        self.flat_items.clear();

        let query = self.filter_query.to_lowercase();
        let roots = std::mem::take(&mut self.roots);
        let last = roots.len().saturating_sub(1);
        for (i, root) in roots.iter().enumerate() {
            self.flatten_node_filtered(root, 0, i == last, &query);
        }
        self.roots = roots;
        self.clamp_selection();
    }

    /// Recursively flatten, keeping nodes whose label matches the query
    /// or that are ancestors of matches. Returns true when this subtree
    /// contains any match.
    fn flatten_node_filtered(
        &mut self,
        node: &TreeNode,
        depth: usize,
        is_last: bool,
        query: &str,
    ) -> bool {
        let self_matches = node.label.to_lowercase().contains(query);

        let before = self.flat_items.len();
        // Reserve a slot so children land after their ancestor.
        self.flat_items
            .push(self.item_for(node, depth, is_last, true));

        let mut child_matches = false;
        let last = node.children.len().saturating_sub(1);
        for (i, child) in node.children.iter().enumerate() {
            if self.flatten_node_filtered(child, depth + 1, i == last, query) {
                child_matches = true;
            }
        }

        if self_matches || child_matches {
            true
        } else {
            self.flat_items.truncate(before);
            false
        }
    }

    /// Every materialized node as `(path, label, id, kind)` in
    /// depth-first order, for the fuzzy finder.
    pub fn collect_entries(&self) -> Vec<(String, String, Option<String>, NodeKind)> {
        let mut entries = Vec::new();
        let mut stack: Vec<&TreeNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            entries.push((
                node.path.clone(),
                node.label.clone(),
                node.id.clone(),
                node.kind,
            ));
            stack.extend(node.children.iter().rev());
        }
        entries
    }

    /// Total materialized node count, folders included.
    pub fn node_count(&self) -> usize {
        count_nodes(&self.roots)
    }

    /// Materialized leaf count.
    pub fn leaf_count(&self) -> usize {
        count_leaves(&self.roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::json::level_slice;
    use serde_json::json;

    fn leaf(id: &str, path: &str, label: &str) -> FlatRecord {
        FlatRecord {
            id: id.to_string(),
            path: path.to_string(),
            label: label.to_string(),
            value_type: Some("string".to_string()),
            value: Some(json!("x")),
            is_folder: None,
        }
    }

    fn sample_records() -> Vec<FlatRecord> {
        vec![
            leaf("a1", "doc.sec1", "Title"),
            leaf("a2", "doc.sec1", "Body"),
            leaf("a3", "doc.sec2", "Note"),
        ]
    }

    #[test]
    fn eager_state_expands_roots() {
        let state = TreeState::new(&sample_records(), true, false);
        // Root `doc` expanded; its subfolders collapsed.
        let labels: Vec<&str> = state.flat_items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["doc", "sec1", "sec2"]);
    }

    #[test]
    fn lazy_state_starts_collapsed() {
        let state = TreeState::new(&sample_records(), true, true);
        assert_eq!(state.flat_items.len(), 1);
        assert!(!state.flat_items[0].is_expanded);
        assert!(state.flat_items[0].can_expand);
    }

    #[test]
    fn expand_reveals_children() {
        let mut state = TreeState::new(&sample_records(), true, false);
        state.selected_index = 1; // doc.sec1
        let fetch = state.expand_selected();
        assert!(fetch.is_none(), "eager mode never requests a fetch");
        let labels: Vec<&str> = state.flat_items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["doc", "sec1", "Body", "Title", "sec2"]);
    }

    #[test]
    fn expand_in_lazy_mode_requests_fetch_once() {
        let mut state = TreeState::new(&sample_records(), true, true);
        let fetch = state.expand_selected();
        assert_eq!(fetch.as_deref(), Some("doc"));
        assert!(state.loading.contains("doc"));
        // A second request while the fetch is in flight is ignored.
        state.expanded.remove("doc");
        state.flatten();
        assert!(state.expand_selected().is_none());
    }

    #[test]
    fn apply_children_merges_and_clears_loading() {
        // Start from the root-level slice, the shape a lazy fetch serves.
        let records = sample_records();
        let mut state = TreeState::new(&level_slice(&records, None), true, true);
        let fetch = state.expand_selected();
        assert_eq!(fetch.as_deref(), Some("doc"));

        let batch = level_slice(&records, Some("doc"));
        let follow_ups = state.apply_children("doc", &batch);
        assert!(follow_ups.is_empty());
        assert!(!state.loading.contains("doc"));
        assert!(state.loaded.contains("doc"));

        let doc = find_node(&state.roots, "doc", KeyKind::Path).unwrap();
        assert_eq!(doc.children.len(), 2);
        let paths: Vec<&str> = doc.children.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["doc.sec1", "doc.sec2"]);
    }

    #[test]
    fn apply_children_is_idempotent() {
        let mut state = TreeState::new(&sample_records(), true, true);
        state.expand_selected();
        let batch = vec![leaf("c1", "doc.x", "Child")];
        state.apply_children("doc", &batch);
        let once = state.roots.clone();
        state.apply_children("doc", &batch);
        assert_eq!(state.roots, once);
    }

    #[test]
    fn apply_children_for_vanished_parent_is_noop() {
        let mut state = TreeState::new(&sample_records(), true, true);
        let before = state.roots.clone();
        state.apply_children("gone.path", &[leaf("c1", "gone.path.x", "Child")]);
        assert_eq!(state.roots, before);
    }

    #[test]
    fn abort_load_allows_retry() {
        let mut state = TreeState::new(&sample_records(), true, true);
        let first = state.expand_selected();
        assert!(first.is_some());
        state.abort_load("doc");
        state.expanded.remove("doc");
        state.flatten();
        let retry = state.expand_selected();
        assert_eq!(retry.as_deref(), Some("doc"));
    }

    #[test]
    fn rebuild_preserves_expansion() {
        let mut state = TreeState::new(&sample_records(), true, false);
        state.selected_index = 1;
        state.expand_selected();
        assert!(state.expanded.contains("doc.sec1"));

        state.rebuild(&sample_records());
        let sec1 = state
            .flat_items
            .iter()
            .find(|i| i.path == "doc.sec1")
            .unwrap();
        assert!(sec1.is_expanded);
    }

    #[test]
    fn rebuild_in_lazy_mode_requeues_expanded_folders() {
        let mut state = TreeState::new(&sample_records(), true, true);
        state.expand_selected();
        state.apply_children("doc", &[leaf("c1", "doc.sec1", "Child")]);

        let pending = state.rebuild(&sample_records());
        assert_eq!(pending, vec!["doc".to_string()]);
        assert!(state.loading.contains("doc"));
    }

    #[test]
    fn collapse_selected_folds_folder() {
        let mut state = TreeState::new(&sample_records(), true, false);
        state.collapse_selected(); // root `doc` is expanded
        assert_eq!(state.flat_items.len(), 1);
    }

    #[test]
    fn collapse_on_leaf_jumps_to_parent() {
        let mut state = TreeState::new(&sample_records(), true, false);
        state.selected_index = 1;
        state.expand_selected(); // open doc.sec1
        state.selected_index = 2; // leaf "Body"
        state.collapse_selected();
        assert_eq!(state.flat_items[state.selected_index].path, "doc.sec1");
    }

    #[test]
    fn selected_node_resolves_leaves_by_id() {
        let mut state = TreeState::new(&sample_records(), true, false);
        state.selected_index = 1;
        state.expand_selected();
        state.selected_index = 3; // leaf "Title" (a1); Body sorts first
        let node = state.selected_node().unwrap();
        assert_eq!(node.id.as_deref(), Some("a1"));
    }

    #[test]
    fn filter_keeps_matches_and_ancestors() {
        let mut state = TreeState::new(&sample_records(), true, false);
        state.filter_query = "note".to_string();
        state.apply_filter();
        let labels: Vec<&str> = state.flat_items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["doc", "sec2", "Note"]);
    }

    #[test]
    fn filter_empty_query_restores_view() {
        let mut state = TreeState::new(&sample_records(), true, false);
        let before = state.flat_items.len();
        state.filter_query = "title".to_string();
        state.apply_filter();
        assert!(state.is_filtering);
        state.filter_query.clear();
        state.apply_filter();
        assert!(!state.is_filtering);
        assert_eq!(state.flat_items.len(), before);
    }

    #[test]
    fn filter_is_case_insensitive() {
        let mut state = TreeState::new(&sample_records(), true, false);
        state.filter_query = "TITLE".to_string();
        state.apply_filter();
        assert!(state.flat_items.iter().any(|i| i.label == "Title"));
    }

    #[test]
    fn filter_with_no_matches_empties_view() {
        let mut state = TreeState::new(&sample_records(), true, false);
        state.filter_query = "zzz-no-such-label".to_string();
        state.apply_filter();
        assert!(state.flat_items.is_empty());
    }

    #[test]
    fn reveal_path_expands_whole_chain() {
        let mut state = TreeState::new(&sample_records(), true, true);
        state.reveal_path("doc.sec1");
        assert!(state.expanded.contains("doc"));
        assert!(state.expanded.contains("doc.sec1"));
        assert!(state.find_index(None, "doc.sec1").is_some());
    }

    #[test]
    fn update_scroll_keeps_selection_visible() {
        let records: Vec<FlatRecord> = (0..50)
            .map(|i| leaf(&format!("id{i}"), "top", &format!("leaf{i:02}")))
            .collect();
        let mut state = TreeState::new(&records, true, false);
        state.selected_index = 40;
        state.update_scroll(10);
        assert_eq!(state.scroll_offset, 31);
        state.selected_index = 5;
        state.update_scroll(10);
        assert_eq!(state.scroll_offset, 5);
    }

    #[test]
    fn last_sibling_flags_are_set() {
        let state = TreeState::new(&sample_records(), true, false);
        assert!(state.flat_items.last().unwrap().is_last_sibling);
        assert!(!state.flat_items[1].is_last_sibling); // sec1 precedes sec2
    }

    #[test]
    fn counts_reflect_materialized_forest() {
        let state = TreeState::new(&sample_records(), true, false);
        assert_eq!(state.node_count(), 6); // doc, sec1, sec2 + 3 leaves
        assert_eq!(state.leaf_count(), 3);
    }

    #[test]
    fn collect_entries_walks_depth_first() {
        let state = TreeState::new(&sample_records(), true, false);
        let entries = state.collect_entries();
        let paths: Vec<&str> = entries.iter().map(|(p, _, _, _)| p.as_str()).collect();
        assert_eq!(paths[0], "doc");
        assert_eq!(paths[1], "doc.sec1");
    }
}
