//! Conversion of flat, path-addressed records into a folder/leaf tree,
//! plus the incremental merge used by lazy node expansion.
//!
//! Every function here is pure and total: malformed paths, duplicate
//! folder paths, and missing lookup keys resolve through documented
//! fallbacks instead of errors. I/O and failure handling belong to the
//! record source, never to this module.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// Separator between segments of a record path.
pub const PATH_SEPARATOR: char = '.';

/// A flat input record carrying its position as a dot-delimited path.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlatRecord {
    /// Unique opaque identifier.
    #[serde(alias = "ID")]
    pub id: String,
    /// Dot-delimited hierarchical position, e.g. `"doc.sec1.title"`.
    #[serde(default)]
    pub path: String,
    /// Display name of the final path segment.
    #[serde(default)]
    pub label: String,
    /// Leaf value type discriminator, passed through unchanged.
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    /// Leaf payload, opaque to the tree builder.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    /// When `Some(true)`, the record is an explicit grouping node.
    #[serde(rename = "isFolder")]
    pub is_folder: Option<bool>,
}

/// Kind of tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    Leaf,
}

/// A node in the record tree.
///
/// Folders group other nodes by a shared path prefix; leaves carry the
/// record payload. Folders have an `id` only when an explicit
/// folder-flagged record with that exact path existed in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub id: Option<String>,
    pub path: String,
    pub label: String,
    pub value_type: Option<String>,
    pub value: Option<serde_json::Value>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create an empty folder node for a path level.
    pub fn folder(path: String, label: String) -> Self {
        Self {
            kind: NodeKind::Folder,
            id: None,
            path,
            label,
            value_type: None,
            value: None,
            children: Vec::new(),
        }
    }

    /// Convert a single record into a childless node.
    ///
    /// The node path is normalized (trimmed segments re-joined); a record
    /// whose path yields no segments keeps its trimmed raw path.
    pub fn from_record(record: &FlatRecord) -> Self {
        let segments = path_segments(&record.path);
        let path = if segments.is_empty() {
            record.path.trim().to_string()
        } else {
            segments.join(".")
        };
        if record.is_folder == Some(true) {
            Self {
                kind: NodeKind::Folder,
                id: Some(record.id.clone()),
                path,
                label: record.label.clone(),
                value_type: None,
                value: None,
                children: Vec::new(),
            }
        } else {
            Self {
                kind: NodeKind::Leaf,
                id: Some(record.id.clone()),
                path,
                label: record.label.clone(),
                value_type: record.value_type.clone(),
                value: record.value.clone(),
                children: Vec::new(),
            }
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

/// Which node field a lookup key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Id,
    Path,
}

/// Split a dot-path into trimmed, non-empty segments.
///
/// Empty and separator-only paths yield no segments; callers treat such
/// records as root-level nodes.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Immediate parent of a normalized dot-path, or `None` at root level.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind(PATH_SEPARATOR).map(|i| &path[..i])
}

fn segment_count(path: &str) -> usize {
    path.matches(PATH_SEPARATOR).count()
}

/// Build a forest of folder/leaf nodes from a flat record collection.
///
/// Folder materialization is implicit: every segment prefix of every
/// record path (the full path included) yields a folder node, so the
/// chain from root to leaf is complete even when no folder-flagged
/// records were supplied. Leaves attach under the folder matching their
/// own full path. Explicit folder records contribute their `label` and
/// `id` to the folder at their path; duplicates merge last-write-wins.
///
/// Records whose path yields no segments become root-level nodes.
/// Deterministic: the same input always produces the same forest.
pub fn build_tree(records: &[FlatRecord]) -> Vec<TreeNode> {
    // Pool of folder paths in first-seen order, with label/id overrides
    // from explicit folder records.
    let mut folder_paths: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut overrides: HashMap<String, (String, String)> = HashMap::new();

    for record in records {
        let segments = path_segments(&record.path);
        let mut prefix = String::new();
        for segment in &segments {
            if !prefix.is_empty() {
                prefix.push(PATH_SEPARATOR);
            }
            prefix.push_str(segment);
            if seen.insert(prefix.clone()) {
                folder_paths.push(prefix.clone());
            }
        }
        if record.is_folder == Some(true) && !segments.is_empty() {
            overrides.insert(prefix, (record.label.clone(), record.id.clone()));
        }
    }

    let mut pool: HashMap<String, TreeNode> = HashMap::with_capacity(folder_paths.len());
    for path in &folder_paths {
        let label = path
            .rsplit(PATH_SEPARATOR)
            .next()
            .unwrap_or(path)
            .to_string();
        let mut node = TreeNode::folder(path.clone(), label);
        if let Some((label, id)) = overrides.get(path) {
            node.label = label.clone();
            node.id = Some(id.clone());
        }
        pool.insert(path.clone(), node);
    }

    // Attach leaves in input order: the folder at the leaf's own path,
    // else the folder at its parent path, else the root fallback. A
    // folder record whose path yields no segments has no pool entry to
    // override, so it falls back to a root node like a pathless leaf.
    let mut fallback_roots: Vec<TreeNode> = Vec::new();
    for record in records {
        let segments = path_segments(&record.path);
        if record.is_folder == Some(true) && !segments.is_empty() {
            continue;
        }
        let node = TreeNode::from_record(record);
        if segments.is_empty() {
            fallback_roots.push(node);
            continue;
        }
        let full = segments.join(".");
        if let Some(folder) = pool.get_mut(&full) {
            folder.children.push(node);
        } else if let Some(folder) = parent_path(&full).and_then(|p| pool.get_mut(p)) {
            folder.children.push(node);
        } else {
            fallback_roots.push(node);
        }
    }

    // Assemble folders deepest-first so every parent is still in the
    // pool when its subfolders fold in. Stable sort keeps first-seen
    // order within a depth, which keeps the output deterministic.
    let mut by_depth_desc = folder_paths;
    by_depth_desc.sort_by_key(|p| std::cmp::Reverse(segment_count(p)));

    let mut roots: Vec<TreeNode> = Vec::new();
    for path in &by_depth_desc {
        let Some(node) = pool.remove(path) else {
            continue;
        };
        match parent_path(path) {
            Some(parent) => match pool.get_mut(parent) {
                Some(folder) => folder.children.push(node),
                None => roots.push(node),
            },
            None => roots.push(node),
        }
    }
    roots.append(&mut fallback_roots);
    roots
}

/// Merge a freshly fetched child batch into a node's children.
///
/// A new child is discarded when an existing child already carries its
/// `id` (leaves) or its `path` (folders); the existing entry always
/// wins. Existing children keep their order, accepted children append
/// in batch order, and duplicates inside the batch itself collapse too,
/// so the operation is idempotent.
pub fn merge_children(node: &mut TreeNode, new_children: Vec<TreeNode>) {
    let mut leaf_ids: HashSet<String> = HashSet::new();
    let mut folder_paths: HashSet<String> = HashSet::new();
    for child in &node.children {
        match child.kind {
            NodeKind::Folder => {
                folder_paths.insert(child.path.clone());
            }
            NodeKind::Leaf => {
                if let Some(id) = &child.id {
                    leaf_ids.insert(id.clone());
                }
            }
        }
    }

    for child in new_children {
        let duplicate = match child.kind {
            NodeKind::Folder => !folder_paths.insert(child.path.clone()),
            NodeKind::Leaf => match &child.id {
                Some(id) => !leaf_ids.insert(id.clone()),
                None => false,
            },
        };
        if !duplicate {
            node.children.push(child);
        }
    }
}

/// Depth-first search over a forest; first match in children-in-order
/// traversal wins. Absence is a normal outcome, not an error.
pub fn find_node<'a>(roots: &'a [TreeNode], key: &str, kind: KeyKind) -> Option<&'a TreeNode> {
    for node in roots {
        if node_matches(node, key, kind) {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, key, kind) {
            return Some(found);
        }
    }
    None
}

/// Mutable counterpart of [`find_node`], used to locate the target of an
/// incremental merge.
pub fn find_node_mut<'a>(
    roots: &'a mut [TreeNode],
    key: &str,
    kind: KeyKind,
) -> Option<&'a mut TreeNode> {
    for node in roots {
        if node_matches(node, key, kind) {
            return Some(node);
        }
        if let Some(found) = find_node_mut(&mut node.children, key, kind) {
            return Some(found);
        }
    }
    None
}

fn node_matches(node: &TreeNode, key: &str, kind: KeyKind) -> bool {
    match kind {
        KeyKind::Id => node.id.as_deref() == Some(key),
        KeyKind::Path => node.path == key,
    }
}

/// Recursively apply the deterministic sibling order: folders before
/// leaves, then ascending lexical label, ties broken by path.
pub fn sort_forest(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| {
        b.is_folder()
            .cmp(&a.is_folder())
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.path.cmp(&b.path))
    });
    for node in nodes.iter_mut() {
        sort_forest(&mut node.children);
    }
}

/// Total number of nodes in a forest, folders included.
pub fn count_nodes(nodes: &[TreeNode]) -> usize {
    nodes
        .iter()
        .map(|n| 1 + count_nodes(&n.children))
        .sum()
}

/// Number of leaf nodes in a forest.
pub fn count_leaves(nodes: &[TreeNode]) -> usize {
    nodes
        .iter()
        .map(|n| match n.kind {
            NodeKind::Leaf => 1,
            NodeKind::Folder => count_leaves(&n.children),
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn folder_record(id: &str, path: &str, label: &str) -> FlatRecord {
        FlatRecord {
            id: id.to_string(),
            path: path.to_string(),
            label: label.to_string(),
            value_type: None,
            value: None,
            is_folder: Some(true),
        }
    }

    fn max_depth(nodes: &[TreeNode]) -> usize {
        nodes
            .iter()
            .map(|n| 1 + max_depth(&n.children))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn empty_input_yields_empty_forest() {
        assert!(build_tree(&[]).is_empty());
    }

    #[test]
    fn path_segments_trim_and_drop_empties() {
        assert_eq!(path_segments("doc.sec1.title"), vec!["doc", "sec1", "title"]);
        assert_eq!(path_segments(" doc . sec1 "), vec!["doc", "sec1"]);
        assert_eq!(path_segments("doc..sec1"), vec!["doc", "sec1"]);
        assert!(path_segments("").is_empty());
        assert!(path_segments("...").is_empty());
    }

    #[test]
    fn parent_path_truncates_last_segment() {
        assert_eq!(parent_path("doc.sec1.title"), Some("doc.sec1"));
        assert_eq!(parent_path("doc"), None);
    }

    #[test]
    fn builds_nested_folders_from_leaf_paths() {
        // Concrete scenario: one root folder `doc` with two subfolders,
        // each holding its leaves.
        let records = vec![
            leaf("a1", "doc.sec1", "Title"),
            leaf("a2", "doc.sec1", "Body"),
            leaf("a3", "doc.sec2", "Note"),
        ];
        let roots = build_tree(&records);

        assert_eq!(roots.len(), 1);
        let doc = &roots[0];
        assert!(doc.is_folder());
        assert_eq!(doc.path, "doc");
        assert_eq!(doc.label, "doc");
        assert_eq!(doc.children.len(), 2);

        let sec1 = find_node(&roots, "doc.sec1", KeyKind::Path).unwrap();
        assert!(sec1.is_folder());
        let ids: Vec<&str> = sec1.children.iter().filter_map(|c| c.id.as_deref()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);

        let sec2 = find_node(&roots, "doc.sec2", KeyKind::Path).unwrap();
        assert_eq!(sec2.children.len(), 1);
        assert_eq!(sec2.children[0].id.as_deref(), Some("a3"));
    }

    #[test]
    fn implicit_folders_have_no_id() {
        let roots = build_tree(&[leaf("a1", "doc.sec1", "Title")]);
        let doc = find_node(&roots, "doc", KeyKind::Path).unwrap();
        assert!(doc.id.is_none());
        let sec1 = find_node(&roots, "doc.sec1", KeyKind::Path).unwrap();
        assert!(sec1.id.is_none());
    }

    #[test]
    fn explicit_folder_record_contributes_label_and_id() {
        let records = vec![
            folder_record("f1", "doc.sec1", "Section One"),
            leaf("a1", "doc.sec1.title", "Title"),
        ];
        let roots = build_tree(&records);
        let sec1 = find_node(&roots, "doc.sec1", KeyKind::Path).unwrap();
        assert_eq!(sec1.label, "Section One");
        assert_eq!(sec1.id.as_deref(), Some("f1"));
        // The leaf still hangs under the folder at its own path.
        let title = find_node(&roots, "doc.sec1.title", KeyKind::Path).unwrap();
        assert!(title.is_folder());
        assert_eq!(title.children[0].id.as_deref(), Some("a1"));
    }

    #[test]
    fn duplicate_folder_records_merge_last_write_wins() {
        let records = vec![
            folder_record("f1", "doc", "First"),
            folder_record("f2", "doc", "Second"),
        ];
        let roots = build_tree(&records);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].label, "Second");
        assert_eq!(roots[0].id.as_deref(), Some("f2"));
    }

    #[test]
    fn empty_path_record_becomes_root_leaf() {
        let records = vec![leaf("z", "", "Orphan"), leaf("a1", "doc", "Title")];
        let roots = build_tree(&records);
        let orphan = find_node(&roots, "z", KeyKind::Id).unwrap();
        assert_eq!(orphan.kind, NodeKind::Leaf);
        assert_eq!(orphan.label, "Orphan");
        // It sits at the root level, not inside `doc`.
        assert!(roots.iter().any(|r| r.id.as_deref() == Some("z")));
    }

    #[test]
    fn folder_record_with_empty_path_becomes_root_node() {
        for path in ["", "...", " . "] {
            let roots = build_tree(&[folder_record("f0", path, "Orphan folder")]);
            assert_eq!(roots.len(), 1);
            assert!(roots[0].is_folder());
            assert_eq!(roots[0].id.as_deref(), Some("f0"));
            assert_eq!(roots[0].label, "Orphan folder");
        }
    }

    #[test]
    fn separator_only_path_becomes_root_leaf() {
        let roots = build_tree(&[leaf("z", "...", "Orphan")]);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].kind, NodeKind::Leaf);
    }

    #[test]
    fn every_leaf_appears_exactly_once() {
        let records = vec![
            leaf("a", "x.y.z", "A"),
            leaf("b", "x.y", "B"),
            leaf("c", "x", "C"),
            leaf("d", "", "D"),
            leaf("e", "q.r", "E"),
        ];
        let roots = build_tree(&records);
        for record in &records {
            let mut found = 0;
            let mut stack: Vec<&TreeNode> = roots.iter().collect();
            while let Some(node) = stack.pop() {
                if node.kind == NodeKind::Leaf && node.id.as_deref() == Some(record.id.as_str()) {
                    found += 1;
                }
                stack.extend(node.children.iter());
            }
            assert_eq!(found, 1, "leaf {} must appear exactly once", record.id);
        }
        assert_eq!(count_leaves(&roots), records.len());
    }

    #[test]
    fn depth_is_bounded_by_segment_count() {
        let records = vec![leaf("a", "one.two.three.four", "Deep")];
        let roots = build_tree(&records);
        // Four folder levels plus the leaf under the deepest folder.
        assert_eq!(max_depth(&roots), 5);
    }

    #[test]
    fn build_is_deterministic() {
        let records = vec![
            leaf("a1", "doc.sec1", "Title"),
            folder_record("f1", "doc", "Documents"),
            leaf("a3", "doc.sec2", "Note"),
            leaf("a2", "doc.sec1", "Body"),
        ];
        let first = build_tree(&records);
        let second = build_tree(&records);
        assert_eq!(first, second);
    }

    #[test]
    fn build_does_not_consume_or_reorder_input() {
        let records = vec![leaf("a1", "doc.sec1", "Title"), leaf("a2", "doc", "Body")];
        let snapshot = records.clone();
        let _ = build_tree(&records);
        assert_eq!(records, snapshot);
    }

    #[test]
    fn sort_orders_folders_before_leaves_then_by_label() {
        let records = vec![
            leaf("l2", "top", "zeta"),
            leaf("l1", "top", "alpha"),
            leaf("d1", "top.beta.x", "X"),
            leaf("d2", "top.aaa.y", "Y"),
        ];
        let mut roots = build_tree(&records);
        sort_forest(&mut roots);

        let top = find_node(&roots, "top", KeyKind::Path).unwrap();
        let labels: Vec<&str> = top.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["aaa", "beta", "alpha", "zeta"]);
    }

    #[test]
    fn sort_breaks_label_ties_by_path() {
        let mut nodes = vec![
            TreeNode::folder("b.same".into(), "same".into()),
            TreeNode::folder("a.same".into(), "same".into()),
        ];
        sort_forest(&mut nodes);
        assert_eq!(nodes[0].path, "a.same");
    }

    #[test]
    fn merge_skips_duplicate_leaf_ids() {
        // Concrete scenario: [x] merged with [x, y] yields [x, y].
        let mut node = TreeNode::folder("doc".into(), "doc".into());
        node.children.push(TreeNode::from_record(&leaf("x", "doc.a", "X")));

        let batch = vec![
            TreeNode::from_record(&leaf("x", "doc.a", "X")),
            TreeNode::from_record(&leaf("y", "doc.b", "Y")),
        ];
        merge_children(&mut node, batch);

        let ids: Vec<&str> = node.children.iter().filter_map(|c| c.id.as_deref()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut node = TreeNode::folder("doc".into(), "doc".into());
        let batch = vec![
            TreeNode::from_record(&leaf("x", "doc.a", "X")),
            TreeNode::from_record(&leaf("y", "doc.b", "Y")),
            TreeNode::folder("doc.sub".into(), "sub".into()),
        ];
        merge_children(&mut node, batch.clone());
        let once = node.children.clone();
        merge_children(&mut node, batch);
        assert_eq!(node.children, once);
    }

    #[test]
    fn merge_keeps_existing_entry_over_new() {
        let mut node = TreeNode::folder("doc".into(), "doc".into());
        let mut original = TreeNode::from_record(&leaf("x", "doc.a", "Original"));
        original.value = Some(json!("kept"));
        node.children.push(original);

        let mut replacement = TreeNode::from_record(&leaf("x", "doc.a", "Replacement"));
        replacement.value = Some(json!("dropped"));
        merge_children(&mut node, vec![replacement]);

        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].label, "Original");
        assert_eq!(node.children[0].value, Some(json!("kept")));
    }

    #[test]
    fn merge_dedupes_folders_by_path() {
        let mut node = TreeNode::folder("doc".into(), "doc".into());
        node.children
            .push(TreeNode::folder("doc.sub".into(), "sub".into()));
        merge_children(
            &mut node,
            vec![
                TreeNode::folder("doc.sub".into(), "sub".into()),
                TreeNode::folder("doc.other".into(), "other".into()),
            ],
        );
        let paths: Vec<&str> = node.children.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["doc.sub", "doc.other"]);
    }

    #[test]
    fn merge_collapses_duplicates_inside_one_batch() {
        let mut node = TreeNode::folder("doc".into(), "doc".into());
        merge_children(
            &mut node,
            vec![
                TreeNode::from_record(&leaf("x", "doc.a", "X")),
                TreeNode::from_record(&leaf("x", "doc.a", "X")),
            ],
        );
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn merge_preserves_order_of_existing_children() {
        let mut node = TreeNode::folder("doc".into(), "doc".into());
        node.children.push(TreeNode::from_record(&leaf("b", "doc.b", "B")));
        node.children.push(TreeNode::from_record(&leaf("a", "doc.a", "A")));
        merge_children(
            &mut node,
            vec![TreeNode::from_record(&leaf("c", "doc.c", "C"))],
        );
        let ids: Vec<&str> = node.children.iter().filter_map(|c| c.id.as_deref()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn no_siblings_share_identity_after_build_and_merge() {
        let records = vec![
            leaf("a1", "doc.sec1", "Title"),
            leaf("a2", "doc.sec1", "Body"),
            leaf("a3", "doc.sec2", "Note"),
        ];
        let mut roots = build_tree(&records);
        let sec1 = find_node_mut(&mut roots, "doc.sec1", KeyKind::Path).unwrap();
        merge_children(
            sec1,
            vec![
                TreeNode::from_record(&leaf("a1", "doc.sec1", "Title")),
                TreeNode::from_record(&leaf("a4", "doc.sec1", "Extra")),
            ],
        );

        let mut stack: Vec<&TreeNode> = roots.iter().collect();
        while let Some(node) = stack.pop() {
            let mut leaf_ids = HashSet::new();
            let mut folder_paths = HashSet::new();
            for child in &node.children {
                match child.kind {
                    NodeKind::Leaf => {
                        assert!(leaf_ids.insert(child.id.clone()), "duplicate leaf id");
                    }
                    NodeKind::Folder => {
                        assert!(folder_paths.insert(child.path.clone()), "duplicate folder");
                    }
                }
                stack.push(child);
            }
        }
    }

    #[test]
    fn find_node_by_id_and_path() {
        let roots = build_tree(&[leaf("a1", "doc.sec1", "Title")]);
        assert!(find_node(&roots, "a1", KeyKind::Id).is_some());
        assert!(find_node(&roots, "doc.sec1", KeyKind::Path).is_some());
        assert!(find_node(&roots, "missing", KeyKind::Id).is_none());
        assert!(find_node(&roots, "doc.sec9", KeyKind::Path).is_none());
    }

    #[test]
    fn find_node_returns_first_match_depth_first() {
        // Two leaves share a path; depth-first children-in-order search
        // returns the earlier sibling.
        let roots = build_tree(&[
            leaf("a1", "doc.sec1", "First"),
            leaf("a2", "doc.sec1", "Second"),
        ]);
        // The folder at doc.sec1 matches before either leaf.
        let hit = find_node(&roots, "doc.sec1", KeyKind::Path).unwrap();
        assert!(hit.is_folder());
    }

    #[test]
    fn from_record_normalizes_sloppy_paths() {
        let node = TreeNode::from_record(&leaf("a", " doc . sec1 ", "Title"));
        assert_eq!(node.path, "doc.sec1");
    }

    #[test]
    fn record_deserializes_from_wire_field_names() {
        let json = r#"{
            "ID": "a1",
            "path": "doc.sec1",
            "label": "Title",
            "type": "string",
            "value": "Hello",
            "isFolder": false
        }"#;
        let record: FlatRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "a1");
        assert_eq!(record.value_type.as_deref(), Some("string"));
        assert_eq!(record.is_folder, Some(false));
    }

    #[test]
    fn count_helpers() {
        let roots = build_tree(&[
            leaf("a1", "doc.sec1", "Title"),
            leaf("a2", "doc.sec2", "Note"),
        ]);
        // doc, doc.sec1, doc.sec2 folders + 2 leaves
        assert_eq!(count_nodes(&roots), 5);
        assert_eq!(count_leaves(&roots), 2);
    }
}
