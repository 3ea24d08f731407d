use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;
use crate::tree::builder::NodeKind;
use crate::tree::state::{FlatItem, TreeState};

/// Tree widget that renders the node tree with box-drawing characters.
pub struct TreeWidget<'a> {
    tree_state: &'a TreeState,
    theme: &'a ThemeColors,
    use_icons: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree_state: &'a TreeState, theme: &'a ThemeColors, use_icons: bool) -> Self {
        Self {
            tree_state,
            theme,
            use_icons,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Build the indentation prefix for an item using box-drawing
    /// characters. Continuation lines at each ancestor level depend on
    /// whether that ancestor was the last among its siblings.
    fn build_prefix(item: &FlatItem, items: &[FlatItem], item_index: usize) -> String {
        if item.depth == 0 {
            return String::new();
        }

        let mut parts: Vec<&str> = Vec::new();

        for d in 1..item.depth {
            // Walk backwards to the ancestor at depth d.
            let mut ancestor_is_last = false;
            for j in (0..item_index).rev() {
                if items[j].depth == d {
                    ancestor_is_last = items[j].is_last_sibling;
                    break;
                }
                if items[j].depth < d {
                    break;
                }
            }
            if ancestor_is_last {
                parts.push("   ");
            } else {
                parts.push("│  ");
            }
        }

        if item.is_last_sibling {
            parts.push("└──");
        } else {
            parts.push("├──");
        }

        parts.join("")
    }

    /// Expansion / kind indicator for an item.
    fn item_indicator(&self, item: &FlatItem) -> &'static str {
        if self.use_icons {
            match item.kind {
                NodeKind::Folder if item.is_loading => "⟳ ",
                NodeKind::Folder if item.is_expanded => "▾ ",
                NodeKind::Folder if item.can_expand => "▸ ",
                NodeKind::Folder => "▹ ",
                NodeKind::Leaf => "· ",
            }
        } else {
            match item.kind {
                NodeKind::Folder if item.is_loading => "[~] ",
                NodeKind::Folder if item.is_expanded => "[-] ",
                NodeKind::Folder if item.can_expand => "[+] ",
                NodeKind::Folder => "[ ] ",
                NodeKind::Leaf => "    ",
            }
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let items = &self.tree_state.flat_items;
        let selected = self.tree_state.selected_index;
        let visible_height = inner_area.height as usize;

        if items.is_empty() || visible_height == 0 {
            return;
        }

        let scroll = self.tree_state.scroll_offset;
        let visible_items = items.iter().enumerate().skip(scroll).take(visible_height);

        for (i, (idx, item)) in visible_items.enumerate() {
            let y = inner_area.y + i as u16;
            if y >= inner_area.y + inner_area.height {
                break;
            }

            let prefix = Self::build_prefix(item, items, idx);
            let indicator = self.item_indicator(item);

            let is_selected = idx == selected;
            let style = if is_selected {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if item.is_loading {
                Style::default()
                    .fg(self.theme.loading_fg)
                    .add_modifier(Modifier::ITALIC)
            } else {
                match item.kind {
                    NodeKind::Folder => Style::default()
                        .fg(self.theme.tree_folder_fg)
                        .add_modifier(Modifier::BOLD),
                    NodeKind::Leaf => Style::default().fg(self.theme.tree_leaf_fg),
                }
            };

            let mut spans = vec![
                Span::styled(prefix, Style::default().fg(self.theme.tree_meta_fg)),
                Span::styled(format!("{}{}", indicator, item.label), style),
            ];
            if let Some(value_type) = &item.value_type {
                spans.push(Span::styled(
                    format!("  ({value_type})"),
                    Style::default().fg(self.theme.tree_meta_fg),
                ));
            }

            let line = Line::from(spans);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
