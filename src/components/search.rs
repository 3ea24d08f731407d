use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::app::SearchState;
use crate::theme::ThemeColors;
use crate::tree::builder::NodeKind;

/// Fuzzy finder overlay: a query input on top, ranked results below.
pub struct SearchOverlay<'a> {
    search_state: &'a SearchState,
    theme: &'a ThemeColors,
}

impl<'a> SearchOverlay<'a> {
    pub fn new(search_state: &'a SearchState, theme: &'a ThemeColors) -> Self {
        Self {
            search_state,
            theme,
        }
    }
}

impl<'a> Widget for SearchOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let overlay_width = (area.width as f32 * 0.60).min(90.0) as u16;
        let overlay_height = (area.height as f32 * 0.70).min(40.0) as u16;
        if overlay_width < 4 || overlay_height < 4 {
            return;
        }

        let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
        let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

        Clear.render(overlay_area, buf);

        let block = Block::default()
            .title(" Find node ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.overlay_border_fg))
            .style(Style::default().bg(self.theme.overlay_bg));
        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);

        if inner.height == 0 {
            return;
        }

        // Query line with a block cursor.
        let query_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.overlay_border_fg)),
            Span::styled(
                self.search_state.query.clone(),
                Style::default().fg(self.theme.detail_fg),
            ),
            Span::styled("█", Style::default().fg(self.theme.detail_fg)),
        ]);
        buf.set_line(inner.x + 1, inner.y, &query_line, inner.width.saturating_sub(2));

        // Results, keeping the highlighted one in view.
        let list_area = Rect::new(
            inner.x + 1,
            inner.y + 2,
            inner.width.saturating_sub(2),
            inner.height.saturating_sub(2),
        );
        let visible_height = list_area.height as usize;
        if visible_height == 0 {
            return;
        }

        let selected = self.search_state.selected_index;
        let scroll = selected.saturating_sub(visible_height.saturating_sub(1));

        for (i, result) in self
            .search_state
            .results
            .iter()
            .enumerate()
            .skip(scroll)
            .take(visible_height)
        {
            let row_y = list_area.y + (i - scroll) as u16;
            let is_selected = i == selected;

            let base_style = if is_selected {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                match result.kind {
                    NodeKind::Folder => Style::default().fg(self.theme.tree_folder_fg),
                    NodeKind::Leaf => Style::default().fg(self.theme.tree_leaf_fg),
                }
            };
            let match_style = base_style
                .fg(self.theme.warning_fg)
                .add_modifier(Modifier::BOLD);

            // Split the display into matched and unmatched spans.
            let mut spans: Vec<Span> = Vec::new();
            let marker = if is_selected { "▶ " } else { "  " };
            spans.push(Span::styled(marker.to_string(), base_style));
            for (byte_index, c) in result.display.char_indices() {
                let style = if result.match_indices.contains(&byte_index) {
                    match_style
                } else {
                    base_style
                };
                spans.push(Span::styled(c.to_string(), style));
            }

            let line = Line::from(spans);
            buf.set_line(list_area.x, row_y, &line, list_area.width);
        }

        if self.search_state.results.is_empty() && !self.search_state.query.is_empty() {
            let line = Line::from(Span::styled(
                "  no matches",
                Style::default().fg(self.theme.tree_meta_fg),
            ));
            buf.set_line(list_area.x, list_area.y, &line, list_area.width);
        }
    }
}
