use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Status bar showing the source name, node counts, key hints, or a
/// transient status message.
pub struct StatusBarWidget<'a> {
    source_name: &'a str,
    counts_info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
    filter_info: Option<&'a str>,
    watcher_status: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(source_name: &'a str, counts_info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            source_name,
            counts_info,
            theme,
            status_message: None,
            is_error: false,
            filter_info: None,
            watcher_status: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    pub fn filter_info(mut self, info: &'a str) -> Self {
        self.filter_info = Some(info);
        self
    }

    pub fn watcher_status(mut self, status: &'a str) -> Self {
        self.watcher_status = Some(status);
        self
    }
}

/// Truncate to at most `max` chars, never splitting a multi-byte char.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        // A transient message takes over the whole bar.
        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                Style::default().fg(self.theme.success_fg)
            };

            let display: String = if msg.chars().count() >= width {
                truncate_chars(msg, width).to_string()
            } else {
                format!("{msg:<width$}")
            };

            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let key_hints = " ?:help  /:filter  ^p:find  r:reload  q:quit ";
        let hints_len = key_hints.len();
        let remaining = width.saturating_sub(hints_len);

        let name_display = if self.source_name.chars().count() > remaining {
            truncate_chars(self.source_name, remaining).to_string()
        } else {
            self.source_name.to_string()
        };

        let name_style = Style::default()
            .fg(self.theme.status_fg)
            .add_modifier(Modifier::BOLD);
        let counts_style = Style::default().fg(self.theme.status_fg);
        let hints_style = Style::default()
            .fg(self.theme.tree_meta_fg)
            .add_modifier(Modifier::DIM);

        let mut spans = vec![Span::styled(name_display, name_style)];

        if !self.counts_info.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(self.counts_info.to_string(), counts_style));
        }

        if let Some(filter) = self.filter_info {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                filter.to_string(),
                Style::default()
                    .fg(self.theme.warning_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        if let Some(watcher_str) = self.watcher_status {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                watcher_str.to_string(),
                Style::default().fg(self.theme.warning_fg),
            ));
        }

        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let pad = width.saturating_sub(used).saturating_sub(hints_len);
        if pad > 0 {
            spans.push(Span::raw(" ".repeat(pad)));
        }
        spans.push(Span::styled(key_hints, hints_style));

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
