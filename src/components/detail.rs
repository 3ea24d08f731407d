use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;
use crate::tree::builder::TreeNode;

/// Detail panel showing the fields of the selected node.
pub struct DetailWidget<'a> {
    node: Option<&'a TreeNode>,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> DetailWidget<'a> {
    pub fn new(node: Option<&'a TreeNode>, theme: &'a ThemeColors) -> Self {
        Self {
            node,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn field_line(&self, key: &str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("{key:<10}"),
                Style::default()
                    .fg(self.theme.detail_key_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(value, Style::default().fg(self.theme.detail_fg)),
        ])
    }

    fn build_lines(&self) -> Vec<Line<'static>> {
        let Some(node) = self.node else {
            return vec![Line::from(Span::styled(
                "Nothing selected".to_string(),
                Style::default().fg(self.theme.tree_meta_fg),
            ))];
        };

        let mut lines = Vec::new();
        lines.push(self.field_line("Label", node.label.clone()));
        let path = if node.path.is_empty() {
            "(root)".to_string()
        } else {
            node.path.clone()
        };
        lines.push(self.field_line("Path", path));
        if let Some(id) = &node.id {
            lines.push(self.field_line("Id", id.clone()));
        }
        if node.is_folder() {
            lines.push(self.field_line("Kind", "folder".to_string()));
            lines.push(self.field_line("Children", node.children.len().to_string()));
        } else {
            lines.push(self.field_line("Kind", "leaf".to_string()));
            if let Some(value_type) = &node.value_type {
                lines.push(self.field_line("Type", value_type.clone()));
            }
            if let Some(value) = &node.value {
                match value {
                    serde_json::Value::String(s) => {
                        lines.push(self.field_line("Value", s.clone()));
                    }
                    other => {
                        // Structured payloads get a pretty-printed block.
                        let rendered = serde_json::to_string_pretty(other)
                            .unwrap_or_else(|_| other.to_string());
                        lines.push(self.field_line("Value", String::new()));
                        for text in rendered.lines() {
                            lines.push(Line::from(Span::styled(
                                format!("  {text}"),
                                Style::default().fg(self.theme.detail_fg),
                            )));
                        }
                    }
                }
            }
        }
        lines
    }
}

impl<'a> Widget for DetailWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner_area.height == 0 || inner_area.width == 0 {
            return;
        }

        let lines = self.build_lines();
        for (i, line) in lines.iter().take(inner_area.height as usize).enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::builder::{FlatRecord, NodeKind};

    fn render_lines(widget: DetailWidget, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn shows_leaf_fields() {
        let node = TreeNode::from_record(&FlatRecord {
            id: "a1".to_string(),
            path: "doc.sec1".to_string(),
            label: "Title".to_string(),
            value_type: Some("string".to_string()),
            value: Some(serde_json::Value::String("Hello".to_string())),
            is_folder: None,
        });
        assert_eq!(node.kind, NodeKind::Leaf);

        let theme = ThemeColors::dark();
        let lines = render_lines(DetailWidget::new(Some(&node), &theme), 40, 8);
        assert!(lines.iter().any(|l| l.contains("Title")));
        assert!(lines.iter().any(|l| l.contains("doc.sec1")));
        assert!(lines.iter().any(|l| l.contains("a1")));
        assert!(lines.iter().any(|l| l.contains("string")));
        assert!(lines.iter().any(|l| l.contains("Hello")));
    }

    #[test]
    fn shows_folder_child_count() {
        let mut node = TreeNode::folder("doc".to_string(), "doc".to_string());
        node.children
            .push(TreeNode::folder("doc.sec1".to_string(), "sec1".to_string()));

        let theme = ThemeColors::dark();
        let lines = render_lines(DetailWidget::new(Some(&node), &theme), 40, 8);
        assert!(lines.iter().any(|l| l.contains("folder")));
        assert!(lines.iter().any(|l| l.contains("Children") && l.contains('1')));
    }

    #[test]
    fn structured_value_is_pretty_printed() {
        let node = TreeNode::from_record(&FlatRecord {
            id: "a2".to_string(),
            path: "doc.meta".to_string(),
            label: "Meta".to_string(),
            value_type: Some("object".to_string()),
            value: Some(serde_json::json!({"lang": "en", "pages": 3})),
            is_folder: None,
        });

        let theme = ThemeColors::dark();
        let lines = render_lines(DetailWidget::new(Some(&node), &theme), 40, 12);
        assert!(lines.iter().any(|l| l.contains("\"lang\": \"en\"")));
        assert!(lines.iter().any(|l| l.contains("\"pages\": 3")));
    }

    #[test]
    fn empty_selection_renders_placeholder() {
        let theme = ThemeColors::dark();
        let lines = render_lines(DetailWidget::new(None, &theme), 40, 4);
        assert!(lines[0].contains("Nothing selected"));
    }
}
