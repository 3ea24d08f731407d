use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::detail::DetailWidget;
use crate::components::help::HelpOverlay;
use crate::components::search::SearchOverlay;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[0]);

    // Keep the selection visible before drawing.
    let visible_height = panels[0].height.saturating_sub(2) as usize;
    app.tree_state.update_scroll(visible_height);

    let tree_title = if app.tree_state.is_filtering || app.mode == AppMode::Filter {
        format!(" /{} ", app.tree_state.filter_query)
    } else {
        format!(" {} ", app.source_name)
    };
    let tree_block = Block::default()
        .title(tree_title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focused_fg));
    let tree_widget = TreeWidget::new(&app.tree_state, &app.theme, app.use_icons).block(tree_block);
    frame.render_widget(tree_widget, panels[0]);

    let detail_block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));
    let detail_widget =
        DetailWidget::new(app.tree_state.selected_node(), &app.theme).block(detail_block);
    frame.render_widget(detail_widget, panels[1]);

    let counts = format!(
        "{} nodes, {} leaves",
        app.tree_state.node_count(),
        app.tree_state.leaf_count()
    );
    let filter_info = if app.tree_state.is_filtering {
        Some(format!("[filter: {}]", app.tree_state.filter_query))
    } else {
        None
    };
    let mut status_bar = StatusBarWidget::new(&app.source_name, &counts, &app.theme);
    if let Some((msg, is_error, _)) = &app.status_message {
        status_bar = status_bar.status_message(msg, *is_error);
    }
    if let Some(info) = &filter_info {
        status_bar = status_bar.filter_info(info);
    }
    if !app.watcher_active {
        status_bar = status_bar.watcher_status("watch:off");
    }
    frame.render_widget(status_bar, chunks[1]);

    match app.mode {
        AppMode::Search => {
            frame.render_widget(SearchOverlay::new(&app.search_state, &app.theme), area);
        }
        AppMode::Help => {
            frame.render_widget(HelpOverlay::new(&app.theme), area);
        }
        AppMode::Normal | AppMode::Filter => {}
    }
}
