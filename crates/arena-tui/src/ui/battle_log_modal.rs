use arena_core::theme::{Element, Theme};
use ratatui::{
    prelude::{Alignment, Constraint, Direction, Frame, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

const PREVIEW_CHARS: usize = 60;

pub struct BattleLogParams<'a> {
    pub theme: &'a Theme,
    pub title: &'a str,
    pub entries: &'a [String],
    pub selected_index: usize,
    pub current_page: usize,
    pub entries_per_page: usize,
}

pub fn render_battle_log_modal(frame: &mut Frame, area: Rect, params: BattleLogParams) {
    let block = Block::new()
        .title(params.title)
        .borders(Borders::ALL)
        .style(params.theme.ratatui_style(Element::Text));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if params.entries.is_empty() {
        let empty_paragraph = Paragraph::new("Nothing has happened yet.")
            .alignment(Alignment::Center)
            .style(params.theme.ratatui_style(Element::Inactive));
        frame.render_widget(empty_paragraph, inner_area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Page indicator
            Constraint::Length(params.entries_per_page as u16),
            Constraint::Min(0),    // Selected entry
            Constraint::Length(1), // Instructions
        ])
        .split(inner_area);

    let total_pages = params.entries.len().div_ceil(params.entries_per_page);
    let current_page = params.current_page.min(total_pages.saturating_sub(1));
    let start_index = current_page * params.entries_per_page;
    let end_index = std::cmp::min(start_index + params.entries_per_page, params.entries.len());

    let page_info = if total_pages > 1 {
        format!(
            "Page {} of {} ({} entries)",
            current_page + 1,
            total_pages,
            params.entries.len()
        )
    } else {
        format!("{} entries", params.entries.len())
    };
    let page_paragraph = Paragraph::new(page_info)
        .alignment(Alignment::Center)
        .style(params.theme.ratatui_style(Element::Inactive));
    frame.render_widget(page_paragraph, chunks[0]);

    let items: Vec<ListItem> = params.entries[start_index..end_index]
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let global_index = start_index + i;
            let style = if global_index == params.selected_index {
                params.theme.highlight_style()
            } else {
                params.theme.text_style()
            };
            let label = if global_index == 0 {
                "Intro".to_string()
            } else {
                format!("#{}", global_index)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<7}", label), style.add_modifier(Modifier::BOLD)),
                Span::styled(preview(entry), style),
            ]))
        })
        .collect();
    frame.render_widget(
        List::new(items).style(params.theme.ratatui_style(Element::Text)),
        chunks[1],
    );

    if let Some(selected) = params.entries.get(params.selected_index) {
        let detail = Paragraph::new(selected.as_str())
            .wrap(Wrap { trim: true })
            .style(params.theme.ratatui_style(Element::Narrative))
            .block(Block::new().borders(Borders::TOP));
        frame.render_widget(detail, chunks[2]);
    }

    let instructions = if total_pages > 1 {
        "[↑↓] Navigate | [←→] Page | [ESC] Close"
    } else {
        "[↑↓] Navigate | [ESC] Close"
    };
    let instructions_paragraph = Paragraph::new(instructions)
        .alignment(Alignment::Center)
        .style(params.theme.ratatui_style(Element::Inactive));
    frame.render_widget(instructions_paragraph, chunks[3]);
}

/// First line of an entry, cut to fit the list.
fn preview(entry: &str) -> String {
    let first_line = entry.lines().next().unwrap_or_default();
    if first_line.chars().count() > PREVIEW_CHARS {
        let cut: String = first_line.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut.trim_end())
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let theme = Theme::default();
        let entries = vec!["A fresh intro.".to_string()];
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

        terminal
            .draw(|frame| {
                let area = frame.size();
                render_battle_log_modal(
                    frame,
                    area,
                    BattleLogParams {
                        theme: &theme,
                        title: " Battle Log ",
                        entries: &entries,
                        selected_index: 10,
                        current_page: 1,
                        entries_per_page: 8,
                    },
                );
            })
            .unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("A fresh intro."));
    }

    #[test]
    fn test_preview_cuts_long_entries() {
        assert_eq!(preview("Short."), "Short.");
        assert_eq!(preview("first\nsecond"), "first");

        let long = "x".repeat(80);
        let cut = preview(&long);
        assert_eq!(cut.len(), 63);
        assert!(cut.ends_with("..."));
    }
}
