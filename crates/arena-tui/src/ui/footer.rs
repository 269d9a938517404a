use crate::ui::app::AppMode;
use arena_core::{
    battle::Battle,
    theme::{Element, Theme},
};
use ratatui::{
    prelude::{Alignment, Frame, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render_footer(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    mode: AppMode,
    battle: Option<&Battle>,
) {
    let footer_block = Block::default()
        .borders(Borders::ALL)
        .style(theme.ratatui_style(Element::Text));

    let inner_area = footer_block.inner(area);

    let content = match mode {
        AppMode::Normal => {
            let mut spans = vec![
                Span::raw("[ENTER] "),
                Span::styled(enter_label(battle), theme.ratatui_style(Element::Title)),
            ];
            if battle.is_some() {
                spans.push(Span::raw(" | "));
                spans.push(Span::raw("[L]"));
                spans.push(Span::styled("og", theme.ratatui_style(Element::Inactive)));
            }
            spans.extend([
                Span::raw(" | "),
                Span::raw("[S]"),
                Span::styled("ettings", theme.ratatui_style(Element::Inactive)),
                Span::raw(" | "),
                Span::raw("[T]"),
                Span::styled("heme", theme.ratatui_style(Element::Inactive)),
                Span::raw(" | "),
                Span::raw("[Q]"),
                Span::styled("uit", theme.ratatui_style(Element::Inactive)),
            ]);
            Line::from(spans).alignment(Alignment::Center)
        }
        AppMode::Settings | AppMode::EditingModel => {
            Line::from(Span::styled("Settings", theme.warning_style()))
                .alignment(Alignment::Center)
        }
        AppMode::BattleLog => Line::from(Span::styled(
            "Battle Log",
            theme.ratatui_style(Element::Narrative),
        ))
        .alignment(Alignment::Center),
    };

    let footer_paragraph = Paragraph::new(content).style(theme.ratatui_style(Element::Text));

    frame.render_widget(footer_block, area);
    frame.render_widget(footer_paragraph, inner_area);
}

/// What Enter does on the main screen.
pub fn enter_label(battle: Option<&Battle>) -> &'static str {
    match battle {
        Some(battle) if !battle.is_over() => battle.action_label(),
        _ => "Start New Battle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::battle::{Phase, Turn};
    use arena_core::hero::Hero;
    use arena_core::monster::Monster;

    #[test]
    fn test_enter_label_follows_battle() {
        assert_eq!(enter_label(None), "Start New Battle");

        let mut battle = Battle::new(Hero::default(), Monster::fallback(10), "intro".into());
        assert_eq!(enter_label(Some(&battle)), "Attack!");

        battle.turn = Turn::Monster;
        assert_eq!(enter_label(Some(&battle)), "Next Turn");

        battle.phase = Phase::Victory;
        assert_eq!(enter_label(Some(&battle)), "Start New Battle");
    }
}
