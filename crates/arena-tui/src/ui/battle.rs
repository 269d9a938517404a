use crate::ui::app::ArenaStatus;
use arena_core::{
    battle::{Battle, Phase, Turn},
    theme::{Element, Theme},
};
use ratatui::{
    prelude::{Alignment, Constraint, Direction, Frame, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const MAIN_LOGO: &str = r#"
    _    ____  _____ _   _    _     
   / \  |  _ \| ____| \ | |  / \    
  / _ \ | |_) |  _| |  \| | / _ \   
 / ___ \|  _ <| |___| |\  |/ ___ \  
/_/   \_\_| \_\_____|_| \_/_/   \_\ 

     C Y B E R   F A N T A S Y      
"#;
const MAIN_LOGO_HEIGHT: u16 = 9;
const TEXT_HEIGHT: u16 = 1;
const GAP_HEIGHT: u16 = 1;
const MAIN_TOTAL_HEIGHT: u16 = MAIN_LOGO_HEIGHT + GAP_HEIGHT + TEXT_HEIGHT;
const PANEL_HEIGHT: u16 = 5;
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub fn render_battle(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    battle: Option<&Battle>,
    status: &ArenaStatus,
    tick: usize,
) {
    match battle {
        Some(battle) => render_fight(frame, area, theme, battle, status, tick),
        None => render_title(frame, area, theme, status, tick),
    }
}

fn render_title(frame: &mut Frame, area: Rect, theme: &Theme, status: &ArenaStatus, tick: usize) {
    let block = Block::new()
        .borders(Borders::ALL)
        .style(theme.ratatui_style(Element::Text));
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let top_padding = (inner_area.height.saturating_sub(MAIN_TOTAL_HEIGHT)) / 2;
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top_padding),
            Constraint::Length(MAIN_LOGO_HEIGHT),
            Constraint::Length(GAP_HEIGHT),
            Constraint::Length(TEXT_HEIGHT),
            Constraint::Min(0),
        ])
        .split(inner_area);

    let logo_paragraph = Paragraph::new(MAIN_LOGO)
        .alignment(Alignment::Center)
        .style(theme.ratatui_style(Element::Title));
    frame.render_widget(logo_paragraph, vertical_chunks[1]);

    let (status_text, status_style) = match status {
        ArenaStatus::MissingCredential => (
            "Set OPENAI_API_KEY in .env to enter the arena".to_string(),
            theme.warning_style(),
        ),
        ArenaStatus::AuthFailed(_) => (
            "The API rejected your key - check OPENAI_API_KEY in .env".to_string(),
            theme.warning_style(),
        ),
        ArenaStatus::Failed(message) => (
            format!("Something went wrong: {} - press [ENTER] to retry", message),
            theme.warning_style(),
        ),
        ArenaStatus::Summoning => (
            format!("{} Summoning a monster...", spinner(tick)),
            theme.ratatui_style(Element::Narrative),
        ),
        _ => (
            "Press [ENTER] to Start New Battle".to_string(),
            theme.ratatui_style(Element::Title),
        ),
    };
    let status_paragraph = Paragraph::new(status_text)
        .alignment(Alignment::Center)
        .style(status_style);
    frame.render_widget(status_paragraph, vertical_chunks[3]);
}

fn render_fight(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    battle: &Battle,
    status: &ArenaStatus,
    tick: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PANEL_HEIGHT),
            Constraint::Length(1), // Turn banner
            Constraint::Min(0),    // Narrative
        ])
        .split(area);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    let hero_active = battle.turn == Turn::Hero && !battle.is_over();
    render_combatant(
        frame,
        panels[0],
        theme,
        CombatantView {
            title: " Hero ",
            name: &battle.hero.name,
            hp: battle.hero.hp,
            weapons: &battle.hero.weapons,
            element: Element::Hero,
            active: hero_active,
        },
    );
    render_combatant(
        frame,
        panels[1],
        theme,
        CombatantView {
            title: " Monster ",
            name: &battle.monster.name,
            hp: battle.monster.hp,
            weapons: &battle.monster.weapons,
            element: Element::Monster,
            active: !hero_active && !battle.is_over(),
        },
    );

    let (banner, banner_style) = turn_banner(battle, status, tick, theme);
    frame.render_widget(
        Paragraph::new(banner)
            .alignment(Alignment::Center)
            .style(banner_style),
        chunks[1],
    );

    let mut narrative = vec![Line::from(Span::styled(
        battle.current_narrative().to_string(),
        theme.ratatui_style(Element::Narrative),
    ))];
    if !battle.monster.description.is_empty() && battle.log.len() == 1 {
        narrative.push(Line::raw(""));
        narrative.push(Line::from(Span::styled(
            battle.monster.description.clone(),
            theme.ratatui_style(Element::Inactive),
        )));
    }
    let narrative_paragraph = Paragraph::new(narrative)
        .wrap(Wrap { trim: true })
        .block(
            Block::new()
                .borders(Borders::ALL)
                .title(" Battle Narrative ")
                .style(theme.ratatui_style(Element::Text)),
        );
    frame.render_widget(narrative_paragraph, chunks[2]);
}

struct CombatantView<'a> {
    title: &'a str,
    name: &'a str,
    hp: u32,
    weapons: &'a [String],
    element: Element,
    active: bool,
}

fn render_combatant(frame: &mut Frame, area: Rect, theme: &Theme, view: CombatantView) {
    let accent = theme.ratatui_style(view.element);
    let border_style = if view.active {
        accent.add_modifier(Modifier::BOLD)
    } else {
        theme.ratatui_style(Element::Inactive)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Name:    ", theme.ratatui_style(Element::Inactive)),
            Span::styled(view.name.to_string(), accent.add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("HP:      ", theme.ratatui_style(Element::Inactive)),
            Span::styled(view.hp.to_string(), accent),
        ]),
        Line::from(vec![
            Span::styled("Weapons: ", theme.ratatui_style(Element::Inactive)),
            Span::styled(view.weapons.join(", "), theme.text_style()),
        ]),
    ];

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::new()
            .borders(Borders::ALL)
            .title(view.title)
            .border_style(border_style)
            .style(theme.ratatui_style(Element::Text)),
    );
    frame.render_widget(paragraph, area);
}

fn turn_banner(battle: &Battle, status: &ArenaStatus, tick: usize, theme: &Theme) -> (String, Style) {
    if status.is_working() {
        return (
            format!("{} Loading...", spinner(tick)),
            theme.ratatui_style(Element::Narrative),
        );
    }
    match battle.phase {
        Phase::Victory => (
            "VICTORY! Press [ENTER] to Start New Battle".to_string(),
            theme.ratatui_style(Element::Hero).add_modifier(Modifier::BOLD),
        ),
        Phase::Defeat => (
            "DEFEAT! Press [ENTER] to Start New Battle".to_string(),
            theme.ratatui_style(Element::Monster).add_modifier(Modifier::BOLD),
        ),
        Phase::InProgress => {
            let element = match battle.turn {
                Turn::Hero => Element::Hero,
                Turn::Monster => Element::Monster,
            };
            (
                format!("Round {} :: {}", battle.round, battle.turn_label()),
                theme.ratatui_style(element).add_modifier(Modifier::BOLD),
            )
        }
    }
}

fn spinner(tick: usize) -> char {
    SPINNER[(tick / 2) % SPINNER.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::hero::Hero;
    use arena_core::monster::Monster;

    fn battle() -> Battle {
        Battle::new(Hero::default(), Monster::fallback(20), "intro".into())
    }

    #[test]
    fn test_banner_shows_turn() {
        let theme = Theme::default();
        let mut battle = battle();
        let (text, _) = turn_banner(&battle, &ArenaStatus::Ready, 0, &theme);
        assert_eq!(text, "Round 1 :: Hero's Turn!");

        battle.turn = Turn::Monster;
        let (text, _) = turn_banner(&battle, &ArenaStatus::Ready, 0, &theme);
        assert_eq!(text, "Round 1 :: Monster's Turn!");
    }

    #[test]
    fn test_banner_while_loading_and_after_battle() {
        let theme = Theme::default();
        let mut battle = battle();
        let (text, _) = turn_banner(&battle, &ArenaStatus::Fighting, 2, &theme);
        assert_eq!(text, "/ Loading...");

        battle.phase = Phase::Defeat;
        let (text, _) = turn_banner(&battle, &ArenaStatus::Ready, 0, &theme);
        assert!(text.starts_with("DEFEAT!"));
    }
}
