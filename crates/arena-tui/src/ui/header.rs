use crate::ui::app::ArenaStatus;
use arena_core::{
    credential::Credential,
    settings::Settings,
    theme::{Element, Theme},
};
use ratatui::{
    prelude::{Alignment, Frame, Rect},
    style::{Color, Style},
    text::Span,
    widgets::{block::Title, Block, Borders, Paragraph},
};

pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    status: &ArenaStatus,
    settings: &Settings,
    credential: Option<&Credential>,
) {
    let title = Title::from(" Cyber Fantasy Battle Arena ").alignment(Alignment::Left);

    let (status_text, status_color) = build_status_with_color(status, settings, credential);
    let status_span = Span::styled(status_text, Style::default().fg(status_color));

    let header_paragraph = Paragraph::new(status_span)
        .style(theme.ratatui_style(Element::Text))
        .alignment(Alignment::Left)
        .block(
            Block::new()
                .borders(Borders::ALL)
                .title(title)
                .style(theme.ratatui_style(Element::Text)),
        );

    frame.render_widget(header_paragraph, area);
}

fn build_status_with_color(
    status: &ArenaStatus,
    settings: &Settings,
    credential: Option<&Credential>,
) -> (String, Color) {
    let key_display = match credential {
        Some(credential) => credential.masked(),
        None => "NO API KEY".to_string(),
    };
    let prefix = format!("Arena :: {} :: {}", settings.model, key_display);

    let text = match status {
        ArenaStatus::Ready => prefix,
        ArenaStatus::MissingCredential => format!("{} :: [SET OPENAI_API_KEY IN .env]", prefix),
        ArenaStatus::Summoning => format!("{} :: [SUMMONING]", prefix),
        ArenaStatus::Fighting => format!("{} :: [FIGHTING]", prefix),
        ArenaStatus::AuthFailed(_) => format!("{} :: [AUTHENTICATION FAILED]", prefix),
        ArenaStatus::Failed(message) => format!("{} :: [ERROR: {}]", prefix, message),
        ArenaStatus::Saved => format!("{} :: [SAVED]", prefix),
    };

    let color = match status {
        ArenaStatus::Ready | ArenaStatus::Saved => Color::Green,
        ArenaStatus::Summoning | ArenaStatus::Fighting => Color::Cyan,
        ArenaStatus::MissingCredential => Color::Yellow,
        ArenaStatus::AuthFailed(_) | ArenaStatus::Failed(_) => Color::Red,
    };

    (text, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::credential::CredentialSource;

    #[test]
    fn test_status_masks_key() {
        let credential = Credential::new(
            "sk-proj-0123456789abcdefghijkl",
            CredentialSource::ProcessEnv,
        );
        let (text, color) =
            build_status_with_color(&ArenaStatus::Ready, &Settings::default(), credential.as_ref());
        assert_eq!(text, "Arena :: gpt-4o :: sk-proj-0123456...jkl");
        assert_eq!(color, Color::Green);
    }

    #[test]
    fn test_status_without_key() {
        let (text, color) = build_status_with_color(
            &ArenaStatus::MissingCredential,
            &Settings::default(),
            None,
        );
        assert!(text.contains("NO API KEY"));
        assert!(text.ends_with("[SET OPENAI_API_KEY IN .env]"));
        assert_eq!(color, Color::Yellow);
    }
}
