use crate::ui::app::{AppMode, SettingsSelection};
use arena_core::{
    credential::Credential,
    settings::Settings,
    theme::{Element, Theme},
};
use ratatui::{
    prelude::{Alignment, Constraint, Direction, Frame, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

#[allow(clippy::too_many_arguments)]
pub fn render_settings_modal(
    frame: &mut Frame,
    area: Rect,
    settings: &Settings,
    credential: Option<&Credential>,
    theme: &Theme,
    selection: SettingsSelection,
    mode: AppMode,
    edit_buffer: &str,
) {
    let block = Block::new()
        .title("Settings")
        .borders(Borders::ALL)
        .style(theme.ratatui_style(Element::Warning));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Model
            Constraint::Length(1), // API Key
            Constraint::Length(1), // Key source
            Constraint::Length(1), // Theme
            Constraint::Min(0),    // Spacer
            Constraint::Length(1), // Action Text
        ])
        .split(inner_area);

    let create_setting_line = |label: &str, value: &str, is_selected: bool, is_editing: bool| {
        let value_style = if is_selected {
            theme.highlight_style()
        } else {
            theme.text_style()
        };

        let display_value = if is_editing {
            format!("{}_", value)
        } else {
            value.to_owned()
        };

        Line::from(vec![
            Span::styled(
                format!("{:<15}", label),
                theme.warning_style().add_modifier(Modifier::BOLD),
            ),
            Span::styled(display_value, value_style),
        ])
    };

    let editing_model = mode == AppMode::EditingModel;
    let model_value = if editing_model {
        edit_buffer
    } else {
        settings.model.as_str()
    };
    let model_line = create_setting_line(
        "Model:",
        model_value,
        selection == SettingsSelection::Model,
        editing_model,
    );
    frame.render_widget(Paragraph::new(model_line), chunks[0]);

    let (api_key_display, source_display) = match credential {
        Some(credential) => (credential.masked(), format!("from {}", credential.source())),
        None => (
            "[NOT SET]".to_string(),
            "add OPENAI_API_KEY to .env and restart".to_string(),
        ),
    };
    let api_key_line = create_setting_line(
        "API Key:",
        &api_key_display,
        selection == SettingsSelection::ApiKey,
        false,
    );
    frame.render_widget(Paragraph::new(api_key_line), chunks[1]);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(format!("{:<15}", "")),
            Span::styled(source_display, theme.ratatui_style(Element::Inactive)),
        ])),
        chunks[2],
    );

    let theme_value = format!("◄ {} ►", settings.theme.label());
    let theme_line = create_setting_line(
        "Theme:",
        &theme_value,
        selection == SettingsSelection::Theme,
        false,
    );
    frame.render_widget(Paragraph::new(theme_line), chunks[3]);

    let action_text = if editing_model {
        "[ENTER] Confirm | [ESC] Cancel"
    } else {
        "[↑↓] Navigate | [ENTER] Edit | [S]ave changes | [ESC] Return"
    };
    let action_style = if selection == SettingsSelection::Save {
        theme.highlight_style()
    } else {
        theme.ratatui_style(Element::Inactive)
    };
    let action_paragraph = Paragraph::new(action_text)
        .alignment(Alignment::Center)
        .style(action_style);
    frame.render_widget(action_paragraph, chunks[5]);
}
