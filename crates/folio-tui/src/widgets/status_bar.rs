use folio_core::machine::PhaseKind;
use folio_core::SceneFrame;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        scene: &SceneFrame<'_>,
        message: Option<&str>,
        theme: &Theme,
    ) {
        let mode_str = scene.phase.label();

        let status_text = match message {
            Some(msg) => format!(" {} | {}", mode_str, msg),
            None => {
                let total = scene.cards.len();
                let card = if total == 0 {
                    "no works".to_string()
                } else {
                    format!("Card {}/{}", scene.active_index + 1, total)
                };
                format!(
                    " {} | {} {:>3.0}% | {}",
                    mode_str,
                    scene.section.label(),
                    scene.scroll_progress * 100.0,
                    card
                )
            }
        };

        let help_hint = match scene.phase {
            PhaseKind::Home => " e:explore j/k:scroll ?:help q:quit ",
            PhaseKind::Explore => " h/l:browse <CR>:open b:home ?:help ",
            PhaseKind::EnteringExplore | PhaseKind::ExitingToHome => " ... ",
        };
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let bar = Style::default().bg(theme.status_bg);
        let line = Line::from(vec![
            Span::styled(
                status_text,
                bar.fg(theme.foreground).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(theme.muted)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
