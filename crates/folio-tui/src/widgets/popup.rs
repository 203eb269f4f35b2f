use folio_core::works::PortfolioWork;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;

pub struct PopupWidget;

impl PopupWidget {
    /// Render the key binding overview
    pub fn render_help(frame: &mut Frame, bindings: &[(String, &'static str)], theme: &Theme) {
        let area = frame.area();
        let popup_width = 44u16.min(area.width.saturating_sub(4));
        let popup_height = (bindings.len() as u16 + 4).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        let key_width = bindings.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let mut lines: Vec<Line> = bindings
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!(" {:>width$}  ", key, width = key_width),
                        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*desc, Style::default().fg(theme.foreground)),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(
            Line::from(Span::styled("any key to close", Style::default().fg(theme.muted)))
                .alignment(Alignment::Center),
        );

        Self::render_box(frame, popup_area, " Help ", theme.accent, lines, theme);
    }

    /// Render the detail view of a work without an external link
    pub fn render_detail(frame: &mut Frame, work: &PortfolioWork, theme: &Theme) {
        let area = frame.area();
        let popup_width = 60u16.min(area.width.saturating_sub(4));
        let popup_height = 14u16.min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        let label = Style::default().fg(theme.muted);
        let value = Style::default().fg(theme.foreground);

        let mut lines = vec![
            Line::from(Span::styled(
                work.description.clone(),
                value.add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
        ];

        if let Some(detail) = &work.detail {
            if let Some(role) = &detail.role {
                lines.push(Line::from(vec![
                    Span::styled("Role  ", label),
                    Span::styled(role.clone(), value),
                ]));
            }
            if let Some(year) = detail.year {
                lines.push(Line::from(vec![
                    Span::styled("Year  ", label),
                    Span::styled(year.to_string(), value),
                ]));
            }
            if !detail.tags.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled("Tags  ", label),
                    Span::styled(detail.tags.join(", "), Style::default().fg(theme.success)),
                ]));
            }
            if let Some(summary) = &detail.summary {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(summary.clone(), value)));
            }
        }

        let title = format!(" {} ", truncate_str(&work.title, popup_width.saturating_sub(4) as usize));
        Self::render_box(frame, popup_area, &title, theme.card_active, lines, theme);
    }

    fn render_box(
        frame: &mut Frame,
        popup_area: Rect,
        title: &str,
        border: ratatui::style::Color,
        lines: Vec<Line<'_>>,
        theme: &Theme,
    ) {
        // Clear the background area
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(title.to_string())
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.surface));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

/// Helper function to create a centered rect
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Truncate a string to max length with ellipsis
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
