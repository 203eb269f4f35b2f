use folio_core::page::Section;
use folio_core::SceneFrame;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use crate::theme::Theme;

/// Home page content layered over the stage, plus the transition cover.
pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, scene: &SceneFrame<'_>, theme: &Theme) {
        if area.width < 8 || area.height < 4 {
            return;
        }

        let lines = Self::section_lines(scene, theme);
        let width = lines
            .iter()
            .map(|l| l.width() as u16)
            .max()
            .unwrap_or(0)
            .min(area.width.saturating_sub(6));
        let height = (lines.len() as u16).min(area.height.saturating_sub(2));
        let text_area = Rect::new(area.x + 2, area.y + 1, width, height);
        frame.render_widget(Paragraph::new(lines), text_area);

        Self::render_scroll_track(frame, area, scene.scroll_progress, theme);
    }

    /// Title band shown while the host switches pages
    pub fn render_cover(frame: &mut Frame, area: Rect, theme: &Theme) {
        let band = Rect::new(area.x, area.y + area.height.saturating_sub(3) / 2, area.width, 3u16.min(area.height));
        frame.render_widget(Clear, band);
        frame.render_widget(Block::default().style(Style::default().bg(theme.surface)), band);

        let title = Line::from(Span::styled(
            "F O L I O",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(
            Paragraph::new(title).alignment(Alignment::Center),
            Rect::new(band.x, band.y + band.height / 2, band.width, 1),
        );
    }

    fn section_lines(scene: &SceneFrame<'_>, theme: &Theme) -> Vec<Line<'static>> {
        let heading = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
        let body = Style::default().fg(theme.foreground);
        let hint = Style::default().fg(theme.muted);

        match scene.section {
            Section::Hero => vec![
                Line::from(Span::styled("FOLIO", heading)),
                Line::from(Span::styled("Selected works in motion", body)),
                Line::from(""),
                Line::from(Span::styled("scroll for more, e to explore", hint)),
            ],
            Section::Portfolio => {
                let mut lines = vec![Line::from(Span::styled("Portfolio", heading))];
                lines.extend(
                    scene
                        .cards
                        .iter()
                        .filter(|c| !c.work.placeholder)
                        .map(|c| {
                            Line::from(vec![
                                Span::styled(format!("{} ", c.work.title), body),
                                Span::styled(c.work.description.clone(), hint),
                            ])
                        }),
                );
                lines
            }
            Section::Contact => vec![
                Line::from(Span::styled("Contact", heading)),
                Line::from(Span::styled("Open to new collaborations", body)),
                Line::from(""),
                Line::from(Span::styled("q to leave", hint)),
            ],
        }
    }

    /// One-column scroll indicator on the right edge
    fn render_scroll_track(frame: &mut Frame, area: Rect, progress: f64, theme: &Theme) {
        let track_height = area.height.saturating_sub(2).max(1);
        let thumb = (progress.clamp(0.0, 1.0) * (track_height - 1) as f64).round() as u16;
        let x = area.x + area.width - 1;

        let lines: Vec<Line> = (0..track_height)
            .map(|row| {
                if row == thumb {
                    Line::from(Span::styled("┃", Style::default().fg(theme.accent)))
                } else {
                    Line::from(Span::styled("│", Style::default().fg(theme.muted)))
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), Rect::new(x, area.y + 1, 1, track_height));
    }
}
