use folio_core::camera::Projected;
use folio_core::card::Card;
use folio_core::machine::PhaseKind;
use folio_core::math::Vec3;
use folio_core::SceneFrame;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::canvas::{Canvas, Context, Line as CanvasLine, Points},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;
use crate::themes::parse_hex_color;

/// Braille-canvas painter for the 3D scene.
///
/// The canvas spans normalized device coordinates, so projected points map
/// straight onto it.
pub struct StageWidget;

impl StageWidget {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        scene: &SceneFrame<'_>,
        theme: &Theme,
        show_particles: bool,
    ) {
        let project = |p: Vec3| scene.projection.project(&scene.camera, p);
        let cell_ndc = 2.0 / area.width.max(1) as f64;
        let row_ndc = 2.0 / area.height.max(1) as f64;

        let canvas = Canvas::default()
            .background_color(theme.background)
            .marker(Marker::Braille)
            .x_bounds([-1.0, 1.0])
            .y_bounds([-1.0, 1.0])
            .paint(|ctx| {
                if show_particles {
                    let coords: Vec<(f64, f64)> = scene
                        .backdrop
                        .particles
                        .world_points()
                        .filter_map(|p| project(p))
                        .map(|p| (p.ndc_x, p.ndc_y))
                        .collect();
                    ctx.draw(&Points {
                        coords: &coords,
                        color: theme.particle,
                    });
                }

                for shape in &scene.backdrop.shapes {
                    for (a, b) in shape.segments() {
                        if let (Some(pa), Some(pb)) = (project(a), project(b)) {
                            draw_segment(ctx, &pa, &pb, theme.shape);
                        }
                    }
                }

                // Cards sit above the backdrop
                ctx.layer();

                for card in scene.cards_by_depth() {
                    if card.live.opacity <= 0.0 {
                        continue;
                    }
                    let corners: Option<Vec<Projected>> =
                        card.live.corners().into_iter().map(|c| project(c)).collect();
                    let Some(corners) = corners else {
                        continue;
                    };

                    let color = theme.fade(card_color(card, scene, theme), card.live.opacity);
                    for i in 0..corners.len() {
                        draw_segment(ctx, &corners[i], &corners[(i + 1) % corners.len()], color);
                    }

                    let cx = corners.iter().map(|p| p.ndc_x).sum::<f64>() / 4.0;
                    let cy = corners.iter().map(|p| p.ndc_y).sum::<f64>() / 4.0;
                    let mut style = Style::default().fg(color);
                    if card.hovered || is_focused(card, scene) {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    for (row, label) in card_labels(card).into_iter().enumerate() {
                        let x = cx - label.width() as f64 * cell_ndc * 0.5;
                        let y = cy - row as f64 * row_ndc;
                        ctx.print(x, y, Span::styled(label, style));
                    }
                }
            });

        frame.render_widget(canvas, area);
    }
}

fn draw_segment(ctx: &mut Context<'_>, a: &Projected, b: &Projected, color: Color) {
    ctx.draw(&CanvasLine::new(a.ndc_x, a.ndc_y, b.ndc_x, b.ndc_y, color));
}

/// Text stamped on a card face, top to bottom
fn card_labels(card: &Card) -> Vec<String> {
    let mut labels = vec![card.work.title.clone()];
    if card.work.placeholder {
        labels.push("COMING SOON".to_string());
    }
    labels
}

fn is_focused(card: &Card, scene: &SceneFrame<'_>) -> bool {
    card.index == scene.active_index
        && matches!(scene.phase, PhaseKind::Explore | PhaseKind::EnteringExplore)
}

fn card_color(card: &Card, scene: &SceneFrame<'_>, theme: &Theme) -> Color {
    if card.hovered {
        return theme.accent;
    }
    if is_focused(card, scene) {
        return theme.card_active;
    }
    card.work
        .color
        .as_deref()
        .and_then(parse_hex_color)
        .unwrap_or(theme.card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::config::AppConfig;
    use folio_core::works::builtin_works;
    use folio_core::{ChoreographySession, StartPage};

    #[test]
    fn test_placeholder_cards_use_palette_color() {
        let session =
            ChoreographySession::create(&AppConfig::default(), builtin_works(), StartPage::Home, 0.0);
        let scene = session.snapshot();
        let theme = Theme::default();

        let placeholder = scene.cards.iter().find(|c| c.work.placeholder).unwrap();
        let expected = parse_hex_color(placeholder.work.color.as_deref().unwrap()).unwrap();
        assert_eq!(card_color(placeholder, &scene, &theme), expected);

        let real = scene.cards.iter().find(|c| !c.work.placeholder).unwrap();
        assert_eq!(card_color(real, &scene, &theme), theme.card);
    }

    #[test]
    fn test_active_card_highlighted_only_in_explore() {
        let home =
            ChoreographySession::create(&AppConfig::default(), builtin_works(), StartPage::Home, 0.0);
        let explore =
            ChoreographySession::create(&AppConfig::default(), builtin_works(), StartPage::Explore, 0.0);
        let theme = Theme::default();

        let scene = home.snapshot();
        assert!(!is_focused(&scene.cards[0], &scene));

        let scene = explore.snapshot();
        let active = &scene.cards[scene.active_index];
        assert_eq!(card_color(active, &scene, &theme), theme.card_active);
    }

    #[test]
    fn test_placeholder_cards_are_labelled() {
        let session =
            ChoreographySession::create(&AppConfig::default(), builtin_works(), StartPage::Home, 0.0);
        let scene = session.snapshot();

        let placeholder = scene.cards.iter().find(|c| c.work.placeholder).unwrap();
        assert_eq!(
            card_labels(placeholder),
            vec![placeholder.work.title.clone(), "COMING SOON".to_string()]
        );

        let real = scene.cards.iter().find(|c| !c.work.placeholder).unwrap();
        assert_eq!(card_labels(real), vec![real.work.title.clone()]);
    }
}
