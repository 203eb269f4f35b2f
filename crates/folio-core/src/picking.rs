use crate::camera::Ray;
use crate::card::{Card, CARD_HEIGHT, CARD_WIDTH};
use crate::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub index: usize,
    pub distance: f64,
    pub point: Vec3,
}

/// Deterministic ray picking against the live card rectangles.
///
/// Ordering contract:
/// - The closest hit along the ray wins.
/// - If two cards are hit at the same distance, the lower card index wins.
///
/// Cards are double sided; a ray parallel to a card's plane never hits it.
pub fn pick_cards(cards: &[Card], ray: Ray) -> Option<PickHit> {
    let dir = ray.dir.normalize()?;
    let mut best: Option<PickHit> = None;

    for card in cards {
        let Some(t) = ray_card_hit_t(ray.origin, dir, card) else {
            continue;
        };
        let closer = match &best {
            None => true,
            Some(b) => t.total_cmp(&b.distance).then_with(|| card.index.cmp(&b.index)).is_lt(),
        };
        if closer {
            best = Some(PickHit {
                index: card.index,
                distance: t,
                point: ray.origin + dir * t,
            });
        }
    }

    best
}

fn ray_card_hit_t(origin: Vec3, dir: Vec3, card: &Card) -> Option<f64> {
    let pose = &card.live;
    if pose.scale <= 0.0 {
        return None;
    }
    let m = pose.rotation.matrix();
    let normal = m.mul_vec(Vec3::Z);
    let denom = dir.dot(normal);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = (pose.position - origin).dot(normal) / denom;
    if !t.is_finite() || t <= 0.0 {
        return None;
    }

    let local = origin + dir * t - pose.position;
    let u = local.dot(m.mul_vec(Vec3::X));
    let v = local.dot(m.mul_vec(Vec3::Y));
    let half_w = CARD_WIDTH * 0.5 * pose.scale;
    let half_h = CARD_HEIGHT * 0.5 * pose.scale;
    (u.abs() <= half_w && v.abs() <= half_h).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Pose, Transform};
    use crate::math::Euler;
    use crate::works::PortfolioWork;

    fn card_at(index: usize, position: Vec3) -> Card {
        let mut card = Card::new(
            index,
            PortfolioWork::placeholder(index + 1, "#264653"),
            Transform::default(),
        );
        card.live = Pose {
            position,
            ..Pose::default()
        };
        card
    }

    fn forward_ray() -> Ray {
        Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        }
    }

    #[test]
    fn nearest_card_wins() {
        let cards = vec![
            card_at(0, Vec3::new(0.0, 0.0, -4.0)),
            card_at(1, Vec3::new(0.3, 0.0, -1.0)),
        ];
        let hit = pick_cards(&cards, forward_ray()).unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.distance - 6.0).abs() < 1e-12);
    }

    #[test]
    fn equal_distance_lower_index_wins() {
        let cards = vec![
            card_at(2, Vec3::new(0.1, 0.0, -2.0)),
            card_at(1, Vec3::new(-0.1, 0.0, -2.0)),
        ];
        assert_eq!(pick_cards(&cards, forward_ray()).unwrap().index, 1);
    }

    #[test]
    fn miss_outside_rectangle() {
        let cards = vec![card_at(0, Vec3::new(1.0, 0.0, -2.0))];
        assert!(pick_cards(&cards, forward_ray()).is_none());
    }

    #[test]
    fn edge_on_card_is_not_hit() {
        let mut card = card_at(0, Vec3::new(0.0, 0.0, -2.0));
        card.live.rotation = Euler::new(0.0, std::f64::consts::FRAC_PI_2, 0.0);
        assert!(pick_cards(&[card], forward_ray()).is_none());
    }

    #[test]
    fn cards_behind_the_ray_are_ignored() {
        let cards = vec![card_at(0, Vec3::new(0.0, 0.0, 8.0))];
        assert!(pick_cards(&cards, forward_ray()).is_none());
    }
}
