//! Per-frame animation of cards and camera.
//!
//! The driver never decides *which* update runs; the session dispatches on the
//! machine's phase and calls exactly one of the update methods per frame.

use crate::camera::CameraPose;
use crate::card::{Card, Pose};
use crate::config::{CameraConfig, Easing, MotionConfig, SceneConfig};
use crate::math::{wrap_angle, Euler, Vec3};
use crate::timing::{approach, progress, settle};

/// Staggered entrance, played once when the carousel is first shown.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Intro {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub delay_step_ms: f64,
}

impl Intro {
    /// Time at which the last card lands.
    pub fn end_ms(&self, count: usize) -> f64 {
        self.start_ms + self.duration_ms + count.saturating_sub(1) as f64 * self.delay_step_ms
    }
}

/// Scripted hand-off between home and explore.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transition {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub from_camera: CameraPose,
    pub to_home: bool,
}

impl Transition {
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }
}

#[derive(Debug, Clone)]
pub struct AnimationDriver {
    motion: MotionConfig,
    camera: CameraConfig,
    transition_easing: Easing,
    intro_easing: Easing,
}

impl AnimationDriver {
    pub fn new(scene: &SceneConfig) -> Self {
        Self {
            motion: scene.motion.clone(),
            camera: scene.camera.clone(),
            transition_easing: scene.timing.transition_easing,
            intro_easing: scene.timing.intro_easing,
        }
    }

    pub fn explore_camera(&self) -> CameraPose {
        self.camera.explore
    }

    /// Scroll-driven home camera. `x` is the camera's current x, which eases
    /// toward the pointer rather than jumping to it.
    pub fn home_camera(&self, scroll_progress: f64, x: f64, pointer_x: f64) -> CameraPose {
        let cfg = &self.camera;
        let p = scroll_progress;
        CameraPose {
            position: Vec3::new(
                approach(x, pointer_x * cfg.pointer_pull, self.motion.home_damping),
                p * cfg.home_rise,
                cfg.home_distance - p * cfg.home_travel,
            ),
            rotation: Euler::new(-p * cfg.home_tilt, 0.0, 0.0),
            look_at: None,
        }
    }

    /// Resting home camera for the given scroll and pointer.
    pub fn home_camera_at_rest(&self, scroll_progress: f64, pointer_x: f64) -> CameraPose {
        let x = pointer_x * self.camera.pointer_pull;
        self.home_camera(scroll_progress, x, pointer_x)
    }

    /// Floating pose of a card at `time_s` seconds, used as the landing pose
    /// when returning home. Spin about y restarts from the original rotation.
    pub fn home_pose(&self, card: &Card, time_s: f64) -> Pose {
        let i = card.index as f64;
        let orig = &card.original;
        Pose {
            position: Vec3::new(
                orig.position.x + (time_s * 0.5 + i).cos() * self.motion.float_x,
                orig.position.y + (time_s + i * 1.5).sin() * self.motion.float_y,
                orig.position.z,
            ),
            rotation: Euler::new(
                (time_s + i).sin() * self.motion.float_tilt,
                orig.rotation.y,
                orig.rotation.z,
            ),
            scale: orig.scale,
            opacity: 1.0,
        }
    }

    /// Home steady state: floating cards plus the scroll/pointer camera.
    pub fn update_home(
        &self,
        cards: &mut [Card],
        camera: &mut CameraPose,
        scroll_progress: f64,
        pointer_x: f64,
        time_s: f64,
    ) {
        *camera = self.home_camera(scroll_progress, camera.position.x, pointer_x);

        let m = &self.motion;
        for card in cards.iter_mut() {
            let i = card.index as f64;
            let orig = card.original;
            let live = &mut card.live;

            live.position.x = orig.position.x + (time_s * 0.5 + i).cos() * m.float_x;
            live.position.y = orig.position.y + (time_s + i * 1.5).sin() * m.float_y;
            live.position.z = orig.position.z;
            live.rotation.x = (time_s + i).sin() * m.float_tilt;
            live.rotation.y = wrap_angle(live.rotation.y + m.spin_per_frame);

            let target_scale = if card.hovered { m.home_hover_scale } else { orig.scale };
            live.scale = approach(live.scale, target_scale, m.home_damping);
            live.opacity = approach(live.opacity, 1.0, m.home_damping);
        }
    }

    /// Place every card at its off-screen entrance pose and assign its stagger.
    pub fn prepare_intro(&self, cards: &mut [Card], delay_step_ms: f64) {
        let swing = self.motion.intro_swing;
        for card in cards.iter_mut() {
            let wobble = if card.index % 2 == 0 { 1.0 } else { -1.0 };
            let start = Pose {
                position: card.line.position + Vec3::new(wobble * swing.x, wobble * swing.y, -swing.z),
                rotation: card.line.rotation,
                scale: card.line.scale * self.motion.intro_scale,
                opacity: 0.0,
            };
            card.intro_delay_ms = card.index as f64 * delay_step_ms;
            card.intro_start = Some(start);
            card.live = start;
        }
    }

    /// Advance the entrance. Returns `true` once every card has landed.
    pub fn play_intro(&self, cards: &mut [Card], intro: &Intro, now_ms: f64) -> bool {
        let mut all_complete = true;
        for card in cards.iter_mut() {
            let p = progress(intro.start_ms + card.intro_delay_ms, intro.duration_ms, now_ms);
            if p < 1.0 {
                all_complete = false;
            }
            let eased = self.intro_easing.apply(p);
            let start = card.intro_start.unwrap_or(card.line);
            card.live = start.lerp(&card.line, eased);
        }
        all_complete
    }

    /// Capture the live pose of every card as its transition origin.
    /// Rotations are folded so accumulated home spin does not unwind.
    pub fn capture_snapshots(cards: &mut [Card]) {
        for card in cards.iter_mut() {
            card.transition_start = Some(Pose {
                rotation: card.live.rotation.wrapped(),
                ..card.live
            });
        }
    }

    /// Advance a mode transition toward `to_camera` and each card's target.
    /// Returns the raw (uneased) progress.
    pub fn update_transition(
        &self,
        cards: &mut [Card],
        camera: &mut CameraPose,
        transition: &Transition,
        to_camera: &CameraPose,
        now_ms: f64,
    ) -> f64 {
        let p = progress(transition.start_ms, transition.duration_ms, now_ms);
        let eased = self.transition_easing.apply(p);

        *camera = blend_cameras(&transition.from_camera, to_camera, eased);

        let landing_s = transition.end_ms() * 0.001;
        for card in cards.iter_mut() {
            let target = if transition.to_home {
                self.home_pose(card, landing_s)
            } else {
                card.line
            };
            let from = card.transition_start.unwrap_or(card.live);
            card.live = from.lerp(&target, eased);
        }
        p
    }

    /// Explore steady state: every channel eases toward its line-state and
    /// snaps once inside the settle epsilon.
    pub fn maintain_explore(&self, cards: &mut [Card], camera: &mut CameraPose) {
        let m = &self.motion;
        let eps = m.settle_epsilon;
        for card in cards.iter_mut() {
            let line = card.line;
            let live = &mut card.live;

            live.position = settle_vec(live.position, line.position, m.position_damping, eps);
            live.rotation = Euler::new(
                settle(live.rotation.x, line.rotation.x, m.rotation_damping, eps),
                settle(live.rotation.y, line.rotation.y, m.rotation_damping, eps),
                settle(live.rotation.z, line.rotation.z, m.rotation_damping, eps),
            );
            let target_scale = line.scale * if card.hovered { m.explore_hover_boost } else { 1.0 };
            live.scale = settle(live.scale, target_scale, m.scale_damping, eps);
            live.opacity = settle(live.opacity, line.opacity, m.opacity_damping, eps);
        }

        let target = self.camera.explore;
        *camera = CameraPose {
            position: settle_vec(camera.position, target.position, m.camera_damping, eps),
            ..target
        };
    }

    /// Put every card and the camera exactly on the carousel targets.
    pub fn snap_to_line(&self, cards: &mut [Card], camera: &mut CameraPose) {
        for card in cards.iter_mut() {
            card.live = card.line;
            card.transition_start = None;
            card.intro_start = None;
        }
        *camera = self.camera.explore;
    }

    /// Put every card and the camera exactly on the home landing poses.
    pub fn snap_to_home(&self, cards: &mut [Card], camera: &mut CameraPose, to_camera: &CameraPose, landing_s: f64) {
        for card in cards.iter_mut() {
            card.live = self.home_pose(card, landing_s);
            card.transition_start = None;
        }
        *camera = *to_camera;
    }
}

fn settle_vec(current: Vec3, target: Vec3, factor: f64, eps: f64) -> Vec3 {
    Vec3::new(
        settle(current.x, target.x, factor, eps),
        settle(current.y, target.y, factor, eps),
        settle(current.z, target.z, factor, eps),
    )
}

/// Interpolate position and look target; the result always uses a look-at so
/// orientation turns smoothly between a free camera and a targeted one.
fn blend_cameras(from: &CameraPose, to: &CameraPose, t: f64) -> CameraPose {
    let distance = to
        .look_at
        .or(from.look_at)
        .map(|target| (target - to.position).length())
        .filter(|d| *d > f64::EPSILON)
        .unwrap_or(5.0);

    let from_target = from.look_at.unwrap_or_else(|| from.look_target(distance));
    let to_target = to.look_at.unwrap_or_else(|| to.look_target(distance));

    CameraPose {
        position: from.position.lerp(to.position, t),
        rotation: from.rotation.lerp(to.rotation, t),
        look_at: Some(from_target.lerp(to_target, t)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Transform;
    use crate::config::{LayoutConfig, TimingConfig};
    use crate::layout::LayoutPlanner;
    use crate::works::PortfolioWork;

    fn scene() -> SceneConfig {
        SceneConfig::default()
    }

    fn cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| {
                let original = Transform {
                    position: Vec3::new(i as f64, -4.0, -3.0),
                    ..Transform::default()
                };
                Card::new(i, PortfolioWork::placeholder(i + 1, "#233044"), original)
            })
            .collect()
    }

    fn planned(n: usize) -> Vec<Card> {
        let mut cards = cards(n);
        LayoutPlanner::new(LayoutConfig::default()).plan(&mut cards, 0, 0);
        cards
    }

    #[test]
    fn intro_completes_after_last_card_lands() {
        let driver = AnimationDriver::new(&scene());
        let timing = TimingConfig::default();
        let mut cards = planned(5);
        driver.prepare_intro(&mut cards, timing.intro_delay_step_ms);

        let intro = Intro {
            start_ms: 1000.0,
            duration_ms: timing.intro_ms,
            delay_step_ms: timing.intro_delay_step_ms,
        };
        assert_eq!(intro.end_ms(5), 2340.0);

        assert!(!driver.play_intro(&mut cards, &intro, 1000.0 + 900.0));
        assert!(!driver.play_intro(&mut cards, &intro, 1000.0 + 1339.0));
        assert!(driver.play_intro(&mut cards, &intro, 1000.0 + 1340.0));
    }

    #[test]
    fn zero_duration_intro_still_staggers() {
        let driver = AnimationDriver::new(&scene());
        let mut cards = planned(5);
        driver.prepare_intro(&mut cards, 110.0);

        let intro = Intro {
            start_ms: 0.0,
            duration_ms: 0.0,
            delay_step_ms: 110.0,
        };
        assert_eq!(intro.end_ms(5), 440.0);

        assert!(!driver.play_intro(&mut cards, &intro, 0.0));
        assert!((cards[0].live.opacity - cards[0].line.opacity).abs() < 1e-12);
        assert_eq!(cards[4].live.opacity, 0.0);

        assert!(!driver.play_intro(&mut cards, &intro, 439.0));
        assert!(driver.play_intro(&mut cards, &intro, 440.0));
        assert!((cards[4].live.opacity - cards[4].line.opacity).abs() < 1e-12);
    }

    #[test]
    fn intro_start_pose_swings_by_parity() {
        let driver = AnimationDriver::new(&scene());
        let mut cards = planned(2);
        driver.prepare_intro(&mut cards, 110.0);

        let even = cards[0].intro_start.unwrap();
        let odd = cards[1].intro_start.unwrap();
        assert!((even.position.x - (cards[0].line.position.x + 1.1)).abs() < 1e-12);
        assert!((even.position.y - 1.6).abs() < 1e-12);
        assert!((odd.position.y + 1.6).abs() < 1e-12);
        assert!((even.position.z - (cards[0].line.position.z - 1.3)).abs() < 1e-12);
        assert!((even.scale - 1.2 * 0.7).abs() < 1e-12);
        assert_eq!(even.opacity, 0.0);
        assert_eq!(cards[1].intro_delay_ms, 110.0);
        assert_eq!(cards[0].live, even);
    }

    #[test]
    fn transition_starts_at_snapshot() {
        let driver = AnimationDriver::new(&scene());
        let mut cards = planned(3);
        let mut camera = CameraPose::default();
        AnimationDriver::capture_snapshots(&mut cards);
        let before: Vec<Pose> = cards.iter().map(|c| c.live).collect();

        let t = Transition {
            start_ms: 0.0,
            duration_ms: 1300.0,
            from_camera: camera,
            to_home: false,
        };
        let p = driver.update_transition(&mut cards, &mut camera, &t, &driver.explore_camera(), 0.0);
        assert_eq!(p, 0.0);
        for (card, pose) in cards.iter().zip(before) {
            assert_eq!(card.live, pose);
        }
        assert_eq!(camera.position, CameraPose::default().position);
    }

    #[test]
    fn transition_reaches_line_state_at_end() {
        let driver = AnimationDriver::new(&scene());
        let mut cards = planned(4);
        let mut camera = CameraPose::default();
        cards[2].live.rotation.y = 40.0;
        AnimationDriver::capture_snapshots(&mut cards);
        assert!(cards[2].transition_start.unwrap().rotation.y.abs() <= std::f64::consts::PI);

        let t = Transition {
            start_ms: 0.0,
            duration_ms: 1300.0,
            from_camera: camera,
            to_home: false,
        };
        let explore = driver.explore_camera();
        for now in [100.0, 650.0, 1299.0] {
            driver.update_transition(&mut cards, &mut camera, &t, &explore, now);
        }
        let p = driver.update_transition(&mut cards, &mut camera, &t, &explore, 1300.0);
        assert_eq!(p, 1.0);
        driver.snap_to_line(&mut cards, &mut camera);
        for card in &cards {
            assert_eq!(card.live, card.line);
            assert!(card.transition_start.is_none());
        }
        assert_eq!(camera, explore);
    }

    #[test]
    fn exit_lands_on_floating_pose() {
        let driver = AnimationDriver::new(&scene());
        let mut cards = planned(3);
        let mut camera = driver.explore_camera();
        AnimationDriver::capture_snapshots(&mut cards);

        let t = Transition {
            start_ms: 500.0,
            duration_ms: 1300.0,
            from_camera: camera,
            to_home: true,
        };
        let home = driver.home_camera_at_rest(0.0, 0.0);
        driver.update_transition(&mut cards, &mut camera, &t, &home, t.end_ms());
        for card in &cards {
            let landing = driver.home_pose(card, 1.8);
            assert!((card.live.position - landing.position).length() < 1e-9);
        }
        assert!((camera.position - home.position).length() < 1e-12);
    }

    #[test]
    fn maintain_explore_settles_exactly() {
        let driver = AnimationDriver::new(&scene());
        let mut cards = planned(3);
        let mut camera = CameraPose::default();
        for _ in 0..400 {
            driver.maintain_explore(&mut cards, &mut camera);
        }
        for card in &cards {
            assert_eq!(card.live, card.line);
        }
        assert_eq!(camera, driver.explore_camera());
    }

    #[test]
    fn hovered_card_scales_up_in_explore() {
        let driver = AnimationDriver::new(&scene());
        let mut cards = planned(3);
        let mut camera = driver.explore_camera();
        cards[0].hovered = true;
        for _ in 0..400 {
            driver.maintain_explore(&mut cards, &mut camera);
        }
        assert!((cards[0].live.scale - 1.2 * 1.05).abs() < 1e-9);
    }

    #[test]
    fn home_camera_follows_scroll() {
        let driver = AnimationDriver::new(&scene());
        let cam = driver.home_camera_at_rest(1.0, 0.0);
        assert!((cam.position.z + 5.0).abs() < 1e-12);
        assert!((cam.position.y - 3.0).abs() < 1e-12);
        assert!((cam.rotation.x + 0.3).abs() < 1e-12);
        assert!(cam.look_at.is_none());
    }

    #[test]
    fn home_pointer_pull_is_damped() {
        let driver = AnimationDriver::new(&scene());
        let mut cards = cards(1);
        let mut camera = CameraPose::default();
        driver.update_home(&mut cards, &mut camera, 0.0, 1.0, 0.0);
        assert!((camera.position.x - 0.05).abs() < 1e-12);
    }

    #[test]
    fn home_hover_scale_approaches() {
        let driver = AnimationDriver::new(&scene());
        let mut cards = cards(2);
        let mut camera = CameraPose::default();
        cards[1].hovered = true;
        driver.update_home(&mut cards, &mut camera, 0.0, 0.0, 2.0);
        assert!((cards[1].live.scale - 1.015).abs() < 1e-12);
        assert_eq!(cards[0].live.scale, 1.0);
        assert!((cards[1].live.position.y - (-4.0 + (2.0f64 + 1.5).sin() * 0.3)).abs() < 1e-12);
    }
}
