//! The choreography session: one self-contained scene instance.
//!
//! Hosts call `tick` once per frame from their pump and forward input between
//! ticks. Nothing here schedules itself.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::backdrop::Backdrop;
use crate::bridge::SceneFrame;
use crate::camera::{CameraPose, Projection};
use crate::card::Card;
use crate::config::AppConfig;
use crate::driver::AnimationDriver;
use crate::input::{InputAdapter, InputOutcome, NavKey, RawInput};
use crate::layout::LayoutPlanner;
use crate::machine::{Cursor, Entrance, ExploreState, ModeMachine, Phase, PhaseKind, Signal};
use crate::page::{PageScroll, Viewport};
use crate::works::{home_transform, pad_with_placeholders, PortfolioWork};

/// Where a session begins
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPage {
    /// Landing page with floating cards
    #[default]
    Home,
    /// Straight into the carousel with the entrance animation
    Explore,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame_index: u64,
    pub phase: PhaseKind,
    pub signals: Vec<Signal>,
}

/// Totals reported when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub frames: u64,
}

pub struct ChoreographySession {
    id: Uuid,
    planner: LayoutPlanner,
    driver: AnimationDriver,
    input: InputAdapter,
    machine: ModeMachine,
    cards: Vec<Card>,
    camera: CameraPose,
    projection: Projection,
    viewport: Viewport,
    page: PageScroll,
    page_screens: f64,
    backdrop: Backdrop,
    pointer_ndc: (f64, f64),
    hovered: Option<usize>,
    cursor: Cursor,
    frame_index: u64,
    last_tick_ms: f64,
    pending: Vec<Signal>,
}

impl ChoreographySession {
    pub fn create(config: &AppConfig, works: Vec<PortfolioWork>, start: StartPage, now_ms: f64) -> Self {
        let scene = &config.scene;
        let works = pad_with_placeholders(works, config.works.min_count, &config.works.placeholder_palette);
        let count = works.len();

        let mut rng = StdRng::seed_from_u64(config.general.seed);
        let mut cards: Vec<Card> = works
            .into_iter()
            .enumerate()
            .map(|(i, work)| {
                let original = home_transform(i, count, &mut rng);
                Card::new(i, work, original)
            })
            .collect();
        let backdrop = Backdrop::generate(&scene.backdrop, &mut rng);

        let viewport = Viewport::default();
        let projection = Projection {
            fov_y_deg: scene.camera.fov_y_deg,
            ..Projection::default()
        }
        .with_aspect(viewport.aspect());
        let page = PageScroll::new(viewport.height, config.ui.page_screens);

        let planner = LayoutPlanner::new(scene.layout.clone());
        let driver = AnimationDriver::new(scene);
        let mut machine = ModeMachine::new(scene.timing.clone());

        let (camera, pending) = match start {
            StartPage::Home => (driver.home_camera_at_rest(0.0, 0.0), Vec::new()),
            StartPage::Explore => {
                let signals = machine.begin_intro(&mut cards, &planner, &driver, now_ms);
                (driver.explore_camera(), signals)
            }
        };

        let id = Uuid::new_v4();
        info!("Session {} created: {} cards, start {:?}", id, cards.len(), start);

        Self {
            id,
            planner,
            driver,
            input: InputAdapter::new(config.input.wheel_noise_floor),
            machine,
            cards,
            camera,
            projection,
            viewport,
            page,
            page_screens: config.ui.page_screens,
            backdrop,
            pointer_ndc: (0.0, 0.0),
            hovered: None,
            cursor: Cursor::Default,
            frame_index: 0,
            last_tick_ms: now_ms,
            pending,
        }
    }

    /// Advance one frame. Exactly one driver update runs, chosen by phase.
    pub fn tick(&mut self, now_ms: f64) -> FrameReport {
        let mut signals = std::mem::take(&mut self.pending);
        let scroll = self.page.progress();
        let pointer_x = self.pointer_ndc.0;

        match self.machine.phase() {
            Phase::Home => {
                self.driver
                    .update_home(&mut self.cards, &mut self.camera, scroll, pointer_x, now_ms * 0.001);
            }
            Phase::EnteringExplore(Entrance::Intro(intro)) => {
                if self.driver.play_intro(&mut self.cards, &intro, now_ms) {
                    self.driver.snap_to_line(&mut self.cards, &mut self.camera);
                    signals.extend(self.machine.finish_intro());
                }
            }
            Phase::EnteringExplore(Entrance::Transition(transition)) => {
                let to_camera = self.driver.explore_camera();
                let p = self
                    .driver
                    .update_transition(&mut self.cards, &mut self.camera, &transition, &to_camera, now_ms);
                if p >= 1.0 {
                    self.driver.snap_to_line(&mut self.cards, &mut self.camera);
                    signals.extend(self.machine.finish_transition(now_ms));
                }
            }
            Phase::Explore => {
                self.driver.maintain_explore(&mut self.cards, &mut self.camera);
            }
            Phase::ExitingToHome(transition) => {
                let to_camera = self.driver.home_camera_at_rest(scroll, pointer_x);
                let p = self
                    .driver
                    .update_transition(&mut self.cards, &mut self.camera, &transition, &to_camera, now_ms);
                if p >= 1.0 {
                    self.driver.snap_to_home(
                        &mut self.cards,
                        &mut self.camera,
                        &to_camera,
                        transition.end_ms() * 0.001,
                    );
                    signals.extend(self.machine.finish_transition(now_ms));
                }
            }
        }

        let deferred = self.machine.poll_deferred(now_ms);
        let navigated = deferred.contains(&Signal::NavigateToExplore);
        signals.extend(deferred);
        if navigated {
            // The explore page opens with its own entrance, which lifts the cover
            signals.extend(self.begin_intro(now_ms));
        }
        self.backdrop.step(scroll);

        self.frame_index += 1;
        self.last_tick_ms = now_ms;
        FrameReport {
            frame_index: self.frame_index,
            phase: self.machine.phase().kind(),
            signals,
        }
    }

    /// End the session. All state is dropped.
    pub fn dispose(self) -> SessionSummary {
        info!("Session {} disposed after {} frames", self.id, self.frame_index);
        SessionSummary {
            id: self.id,
            frames: self.frame_index,
        }
    }

    /// Replay the carousel entrance from the first card.
    pub fn begin_intro(&mut self, now_ms: f64) -> Vec<Signal> {
        self.camera = self.driver.explore_camera();
        self.machine
            .begin_intro(&mut self.cards, &self.planner, &self.driver, now_ms)
    }

    pub fn request_explore(&mut self, now_ms: f64) -> Vec<Signal> {
        self.machine
            .request_explore(&mut self.cards, &self.planner, &self.camera, now_ms)
    }

    pub fn request_home(&mut self, now_ms: f64) -> Vec<Signal> {
        self.machine.request_home(&mut self.cards, &self.camera, now_ms)
    }

    /// Step the carousel directly (host buttons or bound keys).
    pub fn navigate(&mut self, direction: i8, now_ms: f64) -> Vec<Signal> {
        self.machine
            .navigate(direction, &mut self.cards, &self.planner, now_ms)
    }

    /// Dispatch a host-neutral input event.
    pub fn handle(&mut self, input: RawInput, now_ms: f64) -> InputOutcome {
        match input {
            RawInput::PointerMove { x, y } => InputOutcome {
                suppress_default: false,
                signals: self.pointer_move(x, y),
            },
            RawInput::PointerClick { x, y } => InputOutcome {
                suppress_default: false,
                signals: self.click(x, y),
            },
            RawInput::Wheel { delta_x, delta_y } => self.wheel(delta_x, delta_y, now_ms),
            RawInput::Key { key } => self.key(key, now_ms),
        }
    }

    /// Pointer moved to viewport pixel `(x, y)`.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<Signal> {
        self.pointer_ndc = self.viewport.to_ndc(x, y);
        let hit = self
            .input
            .pick(&self.cards, &self.camera, &self.projection, &self.viewport, x, y);
        self.hovered = InputAdapter::update_hover(&mut self.cards, hit.as_ref());

        let cursor = if self.hovered.is_some() { Cursor::Pointer } else { Cursor::Default };
        if cursor != self.cursor {
            self.cursor = cursor;
            return vec![Signal::CursorChanged { cursor }];
        }
        Vec::new()
    }

    pub fn click(&mut self, x: f64, y: f64) -> Vec<Signal> {
        let hit = self
            .input
            .pick(&self.cards, &self.camera, &self.projection, &self.viewport, x, y);
        hit.and_then(|h| self.open_signal(h.index)).into_iter().collect()
    }

    /// Open the focused carousel card, if it has somewhere to go.
    pub fn activate_active(&mut self) -> Vec<Signal> {
        if self.machine.phase() != Phase::Explore {
            return Vec::new();
        }
        self.open_signal(self.machine.active_index()).into_iter().collect()
    }

    fn open_signal(&self, index: usize) -> Option<Signal> {
        let card = self.cards.get(index)?;
        match card.work.action() {
            Some(action) => Some(Signal::OpenWork { index, action }),
            None => {
                debug!("Card {} has no action", index);
                None
            }
        }
    }

    pub fn wheel(&mut self, delta_x: f64, delta_y: f64, now_ms: f64) -> InputOutcome {
        let phase = self.machine.phase();
        if !phase.carousel_enabled() {
            return InputOutcome::default();
        }
        let signals = match (phase, self.input.wheel_direction(delta_x, delta_y)) {
            (Phase::Explore, Some(direction)) => self.navigate(direction, now_ms),
            _ => Vec::new(),
        };
        InputOutcome {
            suppress_default: true,
            signals,
        }
    }

    pub fn key(&mut self, key: NavKey, now_ms: f64) -> InputOutcome {
        let phase = self.machine.phase();
        let Some(direction) = InputAdapter::key_direction(key) else {
            return InputOutcome::default();
        };
        if !phase.carousel_enabled() {
            return InputOutcome::default();
        }
        let signals = if phase == Phase::Explore {
            self.navigate(direction, now_ms)
        } else {
            Vec::new()
        };
        InputOutcome {
            suppress_default: true,
            signals,
        }
    }

    /// Page scroll from the host, in viewport units.
    pub fn set_scroll(&mut self, scroll_y: f64) {
        self.page.set(scroll_y);
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.page.scroll_by(delta);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.projection = self.projection.with_aspect(viewport.aspect());
        self.page.resize(viewport.height, self.page_screens);
        debug!("Viewport {}x{}", viewport.width, viewport.height);
    }

    pub fn snapshot(&self) -> SceneFrame<'_> {
        SceneFrame {
            frame_index: self.frame_index,
            time_ms: self.last_tick_ms,
            phase: self.machine.phase().kind(),
            camera: self.camera,
            projection: self.projection,
            viewport: self.viewport,
            cards: &self.cards,
            backdrop: &self.backdrop,
            active_index: self.machine.active_index(),
            hovered: self.hovered,
            cursor: self.cursor,
            cover_visible: self.machine.state().cover_visible,
            scroll_progress: self.page.progress(),
            section: self.page.section(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn state(&self) -> &ExploreState {
        self.machine.state()
    }

    pub fn page(&self) -> &PageScroll {
        &self.page
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
