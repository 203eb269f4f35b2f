//! Presentation mode state machine.
//!
//! Owns the explore state: mode, active index, transition lifecycle and the
//! navigation gate (cooldown plus transition lock). Every intent arriving
//! while a scripted animation is in flight is dropped, never queued.

use serde::Serialize;
use tracing::{debug, info};

use crate::camera::CameraPose;
use crate::card::Card;
use crate::config::TimingConfig;
use crate::driver::{AnimationDriver, Intro, Transition};
use crate::layout::LayoutPlanner;
use crate::works::WorkAction;

/// How the carousel is being entered.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Entrance {
    Intro(Intro),
    Transition(Transition),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Phase {
    Home,
    EnteringExplore(Entrance),
    Explore,
    ExitingToHome(Transition),
}

/// Fieldless phase tag for hosts and serialized frames.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Home,
    EnteringExplore,
    Explore,
    ExitingToHome,
}

impl PhaseKind {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseKind::Home => "HOME",
            PhaseKind::EnteringExplore => "ENTERING",
            PhaseKind::Explore => "EXPLORE",
            PhaseKind::ExitingToHome => "LEAVING",
        }
    }
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Home => PhaseKind::Home,
            Phase::EnteringExplore(_) => PhaseKind::EnteringExplore,
            Phase::Explore => PhaseKind::Explore,
            Phase::ExitingToHome(_) => PhaseKind::ExitingToHome,
        }
    }

    /// True while an intro or a mode transition is in flight.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Phase::EnteringExplore(_) | Phase::ExitingToHome(_))
    }

    /// Carousel mode is active or being entered.
    pub fn carousel_enabled(&self) -> bool {
        matches!(self, Phase::EnteringExplore(_) | Phase::Explore)
    }
}

/// Pointer affordance
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// Events the host reacts to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    EnteredExplore,
    ReturnedHome,
    IntroFinished,
    CoverShown,
    CoverHidden,
    /// Page-per-mode hosts should switch to the explore page now
    NavigateToExplore,
    ActiveChanged { index: usize, direction: i8 },
    OpenWork { index: usize, action: WorkAction },
    CursorChanged { cursor: Cursor },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExploreState {
    pub phase: Phase,
    pub active_index: usize,
    pub last_direction: i8,
    pub last_navigation_at: Option<f64>,
    pub cover_visible: bool,
    navigation_deadline: Option<f64>,
    navigation_queued: bool,
}

impl Default for ExploreState {
    fn default() -> Self {
        Self {
            phase: Phase::Home,
            active_index: 0,
            last_direction: 0,
            last_navigation_at: None,
            cover_visible: false,
            navigation_deadline: None,
            navigation_queued: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModeMachine {
    state: ExploreState,
    timing: TimingConfig,
}

impl ModeMachine {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            state: ExploreState::default(),
            timing,
        }
    }

    pub fn state(&self) -> &ExploreState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn active_index(&self) -> usize {
        self.state.active_index
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.phase.is_transitioning()
    }

    fn set_cover(&mut self, visible: bool, signals: &mut Vec<Signal>) {
        if self.state.cover_visible != visible {
            self.state.cover_visible = visible;
            signals.push(if visible { Signal::CoverShown } else { Signal::CoverHidden });
        }
    }

    /// Start directly in the carousel with the staggered entrance.
    pub fn begin_intro(
        &mut self,
        cards: &mut [Card],
        planner: &LayoutPlanner,
        driver: &AnimationDriver,
        now_ms: f64,
    ) -> Vec<Signal> {
        let mut signals = Vec::new();
        self.state.active_index = 0;
        self.state.last_direction = 0;

        if cards.is_empty() {
            debug!("No cards; entering explore without an intro");
            self.state.phase = Phase::Explore;
            self.set_cover(false, &mut signals);
            signals.push(Signal::EnteredExplore);
            return signals;
        }

        planner.plan(cards, 0, 0);
        driver.prepare_intro(cards, self.timing.intro_delay_step_ms);
        self.set_cover(true, &mut signals);
        self.state.phase = Phase::EnteringExplore(Entrance::Intro(Intro {
            start_ms: now_ms,
            duration_ms: self.timing.intro_ms,
            delay_step_ms: self.timing.intro_delay_step_ms,
        }));
        info!("Explore intro started for {} cards", cards.len());
        signals
    }

    /// Home -> EnteringExplore. Dropped unless at home with cards to show.
    pub fn request_explore(
        &mut self,
        cards: &mut [Card],
        planner: &LayoutPlanner,
        camera: &CameraPose,
        now_ms: f64,
    ) -> Vec<Signal> {
        let mut signals = Vec::new();
        if self.state.phase != Phase::Home {
            debug!("Explore request dropped in {:?}", self.state.phase.kind());
            return signals;
        }
        if cards.is_empty() {
            debug!("Explore request dropped: no cards");
            return signals;
        }

        // Snapshot before any target moves.
        AnimationDriver::capture_snapshots(cards);

        self.state.active_index = 0;
        self.state.last_direction = 0;
        self.state.navigation_queued = false;
        self.state.navigation_deadline = None;
        planner.plan(cards, 0, 0);

        self.state.phase = Phase::EnteringExplore(Entrance::Transition(Transition {
            start_ms: now_ms,
            duration_ms: self.timing.transition_ms,
            from_camera: *camera,
            to_home: false,
        }));
        self.set_cover(false, &mut signals);
        info!("Entering explore");
        signals
    }

    /// Explore -> ExitingToHome.
    pub fn request_home(&mut self, cards: &mut [Card], camera: &CameraPose, now_ms: f64) -> Vec<Signal> {
        let mut signals = Vec::new();
        if self.state.phase != Phase::Explore {
            debug!("Home request dropped in {:?}", self.state.phase.kind());
            return signals;
        }

        AnimationDriver::capture_snapshots(cards);
        self.state.navigation_deadline = None;
        self.state.phase = Phase::ExitingToHome(Transition {
            start_ms: now_ms,
            duration_ms: self.timing.transition_ms,
            from_camera: *camera,
            to_home: true,
        });
        self.set_cover(false, &mut signals);
        info!("Returning home");
        signals
    }

    /// Single debounced entry point for carousel navigation.
    pub fn navigate(&mut self, direction: i8, cards: &mut [Card], planner: &LayoutPlanner, now_ms: f64) -> Vec<Signal> {
        let mut signals = Vec::new();
        if self.state.phase != Phase::Explore {
            debug!("Navigation dropped in {:?}", self.state.phase.kind());
            return signals;
        }
        let direction = direction.signum();
        if direction == 0 {
            return signals;
        }
        if let Some(last) = self.state.last_navigation_at {
            if now_ms - last < self.timing.navigation_cooldown_ms {
                debug!("Navigation dropped: cooldown ({:.0}ms since last)", now_ms - last);
                return signals;
            }
        }
        let count = cards.len();
        if count == 0 {
            return signals;
        }

        self.state.last_navigation_at = Some(now_ms);
        let count_i = count as i64;
        let next = (self.state.active_index as i64 + direction as i64 + count_i).rem_euclid(count_i);
        self.state.active_index = next as usize;
        self.state.last_direction = direction;
        planner.plan(cards, self.state.active_index, direction);

        debug!("Active card -> {} (direction {})", self.state.active_index, direction);
        signals.push(Signal::ActiveChanged {
            index: self.state.active_index,
            direction,
        });
        signals
    }

    /// The entrance has landed: EnteringExplore(Intro) -> Explore.
    pub fn finish_intro(&mut self) -> Vec<Signal> {
        let mut signals = Vec::new();
        if !matches!(self.state.phase, Phase::EnteringExplore(Entrance::Intro(_))) {
            return signals;
        }
        self.state.phase = Phase::Explore;
        self.set_cover(false, &mut signals);
        signals.push(Signal::IntroFinished);
        signals.push(Signal::EnteredExplore);
        info!("Explore intro finished");
        signals
    }

    /// A mode transition reached progress 1.
    pub fn finish_transition(&mut self, now_ms: f64) -> Vec<Signal> {
        let mut signals = Vec::new();
        match self.state.phase {
            Phase::EnteringExplore(Entrance::Transition(_)) => {
                self.state.phase = Phase::Explore;
                signals.push(Signal::EnteredExplore);
                info!("Explore mode active");

                if self.timing.navigate_after_transition && !self.state.navigation_queued {
                    self.state.navigation_queued = true;
                    self.set_cover(true, &mut signals);
                    self.state.navigation_deadline = Some(now_ms + self.timing.navigation_delay_ms);
                }
            }
            Phase::ExitingToHome(_) => {
                self.state.phase = Phase::Home;
                signals.push(Signal::ReturnedHome);
                info!("Home mode active");
            }
            Phase::Home | Phase::Explore | Phase::EnteringExplore(Entrance::Intro(_)) => {}
        }
        signals
    }

    /// Fire deferred host actions whose deadline has passed.
    pub fn poll_deferred(&mut self, now_ms: f64) -> Vec<Signal> {
        match self.state.navigation_deadline {
            Some(deadline) if now_ms >= deadline => {
                self.state.navigation_deadline = None;
                info!("Navigating to explore page");
                vec![Signal::NavigateToExplore]
            }
            _ => Vec::new(),
        }
    }
}
