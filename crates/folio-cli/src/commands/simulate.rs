//! Headless host: scripted input, one JSON line per frame.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use folio_core::camera::CameraPose;
use folio_core::card::Pose;
use folio_core::input::{NavKey, RawInput};
use folio_core::machine::Cursor;
use folio_core::page::{Section, Viewport};
use folio_core::works::works_for;
use folio_core::{AppConfig, ChoreographySession, PhaseKind, RenderBridge, SceneFrame, Signal, StartPage};

/// Host-level commands a script can issue besides raw input
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptAction {
    Explore,
    Home,
    Next,
    Prev,
    Open,
}

/// One timed step. Exactly one of the optional fields is expected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptEvent {
    pub at_ms: f64,
    #[serde(default)]
    pub action: Option<ScriptAction>,
    #[serde(default)]
    pub input: Option<RawInput>,
    /// Page scroll delta in viewport units
    #[serde(default)]
    pub scroll: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut script: Script = toml::from_str(content)?;
        script.events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        Ok(script)
    }

    /// Enter explore, browse a little, then return home.
    pub fn demo(viewport: Viewport) -> Self {
        let at = |at_ms: f64| ScriptEvent {
            at_ms,
            action: None,
            input: None,
            scroll: None,
        };
        let wheel = |delta_y: f64| RawInput::Wheel { delta_x: 0.0, delta_y };
        Self {
            events: vec![
                ScriptEvent { scroll: Some(viewport.height * 0.5), ..at(200.0) },
                ScriptEvent { action: Some(ScriptAction::Explore), ..at(500.0) },
                ScriptEvent { input: Some(wheel(120.0)), ..at(2000.0) },
                // Inside the cooldown: dropped
                ScriptEvent { input: Some(wheel(120.0)), ..at(2100.0) },
                ScriptEvent {
                    input: Some(RawInput::Key { key: NavKey::ArrowRight }),
                    ..at(2700.0)
                },
                ScriptEvent {
                    input: Some(RawInput::PointerMove {
                        x: viewport.width * 0.5,
                        y: viewport.height * 0.5,
                    }),
                    ..at(3000.0)
                },
                ScriptEvent { action: Some(ScriptAction::Home), ..at(3500.0) },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
struct CardRecord<'a> {
    index: usize,
    title: &'a str,
    placeholder: bool,
    hovered: bool,
    #[serde(flatten)]
    pose: Pose,
}

#[derive(Debug, Serialize)]
struct FrameRecord<'a> {
    frame: u64,
    time_ms: f64,
    phase: PhaseKind,
    camera: CameraPose,
    active_index: usize,
    hovered: Option<usize>,
    cursor: Cursor,
    cover_visible: bool,
    scroll_progress: f64,
    section: Section,
    signals: &'a [Signal],
    cards: Vec<CardRecord<'a>>,
}

/// Render bridge that writes each frame as a JSON line
pub struct JsonLinesBridge<W: Write> {
    writer: W,
    signals: Vec<Signal>,
    frames: u64,
}

impl<W: Write> JsonLinesBridge<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            signals: Vec::new(),
            frames: 0,
        }
    }

    /// Signals to attach to the next presented frame
    pub fn push_signals(&mut self, signals: impl IntoIterator<Item = Signal>) {
        self.signals.extend(signals);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderBridge for JsonLinesBridge<W> {
    fn present(&mut self, scene: &SceneFrame<'_>) -> folio_core::Result<()> {
        let signals = std::mem::take(&mut self.signals);
        let record = FrameRecord {
            frame: scene.frame_index,
            time_ms: scene.time_ms,
            phase: scene.phase,
            camera: scene.camera,
            active_index: scene.active_index,
            hovered: scene.hovered,
            cursor: scene.cursor,
            cover_visible: scene.cover_visible,
            scroll_progress: scene.scroll_progress,
            section: scene.section,
            signals: &signals,
            cards: scene
                .cards
                .iter()
                .map(|card| CardRecord {
                    index: card.index,
                    title: &card.work.title,
                    placeholder: card.work.placeholder,
                    hovered: card.hovered,
                    pose: card.live,
                })
                .collect(),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.frames += 1;
        Ok(())
    }
}

/// Drive a session on a fixed clock and present every frame
pub fn simulate<W: Write>(
    config: &AppConfig,
    script: &Script,
    frames: u64,
    fps: u32,
    start: StartPage,
    bridge: &mut JsonLinesBridge<W>,
) -> Result<()> {
    let works = works_for(config).context("Failed to load portfolio works")?;
    let mut session = ChoreographySession::create(config, works, start, 0.0);
    let frame_ms = 1000.0 / fps.max(1) as f64;
    let mut pending = script.events.iter().peekable();

    for i in 0..frames {
        let now = i as f64 * frame_ms;

        while let Some(event) = pending.next_if(|e| e.at_ms <= now) {
            let signals = apply(&mut session, event, now);
            debug!("t={} {:?} -> {} signals", now, event, signals.len());
            bridge.push_signals(signals);
        }

        let report = session.tick(now);
        bridge.push_signals(report.signals);
        bridge.present(&session.snapshot())?;
    }

    let summary = session.dispose();
    info!("Simulated session {}: {} frames", summary.id, summary.frames);
    Ok(())
}

fn apply(session: &mut ChoreographySession, event: &ScriptEvent, now: f64) -> Vec<Signal> {
    let mut signals = Vec::new();
    if let Some(delta) = event.scroll {
        session.scroll_by(delta);
    }
    if let Some(action) = event.action {
        signals.extend(match action {
            ScriptAction::Explore => session.request_explore(now),
            ScriptAction::Home => session.request_home(now),
            ScriptAction::Next => session.navigate(1, now),
            ScriptAction::Prev => session.navigate(-1, now),
            ScriptAction::Open => session.activate_active(),
        });
    }
    if let Some(input) = event.input {
        signals.extend(session.handle(input, now).signals);
    }
    signals
}

pub fn run(
    config: &AppConfig,
    frames: u64,
    fps: u32,
    script: Option<&Path>,
    demo: bool,
    start: StartPage,
) -> Result<()> {
    let script = match script {
        Some(path) => Script::load(path)?,
        None if demo => Script::demo(Viewport::default()),
        // Idle scene: no input at all
        None => Script::default(),
    };

    let stdout = io::stdout();
    let mut bridge = JsonLinesBridge::new(io::BufWriter::new(stdout.lock()));
    simulate(config, &script, frames, fps, start, &mut bridge)?;
    bridge.into_inner().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_lines(script: &Script, frames: u64, start: StartPage) -> Vec<serde_json::Value> {
        let mut bridge = JsonLinesBridge::new(Vec::new());
        simulate(&AppConfig::default(), script, frames, 60, start, &mut bridge).unwrap();
        assert_eq!(bridge.frames(), frames);
        String::from_utf8(bridge.into_inner())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn signals_named(lines: &[serde_json::Value], name: &str) -> usize {
        lines
            .iter()
            .flat_map(|l| l["signals"].as_array().cloned().unwrap_or_default())
            .filter(|s| s["signal"] == name)
            .count()
    }

    #[test]
    fn test_parse_script() {
        let script = Script::from_toml(
            r#"
            [[events]]
            at_ms = 900
            action = "home"

            [[events]]
            at_ms = 100
            action = "explore"

            [[events]]
            at_ms = 2000
            input = { kind = "wheel", delta_x = 0.0, delta_y = 120.0 }

            [[events]]
            at_ms = 2500
            input = { kind = "key", key = "arrow_left" }
            "#,
        )
        .unwrap();

        assert_eq!(script.events.len(), 4);
        assert_eq!(script.events[0].action, Some(ScriptAction::Explore));
        assert_eq!(
            script.events[2].input,
            Some(RawInput::Wheel { delta_x: 0.0, delta_y: 120.0 })
        );
        assert_eq!(
            script.events[3].input,
            Some(RawInput::Key { key: NavKey::ArrowLeft })
        );
    }

    #[test]
    fn test_one_line_per_frame() {
        let lines = run_to_lines(&Script::default(), 5, StartPage::Home);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0]["phase"], "home");
        assert_eq!(lines[4]["cards"].as_array().unwrap().len(), 7);
        assert!(lines[0]["cards"][0]["opacity"].is_number());
    }

    #[test]
    fn test_demo_round_trip() {
        // 5 s at 60 fps covers the whole demo timeline
        let lines = run_to_lines(&Script::demo(Viewport::default()), 300, StartPage::Home);

        assert_eq!(signals_named(&lines, "entered_explore"), 1);
        assert_eq!(signals_named(&lines, "returned_home"), 1);
        // Wheel plus arrow key; the second wheel falls inside the cooldown
        assert_eq!(signals_named(&lines, "active_changed"), 2);
        assert_eq!(lines.last().unwrap()["phase"], "home");
    }
}
