use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::camera::CameraPose;
use crate::math::Vec3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub works: WorksConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Seed for card placement and the backdrop
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            seed: default_seed(),
        }
    }
}

/// Easing curve selectable for scripted animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    InOutCubic,
    OutQuint,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub backdrop: BackdropConfig,
}

/// Carousel line arrangement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal distance between neighbouring cards
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Z plane of the carousel line
    #[serde(default = "default_depth")]
    pub depth: f64,
    #[serde(default = "default_active_scale")]
    pub active_scale: f64,
    #[serde(default = "default_idle_scale")]
    pub idle_scale: f64,
    #[serde(default = "default_active_opacity")]
    pub active_opacity: f64,
    #[serde(default = "default_idle_opacity")]
    pub idle_opacity: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: default_spacing(),
            depth: default_depth(),
            active_scale: default_active_scale(),
            idle_scale: default_idle_scale(),
            active_opacity: default_active_opacity(),
            idle_opacity: default_idle_opacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Fixed carousel camera
    #[serde(default = "default_explore_camera")]
    pub explore: CameraPose,
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_y_deg: f64,
    /// Home camera z at the top of the page
    #[serde(default = "default_home_distance")]
    pub home_distance: f64,
    /// Z distance travelled over the whole page scroll
    #[serde(default = "default_home_travel")]
    pub home_travel: f64,
    /// Height gained over the whole page scroll
    #[serde(default = "default_home_rise")]
    pub home_rise: f64,
    /// Downward tilt (radians) at the bottom of the page
    #[serde(default = "default_home_tilt")]
    pub home_tilt: f64,
    /// How far the pointer pulls the home camera sideways
    #[serde(default = "default_pointer_pull")]
    pub pointer_pull: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            explore: default_explore_camera(),
            fov_y_deg: default_fov(),
            home_distance: default_home_distance(),
            home_travel: default_home_travel(),
            home_rise: default_home_rise(),
            home_tilt: default_home_tilt(),
            pointer_pull: default_pointer_pull(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Home <-> explore transition duration in milliseconds
    #[serde(default = "default_transition_ms")]
    pub transition_ms: f64,
    #[serde(default)]
    pub transition_easing: Easing,
    /// Per-card entrance duration in milliseconds
    #[serde(default = "default_intro_ms")]
    pub intro_ms: f64,
    /// Entrance stagger between consecutive cards
    #[serde(default = "default_intro_delay_step_ms")]
    pub intro_delay_step_ms: f64,
    #[serde(default = "default_intro_easing")]
    pub intro_easing: Easing,
    /// Minimum time between accepted carousel navigations
    #[serde(default = "default_navigation_cooldown_ms")]
    pub navigation_cooldown_ms: f64,
    /// Emit a page navigation once the home -> explore transition lands
    #[serde(default)]
    pub navigate_after_transition: bool,
    /// Delay between the cover closing and the page navigation
    #[serde(default = "default_navigation_delay_ms")]
    pub navigation_delay_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
            transition_easing: Easing::InOutCubic,
            intro_ms: default_intro_ms(),
            intro_delay_step_ms: default_intro_delay_step_ms(),
            intro_easing: default_intro_easing(),
            navigation_cooldown_ms: default_navigation_cooldown_ms(),
            navigate_after_transition: false,
            navigation_delay_ms: default_navigation_delay_ms(),
        }
    }
}

/// Per-frame approach factors and floating motion amplitudes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub position_damping: f64,
    pub rotation_damping: f64,
    pub scale_damping: f64,
    pub opacity_damping: f64,
    pub camera_damping: f64,
    /// Home mode: camera pointer pull and hover scale
    pub home_damping: f64,
    pub home_hover_scale: f64,
    pub explore_hover_boost: f64,
    pub float_x: f64,
    pub float_y: f64,
    pub float_tilt: f64,
    pub spin_per_frame: f64,
    /// Steady-state channels snap onto their target inside this distance
    pub settle_epsilon: f64,
    /// Entrance start offset; x and y flip sign on odd cards, z pushes back
    pub intro_swing: Vec3,
    pub intro_scale: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            position_damping: 0.18,
            rotation_damping: 0.18,
            scale_damping: 0.20,
            opacity_damping: 0.22,
            camera_damping: 0.12,
            home_damping: 0.1,
            home_hover_scale: 1.15,
            explore_hover_boost: 1.05,
            float_x: 0.5,
            float_y: 0.3,
            float_tilt: 0.5,
            spin_per_frame: 0.008,
            settle_epsilon: 1e-4,
            intro_swing: Vec3::new(1.1, 1.6, 1.3),
            intro_scale: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub shape_count: usize,
    pub particle_count: usize,
    /// Edge length of the particle cube
    pub particle_extent: f64,
    pub particle_spin: f64,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            shape_count: 20,
            particle_count: 8000,
            particle_extent: 50.0,
            particle_spin: 0.0003,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Wheel deltas below this magnitude are noise
    #[serde(default = "default_wheel_noise_floor")]
    pub wheel_noise_floor: f64,
    /// Pixel delta reported for one terminal wheel notch
    #[serde(default = "default_wheel_step")]
    pub wheel_step: f64,
    /// Page rows scrolled per step outside the carousel
    #[serde(default = "default_scroll_step_rows")]
    pub scroll_step_rows: u16,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            wheel_noise_floor: default_wheel_noise_floor(),
            wheel_step: default_wheel_step(),
            scroll_step_rows: default_scroll_step_rows(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Frame pump rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Page length in screens (hero, portfolio, contact)
    #[serde(default = "default_page_screens")]
    pub page_screens: f64,
    #[serde(default = "default_true")]
    pub show_particles: bool,
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            page_screens: default_page_screens(),
            show_particles: default_true(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Theme configuration
/// Can be specified as a simple string (theme name) or as a full struct with overrides
#[derive(Debug, Clone, Serialize)]
pub struct ThemeConfig {
    pub name: String,
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

// Custom deserializer to accept either a string or a struct
impl<'de> Deserialize<'de> for ThemeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        use std::fmt;

        struct ThemeConfigVisitor;

        impl<'de> Visitor<'de> for ThemeConfigVisitor {
            type Value = ThemeConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string (theme name) or a map with 'name' and optional 'colors'")
            }

            fn visit_str<E>(self, value: &str) -> Result<ThemeConfig, E>
            where
                E: de::Error,
            {
                Ok(ThemeConfig {
                    name: value.to_string(),
                    colors: ThemeColorOverrides::default(),
                })
            }

            fn visit_map<M>(self, mut map: M) -> Result<ThemeConfig, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut name: Option<String> = None;
                let mut colors: Option<ThemeColorOverrides> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "colors" => colors = Some(map.next_value()?),
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(ThemeConfig {
                    name: name.unwrap_or_else(default_theme_name),
                    colors: colors.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_any(ThemeConfigVisitor)
    }
}

fn default_theme_name() -> String {
    "midnight".to_string()
}

/// Optional color overrides, each a hex string ("#ff006e" or "ff006e")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub muted: Option<String>,
    pub accent: Option<String>,
    /// Card outline for inactive cards
    pub card: Option<String>,
    /// Card outline for the focused or hovered card
    pub card_active: Option<String>,
    pub shape: Option<String>,
    pub particle: Option<String>,
    pub status_bg: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorksConfig {
    /// Optional TOML or JSON file replacing the built-in works
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Pad with placeholders until this many cards exist
    #[serde(default = "default_min_works")]
    pub min_count: usize,
    /// Placeholder fill colours, cycled by placeholder index
    #[serde(default = "default_placeholder_palette")]
    pub placeholder_palette: Vec<String>,
}

impl Default for WorksConfig {
    fn default() -> Self {
        Self {
            path: None,
            min_count: default_min_works(),
            placeholder_palette: default_placeholder_palette(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "<C-d>" (Ctrl+d), "<S-Tab>" (Shift+Tab), "<CR>", "<Esc>", "<Space>"
/// Arrow keys always drive the carousel and are not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Enter the explore carousel
    #[serde(default = "default_key_explore")]
    pub explore: String,
    /// Return to the home page
    #[serde(default = "default_key_home")]
    pub home: String,
    #[serde(default = "default_key_next_card")]
    pub next_card: String,
    #[serde(default = "default_key_prev_card")]
    pub prev_card: String,
    /// Open the focused work (link or detail)
    #[serde(default = "default_key_open")]
    pub open: String,
    #[serde(default = "default_key_scroll_down")]
    pub scroll_down: String,
    #[serde(default = "default_key_scroll_up")]
    pub scroll_up: String,
    #[serde(default = "default_key_page_down")]
    pub page_down: String,
    #[serde(default = "default_key_page_up")]
    pub page_up: String,
    #[serde(default = "default_key_help")]
    pub help: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            explore: default_key_explore(),
            home: default_key_home(),
            next_card: default_key_next_card(),
            prev_card: default_key_prev_card(),
            open: default_key_open(),
            scroll_down: default_key_scroll_down(),
            scroll_up: default_key_scroll_up(),
            page_down: default_key_page_down(),
            page_up: default_key_page_up(),
            help: default_key_help(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_explore() -> String { "e".to_string() }
fn default_key_home() -> String { "b".to_string() }
fn default_key_next_card() -> String { "l".to_string() }
fn default_key_prev_card() -> String { "h".to_string() }
fn default_key_open() -> String { "<CR>".to_string() }
fn default_key_scroll_down() -> String { "j".to_string() }
fn default_key_scroll_up() -> String { "k".to_string() }
fn default_key_page_down() -> String { "<C-d>".to_string() }
fn default_key_page_up() -> String { "<C-u>".to_string() }
fn default_key_help() -> String { "?".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_seed() -> u64 {
    0x00f0_11a0
}

fn default_true() -> bool {
    true
}

fn default_spacing() -> f64 {
    2.2
}

fn default_depth() -> f64 {
    -2.0
}

fn default_active_scale() -> f64 {
    1.2
}

fn default_idle_scale() -> f64 {
    0.9
}

fn default_active_opacity() -> f64 {
    1.0
}

fn default_idle_opacity() -> f64 {
    0.55
}

fn default_explore_camera() -> CameraPose {
    CameraPose::looking_at(Vec3::new(0.0, 0.4, 2.4), Vec3::new(0.0, 0.0, -2.0))
}

fn default_fov() -> f64 {
    75.0
}

fn default_home_distance() -> f64 {
    5.0
}

fn default_home_travel() -> f64 {
    10.0
}

fn default_home_rise() -> f64 {
    3.0
}

fn default_home_tilt() -> f64 {
    0.3
}

fn default_pointer_pull() -> f64 {
    0.5
}

fn default_transition_ms() -> f64 {
    1300.0
}

fn default_intro_ms() -> f64 {
    900.0
}

fn default_intro_delay_step_ms() -> f64 {
    110.0
}

fn default_intro_easing() -> Easing {
    Easing::OutQuint
}

fn default_navigation_cooldown_ms() -> f64 {
    450.0
}

fn default_navigation_delay_ms() -> f64 {
    400.0
}

fn default_wheel_noise_floor() -> f64 {
    5.0
}

fn default_wheel_step() -> f64 {
    100.0
}

fn default_scroll_step_rows() -> u16 {
    3
}

fn default_fps() -> u32 {
    60
}

fn default_page_screens() -> f64 {
    3.0
}

fn default_min_works() -> usize {
    7
}

fn default_placeholder_palette() -> Vec<String> {
    ["#1f2933", "#264653", "#233044", "#3d405b", "#2b2d42"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/folio/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("folio")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used while the terminal UI owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("folio.log")
    }

    /// Works file with tilde expansion, if configured
    pub fn works_path(&self) -> Option<PathBuf> {
        self.works.path.as_deref().map(expand_tilde)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_values() {
        let config = AppConfig::default();
        assert_eq!(config.scene.layout.spacing, 2.2);
        assert_eq!(config.scene.layout.depth, -2.0);
        assert_eq!(config.scene.timing.navigation_cooldown_ms, 450.0);
        assert_eq!(config.scene.timing.transition_easing, Easing::InOutCubic);
        assert_eq!(config.scene.timing.intro_easing, Easing::OutQuint);
        assert_eq!(config.works.min_count, 7);
        assert_eq!(config.works.placeholder_palette.len(), 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [scene.timing]
            transition_ms = 1200
            intro_easing = "linear"

            [scene.motion]
            settle_epsilon = 0.001
            "#,
        )
        .unwrap();

        assert_eq!(config.scene.timing.transition_ms, 1200.0);
        assert_eq!(config.scene.timing.intro_easing, Easing::Linear);
        assert_eq!(config.scene.timing.intro_ms, 900.0);
        assert_eq!(config.scene.motion.settle_epsilon, 0.001);
        assert_eq!(config.scene.motion.opacity_damping, 0.22);
    }

    #[test]
    fn test_theme_accepts_string_or_table() {
        let config = AppConfig::from_toml("[ui]\ntheme = \"paper\"\n").unwrap();
        assert_eq!(config.ui.theme.name, "paper");

        let config = AppConfig::from_toml(
            "[ui.theme]\nname = \"midnight\"\n[ui.theme.colors]\naccent = \"#ff006e\"\n",
        )
        .unwrap();
        assert_eq!(config.ui.theme.colors.accent.as_deref(), Some("#ff006e"));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let back = AppConfig::from_toml(&text).unwrap();
        assert_eq!(back.scene.camera.explore, config.scene.camera.explore);
        assert_eq!(back.keymap.explore, "e");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[scene.timing]\ntransition_ms = \"slow\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
