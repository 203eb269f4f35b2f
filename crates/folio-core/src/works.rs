//! Portfolio work records and placeholder padding.

use std::f64::consts::TAU;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::card::Transform;
use crate::config::AppConfig;
use crate::math::Vec3;
use crate::{Error, Result};

/// Optional extended fields shown in the detail view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkDetail {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl WorkDetail {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.year.is_none() && self.tags.is_empty() && self.summary.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWork {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Image reference; absent for placeholders
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub placeholder: bool,
    /// Flat fill colour (hex) used when there is no image
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub detail: Option<WorkDetail>,
}

/// What activating a card does
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum WorkAction {
    Link(String),
    Detail,
}

impl PortfolioWork {
    pub fn new(title: &str, description: &str, image: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            image: Some(image.to_string()),
            link: None,
            placeholder: false,
            color: None,
            detail: None,
        }
    }

    /// Synthesized "coming soon" entry; `number` is its 1-based card position.
    pub fn placeholder(number: usize, color: &str) -> Self {
        Self {
            title: format!("Upcoming {}", number),
            description: "New project launching soon".to_string(),
            image: None,
            link: None,
            placeholder: true,
            color: Some(color.to_string()),
            detail: None,
        }
    }

    /// Action for a click; `None` disables the interaction.
    pub fn action(&self) -> Option<WorkAction> {
        if self.placeholder {
            return None;
        }
        if let Some(link) = &self.link {
            return Some(WorkAction::Link(link.clone()));
        }
        match &self.detail {
            Some(detail) if !detail.is_empty() => Some(WorkAction::Detail),
            _ => None,
        }
    }
}

pub fn builtin_works() -> Vec<PortfolioWork> {
    vec![
        PortfolioWork::new(
            "Project Alpha",
            "Interactive 3D Experience",
            "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?w=800&h=600&fit=crop",
        ),
        PortfolioWork::new(
            "Project Beta",
            "WebGL Animation Showcase",
            "https://images.unsplash.com/photo-1633356122544-f134324a6cee?w=800&h=600&fit=crop",
        ),
        PortfolioWork::new(
            "Project Gamma",
            "Immersive Storytelling",
            "https://images.unsplash.com/photo-1618556450994-a6a128ef0d9d?w=800&h=600&fit=crop",
        ),
        PortfolioWork::new(
            "Project Delta",
            "Digital Art Installation",
            "https://images.unsplash.com/photo-1634017839464-5c339ebe3cb4?w=800&h=600&fit=crop",
        ),
    ]
}

/// Append placeholders until `min_count` works exist, cycling the palette.
pub fn pad_with_placeholders(mut works: Vec<PortfolioWork>, min_count: usize, palette: &[String]) -> Vec<PortfolioWork> {
    let mut ordinal = 0;
    while works.len() < min_count {
        let color = if palette.is_empty() {
            "#1a1a1a"
        } else {
            palette[ordinal % palette.len()].as_str()
        };
        works.push(PortfolioWork::placeholder(works.len() + 1, color));
        ordinal += 1;
    }
    works
}

#[derive(Deserialize)]
struct WorksFile {
    #[serde(default)]
    works: Vec<PortfolioWork>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonWorks {
    List(Vec<PortfolioWork>),
    Table(WorksFile),
}

/// Parse a works file: JSON by extension, TOML (`[[works]]`) otherwise.
pub fn load_works(path: &Path) -> Result<Vec<PortfolioWork>> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let works = if is_json {
        match serde_json::from_str::<JsonWorks>(&content)? {
            JsonWorks::List(works) => works,
            JsonWorks::Table(file) => file.works,
        }
    } else {
        toml::from_str::<WorksFile>(&content)
            .map_err(|e| Error::Works(format!("{}: {}", path.display(), e)))?
            .works
    };

    debug!("Loaded {} works from {}", works.len(), path.display());
    Ok(sanitize(works))
}

/// Works for a session: the configured file, or the built-in set.
pub fn works_for(config: &AppConfig) -> Result<Vec<PortfolioWork>> {
    match config.works_path() {
        Some(path) => load_works(&path),
        None => Ok(builtin_works()),
    }
}

/// Drop links that do not parse so the card just stops being clickable.
pub fn sanitize(works: Vec<PortfolioWork>) -> Vec<PortfolioWork> {
    works
        .into_iter()
        .map(|mut work| {
            if let Some(link) = &work.link {
                if let Err(e) = Url::parse(link) {
                    warn!("Ignoring invalid link '{}' for '{}': {}", link, work.title, e);
                    work.link = None;
                }
            }
            if work.detail.as_ref().is_some_and(WorkDetail::is_empty) {
                work.detail = None;
            }
            work
        })
        .collect()
}

/// Home placement of card `index`: an ellipse in front of the camera with a
/// random height.
pub fn home_transform<R: Rng + ?Sized>(index: usize, count: usize, rng: &mut R) -> Transform {
    let angle = if count == 0 {
        0.0
    } else {
        index as f64 / count as f64 * TAU
    };
    let y = (rng.gen::<f64>() - 2.5) * 2.0;
    Transform {
        position: Vec3::new(angle.cos() * 6.0, y, angle.sin() * 3.0 - 4.0),
        ..Transform::default()
    }
}
