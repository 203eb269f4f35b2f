//! Camera pose, perspective projection, and picking rays.

use serde::{Deserialize, Serialize};

use crate::math::{Euler, Vec3};

/// World up used when orienting a look-at camera.
const WORLD_UP: Vec3 = Vec3::Y;

/// Camera position plus orientation.
///
/// When `look_at` is set it wins over `rotation`; the Euler rotation is only
/// used by the free (scroll-driven) home camera.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Euler,
    #[serde(default)]
    pub look_at: Option<Vec3>,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            rotation: Euler::IDENTITY,
            look_at: None,
        }
    }
}

/// Orthonormal camera frame. `forward` points into the scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraBasis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl CameraPose {
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            rotation: Euler::IDENTITY,
            look_at: Some(target),
        }
    }

    pub fn basis(&self) -> CameraBasis {
        if let Some(target) = self.look_at {
            if let Some(forward) = (target - self.position).normalize() {
                let right = forward.cross(WORLD_UP).normalize().unwrap_or(Vec3::X);
                let up = right.cross(forward);
                return CameraBasis { right, up, forward };
            }
        }

        let m = self.rotation.matrix();
        CameraBasis {
            right: m.mul_vec(Vec3::X),
            up: m.mul_vec(Vec3::Y),
            forward: m.mul_vec(-Vec3::Z),
        }
    }

    /// Point `distance` units ahead of the camera.
    pub fn look_target(&self, distance: f64) -> Vec3 {
        self.position + self.basis().forward * distance
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// A world point mapped to normalized device coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projected {
    pub ndc_x: f64,
    pub ndc_y: f64,
    /// Distance along the view direction.
    pub depth: f64,
}

impl Projection {
    pub fn with_aspect(self, aspect: f64) -> Self {
        Self {
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { self.aspect },
            ..self
        }
    }

    fn half_extents(&self) -> (f64, f64) {
        let half_h = (self.fov_y_deg.to_radians() * 0.5).tan();
        (half_h * self.aspect, half_h)
    }

    /// Ray from the camera through the given NDC position (`[-1, 1]` on both axes, y up).
    pub fn ray(&self, camera: &CameraPose, ndc_x: f64, ndc_y: f64) -> Ray {
        let basis = camera.basis();
        let (half_w, half_h) = self.half_extents();
        let dir = basis.forward + basis.right * (ndc_x * half_w) + basis.up * (ndc_y * half_h);
        Ray {
            origin: camera.position,
            dir: dir.normalize().unwrap_or(basis.forward),
        }
    }

    /// Project a world point; `None` when it sits outside the near/far range.
    pub fn project(&self, camera: &CameraPose, point: Vec3) -> Option<Projected> {
        let basis = camera.basis();
        let rel = point - camera.position;
        let depth = rel.dot(basis.forward);
        if depth < self.near || depth > self.far {
            return None;
        }
        let (half_w, half_h) = self.half_extents();
        Some(Projected {
            ndc_x: rel.dot(basis.right) / (depth * half_w),
            ndc_y: rel.dot(basis.up) / (depth * half_h),
            depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let basis = CameraPose::default().basis();
        assert!((basis.forward - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
        assert!((basis.up - Vec3::Y).length() < 1e-12);
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let cam = CameraPose::looking_at(Vec3::new(0.0, 0.4, 2.4), Vec3::new(0.0, 0.0, -2.0));
        let target = cam.look_target(1.0);
        let expected = (Vec3::new(0.0, -0.4, -4.4)).normalize().unwrap() + cam.position;
        assert!((target - expected).length() < 1e-12);
    }

    #[test]
    fn centre_ray_projects_back_to_centre() {
        let cam = CameraPose::default();
        let proj = Projection::default();
        let ray = proj.ray(&cam, 0.0, 0.0);
        let p = proj.project(&cam, ray.origin + ray.dir * 4.0).unwrap();
        assert!(p.ndc_x.abs() < 1e-12 && p.ndc_y.abs() < 1e-12);
        assert!((p.depth - 4.0).abs() < 1e-12);
    }

    #[test]
    fn ray_and_projection_agree_off_axis() {
        let cam = CameraPose::looking_at(Vec3::new(0.5, 1.0, 3.0), Vec3::new(0.0, 0.0, -2.0));
        let proj = Projection::default().with_aspect(2.0);
        let ray = proj.ray(&cam, 0.4, -0.3);
        let p = proj.project(&cam, ray.origin + ray.dir * 6.0).unwrap();
        assert!((p.ndc_x - 0.4).abs() < 1e-9);
        assert!((p.ndc_y + 0.3).abs() < 1e-9);
    }

    #[test]
    fn points_behind_camera_are_not_projected() {
        let cam = CameraPose::default();
        assert!(Projection::default().project(&cam, Vec3::new(0.0, 0.0, 6.0)).is_none());
    }
}
