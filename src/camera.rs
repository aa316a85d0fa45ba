//! Module containing the first-person camera

use cgmath::prelude::*;
use cgmath::{Deg, Point3, Vector3};

use crate::config::Config;
use crate::consts;
use crate::float::*;

/// Direction of a camera translation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Uniform values consumed by the compute shader
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraUniforms {
    pub eye: [f32; 3],
    pub dir: [f32; 3],
    pub up: [f32; 3],
}

/// Representation of a camera
#[derive(Clone, Debug)]
pub struct Camera {
    /// Position of the camera in world coordinates
    pub eye: Point3<Float>,
    /// Unit length view direction
    dir: Vector3<Float>,
    /// World up, fixed to the z-axis
    up: Vector3<Float>,
    /// Polar angle of the view direction measured from up
    phi: Deg<Float>,
    /// Azimuth of the view direction in the xy-plane
    psi: Deg<Float>,
    /// Movement speed in units per second
    speed: Float,
    /// Degrees of rotation per pixel of mouse movement
    sensitivity: Float,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera {
            eye: Point3::origin(),
            dir: Vector3::unit_x(),
            up: Vector3::unit_z(),
            phi: Deg(90.0),
            psi: Deg(0.0),
            speed: 1.0,
            sensitivity: 0.1,
        }
    }
}

impl Camera {
    pub fn new(config: &Config) -> Camera {
        Camera {
            speed: config.speed,
            sensitivity: config.sensitivity,
            ..Default::default()
        }
    }

    pub fn dir(&self) -> Vector3<Float> {
        self.dir
    }

    pub fn angles(&self) -> (Deg<Float>, Deg<Float>) {
        (self.phi, self.psi)
    }

    pub fn speed(&self) -> Float {
        self.speed
    }

    /// Double the movement speed
    pub fn faster(&mut self) {
        self.speed *= 2.0;
    }

    /// Halve the movement speed
    pub fn slower(&mut self) {
        self.speed /= 2.0;
    }

    /// Rotate the view by mouse movement given in pixels
    pub fn look(&mut self, dx: Float, dy: Float) {
        let phi = self.phi.0 + self.sensitivity * dy;
        self.phi = Deg(phi.max(consts::MIN_PHI).min(consts::MAX_PHI));
        self.psi = Deg(self.psi.0 - self.sensitivity * dx);

        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_psi, cos_psi) = self.psi.sin_cos();
        self.dir = Vector3::new(sin_phi * cos_psi, sin_phi * sin_psi, cos_phi).normalize();
    }

    /// View direction flattened to the xy-plane
    pub fn front(&self) -> Vector3<Float> {
        horizontal(self.dir)
    }

    pub fn left(&self) -> Vector3<Float> {
        horizontal(self.up.cross(self.dir))
    }

    pub fn right(&self) -> Vector3<Float> {
        horizontal(self.dir.cross(self.up))
    }

    /// Move the camera for dt seconds into the given direction
    pub fn advance(&mut self, movement: Movement, dt: Float) {
        let d_pos = dt * self.speed;
        let offset = match movement {
            Movement::Forward => self.front(),
            Movement::Backward => -self.front(),
            Movement::Left => self.left(),
            Movement::Right => self.right(),
            Movement::Up => Vector3::unit_z(),
            Movement::Down => -Vector3::unit_z(),
        };
        self.eye += d_pos * offset;
    }

    pub fn uniforms(&self) -> CameraUniforms {
        CameraUniforms {
            eye: self.eye.into_array(),
            dir: self.dir.into_array(),
            up: self.up.into_array(),
        }
    }
}

/// Project the vector to the xy-plane and normalize it
fn horizontal(v: Vector3<Float>) -> Vector3<Float> {
    let flat = Vector3::new(v.x, v.y, 0.0);
    if flat.magnitude2() < consts::EPSILON {
        return Vector3::zero();
    }
    flat.normalize()
}
