// camera.rs - Perspective camera and the screen it looks through
//
// The camera sits on +z looking at the origin. The viewport is the size of
// the z = 0 plane that exactly fills the screen, in world units.

use glam::{Mat4, Vec3};

use crate::track::{is_mobile, Size};

/// Container size plus the window width device-class checks use
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub size: Size,
    pub window_width: f32,
}

impl Screen {
    pub fn new(width: f32, height: f32) -> Self {
        Self { size: Size::new(width, height), window_width: width }
    }

    pub fn with_window_width(mut self, window_width: f32) -> Self {
        self.window_width = window_width;
        self
    }

    /// Decode, geometry and pixel-ratio budgets use the window, not the container.
    pub fn is_mobile(&self) -> bool {
        is_mobile(self.window_width)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub fov_deg: f32,
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self { fov_deg: 45.0, distance: 20.0, near: 0.1, far: 100.0, aspect: 1.0 }
    }
}

impl Camera {
    pub fn set_screen(&mut self, screen: Size) {
        self.aspect = screen.aspect();
    }

    pub fn viewport(&self) -> Size {
        let height = 2.0 * (self.fov_deg.to_radians() / 2.0).tan() * self.distance;
        Size::new(height * self.aspect, height)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
    }
}
