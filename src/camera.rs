//! First-person camera and projection.
//!
//! [`Camera`] is a free-flying controller driven by mouse look and keyboard
//! movement. It produces a fresh view matrix on every call. [`Projection`]
//! owns the global projection mode (perspective or orthographic) and the
//! window dimensions used for the aspect ratio.

use cgmath::{Angle, Deg, InnerSpace, Matrix4, Ortho, PerspectiveFov, Point3, Rad, Vector3};

/// cgmath builds projections for OpenGL's -1..1 clip depth; wgpu expects 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM: f32 = 45.0;

// Inclusive: a pitch of exactly ±89° is reachable.
pub const PITCH_LIMIT: f32 = 89.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;

/// Direction of a keyboard-driven camera move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    front: Vector3<f32>,
    up: Vector3<f32>,
    right: Vector3<f32>,
    world_up: Vector3<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
    pub speed: f32,
    pub sensitivity: f32,
    zoom: Deg<f32>,
}

impl Camera {
    /// Create a camera at `position` looking along the direction given by `yaw`/`pitch`.
    ///
    /// A yaw of -90° with zero pitch looks down -Z. The pitch is clamped like
    /// any mouse-driven change would be.
    pub fn new<V: Into<Point3<f32>>, Y: Into<Deg<f32>>, P: Into<Deg<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let pitch: Deg<f32> = pitch.into();
        let mut camera = Self {
            position: position.into(),
            front: Vector3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            right: Vector3::unit_x(),
            world_up: Vector3::unit_y(),
            yaw: yaw.into(),
            pitch: Deg(pitch.0.clamp(-PITCH_LIMIT, PITCH_LIMIT)),
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            zoom: Deg(DEFAULT_ZOOM),
        };
        camera.update_vectors();
        camera
    }

    pub fn with_controls(mut self, speed: f32, sensitivity: f32) -> Self {
        self.speed = speed;
        self.sensitivity = sensitivity;
        self
    }

    /// Move the camera along its own basis. The distance is `speed * dt`.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.up * velocity,
            CameraMovement::Down => self.position -= self.up * velocity,
        }
    }

    /// Turn the camera by a cursor offset. Positive `dy` looks up.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32) {
        self.yaw += Deg(dx * self.sensitivity);
        let pitch = self.pitch.0 + dy * self.sensitivity;
        // Looking straight up or down would flip the look-at basis.
        self.pitch = Deg(pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT));
        self.update_vectors();
    }

    /// Zoom in (positive offset) or out. The field of view stays within 1°..=45°.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = Deg((self.zoom.0 - y_offset).clamp(MIN_ZOOM, MAX_ZOOM));
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn yaw(&self) -> Deg<f32> {
        self.yaw
    }

    pub fn pitch(&self) -> Deg<f32> {
        self.pitch
    }

    pub fn zoom(&self) -> Deg<f32> {
        self.zoom
    }

    fn update_vectors(&mut self) {
        let (sin_yaw, cos_yaw) = Rad::from(self.yaw).sin_cos();
        let (sin_pitch, cos_pitch) = Rad::from(self.pitch).sin_cos();
        self.front = Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new((0.0, 0.0, 3.0), Deg(DEFAULT_YAW), Deg(DEFAULT_PITCH))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Projection state for the whole window.
///
/// The mode persists across frames until it is changed. Perspective uses the
/// current window aspect ratio with a near plane of 0.2 and a far plane of
/// 100. Orthographic uses a fixed box: -2..2 by -1.5..1.5, near 1, far 100.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    mode: ProjectionMode,
    width: u32,
    height: u32,
}

impl Projection {
    /// Perspective field of view. Scroll zoom does not change it.
    pub const FOVY: Deg<f32> = Deg(45.0);
    pub const PERSPECTIVE_NEAR: f32 = 0.2;
    pub const PERSPECTIVE_FAR: f32 = 100.0;
    pub const ORTHOGRAPHIC: Ortho<f32> = Ortho {
        left: -2.0,
        right: 2.0,
        bottom: -1.5,
        top: 1.5,
        near: 1.0,
        far: 100.0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            mode: ProjectionMode::default(),
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ProjectionMode) {
        if self.mode != mode {
            log::debug!("Projection switched to {:?}", mode);
        }
        self.mode = mode;
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Perspective parameters for the given vertical field of view.
    pub fn perspective<A: Into<Rad<f32>>>(&self, fovy: A) -> PerspectiveFov<f32> {
        PerspectiveFov {
            fovy: fovy.into(),
            aspect: self.aspect(),
            near: Self::PERSPECTIVE_NEAR,
            far: Self::PERSPECTIVE_FAR,
        }
    }

    /// The projection matrix for the active mode in OpenGL clip conventions.
    pub fn calc_matrix<A: Into<Rad<f32>>>(&self, fovy: A) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => self.perspective(fovy).into(),
            ProjectionMode::Orthographic => Self::ORTHOGRAPHIC.into(),
        }
    }
}
