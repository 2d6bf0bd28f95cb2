use crate::geometry::Vec3;

pub const PITCH_LIMIT: f64 = 1.4;
pub const MIN_DISTANCE: f64 = 1.0;
pub const MAX_DISTANCE: f64 = 20.0;

/// Sensibilités de navigation d'un frontal à la souris.
pub mod navigation {
    /// Radians d'orbite par pixel de glissement.
    pub const ORBIT_PER_PIXEL: f64 = 0.01;
    /// Unités monde de panoramique par pixel de glissement.
    pub const PAN_PER_PIXEL: f64 = 0.005;
    /// Facteur de zoom par cran de molette, vers l'arrière.
    pub const WHEEL_ZOOM_OUT: f64 = 1.1;
    /// Facteur de zoom par cran de molette, vers l'avant.
    pub const WHEEL_ZOOM_IN: f64 = 0.9;
}

/// Caméra orbitale autour du point visé `(pan_x, pan_y, 0)`.
///
/// Seul l'état de navigation est stocké ; position et repère de vue sont
/// recalculés à chaque lecture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    yaw: f64,
    pitch: f64,
    distance: f64,
    pan_x: f64,
    pan_y: f64,
}

/// Géométrie figée de la caméra, lue une fois au début d'un rendu.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self { yaw: 0.7, pitch: 0.4, distance: 4.0, pan_x: 0.0, pan_y: 0.0 }
    }
}

impl Camera {
    /// Les bornes de tangage et de distance sont appliquées.
    pub fn new(yaw: f64, pitch: f64, distance: f64, pan_x: f64, pan_y: f64) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            pan_x,
            pan_y,
        }
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn pan_offset(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    pub fn orbit(&mut self, delta_yaw: f64, delta_pitch: f64) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// `factor` < 1 rapproche, > 1 éloigne. Doit être strictement positif.
    pub fn zoom(&mut self, factor: f64) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn target(&self) -> Vec3 {
        Vec3::new(self.pan_x, self.pan_y, 0.0)
    }

    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let orbit = Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw);
        orbit * self.distance + self.target()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target() - self.position()).normalize()
    }

    /// Nul si la caméra regarde exactement à la verticale.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::UNIT_Y).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize()
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot::look_at(self.position(), self.target())
    }
}

impl CameraSnapshot {
    /// Repère de vue d'un œil en `eye` visant `target`, monde vertical +Y.
    pub fn look_at(eye: Vec3, target: Vec3) -> Self {
        let forward = (target - eye).normalize();
        let right = forward.cross(Vec3::UNIT_Y).normalize();
        let up = right.cross(forward).normalize();
        CameraSnapshot { position: eye, forward, right, up }
    }
}

impl From<&Camera> for CameraSnapshot {
    fn from(camera: &Camera) -> Self {
        camera.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_orbit_clamps_pitch() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.orbit(0.3, 0.5);
            assert!(camera.pitch() <= PITCH_LIMIT);
        }
        assert_eq!(camera.pitch(), PITCH_LIMIT);
        for _ in 0..100 {
            camera.orbit(-0.3, -0.5);
            assert!(camera.pitch() >= -PITCH_LIMIT);
        }
        assert_eq!(camera.pitch(), -PITCH_LIMIT);
        // Le lacet n'est pas borné.
        assert!((camera.yaw() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut camera = Camera::default();
        for _ in 0..200 {
            camera.zoom(navigation::WHEEL_ZOOM_IN);
            assert!(camera.distance() >= MIN_DISTANCE);
        }
        assert_eq!(camera.distance(), MIN_DISTANCE);
        for _ in 0..200 {
            camera.zoom(navigation::WHEEL_ZOOM_OUT);
            assert!(camera.distance() <= MAX_DISTANCE);
        }
        assert_eq!(camera.distance(), MAX_DISTANCE);
    }

    #[test]
    fn test_new_clamps() {
        let camera = Camera::new(0.0, 3.0, 100.0, 0.0, 0.0);
        assert_eq!(camera.pitch(), PITCH_LIMIT);
        assert_eq!(camera.distance(), MAX_DISTANCE);
    }

    #[test]
    fn test_position_and_basis() {
        let camera = Camera::new(0.0, 0.0, 4.0, 0.0, 0.0);
        assert!((camera.position() - Vec3::new(0.0, 0.0, 4.0)).length() < TOL);
        assert!((camera.forward() - Vec3::new(0.0, 0.0, -1.0)).length() < TOL);
        assert!((camera.right() - Vec3::new(1.0, 0.0, 0.0)).length() < TOL);
        assert!((camera.up() - Vec3::new(0.0, 1.0, 0.0)).length() < TOL);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let mut camera = Camera::default();
        camera.orbit(1.3, -0.9);
        camera.pan(0.4, -0.2);
        let s = camera.snapshot();
        for v in [s.forward, s.right, s.up] {
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
        assert!(s.forward.dot(s.right).abs() < 1e-9);
        assert!(s.forward.dot(s.up).abs() < 1e-9);
        assert!(s.right.dot(s.up).abs() < 1e-9);
    }

    #[test]
    fn test_pan_moves_target_and_eye() {
        let mut camera = Camera::default();
        let before = camera.position();
        camera.pan(1.0, -0.5);
        assert_eq!(camera.pan_offset(), (1.0, -0.5));
        assert_eq!(camera.target(), Vec3::new(1.0, -0.5, 0.0));
        assert!((camera.position() - (before + Vec3::new(1.0, -0.5, 0.0))).length() < TOL);
        // La direction de visée ne change pas.
        assert!((camera.forward() - Camera::default().forward()).length() < TOL);
    }

    #[test]
    fn test_snapshot_matches_live_queries() {
        let mut camera = Camera::default();
        camera.orbit(-0.4, 0.2);
        camera.zoom(1.5);
        let s = camera.snapshot();
        assert_eq!(s.position, camera.position());
        assert_eq!(s.forward, camera.forward());
        assert_eq!(s.right, camera.right());
        assert_eq!(s.up, camera.up());
        assert_eq!(CameraSnapshot::from(&camera), s);
    }

    #[test]
    fn test_vertical_view_degenerates_to_zero_basis() {
        let s = CameraSnapshot::look_at(Vec3::new(0.0, 4.0, 0.0), Vec3::ZERO);
        assert_eq!(s.forward, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(s.right, Vec3::ZERO);
        assert_eq!(s.up, Vec3::ZERO);
    }
}
