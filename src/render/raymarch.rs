use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::color::{shade, BACKGROUND, UNWRITTEN};
use crate::error::FractalError;
use crate::fractal::{density, is_inside, HitRefinement, RenderParameters};
use crate::geometry::{CameraSnapshot, Vec3};
use crate::render::CancelToken;

/// Champ de vision vertical.
pub const FOV_DEGREES: f64 = 55.0;
/// Au-delà de cette distance le long du rayon, on abandonne.
pub const MAX_RAY_DISTANCE: f64 = 10.0;
/// Décalage des différences finies, en multiples de epsilon.
const NORMAL_OFFSET_FACTOR: f64 = 1.5;

/// Projection pixel -> rayon pour une caméra figée.
#[derive(Clone, Copy, Debug)]
struct ViewPlane {
    camera: CameraSnapshot,
    width: f64,
    height: f64,
    tan_half_fov: f64,
}

impl ViewPlane {
    fn new(camera: &CameraSnapshot, width: u32, height: u32) -> Self {
        Self {
            camera: *camera,
            width: width as f64,
            height: height as f64,
            tan_half_fov: (FOV_DEGREES.to_radians() / 2.0).tan(),
        }
    }

    #[inline]
    fn ray_direction(&self, x: u32, y: u32) -> Vec3 {
        let aspect = self.width / self.height;
        let nx = (2.0 * (x as f64 + 0.5) / self.width - 1.0) * self.tan_half_fov * aspect;
        let ny = (1.0 - 2.0 * (y as f64 + 0.5) / self.height) * self.tan_half_fov;
        (self.camera.forward + self.camera.right * nx + self.camera.up * ny).normalize()
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32, params: &RenderParameters) -> Rgba<u8> {
        trace_ray(self.camera.position, self.ray_direction(x, y), params)
    }
}

/// Marche à pas fixe ; renvoie la distance du premier échantillon intérieur.
pub fn march(origin: Vec3, dir: Vec3, params: &RenderParameters) -> Option<f64> {
    let mut t = 0.0;
    for step in 0..params.max_ray_steps {
        if is_inside(origin + dir * t, params) {
            return Some(match params.refinement {
                HitRefinement::Bisect { steps } if step > 0 => {
                    bisect(origin, dir, t - params.epsilon, t, steps, params)
                }
                _ => t,
            });
        }
        t += params.epsilon;
        if t > MAX_RAY_DISTANCE {
            break;
        }
    }
    None
}

/// Resserre [outside, inside] ; l'extrémité renvoyée reste dans l'ensemble.
fn bisect(origin: Vec3, dir: Vec3, mut outside: f64, mut inside: f64, steps: u32, params: &RenderParameters) -> f64 {
    for _ in 0..steps {
        let mid = 0.5 * (outside + inside);
        if is_inside(origin + dir * mid, params) {
            inside = mid;
        } else {
            outside = mid;
        }
    }
    inside
}

/// Gradient par différences centrées de l'indicatrice 0/1, normalisé.
///
/// Nul quand les six échantillons s'équilibrent.
pub fn estimate_normal(p: Vec3, params: &RenderParameters) -> Vec3 {
    let e = params.epsilon * NORMAL_OFFSET_FACTOR;
    let dx = density(p + Vec3::new(e, 0.0, 0.0), params) - density(p + Vec3::new(-e, 0.0, 0.0), params);
    let dy = density(p + Vec3::new(0.0, e, 0.0), params) - density(p + Vec3::new(0.0, -e, 0.0), params);
    let dz = density(p + Vec3::new(0.0, 0.0, e), params) - density(p + Vec3::new(0.0, 0.0, -e), params);
    Vec3::new(dx, dy, dz).normalize()
}

/// Couleur d'un rayon : fond si aucun impact, sinon éclairage diffus.
pub fn trace_ray(origin: Vec3, dir: Vec3, params: &RenderParameters) -> Rgba<u8> {
    match march(origin, dir, params) {
        Some(t) => shade(estimate_normal(origin + dir * t, params)),
        None => BACKGROUND,
    }
}

fn check_request(width: u32, height: u32, params: &RenderParameters) -> Result<(), FractalError> {
    if width == 0 || height == 0 {
        return Err(FractalError::EmptyImage { width, height });
    }
    params.validate()
}

/// Rendu séquentiel, lignes puis colonnes.
///
/// Le jeton est interrogé avant chaque pixel ; s'il est levé, l'image
/// partielle est renvoyée telle quelle (pixels restants à [`UNWRITTEN`]).
/// Les erreurs de configuration sont levées avant le premier échantillon.
pub fn render<C: CancelToken + ?Sized>(
    width: u32,
    height: u32,
    camera: &CameraSnapshot,
    params: &RenderParameters,
    cancel: &C,
) -> Result<RgbaImage, FractalError> {
    check_request(width, height, params)?;
    let start = Instant::now();
    let view = ViewPlane::new(camera, width, height);
    let mut image = RgbaImage::from_pixel(width, height, UNWRITTEN);

    for y in 0..height {
        for x in 0..width {
            if cancel.is_cancelled() {
                log::debug!("rendu annulé après {} pixels", y as u64 * width as u64 + x as u64);
                return Ok(image);
            }
            image.put_pixel(x, y, view.pixel(x, y, params));
        }
    }

    log::debug!("rendu séquentiel {}x{} en {:?}", width, height, start.elapsed());
    Ok(image)
}

/// Rendu parallélisé par lignes avec rayon.
///
/// Même contrat que [`render`] : chaque ligne est une tranche disjointe du
/// tampon, l'annulation est vérifiée avant chaque pixel.
pub fn render_parallel<C: CancelToken + Sync + ?Sized>(
    width: u32,
    height: u32,
    camera: &CameraSnapshot,
    params: &RenderParameters,
    cancel: &C,
) -> Result<RgbaImage, FractalError> {
    check_request(width, height, params)?;
    let start = Instant::now();
    let view = ViewPlane::new(camera, width, height);
    let mut image = RgbaImage::from_pixel(width, height, UNWRITTEN);
    let row_len = width as usize * 4;

    // Propage l'annulation aux lignes pas encore commencées
    let cancelled = AtomicBool::new(false);
    let written = AtomicUsize::new(0);

    image.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        if cancelled.load(Ordering::Relaxed) {
            return;
        }
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            if cancel.is_cancelled() {
                cancelled.store(true, Ordering::Relaxed);
                written.fetch_add(x, Ordering::Relaxed);
                return;
            }
            px.copy_from_slice(&view.pixel(x as u32, y as u32, params).0);
        }
        written.fetch_add(width as usize, Ordering::Relaxed);
    });

    if cancelled.load(Ordering::Relaxed) {
        log::debug!("rendu parallèle annulé après {} pixels", written.load(Ordering::Relaxed));
    } else {
        log::debug!("rendu parallèle {}x{} en {:?}", width, height, start.elapsed());
    }
    Ok(image)
}
