//! Champ fractal : appartenance escape-time d'un point de l'espace 3D.

use crate::fractal::{RenderParameters, SetFamily, Tricomplex};
use crate::geometry::Vec3;

/// Plonge un point 3D dans l'algèbre : x, y, z divisés par `scale` sur les
/// trois unités de coupe, zéro ailleurs.
#[inline]
pub fn embed(point: Vec3, params: &RenderParameters) -> Tricomplex {
    let mut coeffs = [0.0; 8];
    let [ux, uy, uz] = params.axes.indices();
    coeffs[ux] = point.x / params.scale;
    coeffs[uy] = point.y / params.scale;
    coeffs[uz] = point.z / params.scale;
    Tricomplex::new(coeffs)
}

/// Itère z -> z^power + c ; `false` dès que |z|² dépasse bailout².
#[inline]
fn stays_bounded(mut z: Tricomplex, c: Tricomplex, params: &RenderParameters) -> bool {
    let bailout_sq = params.bailout_squared();
    for _ in 0..params.max_iterations {
        z = z.powu(params.power).add(c);
        if z.norm_squared() > bailout_sq {
            return false;
        }
    }
    true
}

/// Test d'appartenance. Fonction pure de `(point, params)`.
#[inline]
pub fn is_inside(point: Vec3, params: &RenderParameters) -> bool {
    let sample = embed(point, params);
    let (z0, c) = match params.set_family {
        SetFamily::Mandelbrot => (Tricomplex::zero(), sample),
        SetFamily::Julia => (sample, params.julia_constant),
    };
    stays_bounded(z0, c, params)
}

/// Indicatrice 0/1 de l'ensemble, utilisée pour le gradient des normales.
#[inline]
pub fn density(point: Vec3, params: &RenderParameters) -> f64 {
    if is_inside(point, params) {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::AxisEmbedding;

    #[test]
    fn test_embed_uses_configured_axes() {
        let params = RenderParameters {
            axes: AxisEmbedding::new(0, 3, 6).unwrap(),
            scale: 2.0,
            ..RenderParameters::default()
        };
        let sample = embed(Vec3::new(1.0, -4.0, 0.5), &params);
        assert_eq!(sample, Tricomplex::new([0.5, 0.0, 0.0, -2.0, 0.0, 0.0, 0.25, 0.0]));
    }

    #[test]
    fn test_origin_is_inside_mandelbrot() {
        let params = RenderParameters::default();
        assert_eq!(params.max_iterations, 15);
        assert_eq!(params.bailout, 8.0);
        assert!(is_inside(Vec3::ZERO, &params));
        assert_eq!(density(Vec3::ZERO, &params), 1.0);
    }

    #[test]
    fn test_far_point_escapes() {
        let params = RenderParameters { scale: 1.4, ..RenderParameters::default() };
        assert!(!is_inside(Vec3::new(10.0, 10.0, 10.0), &params));
        assert_eq!(density(Vec3::new(10.0, 10.0, 10.0), &params), 0.0);

        // Échappe dès la première itération : |c|² ≈ 153 > 64.
        let one_shot = RenderParameters { max_iterations: 1, ..params };
        assert!(!is_inside(Vec3::new(10.0, 10.0, 10.0), &one_shot));
    }

    #[test]
    fn test_membership_is_deterministic() {
        let params = RenderParameters::default();
        let julia = RenderParameters { set_family: SetFamily::Julia, ..RenderParameters::default() };
        for i in 0..50 {
            let t = i as f64 * 0.07 - 1.7;
            let p = Vec3::new(t, 0.5 * t, -0.3 * t);
            assert_eq!(is_inside(p, &params), is_inside(p, &params));
            assert_eq!(is_inside(p, &julia), is_inside(p, &julia));
        }
    }

    #[test]
    fn test_julia_starts_from_sample_point() {
        // c = 0 : l'ensemble de Julia est la boule unité de z -> z².
        let params = RenderParameters {
            set_family: SetFamily::Julia,
            julia_constant: Tricomplex::zero(),
            scale: 1.0,
            max_iterations: 30,
            ..RenderParameters::default()
        };
        assert!(is_inside(Vec3::new(0.5, 0.0, 0.0), &params));
        assert!(!is_inside(Vec3::new(1.5, 0.0, 0.0), &params));
    }
}
