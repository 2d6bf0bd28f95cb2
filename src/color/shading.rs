//! Éclairage diffus à lumière directionnelle unique.

use image::Rgba;

use crate::geometry::Vec3;

/// Fond opaque, quasi noir teinté de bleu.
pub const BACKGROUND: Rgba<u8> = Rgba([5, 7, 13, 255]);

/// État initial du tampon : pixel pas encore calculé (rendu annulé).
pub const UNWRITTEN: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Direction de la lumière, non normalisée.
pub const LIGHT_DIRECTION: Vec3 = Vec3::new(0.6, 0.7, 0.3);

const AMBIENT_FLOOR: f64 = 0.1;
const BASE_INTENSITY: f64 = 40.0;
const DIFFUSE_GAIN: f64 = 215.0;
/// Teinte froide : multiplicateurs R, G, B.
const TINT: [f64; 3] = [0.7, 0.9, 1.0];

/// Couleur d'une surface de normale `normal`.
///
/// Une normale nulle (gradient indéterminé) retombe sur le plancher ambiant.
pub fn shade(normal: Vec3) -> Rgba<u8> {
    let light = LIGHT_DIRECTION.normalize();
    let diffuse = normal.dot(light).max(AMBIENT_FLOOR);
    let intensity = (BASE_INTENSITY + diffuse * DIFFUSE_GAIN).min(255.0).trunc();
    let channel = |tint: f64| (intensity * tint).trunc().clamp(0.0, 255.0) as u8;
    Rgba([channel(TINT[0]), channel(TINT[1]), channel(TINT[2]), 255])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_light_is_brightest() {
        let c = shade(LIGHT_DIRECTION.normalize());
        assert_eq!(c, Rgba([178, 229, 255, 255]));
    }

    #[test]
    fn test_back_face_uses_ambient_floor() {
        // diffuse = 0.1 -> intensité 61
        let expected = Rgba([42, 54, 61, 255]);
        assert_eq!(shade(-LIGHT_DIRECTION.normalize()), expected);
        assert_eq!(shade(Vec3::ZERO), expected);
    }

    #[test]
    fn test_channels_keep_cool_tint() {
        for n in [Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)] {
            let Rgba([r, g, b, a]) = shade(n);
            assert!(r <= g && g <= b);
            assert_eq!(a, 255);
        }
    }
}
