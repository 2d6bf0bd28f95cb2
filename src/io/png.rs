use std::path::Path;

use image::{ImageError, ImageFormat, RgbaImage};

/// Enregistre le tampon RGBA au format PNG.
///
/// Le format est forcé : l'extension du fichier de sortie n'est pas consultée.
pub fn save_png(image: &RgbaImage, output: &Path) -> Result<(), ImageError> {
    image.save_with_format(output, ImageFormat::Png)
}
