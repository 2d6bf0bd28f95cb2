use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn};

use tricomplex3d::fractal::unit_from_cli_name;
use tricomplex3d::geometry::navigation;
use tricomplex3d::io::png::save_png;
use tricomplex3d::{
    render, render_parallel, AxisEmbedding, Camera, HitRefinement, RenderParameters, SetFamily, Tricomplex,
};

/// Rendu en ligne de commande de coupes 3D de fractales tricomplexes.
///
/// Exemple d'utilisation :
///   tricomplex-cli --set julia --unit-x i1 --unit-y i2 --unit-z i1i2i3 --output julia.png
#[derive(Parser, Debug)]
#[command(
    name = "tricomplex-cli",
    about = "Coupes 3D ray-marchées des ensembles de Mandelbrot et Julia tricomplexes",
    version
)]
struct Cli {
    /// Famille d'ensemble (mandelbrot, julia)
    #[arg(long = "set", default_value = "mandelbrot")]
    set_family: String,

    /// Exposant entier de z -> z^p + c (2 à 8 conseillé)
    #[arg(long, default_value_t = 2)]
    power: u32,

    /// Nombre maximal d'itérations
    #[arg(long, default_value_t = 15)]
    iterations: u32,

    /// Rayon d'échappement
    #[arg(long, default_value_t = 8.0)]
    bailout: f64,

    /// Pas de marche le long des rayons
    #[arg(long, default_value_t = 0.03)]
    epsilon: f64,

    /// Nombre maximal de pas par rayon
    #[arg(long, default_value_t = 260)]
    ray_steps: u32,

    /// Échelle espace 3D -> coefficients tricomplexes
    #[arg(long, default_value_t = 1.4)]
    scale: f64,

    /// Unité recevant la coordonnée x (1, i1, i2, i1i2, i3, i1i3, i2i3, i1i2i3 ou 0..7)
    #[arg(long, default_value = "i1")]
    unit_x: String,

    /// Unité recevant la coordonnée y
    #[arg(long, default_value = "i2")]
    unit_y: String,

    /// Unité recevant la coordonnée z
    #[arg(long, default_value = "i3")]
    unit_z: String,

    /// Partie réelle de la constante de Julia
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    julia_real: f64,

    /// Composante de la constante de Julia sur l'unité x
    #[arg(long, default_value_t = -0.2, allow_hyphen_values = true)]
    julia_u1: f64,

    /// Composante de la constante de Julia sur l'unité y
    #[arg(long, default_value_t = 0.6, allow_hyphen_values = true)]
    julia_u2: f64,

    /// Composante de la constante de Julia sur l'unité z
    #[arg(long, default_value_t = 0.2, allow_hyphen_values = true)]
    julia_u3: f64,

    /// Lacet de la caméra (radians)
    #[arg(long, default_value_t = 0.7, allow_hyphen_values = true)]
    yaw: f64,

    /// Tangage de la caméra (radians, borné à ±1.4)
    #[arg(long, default_value_t = 0.4, allow_hyphen_values = true)]
    pitch: f64,

    /// Distance de la caméra à la cible (bornée à [1, 20])
    #[arg(long, default_value_t = 4.0)]
    distance: f64,

    /// Décalage horizontal de la cible
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_x: f64,

    /// Décalage vertical de la cible
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_y: f64,

    /// Glissement horizontal équivalent en pixels (orbite)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    orbit_x: i32,

    /// Glissement vertical équivalent en pixels (orbite)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    orbit_y: i32,

    /// Crans de molette (positif = éloigner, négatif = rapprocher)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    zoom_steps: i32,

    /// Largeur de l'image de sortie en pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Hauteur de l'image de sortie en pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Affine chaque impact par dichotomie (nombre d'étapes)
    #[arg(long, value_name = "ETAPES")]
    refine: Option<u32>,

    /// Rendu sur un seul thread
    #[arg(long)]
    sequential: bool,

    /// Interrompt le rendu après ce délai (secondes) et enregistre l'image partielle
    #[arg(long, value_name = "SECONDES")]
    time_limit: Option<f64>,

    /// Fichier de sortie PNG
    #[arg(long, value_name = "FICHIER")]
    output: PathBuf,
}

fn parse_unit(axis: char, value: &str) -> Result<usize, String> {
    unit_from_cli_name(value).ok_or_else(|| {
        format!("Unité invalide pour l'axe {axis}: '{value}'. Options: 1, i1, i2, i1i2, i3, i1i3, i2i3, i1i2i3 ou 0..7")
    })
}

fn build_params(cli: &Cli) -> Result<RenderParameters, String> {
    let set_family = SetFamily::from_cli_name(&cli.set_family)
        .ok_or_else(|| format!("Famille invalide: '{}'. Options: mandelbrot, julia", cli.set_family))?;

    let axes = AxisEmbedding::new(
        parse_unit('x', &cli.unit_x)?,
        parse_unit('y', &cli.unit_y)?,
        parse_unit('z', &cli.unit_z)?,
    )
    .map_err(|e| e.to_string())?;

    let params = RenderParameters {
        set_family,
        power: cli.power,
        max_iterations: cli.iterations,
        bailout: cli.bailout,
        epsilon: cli.epsilon,
        max_ray_steps: cli.ray_steps,
        scale: cli.scale,
        axes,
        julia_constant: Tricomplex::julia_constant(cli.julia_real, [cli.julia_u1, cli.julia_u2, cli.julia_u3], axes),
        refinement: match cli.refine {
            Some(steps) if steps > 0 => HitRefinement::Bisect { steps },
            _ => HitRefinement::FirstInside,
        },
    };
    params.validate().map_err(|e| e.to_string())?;
    Ok(params)
}

fn build_camera(cli: &Cli) -> Result<Camera, String> {
    for (name, value) in [
        ("yaw", cli.yaw),
        ("pitch", cli.pitch),
        ("distance", cli.distance),
        ("pan-x", cli.pan_x),
        ("pan-y", cli.pan_y),
    ] {
        if !value.is_finite() {
            return Err(format!("Paramètre de caméra invalide --{name}: {value} (valeur finie attendue)"));
        }
    }
    let mut camera = Camera::new(cli.yaw, cli.pitch, cli.distance, cli.pan_x, cli.pan_y);
    if cli.orbit_x != 0 || cli.orbit_y != 0 {
        camera.orbit(
            cli.orbit_x as f64 * navigation::ORBIT_PER_PIXEL,
            -cli.orbit_y as f64 * navigation::ORBIT_PER_PIXEL,
        );
    }
    let factor = if cli.zoom_steps > 0 {
        navigation::WHEEL_ZOOM_OUT
    } else {
        navigation::WHEEL_ZOOM_IN
    };
    for _ in 0..cli.zoom_steps.unsigned_abs() {
        camera.zoom(factor);
    }
    Ok(camera)
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .ok();

    let cli = Cli::parse();

    let params = match build_params(&cli) {
        Ok(p) => p,
        Err(msg) => {
            error!("{msg}");
            std::process::exit(1);
        }
    };
    let camera = match build_camera(&cli) {
        Ok(c) => c,
        Err(msg) => {
            error!("{msg}");
            std::process::exit(1);
        }
    };
    let [ux, uy, uz] = params.axes.labels();
    info!(
        "{} puissance {} sur ({ux}, {uy}, {uz}), caméra yaw={:.3} pitch={:.3} distance={:.3}",
        params.set_family.name(),
        params.power,
        camera.yaw(),
        camera.pitch(),
        camera.distance()
    );

    let cancel = Arc::new(AtomicBool::new(false));
    if let Some(limit) = cli.time_limit.filter(|s| s.is_finite() && *s > 0.0) {
        let cancel = Arc::clone(&cancel);
        thread::spawn(move || {
            thread::sleep(Duration::from_secs_f64(limit.min(86_400.0)));
            cancel.store(true, Ordering::Relaxed);
        });
    }

    let start = Instant::now();
    let snapshot = camera.snapshot();
    let result = if cli.sequential {
        render(cli.width, cli.height, &snapshot, &params, &cancel)
    } else {
        render_parallel(cli.width, cli.height, &snapshot, &params, &cancel)
    };
    let image = match result {
        Ok(image) => image,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    if cancel.load(Ordering::Relaxed) {
        warn!("Délai dépassé : image partielle après {:.2?}", start.elapsed());
    } else {
        info!("Rendu {}x{} en {:.2?}", cli.width, cli.height, start.elapsed());
    }

    if let Err(e) = save_png(&image, &cli.output) {
        error!("Erreur lors de l'écriture du PNG: {e}");
        std::process::exit(1);
    }
    info!("Image enregistrée: {}", cli.output.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["tricomplex-cli", "--output", "out.png"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_match_library_defaults() {
        let cli = parse(&[]);
        assert_eq!(build_params(&cli).unwrap(), RenderParameters::default());
        assert_eq!(build_camera(&cli).unwrap(), Camera::default());
    }

    #[test]
    fn test_units_by_label_and_index() {
        let cli = parse(&["--set", "julia", "--unit-x", "1", "--unit-y", "i1i2", "--unit-z", "7"]);
        let params = build_params(&cli).unwrap();
        assert_eq!(params.set_family, SetFamily::Julia);
        assert_eq!(params.axes.indices(), [0, 3, 7]);
    }

    #[test]
    fn test_duplicate_units_rejected() {
        let cli = parse(&["--unit-x", "i2", "--unit-y", "i2"]);
        assert!(build_params(&cli).is_err());
        let cli = parse(&["--unit-z", "i4"]);
        assert!(build_params(&cli).is_err());
    }

    #[test]
    fn test_negative_values_and_navigation() {
        let cli = parse(&["--julia-u1", "-0.5", "--orbit-y", "-500", "--zoom-steps", "-100"]);
        assert_eq!(build_params(&cli).unwrap().julia_constant.get(1), -0.5);
        let camera = build_camera(&cli).unwrap();
        assert_eq!(camera.pitch(), 1.4);
        assert_eq!(camera.distance(), 1.0);
    }

    #[test]
    fn test_non_finite_camera_rejected() {
        for args in [
            ["--distance", "NaN"],
            ["--yaw", "inf"],
            ["--pitch", "-inf"],
            ["--pan-x", "NaN"],
            ["--pan-y", "inf"],
        ] {
            let cli = parse(&args);
            assert!(build_camera(&cli).is_err(), "{args:?}");
        }
        assert!(build_camera(&parse(&["--distance", "50"])).is_ok());
    }

    #[test]
    fn test_refine_flag() {
        let cli = parse(&["--refine", "8"]);
        assert_eq!(build_params(&cli).unwrap().refinement, HitRefinement::Bisect { steps: 8 });
    }
}
