use crate::error::FractalError;
use crate::fractal::tricomplex::{Tricomplex, BASIS_LABELS, DIM};

/// Famille d'ensemble escape-time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SetFamily {
    /// z0 = 0, c = point sondé.
    #[default]
    Mandelbrot,
    /// z0 = point sondé, c = constante fixe.
    Julia,
}

impl SetFamily {
    pub fn all() -> &'static [SetFamily] {
        &[SetFamily::Mandelbrot, SetFamily::Julia]
    }

    pub fn name(self) -> &'static str {
        match self {
            SetFamily::Mandelbrot => "Mandelbrot",
            SetFamily::Julia => "Julia",
        }
    }

    pub fn from_cli_name(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "mandelbrot" | "m" => Some(SetFamily::Mandelbrot),
            "julia" | "j" => Some(SetFamily::Julia),
            _ => None,
        }
    }
}

/// Les trois emplacements de coefficients recevant x, y et z.
///
/// Ne se construit que via [`AxisEmbedding::new`] : indices dans [0, 7]
/// et deux à deux distincts, ce qui permet d'indexer sans contrôle dans
/// la boucle de rendu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisEmbedding {
    x: usize,
    y: usize,
    z: usize,
}

impl AxisEmbedding {
    pub fn new(x: usize, y: usize, z: usize) -> Result<Self, FractalError> {
        for (axis, index) in [('x', x), ('y', y), ('z', z)] {
            if index >= DIM {
                return Err(FractalError::AxisOutOfRange { axis, index });
            }
        }
        if x == y || x == z || y == z {
            return Err(FractalError::DuplicateAxes([x, y, z]));
        }
        Ok(Self { x, y, z })
    }

    #[inline]
    pub fn indices(&self) -> [usize; 3] {
        [self.x, self.y, self.z]
    }

    /// Libellés des unités, p. ex. `["i1", "i2", "i3"]`.
    pub fn labels(&self) -> [&'static str; 3] {
        [BASIS_LABELS[self.x], BASIS_LABELS[self.y], BASIS_LABELS[self.z]]
    }
}

impl Default for AxisEmbedding {
    /// i1, i2, i3.
    fn default() -> Self {
        Self { x: 1, y: 2, z: 4 }
    }
}

/// Localisation de la surface une fois le premier échantillon intérieur trouvé.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HitRefinement {
    /// Le premier échantillon intérieur est la surface (erreur ≤ epsilon).
    #[default]
    FirstInside,
    /// Dichotomie entre le dernier échantillon extérieur et le premier intérieur.
    Bisect { steps: u32 },
}

/// Paramètres d'un rendu, figés pour toute sa durée.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderParameters {
    pub set_family: SetFamily,
    pub power: u32,
    pub max_iterations: u32,
    pub bailout: f64,
    /// Pas de marche le long du rayon.
    pub epsilon: f64,
    pub max_ray_steps: u32,
    /// Facteur espace réel -> coefficients tricomplexes.
    pub scale: f64,
    pub axes: AxisEmbedding,
    /// Utilisée seulement pour `SetFamily::Julia`.
    pub julia_constant: Tricomplex,
    pub refinement: HitRefinement,
}

impl Default for RenderParameters {
    fn default() -> Self {
        let axes = AxisEmbedding::default();
        Self {
            set_family: SetFamily::Mandelbrot,
            power: 2,
            max_iterations: 15,
            bailout: 8.0,
            epsilon: 0.03,
            max_ray_steps: 260,
            scale: 1.4,
            axes,
            julia_constant: Tricomplex::julia_constant(0.0, [-0.2, 0.6, 0.2], axes),
            refinement: HitRefinement::FirstInside,
        }
    }
}

impl RenderParameters {
    /// Vérifie les plages acceptées ; à appeler avant tout échantillonnage.
    pub fn validate(&self) -> Result<(), FractalError> {
        if self.power < 2 {
            return Err(FractalError::invalid("power", format!("doit être ≥ 2 (reçu {})", self.power)));
        }
        if self.max_iterations < 1 {
            return Err(FractalError::invalid("max_iterations", "doit être ≥ 1"));
        }
        positive_finite("bailout", self.bailout)?;
        positive_finite("epsilon", self.epsilon)?;
        if self.max_ray_steps < 1 {
            return Err(FractalError::invalid("max_ray_steps", "doit être ≥ 1"));
        }
        positive_finite("scale", self.scale)?;
        if self.set_family == SetFamily::Julia
            && self.julia_constant.coefficients().iter().any(|c| !c.is_finite())
        {
            return Err(FractalError::invalid("julia_constant", "coefficients non finis"));
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn bailout_squared(&self) -> f64 {
        self.bailout * self.bailout
    }
}

fn positive_finite(name: &'static str, value: f64) -> Result<(), FractalError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FractalError::invalid(name, format!("doit être > 0 et fini (reçu {value})")))
    }
}
