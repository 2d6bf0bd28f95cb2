use thiserror::Error;

/// Erreurs de configuration du noyau.
///
/// Toutes relèvent de la catégorie « argument invalide » : elles sont
/// détectées avant le premier échantillon et aucun rendu ne démarre.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FractalError {
    #[error("un nombre tricomplexe attend {expected} coefficients, {actual} reçus")]
    CoefficientCount { expected: usize, actual: usize },

    #[error("l'exposant doit être positif ou nul (reçu {0})")]
    NegativeExponent(i64),

    #[error("unité d'axe {axis} hors de l'intervalle [0, 7] : {index}")]
    AxisOutOfRange { axis: char, index: usize },

    #[error("les trois unités de coupe doivent être distinctes (reçu {0:?})")]
    DuplicateAxes([usize; 3]),

    #[error("paramètre `{name}` invalide : {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("dimensions d'image invalides : {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}

impl FractalError {
    /// Toutes les variantes sont des erreurs d'argument côté appelant.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            FractalError::CoefficientCount { .. }
                | FractalError::NegativeExponent(_)
                | FractalError::AxisOutOfRange { .. }
                | FractalError::DuplicateAxes(_)
                | FractalError::InvalidParameter { .. }
                | FractalError::EmptyImage { .. }
        )
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        FractalError::InvalidParameter { name, reason: reason.into() }
    }
}
