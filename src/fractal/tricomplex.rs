use std::ops::{Add, Mul};

use crate::error::FractalError;
use crate::fractal::types::AxisEmbedding;

/// Dimension de l'algèbre : 2^3 produits d'unités.
pub const DIM: usize = 8;

/// Libellés des éléments de base, indexés par masque de bits
/// (bit 0 = i1, bit 1 = i2, bit 2 = i3).
pub const BASIS_LABELS: [&str; DIM] = ["1", "i1", "i2", "i1i2", "i3", "i1i3", "i2i3", "i1i2i3"];

/// Nombre tricomplexe : trois unités imaginaires commutatives i1, i2, i3
/// avec i1² = i2² = i3² = -1.
///
/// Le coefficient d'indice `k` porte l'élément de base formé du produit
/// des unités dont le bit est levé dans `k`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Tricomplex {
    coeffs: [f64; DIM],
}

impl Tricomplex {
    pub const fn new(coeffs: [f64; DIM]) -> Self {
        Self { coeffs }
    }

    /// Construit depuis une tranche quelconque ; échoue si elle n'a pas 8 éléments.
    pub fn from_slice(values: &[f64]) -> Result<Self, FractalError> {
        let coeffs: [f64; DIM] = values.try_into().map_err(|_| FractalError::CoefficientCount {
            expected: DIM,
            actual: values.len(),
        })?;
        Ok(Self { coeffs })
    }

    pub const fn zero() -> Self {
        Self { coeffs: [0.0; DIM] }
    }

    /// Élément neutre de la multiplication.
    pub const fn one() -> Self {
        Self::basis(0, 1.0)
    }

    /// `value` placé sur l'élément de base `index`, zéro ailleurs.
    ///
    /// Panique si `index >= 8`.
    pub const fn basis(index: usize, value: f64) -> Self {
        let mut coeffs = [0.0; DIM];
        coeffs[index] = value;
        Self { coeffs }
    }

    /// Constante de Julia telle que construite par le panneau de contrôle :
    /// partie réelle sur l'unité 1, puis une composante par unité de coupe.
    ///
    /// Si une unité de coupe est l'unité réelle, sa composante remplace `real`.
    pub fn julia_constant(real: f64, components: [f64; 3], axes: AxisEmbedding) -> Self {
        let mut coeffs = [0.0; DIM];
        coeffs[0] = real;
        for (slot, value) in axes.indices().into_iter().zip(components) {
            coeffs[slot] = value;
        }
        Self { coeffs }
    }

    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.coeffs[index]
    }

    #[inline]
    pub fn coefficients(&self) -> &[f64; DIM] {
        &self.coeffs
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0.0)
    }

    #[inline]
    pub fn add(self, other: Self) -> Self {
        let mut out = self.coeffs;
        for (o, b) in out.iter_mut().zip(other.coeffs) {
            *o += b;
        }
        Self { coeffs: out }
    }

    /// Produit : e_p · e_q = ±e_{p XOR q}, signe négatif quand les deux
    /// facteurs partagent un nombre impair d'unités.
    #[inline]
    pub fn multiply(self, other: Self) -> Self {
        let mut out = [0.0; DIM];
        for (p, &a) in self.coeffs.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            for (q, &b) in other.coeffs.iter().enumerate() {
                if b == 0.0 {
                    continue;
                }
                let term = a * b;
                if (p & q).count_ones() % 2 == 0 {
                    out[p ^ q] += term;
                } else {
                    out[p ^ q] -= term;
                }
            }
        }
        Self { coeffs: out }
    }

    /// Puissance entière ; un exposant négatif est une erreur d'argument.
    pub fn pow(self, exponent: i64) -> Result<Self, FractalError> {
        let exponent = u32::try_from(exponent).map_err(|_| {
            if exponent < 0 {
                FractalError::NegativeExponent(exponent)
            } else {
                FractalError::invalid("exponent", format!("{exponent} dépasse u32::MAX"))
            }
        })?;
        Ok(self.powu(exponent))
    }

    /// Exponentiation rapide, O(log n) multiplications.
    #[inline]
    pub fn powu(self, exponent: u32) -> Self {
        let mut result = Self::one();
        let mut base = self;
        let mut exp = exponent;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.multiply(base);
            }
            exp >>= 1;
            if exp > 0 {
                base = base.multiply(base);
            }
        }
        result
    }

    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.coeffs.iter().map(|c| c * c).sum()
    }
}

impl TryFrom<&[f64]> for Tricomplex {
    type Error = FractalError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        Self::from_slice(values)
    }
}

impl From<[f64; DIM]> for Tricomplex {
    fn from(coeffs: [f64; DIM]) -> Self {
        Self::new(coeffs)
    }
}

impl Add for Tricomplex {
    type Output = Tricomplex;

    fn add(self, rhs: Self) -> Self::Output {
        Tricomplex::add(self, rhs)
    }
}

impl Mul for Tricomplex {
    type Output = Tricomplex;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(rhs)
    }
}

/// Parse une unité de base depuis son libellé (`i1i3`) ou son indice (`5`).
///
/// Le libellé prime : `"1"` désigne l'unité réelle (indice 0), pas i1.
pub fn unit_from_cli_name(value: &str) -> Option<usize> {
    let value = value.trim().to_lowercase();
    if let Some(index) = BASIS_LABELS.iter().position(|&label| label == value) {
        return Some(index);
    }
    value.parse::<usize>().ok().filter(|&index| index < DIM)
}
