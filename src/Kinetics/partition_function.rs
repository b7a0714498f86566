use crate::Utils::physical_constants::{BOLTZMANN, PLANCK};
use serde::{Deserialize, Serialize};

/// Boundary contract to the quantum-chemistry side: something that can
/// evaluate a molecular partition function at a given temperature.
///
/// The crate never computes partition functions itself (normal-mode and
/// Hessian analysis are outside its scope); it only consumes values supplied
/// by an external provider. For a transition state the provider may also
/// report the magnitude of its imaginary-mode frequency (in cm⁻¹), which
/// feeds the Wigner tunneling correction.
pub trait PartitionFunction: std::fmt::Debug {
    /// Partition function value at temperature `temp` (K).
    fn value(&self, temp: f64) -> f64;
    /// Magnitude of the imaginary-mode frequency in cm⁻¹, transition states
    /// only.
    fn imaginary_frequency(&self) -> Option<f64> {
        None
    }
}

/// Zero-point-corrected and classical barrier heights, J/mol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Barriers {
    pub zero_point: f64,
    pub classical: f64,
}

impl Barriers {
    pub fn new(zero_point: f64, classical: f64) -> Self {
        Self {
            zero_point,
            classical,
        }
    }
}

/// Temperature-independent partition function. Useful as a reactant stub in
/// examples and validation runs.
#[derive(Debug, Clone, Copy)]
pub struct ConstantPartFun {
    pub q: f64,
    pub imag_freq: Option<f64>,
}

impl ConstantPartFun {
    pub fn new(q: f64) -> Self {
        Self { q, imag_freq: None }
    }

    pub fn with_imaginary_frequency(q: f64, imag_freq: f64) -> Self {
        Self {
            q,
            imag_freq: Some(imag_freq),
        }
    }
}

impl PartitionFunction for ConstantPartFun {
    fn value(&self, _temp: f64) -> f64 {
        self.q
    }

    fn imaginary_frequency(&self) -> Option<f64> {
        self.imag_freq
    }
}

/// Transition-state partition function constructed so that the full
/// transition-state-theory expression collapses to an exact Arrhenius law
/// k(T) = A0 * exp(-Ea0/(R*T)) when all reactant partition functions are 1
/// and the zero-point barrier equals Ea0. The (kB*T/h) prefactor is divided
/// out: Q(T) = A0 * h / (kB * T).
///
/// This is a validation device: fitting the resulting series must recover
/// (A0, Ea0) to numerical precision.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticTsPartFun {
    pub a0: f64,
    pub imag_freq: Option<f64>,
}

impl AnalyticTsPartFun {
    pub fn new(a0: f64) -> Self {
        Self {
            a0,
            imag_freq: None,
        }
    }

    pub fn with_imaginary_frequency(a0: f64, imag_freq: f64) -> Self {
        Self {
            a0,
            imag_freq: Some(imag_freq),
        }
    }

    /// Barriers making the analytic law come out with activation energy
    /// `ea0` (J/mol).
    pub fn barriers(ea0: f64) -> Barriers {
        Barriers::new(ea0, ea0)
    }
}

impl PartitionFunction for AnalyticTsPartFun {
    fn value(&self, temp: f64) -> f64 {
        self.a0 * PLANCK / (BOLTZMANN * temp)
    }

    fn imaginary_frequency(&self) -> Option<f64> {
        self.imag_freq
    }
}
