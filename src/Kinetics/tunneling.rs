use crate::Kinetics::errors::KineticsError;
use crate::Kinetics::partition_function::PartitionFunction;
use crate::Utils::physical_constants::{BOLTZMANN, PER_CM, PLANCK, SPEED_OF_LIGHT};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// Dimensionless multiplicative correction to the classical rate coefficient
/// accounting for quantum tunneling through the barrier. Factors are >= 0 and
/// unbounded above; the trivial variant is identically 1.
#[enum_dispatch]
pub trait TunnelingCorrection {
    fn factor(&self, temp: f64) -> f64;
}

/// No tunneling, factor ≡ 1.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NoTunneling;

impl TunnelingCorrection for NoTunneling {
    fn factor(&self, _temp: f64) -> f64 {
        1.0
    }
}

/// Wigner correction, kappa = 1 + (h*c*nu/(kB*T))²/24, with nu the magnitude
/// of the transition-state imaginary-mode frequency in cm⁻¹.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wigner {
    /// imaginary-mode wavenumber, cm⁻¹
    pub imag_frequency: f64,
}

impl Wigner {
    pub fn new(imag_frequency: f64) -> Result<Self, KineticsError> {
        if !imag_frequency.is_finite() || imag_frequency <= 0.0 {
            return Err(KineticsError::InvalidInput(format!(
                "Wigner correction needs a positive imaginary-mode wavenumber, got {} cm⁻¹",
                imag_frequency
            )));
        }
        Ok(Self { imag_frequency })
    }

    /// Builds the correction from a transition-state partition function that
    /// reports its imaginary-mode frequency.
    pub fn from_partition_function(pf: &dyn PartitionFunction) -> Result<Self, KineticsError> {
        let freq = pf.imaginary_frequency().ok_or_else(|| {
            KineticsError::InvalidInput(
                "transition-state partition function does not report an imaginary frequency"
                    .to_owned(),
            )
        })?;
        Self::new(freq)
    }
}

impl TunnelingCorrection for Wigner {
    fn factor(&self, temp: f64) -> f64 {
        // h*c*nu is the energy quantum of the imaginary mode
        let x = PLANCK * SPEED_OF_LIGHT * self.imag_frequency * PER_CM / (BOLTZMANN * temp);
        1.0 + x * x / 24.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[enum_dispatch(TunnelingCorrection)]
pub enum TunnelingEnum {
    NoTunneling(NoTunneling),
    Wigner(Wigner),
}

impl Default for TunnelingEnum {
    fn default() -> Self {
        TunnelingEnum::NoTunneling(NoTunneling)
    }
}
