//! Physical constants and unit conversion factors (2019 SI redefinition).
//!
//! Unit convention of the whole crate: every internal quantity is stored in
//! SI base units: energies in J/mol, temperatures in K, rate coefficients in
//! (m³/mol)^(n-1)·s⁻¹ for an n-th order reaction. Conversions from "chemist"
//! units (kJ/mol, cm⁻¹) happen only at input/output boundaries through the
//! factors below.

/// Boltzmann constant, J/K
pub const BOLTZMANN: f64 = 1.380649e-23;
/// Planck constant, J*s
pub const PLANCK: f64 = 6.62607015e-34;
/// Avogadro number, 1/mol
pub const AVOGADRO: f64 = 6.02214076e23;
/// Molar gas constant R = k_B * N_A, J/(mol*K)
pub const GAS_CONSTANT: f64 = BOLTZMANN * AVOGADRO;
/// Speed of light in vacuum, m/s
pub const SPEED_OF_LIGHT: f64 = 2.99792458e8;

/// J/mol per kJ/mol
pub const KJMOL: f64 = 1e3;
/// m⁻¹ per cm⁻¹ (wavenumber conversion)
pub const PER_CM: f64 = 1e2;

/// Unit of the pre-exponential factor for an n-th order reaction,
/// (m³/mol)^(n-1)·s⁻¹ written out as a display string.
pub fn rate_unit_label(order: usize) -> String {
    match order {
        0 => "mol/(m³·s)".to_owned(),
        1 => "1/s".to_owned(),
        2 => "m³/(mol·s)".to_owned(),
        n => format!("(m³/mol)^{}/s", n - 1),
    }
}
