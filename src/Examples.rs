/// Demonstrations of the reaction-rate analysis API: end-to-end Arrhenius
/// fits, Wigner-corrected runs, Monte Carlo resampling, experimental
/// comparison.
pub mod kinetics_examples;
