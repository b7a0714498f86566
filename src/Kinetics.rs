/// Error taxonomy of the kinetics core: invalid input, singular least-squares
/// systems, file IO.
pub mod errors;

/// Weighted/unweighted least-squares fit of the linearized Arrhenius law
/// ln(k) = ln(A) - Ea/(R*T) with covariance propagation through the
/// sensitivity matrix.
///
///  # Examples
/// ```
/// use ArrKin::Kinetics::arrhenius_fit::ArrheniusFitter;
/// let temps = vec![300.0, 400.0, 500.0, 600.0];
/// let rates = vec![1.2e-3, 4.5e-1, 1.1e1, 9.8e1];
/// let fit = ArrheniusFitter::new(temps, rates).fit().unwrap();
/// println!("A = {:e} {}, Ea = {} kJ/mol", fit.A, fit.unit, fit.Ea_kjmol());
/// ```
pub mod arrhenius_fit;

/// Boundary contracts to the quantum-chemistry side: partition-function
/// providers, barrier heights, and analytic providers for validation runs.
pub mod partition_function;

/// Tunneling corrections as a dispatch enum with a single `factor(T)`
/// operation: none, or the Wigner correction built from the transition-state
/// imaginary-mode frequency.
pub mod tunneling;

/// Transition-state-theory rate coefficients over a temperature grid, the
/// Arrhenius fit of the resulting series, text reports and console tables.
///
///  # Examples
/// ```
/// use ArrKin::Kinetics::partition_function::{AnalyticTsPartFun, ConstantPartFun, PartitionFunction};
/// use ArrKin::Kinetics::reaction_analysis::ReactionAnalysis;
/// let reactants: Vec<Box<dyn PartitionFunction>> = vec![Box::new(ConstantPartFun::new(1.0))];
/// let ts = Box::new(AnalyticTsPartFun::new(3.3e10));
/// let barriers = AnalyticTsPartFun::barriers(160.0e3);
/// let ra = ReactionAnalysis::new(reactants, ts, barriers, 300.0, 800.0).unwrap();
/// println!("Ea = {} kJ/mol, A = {:e} {}", ra.Ea() / 1e3, ra.A(), ra.unit());
/// ```
pub mod reaction_analysis;
mod reaction_analysis_tests;

/// Monte Carlo estimation of Arrhenius-parameter uncertainty: perturb the
/// log-rate series under a configurable error model, refit every replica,
/// collect the (A, Ea) draws. Randomness is always an explicitly passed,
/// seedable generator.
pub mod monte_carlo;

/// Comparison against experimental kinetics: summary-file IO, configurable
/// log-space covariance models and the residual color map for visual reports.
pub mod experimental;
