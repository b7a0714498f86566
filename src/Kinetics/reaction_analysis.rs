use crate::Kinetics::arrhenius_fit::{ArrheniusFitResult, ArrheniusFitter};
use crate::Kinetics::errors::KineticsError;
use crate::Kinetics::monte_carlo::{self, MonteCarloSample, SigmaModel};
use crate::Kinetics::partition_function::{Barriers, PartitionFunction};
use crate::Kinetics::tunneling::{TunnelingCorrection, TunnelingEnum};
use crate::Utils::physical_constants::{BOLTZMANN, GAS_CONSTANT, KJMOL, PLANCK, rate_unit_label};
use log::info;
use nalgebra::DMatrix;
use prettytable::{Table, row};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Rate coefficients over a temperature grid. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSeries {
    pub temps: Vec<f64>,
    pub rates: Vec<f64>,
}

impl RateSeries {
    pub fn len(&self) -> usize {
        self.temps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temps.is_empty()
    }

    pub fn ln_rates(&self) -> Vec<f64> {
        self.rates.iter().map(|k| k.ln()).collect()
    }

    /// (1/T, ln k) pairs, the coordinates of an Arrhenius plot.
    pub fn arrhenius_series(&self) -> Vec<(f64, f64)> {
        self.temps
            .iter()
            .zip(&self.rates)
            .map(|(&t, &k)| (1.0 / t, k.ln()))
            .collect()
    }
}

/// Contract of the external plotting collaborator: consumes an Arrhenius
/// series or a parameter-sample collection and produces an image artifact.
/// Implementations live outside this crate.
pub trait ArrheniusPlotter {
    fn plot_arrhenius(&self, series: &[(f64, f64)], path: &str) -> Result<(), KineticsError>;
    fn plot_parameters(&self, sample: &MonteCarloSample, path: &str) -> Result<(), KineticsError>;
}

/// Transition-state-theory rate analysis over a temperature range.
///
/// k(T) = (kB*T/h) * (Q_ts(T) / Π Q_react(T)) * exp(-dE0/(R*T)) * kappa(T)
///
/// with dE0 the zero-point-corrected barrier (J/mol) and kappa the configured
/// tunneling factor. The full rate series and the Arrhenius fit are computed
/// eagerly at construction, so every fitting error surfaces there; the
/// resulting series and fit are immutable afterwards.
#[derive(Debug)]
pub struct ReactionAnalysis {
    reactants: Vec<Box<dyn PartitionFunction>>,
    transition_state: Box<dyn PartitionFunction>,
    pub barriers: Barriers,
    pub temp_low: f64,
    pub temp_high: f64,
    pub temp_step: f64,
    pub tunneling: TunnelingEnum,
    pub series: RateSeries,
    pub fit: ArrheniusFitResult,
}

impl ReactionAnalysis {
    /// Analysis with the default 10 K grid step, no tunneling correction and
    /// an unweighted fit.
    pub fn new(
        reactants: Vec<Box<dyn PartitionFunction>>,
        transition_state: Box<dyn PartitionFunction>,
        barriers: Barriers,
        temp_low: f64,
        temp_high: f64,
    ) -> Result<Self, KineticsError> {
        Self::with_options(
            reactants,
            transition_state,
            barriers,
            temp_low,
            temp_high,
            None,
            None,
            None,
        )
    }

    pub fn with_options(
        reactants: Vec<Box<dyn PartitionFunction>>,
        transition_state: Box<dyn PartitionFunction>,
        barriers: Barriers,
        temp_low: f64,
        temp_high: f64,
        temp_step: Option<f64>,
        tunneling: Option<TunnelingEnum>,
        weights: Option<DMatrix<f64>>,
    ) -> Result<Self, KineticsError> {
        if reactants.is_empty() {
            return Err(KineticsError::InvalidInput(
                "at least one reactant partition function is required".to_owned(),
            ));
        }
        let temp_step = temp_step.unwrap_or(10.0);
        if !(temp_low > 0.0) || !(temp_high > temp_low) || !(temp_step > 0.0) {
            return Err(KineticsError::InvalidInput(format!(
                "bad temperature grid: low = {} K, high = {} K, step = {} K",
                temp_low, temp_high, temp_step
            )));
        }
        let tunneling = tunneling.unwrap_or_default();
        let temps = temperature_grid(temp_low, temp_high, temp_step);
        let rates: Vec<f64> = temps
            .iter()
            .map(|&t| tst_rate(&reactants, transition_state.as_ref(), &barriers, &tunneling, t))
            .collect();
        let unit = rate_unit_label(reactants.len());
        let mut fitter = ArrheniusFitter::new(temps.clone(), rates.clone()).with_unit(&unit);
        if let Some(w) = weights {
            fitter = fitter.with_weights(w);
        }
        let fit = fitter.fit()?;
        info!(
            "reaction analysis over [{}, {}] K: Ea = {:.3} kJ/mol, A = {:.4e} {}",
            temp_low,
            temp_high,
            fit.Ea_kjmol(),
            fit.A,
            fit.unit
        );
        Ok(Self {
            reactants,
            transition_state,
            barriers,
            temp_low,
            temp_high,
            temp_step,
            tunneling,
            series: RateSeries { temps, rates },
            fit,
        })
    }

    /// Reaction order, equal to the number of reactants.
    pub fn order(&self) -> usize {
        self.reactants.len()
    }

    /// Pre-exponential factor in `unit()`.
    pub fn A(&self) -> f64 {
        self.fit.A
    }

    /// Activation energy, J/mol.
    pub fn Ea(&self) -> f64 {
        self.fit.Ea
    }

    /// Unit of the pre-exponential factor, (m³/mol)^(n-1)/s.
    pub fn unit(&self) -> &str {
        &self.fit.unit
    }

    /// TST rate coefficient at a single temperature (K), including the
    /// tunneling factor.
    pub fn compute_rate(&self, temp: f64) -> f64 {
        tst_rate(
            &self.reactants,
            self.transition_state.as_ref(),
            &self.barriers,
            &self.tunneling,
            temp,
        )
    }

    /// (1/T, ln k) series for the plotting collaborator.
    pub fn arrhenius_series(&self) -> Vec<(f64, f64)> {
        self.series.arrhenius_series()
    }

    pub fn plot_arrhenius(
        &self,
        plotter: &dyn ArrheniusPlotter,
        path: &str,
    ) -> Result<(), KineticsError> {
        plotter.plot_arrhenius(&self.arrhenius_series(), path)
    }

    pub fn plot_parameters(
        &self,
        plotter: &dyn ArrheniusPlotter,
        sample: &MonteCarloSample,
        path: &str,
    ) -> Result<(), KineticsError> {
        plotter.plot_parameters(sample, path)
    }

    /// Monte Carlo resampling of the fitted parameters. Perturbs the log-rate
    /// series `num_iter` times according to `sigma` (factor-of-two default),
    /// refits each replica and returns the (A, Ea) draws. The analysis itself
    /// is not mutated; randomness comes only from the caller-supplied rng.
    pub fn monte_carlo(
        &self,
        num_iter: usize,
        sigma: Option<SigmaModel>,
        rng: &mut StdRng,
    ) -> Result<MonteCarloSample, KineticsError> {
        let sigma = sigma.unwrap_or_else(SigmaModel::factor_of_two);
        monte_carlo::resample(&self.series.temps, &self.series.rates, &sigma, num_iter, rng)
    }

    /// Serializes the rate series, the fitted parameters and their covariance
    /// to a line-oriented text report.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), KineticsError> {
        let file = File::create(path.as_ref())?;
        let mut out = BufWriter::new(file);
        writeln!(out, "reaction order: {}", self.order())?;
        writeln!(
            out,
            "temperature grid: {} .. {} K, step {} K",
            self.temp_low, self.temp_high, self.temp_step
        )?;
        writeln!(out, "A [{}] = {:.10e}", self.unit(), self.A())?;
        writeln!(out, "ln(A) = {:.10}", self.fit.ln_A)?;
        writeln!(out, "Ea [kJ/mol] = {:.10}", self.fit.Ea_kjmol())?;
        writeln!(
            out,
            "zero-point barrier [kJ/mol] = {:.10}",
            self.barriers.zero_point / KJMOL
        )?;
        writeln!(
            out,
            "classical barrier [kJ/mol] = {:.10}",
            self.barriers.classical / KJMOL
        )?;
        writeln!(out, "covariance of (ln A, Ea):")?;
        for i in 0..2 {
            writeln!(
                out,
                "  {:.10e}  {:.10e}",
                self.fit.covariance[(i, 0)],
                self.fit.covariance[(i, 1)]
            )?;
        }
        writeln!(out, "T [K]  k [{}]  ln(k)", self.unit())?;
        for (t, k) in self.series.temps.iter().zip(&self.series.rates) {
            writeln!(out, "{:.2}  {:.10e}  {:.10}", t, k, k.ln())?;
        }
        info!("reaction analysis written to {:?}", path.as_ref());
        Ok(())
    }

    /// Prints the rate series and the fitted parameters to the console.
    pub fn pretty_print(&self) {
        println!(
            "__________reaction analysis, {} .. {} K__________",
            self.temp_low, self.temp_high
        );
        let mut table = Table::new();
        table.add_row(row!["T, K", format!("k, {}", self.unit()), "ln(k)", "kappa(T)"]);
        for (t, k) in self.series.temps.iter().zip(&self.series.rates) {
            table.add_row(row![
                format!("{:.1}", t),
                format!("{:.6e}", k),
                format!("{:.4}", k.ln()),
                format!("{:.4}", self.tunneling.factor(*t))
            ]);
        }
        table.printstd();
        let mut fit_table = Table::new();
        fit_table.add_row(row!["A", "ln(A)", "Ea, kJ/mol", "std ln(A)", "std Ea, kJ/mol"]);
        fit_table.add_row(row![
            format!("{:.4e} {}", self.A(), self.unit()),
            format!("{:.4}", self.fit.ln_A),
            format!("{:.4}", self.fit.Ea_kjmol()),
            format!("{:.4}", self.fit.std_ln_A()),
            format!("{:.4}", self.fit.std_Ea() / KJMOL)
        ]);
        fit_table.printstd();
        println!("_____________________________________________________________");
    }
}

/// Inclusive temperature grid from `low` to `high` with the given step.
fn temperature_grid(low: f64, high: f64, step: f64) -> Vec<f64> {
    let mut temps = Vec::new();
    let mut i = 0usize;
    loop {
        let t = low + step * i as f64;
        if t > high + 1e-9 * step {
            break;
        }
        temps.push(t);
        i += 1;
    }
    temps
}

fn tst_rate(
    reactants: &[Box<dyn PartitionFunction>],
    transition_state: &dyn PartitionFunction,
    barriers: &Barriers,
    tunneling: &TunnelingEnum,
    temp: f64,
) -> f64 {
    let q_react: f64 = reactants.iter().map(|pf| pf.value(temp)).product();
    let q_ts = transition_state.value(temp);
    (BOLTZMANN * temp / PLANCK)
        * (q_ts / q_react)
        * (-barriers.zero_point / (GAS_CONSTANT * temp)).exp()
        * tunneling.factor(temp)
}
