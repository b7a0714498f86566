//! Helpers for comparing computed kinetics against experimental data:
//! the one-line summary-file format, configurable log-space covariance
//! models for experimental rate coefficients, and the residual color map
//! used in visual reports.

use crate::Kinetics::arrhenius_fit::{ArrheniusFitResult, ArrheniusFitter};
use crate::Kinetics::errors::KineticsError;
use log::info;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Contents of a kinetics summary file: one line of whitespace-separated
/// floats `k_1 .. k_m  A  Ea  E0  E` where the rate coefficients refer to an
/// externally defined temperature grid (e.g. 300/400/500/600 K), `E0` is the
/// zero-point corrected barrier and `E` the classical barrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub rate_coefficients: Vec<f64>,
    pub A: f64,
    pub Ea: f64,
    pub zero_point_barrier: f64,
    pub classical_barrier: f64,
}

/// Loads a kinetics summary file. Fails if the first line holds fewer than 6
/// numbers (at least two rate coefficients are needed ahead of the four
/// trailing parameters).
pub fn load_summary<P: AsRef<Path>>(path: P) -> Result<Summary, KineticsError> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let values: Vec<f64> = line
        .split_whitespace()
        .map(|word| {
            word.parse::<f64>().map_err(|_| {
                KineticsError::InvalidInput(format!(
                    "summary file {:?}: not a number: '{}'",
                    path.as_ref(),
                    word
                ))
            })
        })
        .collect::<Result<_, _>>()?;
    if values.len() < 6 {
        return Err(KineticsError::InvalidInput(format!(
            "summary file {:?}: expected at least 6 numbers, got {}",
            path.as_ref(),
            values.len()
        )));
    }
    let n = values.len();
    info!("loaded summary {:?}: {} rate coefficients", path.as_ref(), n - 4);
    Ok(Summary {
        rate_coefficients: values[..n - 4].to_vec(),
        A: values[n - 4],
        Ea: values[n - 3],
        zero_point_barrier: values[n - 2],
        classical_barrier: values[n - 1],
    })
}

/// Writes a summary back in the one-line format accepted by `load_summary`.
pub fn write_summary<P: AsRef<Path>>(path: P, summary: &Summary) -> Result<(), KineticsError> {
    if summary.rate_coefficients.len() < 2 {
        return Err(KineticsError::InvalidInput(
            "summary needs at least 2 rate coefficients".to_owned(),
        ));
    }
    let file = File::create(path.as_ref())?;
    let mut out = BufWriter::new(file);
    for k in &summary.rate_coefficients {
        write!(out, "{:e} ", k)?;
    }
    writeln!(
        out,
        "{:e} {:e} {:e} {:e}",
        summary.A, summary.Ea, summary.zero_point_barrier, summary.classical_barrier
    )?;
    Ok(())
}

/// Covariance structure assumed for experimental ln(k) values. The original
/// comparison against one experimental dataset used a uniform log-base-10
/// term plus diagonal log-base-2 terms; that is one modeling choice among
/// several, so the structure is configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CovarianceModel {
    Identity,
    /// Diagonal with a single standard deviation of ln(k).
    Diagonal(f64),
    /// Fully correlated `uniform` term on every entry plus `diagonal` on the
    /// main diagonal (both are variances of ln(k)).
    UniformPlusDiagonal { uniform: f64, diagonal: f64 },
}

impl CovarianceModel {
    /// The error structure used in the original experimental comparison:
    /// ln(10)² uniform plus ln(2)² diagonal.
    pub fn uniform_log10_diagonal_log2() -> Self {
        CovarianceModel::UniformPlusDiagonal {
            uniform: 10f64.ln().powi(2),
            diagonal: 2f64.ln().powi(2),
        }
    }

    pub fn build(&self, n: usize) -> DMatrix<f64> {
        match self {
            CovarianceModel::Identity => DMatrix::identity(n, n),
            CovarianceModel::Diagonal(sigma) => {
                DMatrix::from_diagonal_element(n, n, sigma * sigma)
            }
            CovarianceModel::UniformPlusDiagonal { uniform, diagonal } => {
                DMatrix::from_fn(n, n, |i, j| {
                    if i == j {
                        uniform + diagonal
                    } else {
                        *uniform
                    }
                })
            }
        }
    }
}

/// Unweighted Arrhenius fit of experimental rate coefficients with the chosen
/// covariance model propagated into the parameter covariance.
pub fn fit_experimental(
    temps: &[f64],
    rates: &[f64],
    covariance: &CovarianceModel,
) -> Result<ArrheniusFitResult, KineticsError> {
    ArrheniusFitter::new(temps.to_vec(), rates.to_vec())
        .with_covariance(covariance.build(temps.len()))
        .fit()
}

/// Maps a normalized residual (observed vs. fit deviation divided by its
/// error bar) to a hex color on a fixed piecewise scale: green-to-yellow for
/// |ratio| < 1, yellow-to-red up to 2, red-to-purple up to 3, fixed purple
/// beyond. Visual reporting only.
pub fn get_error_color(ratio: f64) -> String {
    let x = ratio.abs();
    let rgb = if x < 1.0 {
        (x, 1.0, 0.0)
    } else if x < 2.0 {
        (1.0, 2.0 - x, 0.0)
    } else if x < 3.0 {
        ((4.0 - x) / 2.0, 0.0, (x - 2.0) / 2.0)
    } else {
        (0.5, 0.0, 0.5)
    };
    format!(
        "#{:02x}{:02x}{:02x}",
        (rgb.0 * 255.0) as u8,
        (rgb.1 * 255.0) as u8,
        (rgb.2 * 255.0) as u8
    )
}
