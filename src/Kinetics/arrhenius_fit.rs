use crate::Kinetics::errors::KineticsError;
use crate::Utils::physical_constants::GAS_CONSTANT;
use log::warn;
use nalgebra::{DMatrix, DVector, Matrix2};
use serde::{Deserialize, Serialize};

/// Least-squares fit of the linearized Arrhenius law
/// ln(k) = ln(A) - Ea/(R*T).
///
/// The fit is carried out entirely in log space: design matrix rows are
/// [1, -1/(R*T_i)], observations are ln(k_i), so the recovered parameters are
/// theta = [ln A, Ea]. An optional weight matrix W turns the normal equations
/// into Xᵗ W X theta = Xᵗ W y; an optional covariance of the observations is
/// propagated through the sensitivity matrix S = (XᵗWX)⁻¹ XᵗW as
/// Cov(theta) = S Σ_y Sᵗ. When no covariance is supplied Σ_y defaults to W⁻¹
/// (identity for the unweighted fit), so an identity weight matrix reproduces
/// the unweighted result exactly.
pub struct ArrheniusFitter {
    pub temps: Vec<f64>,
    pub rates: Vec<f64>,
    pub weights: Option<DMatrix<f64>>,
    pub covariance_y: Option<DMatrix<f64>>,
    pub unit: String,
}

/// Result of an Arrhenius fit. Immutable once produced.
///
/// `A` is recovered as exp(ln A) from a real-valued fit, so it is always
/// positive and its sampling distribution is log-normal; callers that need
/// symmetric confidence intervals on `A` must go through the Monte Carlo
/// resampler instead of the linear covariance alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrheniusFitResult {
    /// fitted ln of the pre-exponential factor
    pub ln_A: f64,
    /// pre-exponential factor, exp(ln_A), in `unit`
    pub A: f64,
    /// activation energy, J/mol
    pub Ea: f64,
    /// 2x2 covariance of (ln A, Ea)
    pub covariance: Matrix2<f64>,
    /// unit of A, (m³/mol)^(n-1)/s for an n-th order reaction
    pub unit: String,
}

impl ArrheniusFitResult {
    /// Standard deviation of ln A (square root of the covariance diagonal).
    pub fn std_ln_A(&self) -> f64 {
        self.covariance[(0, 0)].max(0.0).sqrt()
    }
    /// Standard deviation of Ea, J/mol.
    pub fn std_Ea(&self) -> f64 {
        self.covariance[(1, 1)].max(0.0).sqrt()
    }
    /// Activation energy in kJ/mol, for reporting.
    pub fn Ea_kjmol(&self) -> f64 {
        self.Ea / crate::Utils::physical_constants::KJMOL
    }
}

impl ArrheniusFitter {
    pub fn new(temps: Vec<f64>, rates: Vec<f64>) -> Self {
        Self {
            temps,
            rates,
            weights: None,
            covariance_y: None,
            unit: "1/s".to_owned(),
        }
    }

    /// Weight matrix W for the normal equations, n x n.
    pub fn with_weights(mut self, weights: DMatrix<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Covariance Σ_y of the ln(k) observations, n x n, propagated into the
    /// parameter covariance.
    pub fn with_covariance(mut self, covariance_y: DMatrix<f64>) -> Self {
        self.covariance_y = Some(covariance_y);
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_owned();
        self
    }

    fn validate(&self) -> Result<(), KineticsError> {
        let n = self.temps.len();
        if n < 2 {
            return Err(KineticsError::InvalidInput(format!(
                "at least 2 data points are required for an Arrhenius fit, got {}",
                n
            )));
        }
        if self.rates.len() != n {
            return Err(KineticsError::InvalidInput(format!(
                "temperature and rate vectors differ in length: {} vs {}",
                n,
                self.rates.len()
            )));
        }
        for &t in &self.temps {
            if !t.is_finite() || t <= 0.0 {
                return Err(KineticsError::InvalidInput(format!(
                    "temperature must be positive and finite, got {} K",
                    t
                )));
            }
        }
        for &k in &self.rates {
            if !k.is_finite() || k <= 0.0 {
                return Err(KineticsError::InvalidInput(format!(
                    "rate coefficient must be positive for a log-space fit, got {}",
                    k
                )));
            }
        }
        if let Some(w) = &self.weights {
            if w.nrows() != n || w.ncols() != n {
                return Err(KineticsError::InvalidInput(format!(
                    "weight matrix must be {}x{}, got {}x{}",
                    n,
                    n,
                    w.nrows(),
                    w.ncols()
                )));
            }
        }
        if let Some(c) = &self.covariance_y {
            if c.nrows() != n || c.ncols() != n {
                return Err(KineticsError::InvalidInput(format!(
                    "observation covariance must be {}x{}, got {}x{}",
                    n,
                    n,
                    c.nrows(),
                    c.ncols()
                )));
            }
        }
        let tmin = self.temps.iter().cloned().fold(f64::INFINITY, f64::min);
        let tmax = self.temps.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if tmax - tmin <= tmax * f64::EPSILON {
            return Err(KineticsError::SingularSystem(
                "all temperatures are numerically identical, design matrix is rank-deficient"
                    .to_owned(),
            ));
        }
        Ok(())
    }

    pub fn fit(&self) -> Result<ArrheniusFitResult, KineticsError> {
        self.validate()?;
        let n = self.temps.len();
        let x = DMatrix::from_fn(n, 2, |i, j| {
            if j == 0 {
                1.0
            } else {
                -1.0 / (GAS_CONSTANT * self.temps[i])
            }
        });
        let y = DVector::from_iterator(n, self.rates.iter().map(|k| k.ln()));
        let w = match &self.weights {
            Some(w) => w.clone(),
            None => DMatrix::identity(n, n),
        };
        let xtw = x.transpose() * &w; // 2 x n
        let m = &xtw * &x; // 2 x 2 normal matrix
        let b = &xtw * &y;
        let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
        if !det.is_finite() || det == 0.0 {
            return Err(KineticsError::SingularSystem(
                "normal equations are singular".to_owned(),
            ));
        }
        let theta = m
            .clone()
            .lu()
            .solve(&b)
            .ok_or_else(|| KineticsError::SingularSystem("normal equations are singular".to_owned()))?;
        if !theta[0].is_finite() || !theta[1].is_finite() {
            return Err(KineticsError::SingularSystem(
                "least-squares solution is not finite".to_owned(),
            ));
        }
        let m_inv = m.try_inverse().ok_or_else(|| {
            KineticsError::SingularSystem("normal matrix is not invertible".to_owned())
        })?;
        // sensitivity of theta to the observations, S = (XᵗWX)⁻¹ XᵗW
        let sensitivity = &m_inv * &xtw; // 2 x n
        let sigma_y = match (&self.covariance_y, &self.weights) {
            (Some(c), _) => c.clone(),
            (None, Some(w)) => w.clone().try_inverse().ok_or_else(|| {
                KineticsError::SingularSystem(
                    "weight matrix is singular, cannot derive observation covariance".to_owned(),
                )
            })?,
            (None, None) => DMatrix::identity(n, n),
        };
        let cov = &sensitivity * &sigma_y * sensitivity.transpose(); // 2 x 2
        let covariance = check_and_symmetrize(&cov);
        Ok(ArrheniusFitResult {
            ln_A: theta[0],
            A: theta[0].exp(),
            Ea: theta[1],
            covariance,
            unit: self.unit.clone(),
        })
    }
}

/// Non-fatal covariance diagnostics. The fit proceeds with the symmetrized
/// matrix; asymmetry or negative eigenvalues beyond tolerance are reported
/// through `log::warn!` and never silently alter the point estimate.
fn check_and_symmetrize(cov: &DMatrix<f64>) -> Matrix2<f64> {
    let scale = cov[(0, 0)]
        .abs()
        .max(cov[(1, 1)].abs())
        .max(cov[(0, 1)].abs())
        .max(f64::MIN_POSITIVE);
    let asym = (cov[(0, 1)] - cov[(1, 0)]).abs();
    if asym > 1e-10 * scale {
        warn!(
            "parameter covariance is asymmetric: c01 = {:e}, c10 = {:e}; proceeding with the symmetrized matrix",
            cov[(0, 1)],
            cov[(1, 0)]
        );
    }
    let off = 0.5 * (cov[(0, 1)] + cov[(1, 0)]);
    let sym = Matrix2::new(cov[(0, 0)], off, off, cov[(1, 1)]);
    // eigenvalues of the symmetric 2x2 in closed form
    let half_trace = 0.5 * (sym[(0, 0)] + sym[(1, 1)]);
    let det = sym[(0, 0)] * sym[(1, 1)] - off * off;
    let disc = (half_trace * half_trace - det).max(0.0).sqrt();
    let lambda_min = half_trace - disc;
    if lambda_min < -1e-10 * scale {
        warn!(
            "parameter covariance is not positive semi-definite: smallest eigenvalue {:e}",
            lambda_min
        );
    }
    sym
}
