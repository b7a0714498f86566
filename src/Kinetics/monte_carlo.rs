use crate::Kinetics::arrhenius_fit::ArrheniusFitter;
use crate::Kinetics::errors::KineticsError;
use nalgebra::{Cholesky, DMatrix, DVector};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Assumed error model for the log-rate observations used by the resampler.
/// The exact error structure is a modeling choice, so it is configurable
/// rather than hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SigmaModel {
    /// One standard deviation of ln(k) for every point.
    Constant(f64),
    /// Per-point standard deviations of ln(k).
    PerPoint(Vec<f64>),
    /// Full covariance of the ln(k) observations. Perturbations are
    /// correlated Gaussian draws through the Cholesky factor of the matrix,
    /// so off-diagonal terms (e.g. a fully correlated uniform component) are
    /// realized exactly.
    Covariance(DMatrix<f64>),
}

impl SigmaModel {
    /// Factor-of-two rate uncertainty, sigma = ln 2 on every ln(k).
    pub fn factor_of_two() -> Self {
        SigmaModel::Constant(std::f64::consts::LN_2)
    }

    fn validate(&self, n: usize) -> Result<(), KineticsError> {
        match self {
            SigmaModel::Constant(s) => {
                if !s.is_finite() || *s < 0.0 {
                    return Err(KineticsError::InvalidInput(format!(
                        "sigma must be finite and non-negative, got {}",
                        s
                    )));
                }
            }
            SigmaModel::PerPoint(v) => {
                if v.len() != n {
                    return Err(KineticsError::InvalidInput(format!(
                        "per-point sigma vector has length {}, expected {}",
                        v.len(),
                        n
                    )));
                }
                for &s in v {
                    if !s.is_finite() || s < 0.0 {
                        return Err(KineticsError::InvalidInput(format!(
                            "sigma must be finite and non-negative, got {}",
                            s
                        )));
                    }
                }
            }
            SigmaModel::Covariance(c) => {
                if c.nrows() != n || c.ncols() != n {
                    return Err(KineticsError::InvalidInput(format!(
                        "covariance matrix must be {}x{}, got {}x{}",
                        n,
                        n,
                        c.nrows(),
                        c.ncols()
                    )));
                }
                let scale = c
                    .iter()
                    .fold(0.0f64, |acc, &v| acc.max(v.abs()))
                    .max(f64::MIN_POSITIVE);
                for i in 0..n {
                    for j in 0..i {
                        if (c[(i, j)] - c[(j, i)]).abs() > 1e-10 * scale {
                            return Err(KineticsError::InvalidInput(format!(
                                "covariance matrix is asymmetric at ({}, {})",
                                i, j
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Per-replica perturbation engine derived from a `SigmaModel`.
enum Perturbation {
    Diagonal(Vec<f64>),
    Correlated(DMatrix<f64>),
}

impl Perturbation {
    fn build(sigma: &SigmaModel, n: usize) -> Result<Self, KineticsError> {
        match sigma {
            SigmaModel::Constant(s) => Ok(Perturbation::Diagonal(vec![*s; n])),
            SigmaModel::PerPoint(v) => Ok(Perturbation::Diagonal(v.clone())),
            SigmaModel::Covariance(c) => {
                let chol = Cholesky::new(c.clone()).ok_or_else(|| {
                    KineticsError::InvalidInput(
                        "covariance matrix is not positive definite, Cholesky factorization failed"
                            .to_owned(),
                    )
                })?;
                Ok(Perturbation::Correlated(chol.l()))
            }
        }
    }

    fn draw(&self, z: &DVector<f64>) -> DVector<f64> {
        match self {
            Perturbation::Diagonal(s) => {
                DVector::from_iterator(z.len(), z.iter().zip(s).map(|(zi, si)| zi * si))
            }
            Perturbation::Correlated(l) => l * z,
        }
    }
}

/// Resampled (A, Ea) draws. Owned separately from the fit that spawned them;
/// producing a sample never mutates the original fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloSample {
    pub A: Vec<f64>,
    pub Ea: Vec<f64>,
}

impl MonteCarloSample {
    pub fn len(&self) -> usize {
        self.A.len()
    }

    pub fn is_empty(&self) -> bool {
        self.A.is_empty()
    }

    pub fn mean_Ea(&self) -> f64 {
        mean(&self.Ea)
    }

    pub fn std_Ea(&self) -> f64 {
        std(&self.Ea)
    }

    /// Mean of ln(A); the sampling distribution of A itself is log-normal,
    /// so summaries are taken in log space.
    pub fn mean_ln_A(&self) -> f64 {
        let ln_a: Vec<f64> = self.A.iter().map(|a| a.ln()).collect();
        mean(&ln_a)
    }

    pub fn std_ln_A(&self) -> f64 {
        let ln_a: Vec<f64> = self.A.iter().map(|a| a.ln()).collect();
        std(&ln_a)
    }
}

fn mean(v: &[f64]) -> f64 {
    if v.is_empty() {
        return f64::NAN;
    }
    v.iter().sum::<f64>() / v.len() as f64
}

fn std(v: &[f64]) -> f64 {
    if v.len() < 2 {
        return f64::NAN;
    }
    let m = mean(v);
    (v.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (v.len() - 1) as f64).sqrt()
}

/// Draws `num_iter` perturbed replicas of the log-rate series, refits each
/// one, and collects the resulting (A, Ea) pairs.
///
/// Randomness comes only from the caller-supplied `StdRng`; a fixed seed
/// reproduces the sample sequence exactly. Replicas with non-positive
/// perturbed rates cannot occur since the perturbation acts on ln(k).
pub fn resample(
    temps: &[f64],
    rates: &[f64],
    sigma: &SigmaModel,
    num_iter: usize,
    rng: &mut StdRng,
) -> Result<MonteCarloSample, KineticsError> {
    if num_iter == 0 {
        return Err(KineticsError::InvalidInput(
            "Monte Carlo needs at least one iteration".to_owned(),
        ));
    }
    let n = temps.len();
    sigma.validate(n)?;
    for &k in rates {
        if !k.is_finite() || k <= 0.0 {
            return Err(KineticsError::InvalidInput(format!(
                "rate coefficient must be positive for a log-space resample, got {}",
                k
            )));
        }
    }
    let perturbation = Perturbation::build(sigma, n)?;
    let ln_rates: Vec<f64> = rates.iter().map(|k| k.ln()).collect();
    let unit_normal = Normal::new(0.0, 1.0)
        .map_err(|e| KineticsError::InvalidInput(format!("normal distribution: {}", e)))?;
    let mut sample = MonteCarloSample {
        A: Vec::with_capacity(num_iter),
        Ea: Vec::with_capacity(num_iter),
    };
    for _ in 0..num_iter {
        let z = DVector::from_iterator(n, (0..n).map(|_| unit_normal.sample(rng)));
        let eps = perturbation.draw(&z);
        let perturbed: Vec<f64> = ln_rates
            .iter()
            .zip(eps.iter())
            .map(|(&lnk, &e)| (lnk + e).exp())
            .collect();
        let fit = ArrheniusFitter::new(temps.to_vec(), perturbed).fit()?;
        sample.A.push(fit.A);
        sample.Ea.push(fit.Ea);
    }
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::experimental::CovarianceModel;
    use crate::Utils::physical_constants::GAS_CONSTANT;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn synthetic() -> (Vec<f64>, Vec<f64>) {
        let temps: Vec<f64> = (0..7).map(|i| 300.0 + 50.0 * i as f64).collect();
        let rates = temps
            .iter()
            .map(|&t| 1.0e8 * (-90.0e3 / (GAS_CONSTANT * t)).exp())
            .collect();
        (temps, rates)
    }

    #[test]
    fn fixed_seed_reproduces_sample() {
        let (temps, rates) = synthetic();
        let sigma = SigmaModel::factor_of_two();
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        let s1 = resample(&temps, &rates, &sigma, 50, &mut rng1).unwrap();
        let s2 = resample(&temps, &rates, &sigma, 50, &mut rng2).unwrap();
        assert_eq!(s1.A, s2.A);
        assert_eq!(s1.Ea, s2.Ea);
    }

    #[test]
    fn different_seeds_differ() {
        let (temps, rates) = synthetic();
        let sigma = SigmaModel::factor_of_two();
        let mut rng1 = StdRng::seed_from_u64(1);
        let mut rng2 = StdRng::seed_from_u64(2);
        let s1 = resample(&temps, &rates, &sigma, 10, &mut rng1).unwrap();
        let s2 = resample(&temps, &rates, &sigma, 10, &mut rng2).unwrap();
        assert_ne!(s1.Ea, s2.Ea);
    }

    #[test]
    fn sample_mean_converges_to_point_estimate() {
        let (temps, rates) = synthetic();
        let point = ArrheniusFitter::new(temps.clone(), rates.clone())
            .fit()
            .unwrap();
        let sigma = SigmaModel::Constant(0.1);
        let mut rng = StdRng::seed_from_u64(7);
        let sample = resample(&temps, &rates, &sigma, 4000, &mut rng).unwrap();
        // mean Ea approaches the point estimate as M grows
        assert_relative_eq!(sample.mean_Ea(), point.Ea, max_relative = 2e-2);
        assert!(sample.std_Ea() > 0.0);
        assert_eq!(sample.len(), 4000);
    }

    #[test]
    fn zero_sigma_reproduces_fit_exactly() {
        let (temps, rates) = synthetic();
        let point = ArrheniusFitter::new(temps.clone(), rates.clone())
            .fit()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let sample = resample(&temps, &rates, &SigmaModel::Constant(0.0), 5, &mut rng).unwrap();
        for j in 0..sample.len() {
            assert_relative_eq!(sample.Ea[j], point.Ea, max_relative = 1e-9);
            assert_relative_eq!(sample.A[j], point.A, max_relative = 1e-9);
        }
    }

    #[test]
    fn correlated_covariance_is_seed_reproducible() {
        let (temps, rates) = synthetic();
        let cov = CovarianceModel::uniform_log10_diagonal_log2().build(temps.len());
        let sigma = SigmaModel::Covariance(cov);
        let mut rng1 = StdRng::seed_from_u64(11);
        let mut rng2 = StdRng::seed_from_u64(11);
        let s1 = resample(&temps, &rates, &sigma, 200, &mut rng1).unwrap();
        let s2 = resample(&temps, &rates, &sigma, 200, &mut rng2).unwrap();
        assert_eq!(s1.A, s2.A);
        assert_eq!(s1.Ea, s2.Ea);
        let point = ArrheniusFitter::new(temps.clone(), rates.clone())
            .fit()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(12);
        let big = resample(&temps, &rates, &sigma, 4000, &mut rng).unwrap();
        assert_relative_eq!(big.mean_Ea(), point.Ea, max_relative = 1e-2);
    }

    #[test]
    fn uniform_component_inflates_intercept_not_slope() {
        // a fully correlated term shifts every ln(k) equally, so it moves
        // ln(A) but cancels in the slope Ea
        let (temps, rates) = synthetic();
        let n = temps.len();
        let correlated = SigmaModel::Covariance(
            CovarianceModel::uniform_log10_diagonal_log2().build(n),
        );
        let diagonal_only =
            SigmaModel::Covariance(CovarianceModel::Diagonal(std::f64::consts::LN_2).build(n));
        let mut rng1 = StdRng::seed_from_u64(21);
        let mut rng2 = StdRng::seed_from_u64(21);
        let s_corr = resample(&temps, &rates, &correlated, 4000, &mut rng1).unwrap();
        let s_diag = resample(&temps, &rates, &diagonal_only, 4000, &mut rng2).unwrap();
        assert!(s_corr.std_ln_A() > 1.5 * s_diag.std_ln_A());
        assert_relative_eq!(s_corr.std_Ea(), s_diag.std_Ea(), max_relative = 0.15);
    }

    #[test]
    fn rejects_non_positive_definite_covariance() {
        let (temps, rates) = synthetic();
        let n = temps.len();
        // rank-1 all-ones matrix, PSD but singular
        let cov = DMatrix::from_element(n, n, 1.0);
        let mut rng = StdRng::seed_from_u64(0);
        let err = resample(&temps, &rates, &SigmaModel::Covariance(cov), 10, &mut rng).unwrap_err();
        assert!(matches!(err, KineticsError::InvalidInput(_)));
    }

    #[test]
    fn rejects_bad_sigma() {
        let (temps, rates) = synthetic();
        let mut rng = StdRng::seed_from_u64(0);
        let err = resample(
            &temps,
            &rates,
            &SigmaModel::Constant(-1.0),
            10,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, KineticsError::InvalidInput(_)));
        let err = resample(
            &temps,
            &rates,
            &SigmaModel::PerPoint(vec![0.1; 3]),
            10,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, KineticsError::InvalidInput(_)));
        let err = resample(
            &temps,
            &rates,
            &SigmaModel::Covariance(DMatrix::identity(3, 3)),
            10,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, KineticsError::InvalidInput(_)));
    }
}
