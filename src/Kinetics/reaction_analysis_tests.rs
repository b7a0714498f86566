/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Kinetics::errors::KineticsError;
    use crate::Kinetics::monte_carlo::SigmaModel;
    use crate::Kinetics::partition_function::{
        AnalyticTsPartFun, Barriers, ConstantPartFun, PartitionFunction,
    };
    use crate::Kinetics::reaction_analysis::ReactionAnalysis;
    use crate::Kinetics::tunneling::{TunnelingCorrection, TunnelingEnum, Wigner};
    use crate::Utils::physical_constants::{GAS_CONSTANT, KJMOL};
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::fs;
    use tempfile::NamedTempFile;

    /// Bimolecular addition validated in the original toolkit: two reactants,
    /// published reference values Ea = 25.96 kJ/mol, A = 2.29e2.
    fn bimolecular_analysis() -> ReactionAnalysis {
        let a0 = 2.29e2;
        let ea0 = 25.96 * KJMOL;
        let reactants: Vec<Box<dyn PartitionFunction>> = vec![
            Box::new(ConstantPartFun::new(1.0)),
            Box::new(ConstantPartFun::new(1.0)),
        ];
        let ts = Box::new(AnalyticTsPartFun::new(a0));
        ReactionAnalysis::new(reactants, ts, AnalyticTsPartFun::barriers(ea0), 280.0, 360.0)
            .unwrap()
    }

    #[test]
    fn recovers_published_reference_values() {
        let ra = bimolecular_analysis();
        assert_relative_eq!(ra.Ea() / KJMOL, 25.96, epsilon = 0.05);
        assert_relative_eq!(ra.A().ln(), 2.29e2_f64.ln(), epsilon = 0.05);
        assert_eq!(ra.order(), 2);
        assert_eq!(ra.unit(), "m³/(mol·s)");
    }

    #[test]
    fn grid_is_inclusive_with_default_step() {
        let ra = bimolecular_analysis();
        assert_eq!(ra.series.len(), 9); // 280, 290, ..., 360
        assert_relative_eq!(ra.series.temps[0], 280.0);
        assert_relative_eq!(*ra.series.temps.last().unwrap(), 360.0);
    }

    #[test]
    fn compute_rate_matches_series() {
        let ra = bimolecular_analysis();
        for (t, k) in ra.series.temps.iter().zip(&ra.series.rates) {
            assert_relative_eq!(ra.compute_rate(*t), *k, max_relative = 1e-12);
        }
        // and the analytic law itself
        let ea0 = 25.96 * KJMOL;
        let k300 = ra.compute_rate(300.0);
        assert_relative_eq!(
            k300,
            2.29e2 * (-ea0 / (GAS_CONSTANT * 300.0)).exp(),
            max_relative = 1e-10
        );
    }

    #[test]
    fn unimolecular_with_custom_step() {
        let reactants: Vec<Box<dyn PartitionFunction>> =
            vec![Box::new(ConstantPartFun::new(1.0))];
        let ts = Box::new(AnalyticTsPartFun::new(3.33e10));
        let ra = ReactionAnalysis::with_options(
            reactants,
            ts,
            AnalyticTsPartFun::barriers(160.6 * KJMOL),
            100.0,
            1200.0,
            Some(50.0),
            None,
            None,
        )
        .unwrap();
        assert_eq!(ra.order(), 1);
        assert_eq!(ra.unit(), "1/s");
        assert_eq!(ra.series.len(), 23); // 100, 150, ..., 1200
        assert_relative_eq!(ra.Ea() / KJMOL, 160.6, epsilon = 0.5);
        assert_relative_eq!(ra.A().ln(), 3.33e10_f64.ln(), epsilon = 0.5);
    }

    #[test]
    fn weighted_fit_through_options_matches_on_exact_data() {
        // the series follows the exact Arrhenius law, so reweighting the
        // points cannot move the estimate; only the covariance changes
        // through the implied observation covariance W⁻¹
        let unweighted = bimolecular_analysis();
        let n = unweighted.series.len();
        let weights = DMatrix::from_fn(n, n, |i, j| {
            if i == j { 1.0 + i as f64 } else { 0.0 }
        });
        let reactants: Vec<Box<dyn PartitionFunction>> = vec![
            Box::new(ConstantPartFun::new(1.0)),
            Box::new(ConstantPartFun::new(1.0)),
        ];
        let weighted = ReactionAnalysis::with_options(
            reactants,
            Box::new(AnalyticTsPartFun::new(2.29e2)),
            AnalyticTsPartFun::barriers(25.96 * KJMOL),
            280.0,
            360.0,
            None,
            None,
            Some(weights),
        )
        .unwrap();
        assert_relative_eq!(weighted.Ea(), unweighted.Ea(), max_relative = 1e-9);
        assert_relative_eq!(
            weighted.fit.ln_A,
            unweighted.fit.ln_A,
            max_relative = 1e-9
        );
        assert!(
            (weighted.fit.covariance[(1, 1)] - unweighted.fit.covariance[(1, 1)]).abs()
                > 1e-3 * unweighted.fit.covariance[(1, 1)]
        );
    }

    #[test]
    fn wigner_correction_raises_low_temperature_rates() {
        let reactants: Vec<Box<dyn PartitionFunction>> =
            vec![Box::new(ConstantPartFun::new(1.0))];
        let ts = Box::new(AnalyticTsPartFun::with_imaginary_frequency(1.0e10, 1500.0));
        let wigner = Wigner::from_partition_function(ts.as_ref()).unwrap();
        let kappa300 = wigner.factor(300.0);
        let corrected = ReactionAnalysis::with_options(
            reactants,
            ts,
            AnalyticTsPartFun::barriers(90.0 * KJMOL),
            250.0,
            450.0,
            None,
            Some(TunnelingEnum::Wigner(wigner)),
            None,
        )
        .unwrap();
        let plain_reactants: Vec<Box<dyn PartitionFunction>> =
            vec![Box::new(ConstantPartFun::new(1.0))];
        let plain = ReactionAnalysis::new(
            plain_reactants,
            Box::new(AnalyticTsPartFun::new(1.0e10)),
            AnalyticTsPartFun::barriers(90.0 * KJMOL),
            250.0,
            450.0,
        )
        .unwrap();
        assert_relative_eq!(
            corrected.compute_rate(300.0),
            plain.compute_rate(300.0) * kappa300,
            max_relative = 1e-12
        );
        // tunneling lowers the apparent activation energy
        assert!(corrected.Ea() < plain.Ea());
    }

    #[test]
    fn monte_carlo_is_seed_reproducible_and_leaves_fit_alone() {
        let ra = bimolecular_analysis();
        let ea_before = ra.Ea();
        let mut rng1 = StdRng::seed_from_u64(2024);
        let mut rng2 = StdRng::seed_from_u64(2024);
        let s1 = ra.monte_carlo(100, None, &mut rng1).unwrap();
        let s2 = ra.monte_carlo(100, None, &mut rng2).unwrap();
        assert_eq!(s1.A, s2.A);
        assert_eq!(s1.Ea, s2.Ea);
        assert_eq!(s1.len(), 100);
        assert_relative_eq!(ra.Ea(), ea_before);
        let tight = ra
            .monte_carlo(500, Some(SigmaModel::Constant(0.05)), &mut rng1)
            .unwrap();
        assert_relative_eq!(tight.mean_Ea(), ra.Ea(), max_relative = 5e-3);
    }

    #[test]
    fn report_is_written_and_readable() {
        let ra = bimolecular_analysis();
        let file = NamedTempFile::new().unwrap();
        ra.write_to_file(file.path()).unwrap();
        let text = fs::read_to_string(file.path()).unwrap();
        assert!(text.contains("reaction order: 2"));
        assert!(text.contains("Ea [kJ/mol]"));
        assert!(text.contains("covariance of (ln A, Ea):"));
        // one line per grid point after the header
        let data_lines = text
            .lines()
            .skip_while(|l| !l.starts_with("T [K]"))
            .skip(1)
            .count();
        assert_eq!(data_lines, ra.series.len());
    }

    #[test]
    fn rejects_empty_reactants_and_bad_grid() {
        let err = ReactionAnalysis::new(
            vec![],
            Box::new(AnalyticTsPartFun::new(1.0)),
            Barriers::new(1.0 * KJMOL, 1.0 * KJMOL),
            280.0,
            360.0,
        )
        .unwrap_err();
        assert!(matches!(err, KineticsError::InvalidInput(_)));
        let reactants: Vec<Box<dyn PartitionFunction>> =
            vec![Box::new(ConstantPartFun::new(1.0))];
        let err = ReactionAnalysis::new(
            reactants,
            Box::new(AnalyticTsPartFun::new(1.0)),
            Barriers::new(1.0 * KJMOL, 1.0 * KJMOL),
            360.0,
            280.0,
        )
        .unwrap_err();
        assert!(matches!(err, KineticsError::InvalidInput(_)));
    }
}
