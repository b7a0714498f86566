use crate::Kinetics::experimental::{CovarianceModel, fit_experimental, get_error_color};
use crate::Kinetics::monte_carlo::SigmaModel;
use crate::Kinetics::partition_function::{AnalyticTsPartFun, ConstantPartFun, PartitionFunction};
use crate::Kinetics::reaction_analysis::ReactionAnalysis;
use crate::Kinetics::tunneling::{TunnelingEnum, Wigner};
use crate::Utils::physical_constants::{GAS_CONSTANT, KJMOL};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub fn rate_examples(task: usize) {
    //

    match task {
        0 => {
            // BIMOLECULAR REACTION ANALYSIS
            // two reactants + analytic transition state reproducing the
            // published reference values Ea = 25.96 kJ/mol, A = 2.29e2
            let reactants: Vec<Box<dyn PartitionFunction>> = vec![
                Box::new(ConstantPartFun::new(1.0)),
                Box::new(ConstantPartFun::new(1.0)),
            ];
            let ts = Box::new(AnalyticTsPartFun::new(2.29e2));
            let barriers = AnalyticTsPartFun::barriers(25.96 * KJMOL);
            let ra = ReactionAnalysis::new(reactants, ts, barriers, 280.0, 360.0).unwrap();
            ra.pretty_print();
            assert!((ra.Ea() / KJMOL - 25.96).abs() < 0.1);
            println!("A = {:.4e} {}", ra.A(), ra.unit());
            println!("Ea = {:.4} kJ/mol", ra.Ea() / KJMOL);
        }
        1 => {
            // WIGNER TUNNELING CORRECTION
            let reactants: Vec<Box<dyn PartitionFunction>> =
                vec![Box::new(ConstantPartFun::new(1.0))];
            let ts = Box::new(AnalyticTsPartFun::with_imaginary_frequency(3.33e10, 1520.0));
            let wigner = Wigner::from_partition_function(ts.as_ref()).unwrap();
            let ra = ReactionAnalysis::with_options(
                reactants,
                ts,
                AnalyticTsPartFun::barriers(160.6 * KJMOL),
                100.0,
                1200.0,
                Some(50.0),
                Some(TunnelingEnum::Wigner(wigner)),
                None,
            )
            .unwrap();
            ra.pretty_print();
            println!("corrected Ea = {:.4} kJ/mol", ra.Ea() / KJMOL);
        }
        2 => {
            // MONTE CARLO UNCERTAINTY ESTIMATION
            let reactants: Vec<Box<dyn PartitionFunction>> = vec![
                Box::new(ConstantPartFun::new(1.0)),
                Box::new(ConstantPartFun::new(1.0)),
            ];
            let ts = Box::new(AnalyticTsPartFun::new(2.29e2));
            let barriers = AnalyticTsPartFun::barriers(25.96 * KJMOL);
            let ra = ReactionAnalysis::new(reactants, ts, barriers, 280.0, 360.0).unwrap();
            let mut rng = StdRng::seed_from_u64(2024);
            let sample = ra
                .monte_carlo(1000, Some(SigmaModel::factor_of_two()), &mut rng)
                .unwrap();
            println!(
                "Ea = {:.3} ± {:.3} kJ/mol",
                sample.mean_Ea() / KJMOL,
                sample.std_Ea() / KJMOL
            );
            println!(
                "ln(A) = {:.3} ± {:.3}",
                sample.mean_ln_A(),
                sample.std_ln_A()
            );
            let report = std::env::temp_dir().join("reaction_aa.txt");
            ra.write_to_file(&report).unwrap();
            println!("report written to {:?}", report);
        }
        3 => {
            // EXPERIMENTAL COMPARISON
            // modified-Arrhenius dataset fitted with the ln10/ln2 covariance
            let temps = [300.0, 400.0, 500.0, 600.0];
            let c = 7.19e-15 * 1e-6 * 6.02214076e23;
            let rates: Vec<f64> = temps
                .iter()
                .map(|&t| {
                    c * (t / 298.0_f64).powf(2.44) * (-22.45 * KJMOL / (GAS_CONSTANT * t)).exp()
                })
                .collect();
            let fit = fit_experimental(
                &temps,
                &rates,
                &CovarianceModel::uniform_log10_diagonal_log2(),
            )
            .unwrap();
            println!("experimental A = {:.4e}", fit.A);
            println!("experimental Ea = {:.4} kJ/mol", fit.Ea_kjmol());
            for (&t, &k) in temps.iter().zip(&rates) {
                let residual = k.ln() - (fit.ln_A - fit.Ea / (GAS_CONSTANT * t));
                let ratio = residual / 2f64.ln();
                println!(
                    "T = {} K: deviation {:.3} error bars, color {}",
                    t,
                    ratio,
                    get_error_color(ratio)
                );
            }
        }
        _ => {
            println!("no such example");
        }
    }
}
