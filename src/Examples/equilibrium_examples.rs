use crate::Thermodynamics::GasEquilibrium::ConversionMap::{ConversionMap, linspace};
use crate::Thermodynamics::GasEquilibrium::ReactionModel::ReactionModel;
use crate::Thermodynamics::GasEquilibrium::Species::Species;
use crate::Thermodynamics::GasEquilibrium::errors::ReactionError;
use crate::Thermodynamics::Shomate::ShomateCoeffs;
use log::error;
use prettytable::{Table, row};
use std::path::Path;

// NIST Shomate A..E, 298-1200 K (NH3 298-1400 K)
const N2: [f64; 5] = [19.50583, 19.88705, -8.598535, 1.369784, 0.527601];
const H2: [f64; 5] = [33.066178, -11.363417, 11.432816, -2.772874, -0.158558];
const NH3: [f64; 5] = [19.99563, 49.77119, -15.37599, 1.921168, 0.189174];

/// N2 + 3H2 <-> 2NH3 starting from the given moles of each species
pub fn haber_model(n2: f64, h2: f64, nh3: f64) -> Result<ReactionModel, ReactionError> {
    let reactants = vec![
        Species::reactant("N2", 1.0, ShomateCoeffs::from_slice(&N2)?, n2)?,
        Species::reactant("H2", 3.0, ShomateCoeffs::from_slice(&H2)?, h2)?,
    ];
    let products = vec![Species::product("NH3", 2.0, ShomateCoeffs::from_slice(&NH3)?, nh3)?];
    ReactionModel::new(reactants, products, -92400.0, -198.3)
}

pub fn equilibrium_examples(task: usize) {
    match task {
        0 => {
            // stoichiometric feed at 673 K and 200 atm
            let state = haber_model(1.0, 3.0, 0.0).and_then(|m| m.calculate_conversion(673.0, 200.0));
            match state {
                Ok(state) => {
                    state.pretty_print();
                    println!(
                        "N2 conversion: {:.4}",
                        state.conversion_of("N2").unwrap_or(f64::NAN)
                    );
                }
                Err(e) => error!("{}", e),
            }
        }
        1 => {
            // extent of reaction over 300-2000 K and 10-300 atm, written for a heatmap
            let model = match haber_model(1.0, 3.0, 0.0) {
                Ok(model) => model,
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            };
            let temperatures = linspace(300.0, 2000.0, 18);
            let pressures = linspace(10.0, 300.0, 8);
            let map = ConversionMap::compute(&model, &temperatures, &pressures);
            map.pretty_print();
            if let Err(e) = map.save_to_json(Path::new("haber_map.json"), &model, Some("N2")) {
                error!("{}", e);
            }
        }
        2 => {
            // pure ammonia decomposes: the extent is negative
            let state = haber_model(0.0, 0.0, 2.0).and_then(|m| m.calculate_conversion(673.0, 1.0));
            match state {
                Ok(state) => state.pretty_print(),
                Err(e) => error!("{}", e),
            }
        }
        3 => {
            // K(T) from the closed-form ΔG(T) against the numeric one
            let model = match haber_model(1.0, 3.0, 0.0) {
                Ok(model) => model,
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            };
            let (_, _, dg_sym) = model.calculate_rxn_gibbs_sym();
            println!("dG(T) = {}", dg_sym);
            let dg_fun = dg_sym.lambdify1D();
            let mut table = Table::new();
            table.add_row(row!["T, K", "dG numeric", "dG symbolic", "K"]);
            for T in linspace(300.0, 1200.0, 10) {
                match model.calculate_rxn_gibbs(T).and_then(|(_, _, dg)| {
                    model.calculate_rxn_k(T).map(|k| (dg, k))
                }) {
                    Ok((dg, k)) => {
                        table.add_row(row![
                            T,
                            format!("{:.2}", dg),
                            format!("{:.2}", dg_fun(T)),
                            format!("{:e}", k)
                        ]);
                    }
                    Err(e) => error!("{}", e),
                }
            }
            table.printstd();
        }
        _ => {
            println!("no such example: {}", task);
        }
    }
}
