#[cfg(test)]
mod tests {
    use crate::Thermodynamics::GasEquilibrium::ConversionMap::{ConversionMap, linspace};
    use crate::Thermodynamics::GasEquilibrium::EquilibriumSolver::SolverSettings;
    use crate::Thermodynamics::GasEquilibrium::ReactionModel::{ExtentEdge, ReactionModel};
    use crate::Thermodynamics::GasEquilibrium::Species::{Role, Species};
    use crate::Thermodynamics::GasEquilibrium::errors::ReactionError;
    use crate::Thermodynamics::Shomate::ShomateCoeffs;
    use crate::Thermodynamics::constants::{R, T_REF};
    use approx::assert_relative_eq;

    const N2: [f64; 5] = [19.50583, 19.88705, -8.598535, 1.369784, 0.527601];
    const H2: [f64; 5] = [33.066178, -11.363417, 11.432816, -2.772874, -0.158558];
    const NH3: [f64; 5] = [19.99563, 49.77119, -15.37599, 1.921168, 0.189174];
    const SO2: [f64; 5] = [21.43049, 74.35094, -57.75217, 16.35534, 0.086731];
    const O2: [f64; 5] = [30.03235, 8.772972, -3.988133, 0.788313, -0.741599];
    const SO3: [f64; 5] = [24.02503, 119.4607, -94.38686, 26.96237, -0.117517];

    fn cp(c: &[f64; 5]) -> ShomateCoeffs {
        ShomateCoeffs::from_slice(c).unwrap()
    }

    fn zero_cp() -> ShomateCoeffs {
        ShomateCoeffs::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }

    fn haber() -> ReactionModel {
        let reactants = vec![
            Species::reactant("N2", 1.0, cp(&N2), 1.0).unwrap(),
            Species::reactant("H2", 3.0, cp(&H2), 3.0).unwrap(),
        ];
        let products = vec![Species::product("NH3", 2.0, cp(&NH3), 0.0).unwrap()];
        ReactionModel::new(reactants, products, -92400.0, -198.3).unwrap()
    }
    /// A <-> B with Cp = 0, so K = exp(-(dh - T*ds)/(R*T)) exactly
    fn isomerization(a0: f64, b0: f64, std_dh: f64, std_ds: f64) -> ReactionModel {
        ReactionModel::new(
            vec![Species::reactant("A", 1.0, zero_cp(), a0).unwrap()],
            vec![Species::product("B", 1.0, zero_cp(), b0).unwrap()],
            std_dh,
            std_ds,
        )
        .unwrap()
    }

    #[test]
    fn test_reference_temperature_gives_standard_values() {
        let model = haber();
        let (dh, ds, dg) = model.calculate_rxn_gibbs(T_REF).unwrap();
        assert_eq!(dh, -92400.0);
        assert_eq!(ds, -198.3);
        assert_relative_eq!(dg, -92400.0 + T_REF * 198.3, epsilon = 1e-9);
    }

    #[test]
    fn test_delta_gamma() {
        assert_eq!(haber().delta_gamma(), -2.0);
        assert_eq!(isomerization(1.0, 0.0, 0.0, 0.0).delta_gamma(), 0.0);
    }

    #[test]
    fn test_k_positive_and_decreasing_for_exothermic_reaction() {
        let model = haber();
        let mut previous = f64::INFINITY;
        for T in [300.0, 400.0, 500.0, 673.0, 800.0, 1000.0, 1500.0] {
            let k = model.calculate_rxn_k(T).unwrap();
            assert!(k > 0.0 && k.is_finite());
            assert!(k < previous, "K must fall with T for an exothermic reaction");
            previous = k;
        }
    }

    #[test]
    fn test_k_of_constant_cp_reaction() {
        let T = 500.0;
        let model = isomerization(1.0, 0.0, 10_000.0, 5.0);
        let expected = (-(10_000.0 - T * 5.0) / (R * T)).exp();
        assert_relative_eq!(
            model.calculate_rxn_k(T).unwrap(),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_k_overflow_is_reported() {
        let model = isomerization(1.0, 0.0, -5.0e6, 0.0);
        match model.calculate_rxn_k(300.0) {
            Err(ReactionError::NumericOverflow { ln_k, temperature }) => {
                assert!(ln_k > 700.0);
                assert_eq!(temperature, 300.0);
            }
            other => panic!("expected overflow, got {:?}", other),
        }
        let model = isomerization(1.0, 0.0, 5.0e6, 0.0);
        assert!(matches!(
            model.calculate_conversion(300.0, 1.0),
            Err(ReactionError::NumericOverflow { .. })
        ));
    }

    #[test]
    fn test_quotient_monotonic_for_isomerization() {
        let model = isomerization(1.0, 0.0, 0.0, 0.0);
        let mut previous = -1.0;
        for i in 1..100 {
            let chi = i as f64 / 100.0;
            let q = model.reaction_equation(chi, 5.0).unwrap();
            assert_relative_eq!(q, chi / (1.0 - chi), max_relative = 1e-12);
            assert!(q > previous);
            previous = q;
        }
    }

    #[test]
    fn test_quotient_domain_guards() {
        let model = haber();
        // past the limiting reactant
        assert!(matches!(
            model.reaction_equation(1.0, 10.0),
            Err(ReactionError::QuotientDomain { .. })
        ));
        assert!(model.reaction_equation(1.2, 10.0).is_err());
        // backwards with no product present
        assert!(matches!(
            model.reaction_equation(-0.1, 10.0),
            Err(ReactionError::QuotientDomain { .. })
        ));
        // no product yet: Q = 0
        assert_eq!(model.reaction_equation(0.0, 10.0).unwrap(), 0.0);
        assert!(matches!(
            model.reaction_equation(0.5, 0.0),
            Err(ReactionError::InputDomain(_))
        ));
    }

    #[test]
    fn test_quotient_of_haber_reaction() {
        let model = haber();
        let (chi, P): (f64, f64) = (0.4, 150.0);
        let expected = (2.0 * chi).powi(2) * (4.0 - 2.0 * chi).powi(2)
            / ((1.0 - chi) * (3.0 - 3.0 * chi).powi(3) * P.powi(2));
        assert_relative_eq!(
            model.reaction_equation(chi, P).unwrap(),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_haber_conversion() {
        let model = haber();
        let state = model.calculate_conversion(673.0, 200.0).unwrap();
        assert!(state.chi > 0.0 && state.chi < 1.0);
        assert_relative_eq!(state.chi, 0.534, epsilon = 0.01);
        // round trip
        let q = model.reaction_equation(state.chi, 200.0).unwrap();
        assert_relative_eq!(q, state.k, max_relative = 1e-8);
        assert_eq!(state.chi_bounds, (0.0, 1.0));
        // composition
        assert_relative_eq!(state.moles_of("NH3").unwrap(), 2.0 * state.chi);
        assert_relative_eq!(state.total_moles(), 4.0 - 2.0 * state.chi, epsilon = 1e-12);
        let x_sum: f64 = state.species.iter().map(|s| s.mole_fraction).sum();
        assert_relative_eq!(x_sum, 1.0, epsilon = 1e-12);
        assert_relative_eq!(state.conversion_of("N2").unwrap(), state.chi, epsilon = 1e-12);
        assert_relative_eq!(state.conversion_of("H2").unwrap(), state.chi, epsilon = 1e-12);
        assert!(state.conversion_of("NH3").is_none());
    }

    #[test]
    fn test_haber_le_chatelier() {
        let model = haber();
        let mut previous = 0.0;
        for P in [1.0, 50.0, 100.0, 200.0, 300.0] {
            let chi = model.calculate_conversion(673.0, P).unwrap().chi;
            assert!(chi > previous, "chi must grow with P when Δγ < 0");
            assert!(chi < 1.0);
            previous = chi;
        }
        // and fall with T for an exothermic reaction
        let cold = model.calculate_conversion(500.0, 100.0).unwrap().chi;
        let hot = model.calculate_conversion(800.0, 100.0).unwrap().chi;
        assert!(cold > hot);
    }

    #[test]
    fn test_unfavourable_reaction_stays_near_lower_pole() {
        // K ~ 3.6e-11
        let model = isomerization(1.0, 0.0, 100_000.0, 0.0);
        let state = model.calculate_conversion(500.0, 1.0).unwrap();
        assert!(state.chi > 0.0 && state.chi < 1e-9);
        assert_relative_eq!(state.chi, state.k / (1.0 + state.k), max_relative = 1e-6);
        // K ~ 1e-105
        let model = isomerization(1.0, 0.0, 1.0e6, 0.0);
        let state = model.calculate_conversion(500.0, 1.0).unwrap();
        assert!(state.chi > 0.0);
        assert_relative_eq!(state.chi, state.k, max_relative = 1e-6);
    }

    #[test]
    fn test_strongly_favourable_reaction_resolved_near_upper_limit() {
        // ln K = ΔS/R when ΔH = 0 and Cp = 0; 1 - χ drops far below the f64 spacing near 1
        for ln_k in [48.0, 240.0] {
            let model = isomerization(1.0, 0.0, 0.0, ln_k * R);
            let state = model.calculate_conversion(500.0, 1.0).unwrap();
            assert_relative_eq!(state.k.ln(), ln_k, max_relative = 1e-12);
            assert_relative_eq!(state.q, state.k, max_relative = 1e-8);
            assert_relative_eq!(
                state.moles_of("A").unwrap(),
                1.0 / (1.0 + state.k),
                max_relative = 1e-8
            );
            assert_relative_eq!(state.moles_of("B").unwrap(), 1.0);
            assert!(state.chi > 0.999 && state.chi <= 1.0);
        }
    }

    #[test]
    fn test_moles_near_extent_limits() {
        let model = haber();
        let (chi, moles) = model.mole_numbers_near(ExtentEdge::Upper, 1e-30).unwrap();
        assert_eq!(chi, 1.0);
        assert_eq!(moles[0], 1e-30);
        assert_relative_eq!(moles[1], 3e-30, max_relative = 1e-15);
        assert_eq!(moles[2], 2.0);
        // χ = 1.0 itself exhausts N2, the offset form still has a finite Q
        assert!(model.reaction_equation(chi, 10.0).is_err());
        let q = model
            .reaction_equation_near(ExtentEdge::Upper, 1e-30, 10.0)
            .unwrap();
        assert!(q.is_finite() && q > 1e100);
        let (chi, moles) = model.mole_numbers_near(ExtentEdge::Lower, 0.25).unwrap();
        assert_eq!(chi, 0.25);
        assert_eq!(moles, model.mole_numbers(0.25));
    }

    #[test]
    fn test_reverse_reaction_from_products() {
        // K = 0.25 at 500 K, starting from equal amounts: the reaction runs backwards
        let T = 500.0;
        let std_dh = -R * T * 0.25_f64.ln();
        let model = isomerization(0.5, 0.5, std_dh, 0.0);
        let state = model.calculate_conversion(T, 3.0).unwrap();
        assert_eq!(state.chi_bounds, (-0.5, 0.5));
        assert_relative_eq!(state.chi, -0.3, epsilon = 1e-8);
        assert_relative_eq!(state.moles_of("B").unwrap(), 0.2, epsilon = 1e-8);
    }

    #[test]
    fn test_fractional_stoichiometry() {
        // SO2 + 1/2 O2 <-> SO3
        let model = ReactionModel::new(
            vec![
                Species::reactant("SO2", 1.0, cp(&SO2), 2.0).unwrap(),
                Species::reactant("O2", 0.5, cp(&O2), 1.0).unwrap(),
            ],
            vec![Species::product("SO3", 1.0, cp(&SO3), 0.0).unwrap()],
            -98900.0,
            -94.0,
        )
        .unwrap();
        assert_eq!(model.delta_gamma(), -0.5);
        let state = model.calculate_conversion(900.0, 1.0).unwrap();
        assert!(state.chi > 0.0 && state.chi < 2.0);
        let q = model.reaction_equation(state.chi, 1.0).unwrap();
        assert_relative_eq!(q, state.k, max_relative = 1e-8);
        let low = model.calculate_conversion(900.0, 0.5).unwrap().chi;
        assert!(low < state.chi);
    }

    #[test]
    fn test_input_domain_errors() {
        let model = haber();
        assert!(matches!(
            model.calculate_conversion(0.0, 200.0),
            Err(ReactionError::InputDomain(_))
        ));
        assert!(matches!(
            model.calculate_conversion(-10.0, 200.0),
            Err(ReactionError::InputDomain(_))
        ));
        assert!(matches!(
            model.calculate_conversion(673.0, 0.0),
            Err(ReactionError::InputDomain(_))
        ));
        assert!(model.calculate_rxn_gibbs(f64::NAN).is_err());
    }

    #[test]
    fn test_model_construction_rules() {
        let a = Species::reactant("A", 1.0, zero_cp(), 1.0).unwrap();
        let b = Species::product("B", 1.0, zero_cp(), 0.0).unwrap();
        assert!(ReactionModel::new(vec![], vec![b.clone()], 0.0, 0.0).is_err());
        // role must match the list
        assert!(ReactionModel::new(vec![a.clone()], vec![a.clone()], 0.0, 0.0).is_err());
        assert!(ReactionModel::new(vec![a.clone()], vec![b.clone()], f64::NAN, 0.0).is_err());
        // nothing to react in either direction
        let empty_a = Species::new("A", 1.0, Role::Reactant, zero_cp(), 0.0).unwrap();
        let model = ReactionModel::new(vec![empty_a], vec![b], 0.0, 0.0).unwrap();
        assert!(matches!(
            model.calculate_conversion(500.0, 1.0),
            Err(ReactionError::InputDomain(_))
        ));
        let bad = SolverSettings {
            max_probes: 0,
            ..SolverSettings::default()
        };
        assert!(haber().with_settings(bad).is_err());
    }

    #[test]
    fn test_small_probe_budget_reports_no_bracket() {
        let settings = SolverSettings {
            max_probes: 2,
            interior_points: 2,
            ..SolverSettings::default()
        };
        let model = isomerization(1.0, 0.0, 100_000.0, 0.0)
            .with_settings(settings)
            .unwrap();
        assert!(matches!(
            model.calculate_conversion(500.0, 1.0),
            Err(ReactionError::NoBracket { probes: 2, .. })
        ));
    }

    #[test]
    fn test_symbolic_gibbs_matches_numeric() {
        let model = haber();
        let (dh_sym, ds_sym, dg_sym) = model.calculate_rxn_gibbs_sym();
        for T in [400.0, 673.0, 900.0] {
            let (dh, ds, dg) = model.calculate_rxn_gibbs(T).unwrap();
            assert_relative_eq!(dh_sym.lambdify1D()(T), dh, max_relative = 1e-9);
            assert_relative_eq!(ds_sym.lambdify1D()(T), ds, max_relative = 1e-9);
            assert_relative_eq!(dg_sym.lambdify1D()(T), dg, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_conversion_map_matches_point_solves() {
        let model = haber();
        let temperatures = linspace(500.0, 900.0, 5);
        let pressures = linspace(10.0, 300.0, 4);
        let map = ConversionMap::compute(&model, &temperatures, &pressures);
        assert_eq!(map.cells.len(), 5);
        assert!(map.cells.iter().all(|row| row.len() == 4));
        assert!(map.failures().is_empty());
        for (i, T) in temperatures.iter().enumerate() {
            for (j, P) in pressures.iter().enumerate() {
                let chi = *map.get(i, j).unwrap().as_ref().unwrap();
                let direct = model.calculate_conversion(*T, *P).unwrap().chi;
                assert_relative_eq!(chi, direct, epsilon = 1e-12);
            }
        }
        let conversion = map.conversion_of(&model, "H2").unwrap();
        assert_relative_eq!(
            conversion[0][0].unwrap(),
            map.chi_grid()[0][0].unwrap(),
            epsilon = 1e-12
        );
        assert!(map.conversion_of(&model, "NH3").is_err());
    }

    #[test]
    fn test_conversion_map_records_failures() {
        let model = isomerization(1.0, 0.0, 5.0e6, 0.0);
        // ln K ~ -2000 at 300 K, ~ -300 at 2000 K
        let map = ConversionMap::compute(&model, &[300.0, 2000.0], &[1.0, 2.0]);
        assert!(matches!(
            map.get(0, 0),
            Some(Err(ReactionError::NumericOverflow { .. }))
        ));
        assert!(map.get(1, 1).unwrap().is_ok());
        assert_eq!(map.failures().len(), 2);
    }

    #[test]
    fn test_conversion_map_json() {
        let model = haber();
        let map = ConversionMap::compute(&model, &[600.0, 700.0], &[100.0]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        map.save_to_json(&path, &model, Some("N2")).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["temperatures"].as_array().unwrap().len(), 2);
        assert_eq!(value["conversion"][0], "N2");
        assert!(value["errors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
