//! # Equilibrium of a single ideal-gas reaction
//!
//! ```
//! use GasEquilibrium::Thermodynamics::GasEquilibrium::ReactionModel::ReactionModel;
//! use GasEquilibrium::Thermodynamics::GasEquilibrium::Species::Species;
//! use GasEquilibrium::Thermodynamics::Shomate::ShomateCoeffs;
//! // N2 + 3H2 <-> 2NH3, Shomate coefficients from the NIST WebBook
//! let n2 = ShomateCoeffs::new(19.50583, 19.88705, -8.598535, 1.369784, 0.527601);
//! let h2 = ShomateCoeffs::new(33.066178, -11.363417, 11.432816, -2.772874, -0.158558);
//! let nh3 = ShomateCoeffs::new(19.99563, 49.77119, -15.37599, 1.921168, 0.189174);
//! let reactants = vec![
//!     Species::reactant("N2", 1.0, n2, 1.0).unwrap(),
//!     Species::reactant("H2", 3.0, h2, 3.0).unwrap(),
//! ];
//! let products = vec![Species::product("NH3", 2.0, nh3, 0.0).unwrap()];
//! let haber = ReactionModel::new(reactants, products, -92400.0, -198.3).unwrap();
//! // 673 K, 200 atm
//! let state = haber.calculate_conversion(673.0, 200.0).unwrap();
//! assert!(state.chi > 0.0 && state.chi < 1.0);
//! assert!((state.q - state.k).abs() <= 1e-8 * state.k);
//! state.pretty_print();
//! ```
/// map of the equilibrium extent over a temperature x pressure grid
pub mod ConversionMap;
/// bracketing state machine and Brent's method
pub mod EquilibriumSolver;
/// solved composition of one (T, P) point
pub mod EquilibriumState;
/// the reaction: ΔG(T), K(T), Q(χ, P), conversion solver
pub mod ReactionModel;
mod ReactionModel_tests;
pub mod Species;
pub mod errors;
