use super::ReactionModel::ReactionModel;
use super::Species::Role;
use prettytable::{Table, row};
use serde::Serialize;

/// composition of one species at the solved extent of reaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesState {
    pub name: String,
    pub role: Role,
    pub initial_moles: f64,
    pub moles: f64,
    pub mole_fraction: f64,
}

/// solution of one (T, P) point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquilibriumState {
    /// temperature, K
    pub temperature: f64,
    /// atm
    pub pressure: f64,
    /// extent of reaction, as close to a limit as f64 allows; `species` keeps the exact moles
    pub chi: f64,
    /// open feasible interval the extent was searched in
    pub chi_bounds: (f64, f64),
    pub k: f64,
    /// reaction quotient at chi
    pub q: f64,
    /// Brent iterations spent
    pub iterations: usize,
    pub species: Vec<SpeciesState>,
}

impl EquilibriumState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model: &ReactionModel,
        temperature: f64,
        pressure: f64,
        chi: f64,
        moles: Vec<f64>,
        chi_bounds: (f64, f64),
        k: f64,
        q: f64,
        iterations: usize,
    ) -> Self {
        let total: f64 = moles.iter().sum();
        let species = model
            .species()
            .zip(moles)
            .map(|(s, n)| SpeciesState {
                name: s.name.clone(),
                role: s.role,
                initial_moles: s.initial_moles,
                moles: n,
                mole_fraction: n / total,
            })
            .collect();
        Self {
            temperature,
            pressure,
            chi,
            chi_bounds,
            k,
            q,
            iterations,
            species,
        }
    }

    pub fn total_moles(&self) -> f64 {
        self.species.iter().map(|s| s.moles).sum()
    }

    pub fn get(&self, name: &str) -> Option<&SpeciesState> {
        self.species.iter().find(|s| s.name == name)
    }

    pub fn moles_of(&self, name: &str) -> Option<f64> {
        self.get(name).map(|s| s.moles)
    }

    pub fn mole_fraction_of(&self, name: &str) -> Option<f64> {
        self.get(name).map(|s| s.mole_fraction)
    }
    /// share of the initial amount of a reactant consumed, None for products and absent species
    pub fn conversion_of(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|s| match s.role {
            Role::Reactant if s.initial_moles > 0.0 => {
                Some((s.initial_moles - s.moles) / s.initial_moles)
            }
            _ => None,
        })
    }

    pub fn pretty_print(&self) {
        println!(
            "__________equilibrium at {} K, {} atm__________",
            self.temperature, self.pressure
        );
        let mut table = Table::new();
        table.add_row(row!["chi", "chi_min", "chi_max", "K", "Q", "iterations"]);
        table.add_row(row![
            format!("{:.6}", self.chi),
            self.chi_bounds.0,
            self.chi_bounds.1,
            format!("{:e}", self.k),
            format!("{:e}", self.q),
            self.iterations
        ]);
        table.printstd();
        let mut table = Table::new();
        table.add_row(row!["substance", "role", "n0", "n", "x"]);
        for s in &self.species {
            table.add_row(row![
                s.name,
                s.role,
                s.initial_moles,
                format!("{:.6}", s.moles),
                format!("{:.6}", s.mole_fraction)
            ]);
        }
        table.printstd();
    }
}
