//! # Reaction task files
//!
//! A task is a JSON document describing one reaction and the operating points to solve it at:
//! ```json
//! {
//!   "reactants": [ {"name": "N2", "order": 1.0, "cp": [19.50583, 19.88705, -8.598535, 1.369784, 0.527601], "initial_moles": 1.0} ],
//!   "products":  [ {"name": "NH3", "order": 2.0, "cp": [19.99563, 49.77119, -15.37599, 1.921168, 0.189174], "initial_moles": 0.0, "t_range": [298.0, 1400.0]} ],
//!   "std_dh": -92400.0,
//!   "std_ds": -198.3,
//!   "conditions": [ {"temperature": 673.0, "pressure": 200.0} ],
//!   "grid": {"t_min": 300.0, "t_max": 2000.0, "t_points": 20, "p_min": 10.0, "p_max": 300.0, "p_points": 20, "key_reactant": "N2", "output": "map.json"},
//!   "solver": {"max_probes": 200}
//! }
//! ```
//! `cp` holds Shomate A..E (NIST A..H is accepted too). Everything is validated before a
//! `ReactionModel` is built.
use crate::Thermodynamics::GasEquilibrium::ConversionMap::{ConversionMap, linspace};
use crate::Thermodynamics::GasEquilibrium::EquilibriumSolver::SolverSettings;
use crate::Thermodynamics::GasEquilibrium::EquilibriumState::EquilibriumState;
use crate::Thermodynamics::GasEquilibrium::ReactionModel::ReactionModel;
use crate::Thermodynamics::GasEquilibrium::Species::{Role, Species};
use crate::Thermodynamics::GasEquilibrium::errors::ReactionError;
use crate::Thermodynamics::Shomate::ShomateCoeffs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesInput {
    pub name: String,
    pub order: f64,
    pub cp: Vec<f64>,
    pub initial_moles: f64,
    #[serde(default)]
    pub t_range: Option<(f64, f64)>,
}

impl SpeciesInput {
    fn to_species(&self, role: Role) -> Result<Species, ReactionError> {
        let mut cp = ShomateCoeffs::from_slice(&self.cp).map_err(|e| {
            ReactionError::InputDomain(format!("species {}: {}", self.name, e))
        })?;
        if let Some((t_min, t_max)) = self.t_range {
            if !(t_min > 0.0 && t_min < t_max) {
                return Err(ReactionError::InputDomain(format!(
                    "species {}: invalid Shomate range {} - {} K",
                    self.name, t_min, t_max
                )));
            }
            cp = cp.with_range(t_min, t_max);
        }
        Species::new(&self.name, self.order, role, cp, self.initial_moles)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// K
    pub temperature: f64,
    /// atm
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridInput {
    pub t_min: f64,
    pub t_max: f64,
    pub t_points: usize,
    pub p_min: f64,
    pub p_max: f64,
    pub p_points: usize,
    /// reactant whose conversion is reported alongside χ
    #[serde(default)]
    pub key_reactant: Option<String>,
    /// JSON file the map is written to
    #[serde(default)]
    pub output: Option<String>,
}

impl GridInput {
    pub fn temperatures(&self) -> Vec<f64> {
        linspace(self.t_min, self.t_max, self.t_points)
    }

    pub fn pressures(&self) -> Vec<f64> {
        linspace(self.p_min, self.p_max, self.p_points)
    }

    fn validate(&self) -> Result<(), ReactionError> {
        if !(self.t_min > 0.0 && self.t_max >= self.t_min && self.t_points > 0) {
            return Err(ReactionError::InputDomain(format!(
                "grid temperatures must be positive and ordered, got {} - {} K ({} points)",
                self.t_min, self.t_max, self.t_points
            )));
        }
        if !(self.p_min > 0.0 && self.p_max >= self.p_min && self.p_points > 0) {
            return Err(ReactionError::InputDomain(format!(
                "grid pressures must be positive and ordered, got {} - {} atm ({} points)",
                self.p_min, self.p_max, self.p_points
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionTask {
    pub reactants: Vec<SpeciesInput>,
    pub products: Vec<SpeciesInput>,
    /// J/mol at 298 K
    pub std_dh: f64,
    /// J/(mol*K) at 298 K
    pub std_ds: f64,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub grid: Option<GridInput>,
    #[serde(default)]
    pub solver: Option<SolverSettings>,
}

impl FromStr for ReactionTask {
    type Err = ReactionError;
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let task: ReactionTask = serde_json::from_str(text)
            .map_err(|e| ReactionError::TaskFile(format!("invalid task JSON: {}", e)))?;
        task.validate()?;
        Ok(task)
    }
}

/// results of every operating point of a task
#[derive(Debug)]
pub struct TaskResult {
    pub states: Vec<(Condition, Result<EquilibriumState, ReactionError>)>,
    pub map: Option<ConversionMap>,
}

impl ReactionTask {
    pub fn validate(&self) -> Result<(), ReactionError> {
        for c in &self.conditions {
            if !(c.temperature > 0.0 && c.temperature.is_finite()) {
                return Err(ReactionError::InputDomain(format!(
                    "temperature must be positive, got {} K",
                    c.temperature
                )));
            }
            if !(c.pressure > 0.0 && c.pressure.is_finite()) {
                return Err(ReactionError::InputDomain(format!(
                    "pressure must be positive, got {} atm",
                    c.pressure
                )));
            }
        }
        if let Some(grid) = &self.grid {
            grid.validate()?;
        }
        if let Some(settings) = &self.solver {
            settings.validate()?;
        }
        if self.conditions.is_empty() && self.grid.is_none() {
            warn!("task has neither conditions nor grid: nothing to solve");
        }
        Ok(())
    }

    pub fn build_model(&self) -> Result<ReactionModel, ReactionError> {
        let reactants = self
            .reactants
            .iter()
            .map(|s| s.to_species(Role::Reactant))
            .collect::<Result<Vec<_>, _>>()?;
        let products = self
            .products
            .iter()
            .map(|s| s.to_species(Role::Product))
            .collect::<Result<Vec<_>, _>>()?;
        let model = ReactionModel::new(reactants, products, self.std_dh, self.std_ds)?;
        match self.solver {
            Some(settings) => model.with_settings(settings),
            None => Ok(model),
        }
    }
    /// solves every condition and the grid; per-point failures are kept, not raised
    pub fn run(&self) -> Result<TaskResult, ReactionError> {
        let model = self.build_model()?;
        let states = self
            .conditions
            .iter()
            .map(|c| (*c, model.calculate_conversion(c.temperature, c.pressure)))
            .collect();
        let map = match &self.grid {
            Some(grid) => {
                let map = ConversionMap::compute(&model, &grid.temperatures(), &grid.pressures());
                if let Some(output) = &grid.output {
                    map.save_to_json(Path::new(output), &model, grid.key_reactant.as_deref())?;
                }
                Some(map)
            }
            None => None,
        };
        Ok(TaskResult { states, map })
    }
}

impl TaskResult {
    pub fn pretty_print(&self) {
        for (condition, state) in &self.states {
            match state {
                Ok(state) => state.pretty_print(),
                Err(e) => println!(
                    "T = {} K, P = {} atm: {}",
                    condition.temperature, condition.pressure, e
                ),
            }
        }
        if let Some(map) = &self.map {
            println!("__________extent of reaction over T (rows) and P (columns)__________");
            map.pretty_print();
        }
    }
}

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_task(&self) -> Result<ReactionTask, ReactionError> {
        load_task(&self.file_name)
    }
}

pub fn load_task(file_name: &str) -> Result<ReactionTask, ReactionError> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(ReactionError::TaskFile(format!(
            "File '{}' does not exist",
            file_name
        )));
    }
    let text = fs::read_to_string(path)
        .map_err(|e| ReactionError::TaskFile(format!("Failed to open file '{}': {}", file_name, e)))?;
    let task = ReactionTask::from_str(&text)?;
    info!(
        "task loaded from '{}': {} reactants, {} products, {} conditions",
        file_name,
        task.reactants.len(),
        task.products.len(),
        task.conditions.len()
    );
    Ok(task)
}
