//! # Temperature x pressure conversion map
//!
//! Scans one `ReactionModel` over a rectangular grid. K(T) is computed once per temperature row,
//! every cell is an independent solve run on the rayon pool. A failed cell keeps its error and
//! the scan goes on. The result can be printed as a table or written to JSON for an external
//! plotting tool (e.g. a heatmap of the conversion of the key reactant).
use super::ReactionModel::ReactionModel;
use super::errors::ReactionError;
use log::{info, warn};
use prettytable::{Cell, Row, Table};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// equilibrium extent or the reason there is none
pub type GridCell = Result<f64, ReactionError>;

#[derive(Debug, Clone)]
pub struct ConversionMap {
    pub temperatures: Vec<f64>,
    pub pressures: Vec<f64>,
    /// cells[i][j] belongs to temperatures[i], pressures[j]
    pub cells: Vec<Vec<GridCell>>,
}

/// serializable form of the map, failures stored as messages
#[derive(Debug, Serialize)]
struct ConversionMapRecord<'a> {
    temperatures: &'a [f64],
    pressures: &'a [f64],
    chi: Vec<Vec<Option<f64>>>,
    conversion: Option<(String, Vec<Vec<Option<f64>>>)>,
    errors: Vec<(f64, f64, String)>,
}

impl ConversionMap {
    pub fn compute(model: &ReactionModel, temperatures: &[f64], pressures: &[f64]) -> Self {
        info!(
            "computing conversion map: {} temperatures x {} pressures",
            temperatures.len(),
            pressures.len()
        );
        let cells: Vec<Vec<GridCell>> = temperatures
            .par_iter()
            .map(|&T| -> Vec<GridCell> {
                match model.calculate_rxn_k(T) {
                    Ok(k) => pressures
                        .par_iter()
                        .map(|&P| model.conversion_at_k(T, P, k).map(|state| state.chi))
                        .collect(),
                    Err(e) => pressures.iter().map(|_| Err(e.clone())).collect(),
                }
            })
            .collect();
        let map = Self {
            temperatures: temperatures.to_vec(),
            pressures: pressures.to_vec(),
            cells,
        };
        for (T, P, e) in map.failures() {
            warn!("no solution at T = {} K, P = {} atm: {}", T, P, e);
        }
        map
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&GridCell> {
        self.cells.get(i).and_then(|row| row.get(j))
    }
    /// (T, P, error) of every failed cell
    pub fn failures(&self) -> Vec<(f64, f64, &ReactionError)> {
        let mut failures = Vec::new();
        for (i, row) in self.cells.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                if let Err(e) = cell {
                    failures.push((self.temperatures[i], self.pressures[j], e));
                }
            }
        }
        failures
    }

    pub fn chi_grid(&self) -> Vec<Vec<Option<f64>>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.as_ref().ok().copied()).collect())
            .collect()
    }
    /// fraction of the initial amount of a reactant consumed, γ·χ/I, per cell
    pub fn conversion_of(
        &self,
        model: &ReactionModel,
        reactant: &str,
    ) -> Result<Vec<Vec<Option<f64>>>, ReactionError> {
        let species = model
            .reactants
            .iter()
            .find(|s| s.name == reactant)
            .ok_or_else(|| {
                ReactionError::InputDomain(format!("{} is not a reactant of the model", reactant))
            })?;
        if species.initial_moles <= 0.0 {
            return Err(ReactionError::InputDomain(format!(
                "conversion of {} undefined: no initial moles",
                reactant
            )));
        }
        let factor = species.order / species.initial_moles;
        Ok(self
            .chi_grid()
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.map(|chi| factor * chi)).collect())
            .collect())
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        let mut header = vec![Cell::new("T \\ P")];
        header.extend(self.pressures.iter().map(|P| Cell::new(&format!("{:.1}", P))));
        table.add_row(Row::new(header));
        for (T, row) in self.temperatures.iter().zip(&self.cells) {
            let mut cells = vec![Cell::new(&format!("{:.1}", T))];
            cells.extend(row.iter().map(|c| match c {
                Ok(chi) => Cell::new(&format!("{:.4}", chi)),
                Err(_) => Cell::new("-"),
            }));
            table.add_row(Row::new(cells));
        }
        table.printstd();
    }
    /// writes grids and failures as pretty JSON; `conversion_of` adds the conversion of that reactant
    pub fn save_to_json(
        &self,
        path: &Path,
        model: &ReactionModel,
        conversion_of: Option<&str>,
    ) -> Result<(), ReactionError> {
        let conversion = match conversion_of {
            Some(name) => Some((name.to_owned(), self.conversion_of(model, name)?)),
            None => None,
        };
        let record = ConversionMapRecord {
            temperatures: &self.temperatures,
            pressures: &self.pressures,
            chi: self.chi_grid(),
            conversion,
            errors: self
                .failures()
                .into_iter()
                .map(|(T, P, e)| (T, P, e.to_string()))
                .collect(),
        };
        let file = File::create(path).map_err(|e| {
            ReactionError::TaskFile(format!("cannot create {}: {}", path.display(), e))
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), &record)
            .map_err(|e| ReactionError::TaskFile(format!("cannot write map: {}", e)))?;
        info!("conversion map written to {}", path.display());
        Ok(())
    }
}

/// n evenly spaced values from start to end inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let delta = (end - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + i as f64 * delta).collect();
            points[n - 1] = end;
            points
        }
    }
}
