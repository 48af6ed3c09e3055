//! # Single ideal-gas reaction
//!
//! `ReactionModel` aggregates the reactants and products of aA + bB <-> rR + sS together with the
//! standard reaction enthalpy and entropy at T_REF. For any (T, P) it yields
//! - ΔH(T), ΔS(T), ΔG(T) along the Hess path reactants(T) -> reactants(T_REF) -> products(T_REF) -> products(T)
//! - K(T) = exp(-ΔG/(R*T))
//! - the reaction quotient Q(χ) = Π n_prod^γ / Π n_reac^γ * (P/n_total)^Δγ
//! - the extent of reaction χ with Q(χ) = K(T)
//!
//! Q grows monotonically with χ, so Q at the middle of the feasible interval tells which half
//! holds the root. That half is solved in the offset δ from its end of the interval, where the
//! exhausted species holds exactly γ·δ moles: a reaction that is complete to within 1e-20 is
//! still resolved although χ itself can not be told apart from χ_max in f64.
//!
//! The model is never mutated by a query, so one instance can serve a whole (T, P) grid
//! from several threads.
use super::EquilibriumSolver::{SolverSettings, solve_bracketed};
use super::EquilibriumState::EquilibriumState;
use super::Species::{Role, Species, check_temperature};
use super::errors::ReactionError;
use crate::Thermodynamics::constants::{P_STD_ATM, R};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::{debug, info};

/// end of the feasible extent interval an offset δ is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtentEdge {
    /// χ = χ_min + δ
    Lower,
    /// χ = χ_max - δ
    Upper,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReactionModel {
    pub reactants: Vec<Species>,
    pub products: Vec<Species>,
    /// standard reaction enthalpy at T_REF, J/mol
    pub std_dh: f64,
    /// standard reaction entropy at T_REF, J/(mol*K)
    pub std_ds: f64,
    pub settings: SolverSettings,
}

impl ReactionModel {
    pub fn new(
        reactants: Vec<Species>,
        products: Vec<Species>,
        std_dh: f64,
        std_ds: f64,
    ) -> Result<Self, ReactionError> {
        if reactants.is_empty() || products.is_empty() {
            return Err(ReactionError::InputDomain(
                "a reaction needs at least one reactant and one product".to_owned(),
            ));
        }
        for (list, role) in [(&reactants, Role::Reactant), (&products, Role::Product)] {
            if let Some(s) = list.iter().find(|s| s.role != role) {
                return Err(ReactionError::InputDomain(format!(
                    "{} is declared as {} but listed among {}s",
                    s.name, s.role, role
                )));
            }
        }
        if !(std_dh.is_finite() && std_ds.is_finite()) {
            return Err(ReactionError::InputDomain(format!(
                "standard reaction data must be finite, got dH = {}, dS = {}",
                std_dh, std_ds
            )));
        }
        Ok(Self {
            reactants,
            products,
            std_dh,
            std_ds,
            settings: SolverSettings::default(),
        })
    }

    pub fn with_settings(mut self, settings: SolverSettings) -> Result<Self, ReactionError> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }
    /// all species, reactants first, in a stable order
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.reactants.iter().chain(self.products.iter())
    }
    /// Δγ = Σγ_products - Σγ_reactants
    pub fn delta_gamma(&self) -> f64 {
        self.species().map(|s| s.signed_order()).sum()
    }
    ////////////////////////////////////THERMODYNAMICS/////////////////////////////////////////
    /// (ΔH_T, ΔS_T, ΔG_T) of the reaction at temperature T
    pub fn calculate_rxn_gibbs(&self, T: f64) -> Result<(f64, f64, f64), ReactionError> {
        check_temperature(T)?;
        let mut dh = 0.0;
        let mut ds = 0.0;
        for comp in &self.reactants {
            dh += comp.enthalpy_change(T)?;
            ds += comp.entropy_change(T)?;
        }
        dh += self.std_dh;
        ds += self.std_ds;
        for comp in &self.products {
            dh += comp.enthalpy_change(T)?;
            ds += comp.entropy_change(T)?;
        }
        let dg = dh - T * ds;
        debug!("T = {} K: dH = {}, dS = {}, dG = {}", T, dh, ds, dg);
        Ok((dh, ds, dg))
    }
    /// ΔH(T), ΔS(T), ΔG(T) as expressions of "T"
    pub fn calculate_rxn_gibbs_sym(&self) -> (Expr, Expr, Expr) {
        let T = Expr::Var("T".to_owned());
        let mut dh = Expr::Const(self.std_dh);
        let mut ds = Expr::Const(self.std_ds);
        for comp in self.species() {
            dh = dh + comp.enthalpy_change_sym();
            ds = ds + comp.entropy_change_sym();
        }
        let dg = dh.clone() - T * ds.clone();
        (dh.simplify_(), ds.simplify_(), dg.simplify_())
    }
    /// ln K = -ΔG_T/(R*T)
    pub fn calculate_rxn_ln_k(&self, T: f64) -> Result<f64, ReactionError> {
        let (_, _, dg) = self.calculate_rxn_gibbs(T)?;
        Ok(-dg / (R * T))
    }
    /// K(T), guaranteed finite and strictly positive
    pub fn calculate_rxn_k(&self, T: f64) -> Result<f64, ReactionError> {
        let ln_k = self.calculate_rxn_ln_k(T)?;
        if !ln_k.is_finite() || ln_k > f64::MAX.ln() || ln_k < f64::MIN_POSITIVE.ln() {
            return Err(ReactionError::NumericOverflow {
                ln_k,
                temperature: T,
            });
        }
        let k = ln_k.exp();
        info!("K({} K) = {:e}", T, k);
        Ok(k)
    }
    ////////////////////////////////////MOLE BALANCE///////////////////////////////////////////
    /// open interval (χ_min, χ_max) of physically possible extents: χ_max exhausts the limiting
    /// reactant, χ_min exhausts the limiting product when the reaction runs backwards
    pub fn extent_bounds(&self) -> Result<(f64, f64), ReactionError> {
        let chi_max = self
            .reactants
            .iter()
            .map(|s| s.extent_limit())
            .fold(f64::INFINITY, f64::min);
        let chi_min = self
            .products
            .iter()
            .map(|s| s.extent_limit())
            .fold(f64::NEG_INFINITY, f64::max);
        if !(chi_min < chi_max) {
            return Err(ReactionError::InputDomain(format!(
                "no feasible extent of reaction: interval ({}, {}) is empty (both a reactant and a product start at zero moles)",
                chi_min, chi_max
            )));
        }
        Ok((chi_min, chi_max))
    }
    /// moles of every species at extent χ, in the order of `species()`
    pub fn mole_numbers(&self, chi: f64) -> Vec<f64> {
        self.species().map(|s| s.moles_at(chi)).collect()
    }
    /// (χ, moles of every species) at offset δ from one end of the feasible interval.
    /// Species exhausted at that end get exactly γ·δ instead of a difference of two close numbers.
    pub fn mole_numbers_near(
        &self,
        edge: ExtentEdge,
        delta: f64,
    ) -> Result<(f64, Vec<f64>), ReactionError> {
        let (chi_min, chi_max) = self.extent_bounds()?;
        let (limit, step) = match edge {
            ExtentEdge::Lower => (chi_min, delta),
            ExtentEdge::Upper => (chi_max, -delta),
        };
        let moles = self
            .species()
            .map(|s| {
                let at_limit = if s.extent_limit() == limit {
                    0.0
                } else {
                    s.moles_at(limit)
                };
                at_limit + s.signed_order() * step
            })
            .collect();
        Ok((limit + step, moles))
    }
    /// reaction quotient Q(χ, P) with P in atm.
    /// Fails instead of producing a non-real or infinite value: a reactant at or below zero
    /// moles, a negative product, non-positive total moles, or overflow.
    pub fn reaction_equation(&self, chi: f64, P: f64) -> Result<f64, ReactionError> {
        check_pressure(P)?;
        self.quotient(&self.mole_numbers(chi), P, chi)
    }
    /// Q at offset δ from one end of the feasible interval, see `mole_numbers_near`
    pub fn reaction_equation_near(
        &self,
        edge: ExtentEdge,
        delta: f64,
        P: f64,
    ) -> Result<f64, ReactionError> {
        check_pressure(P)?;
        let (chi, moles) = self.mole_numbers_near(edge, delta)?;
        self.quotient(&moles, P, chi)
    }

    fn quotient(&self, moles: &[f64], P: f64, chi: f64) -> Result<f64, ReactionError> {
        let domain = |reason: String| ReactionError::QuotientDomain { chi, reason };
        // ln Q accumulated term by term; every base is checked positive first, so no
        // fractional exponent ever sees a negative number
        let mut ln_q = 0.0;
        let mut n_total = 0.0;
        for (comp, &n) in self.species().zip(moles) {
            match comp.role {
                Role::Reactant if n <= 0.0 => {
                    return Err(domain(format!("reactant {} exhausted (n = {})", comp.name, n)));
                }
                Role::Product if n < 0.0 => {
                    return Err(domain(format!("product {} negative (n = {})", comp.name, n)));
                }
                _ => {}
            }
            // n = 0 for a product gives ln 0 = -inf and Q = 0
            ln_q += comp.signed_order() * n.ln();
            n_total += n;
        }
        if !(n_total > 0.0) {
            return Err(domain(format!("total moles not positive (n = {})", n_total)));
        }
        let dgamma = self.delta_gamma();
        ln_q += dgamma * (P / P_STD_ATM).ln() - dgamma * n_total.ln();
        let q = ln_q.exp();
        if q.is_nan() || q.is_infinite() {
            return Err(domain(format!("quotient overflow (ln Q = {})", ln_q)));
        }
        Ok(q)
    }
    ////////////////////////////////////SOLVER/////////////////////////////////////////////////
    /// equilibrium extent of reaction at temperature T (K) and pressure P (atm)
    pub fn calculate_conversion(&self, T: f64, P: f64) -> Result<EquilibriumState, ReactionError> {
        check_temperature(T)?;
        check_pressure(P)?;
        let k = self.calculate_rxn_k(T)?;
        self.conversion_at_k(T, P, k)
    }
    /// same as `calculate_conversion` for an already known K(T)
    pub fn conversion_at_k(
        &self,
        T: f64,
        P: f64,
        k: f64,
    ) -> Result<EquilibriumState, ReactionError> {
        check_pressure(P)?;
        if !(k.is_finite() && k > 0.0) {
            return Err(ReactionError::InputDomain(format!(
                "equilibrium constant must be finite and positive, got {}",
                k
            )));
        }
        let (chi_min, chi_max) = self.extent_bounds()?;
        let f_tol = self.settings.f_abs_tol + self.settings.f_rel_tol * k;
        let mid = 0.5 * (chi_min + chi_max);
        let (chi, moles, q, iterations) = match self.reaction_equation(mid, P) {
            Ok(q_mid) if q_mid == k => (mid, self.mole_numbers(mid), q_mid, 0),
            Ok(q_mid) => {
                let edge = if q_mid < k {
                    ExtentEdge::Upper
                } else {
                    ExtentEdge::Lower
                };
                let mut residual = |delta: f64| -> Result<f64, ReactionError> {
                    Ok(self.reaction_equation_near(edge, delta, P)? - k)
                };
                let half = 0.5 * (chi_max - chi_min);
                let root = solve_bracketed(&mut residual, 0.0, half, f_tol, &self.settings)
                    .map_err(|e| match e {
                        ReactionError::NoBracket { probes, .. } => ReactionError::NoBracket {
                            lower: chi_min,
                            upper: chi_max,
                            probes,
                        },
                        e => e,
                    })?;
                debug!("root at {:e} from the {:?} end of the extent interval", root.root, edge);
                let (chi, moles) = self.mole_numbers_near(edge, root.root)?;
                let q = self.quotient(&moles, P, chi)?;
                (chi, moles, q, root.iterations)
            }
            Err(e) => {
                debug!("Q undefined at the middle of ({}, {}): {}", chi_min, chi_max, e);
                let mut residual = |chi: f64| -> Result<f64, ReactionError> {
                    Ok(self.reaction_equation(chi, P)? - k)
                };
                let root = solve_bracketed(&mut residual, chi_min, chi_max, f_tol, &self.settings)?;
                let q = self.reaction_equation(root.root, P)?;
                (root.root, self.mole_numbers(root.root), q, root.iterations)
            }
        };
        info!(
            "T = {} K, P = {} atm: chi = {} in ({}, {}), Q = {:e}, K = {:e}, {} Brent iterations",
            T, P, chi, chi_min, chi_max, q, k, iterations
        );
        Ok(EquilibriumState::new(
            self,
            T,
            P,
            chi,
            moles,
            (chi_min, chi_max),
            k,
            q,
            iterations,
        ))
    }
}

pub(crate) fn check_pressure(P: f64) -> Result<(), ReactionError> {
    if P.is_finite() && P > 0.0 {
        Ok(())
    } else {
        Err(ReactionError::InputDomain(format!(
            "pressure must be positive, got {} atm",
            P
        )))
    }
}
