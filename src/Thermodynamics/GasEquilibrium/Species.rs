use super::errors::ReactionError;
use crate::Thermodynamics::Shomate::ShomateCoeffs;
use crate::Thermodynamics::constants::T_REF;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// side of the reaction a species sits on. The sign of γ·χ in the mole balance,
/// the place of n^γ in the reaction quotient and the direction of the Hess path
/// are all decided here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Reactant,
    Product,
}

impl Role {
    /// +1 for products, -1 for reactants
    pub fn sign(&self) -> f64 {
        match self {
            Role::Reactant => -1.0,
            Role::Product => 1.0,
        }
    }
    /// (from, to) of the sensible heat path: reactants are brought from T to T_REF,
    /// products from T_REF back to T
    pub fn path(&self, T: f64) -> (f64, f64) {
        match self {
            Role::Reactant => (T, T_REF),
            Role::Product => (T_REF, T),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Reactant => write!(f, "reactant"),
            Role::Product => write!(f, "product"),
        }
    }
}

/// one gaseous component of the reaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// label, used only in reports and logs
    pub name: String,
    /// stoichiometric coefficient γ > 0, sign comes from `role`
    pub order: f64,
    pub role: Role,
    pub cp_coeffs: ShomateCoeffs,
    /// moles present before the reaction starts
    pub initial_moles: f64,
}

impl Species {
    pub fn new(
        name: &str,
        order: f64,
        role: Role,
        cp_coeffs: ShomateCoeffs,
        initial_moles: f64,
    ) -> Result<Self, ReactionError> {
        if !(order.is_finite() && order > 0.0) {
            return Err(ReactionError::InputDomain(format!(
                "stoichiometric order of {} must be positive, got {}",
                name, order
            )));
        }
        if !(initial_moles.is_finite() && initial_moles >= 0.0) {
            return Err(ReactionError::InputDomain(format!(
                "initial moles of {} must be non-negative, got {}",
                name, initial_moles
            )));
        }
        Ok(Self {
            name: name.to_owned(),
            order,
            role,
            cp_coeffs,
            initial_moles,
        })
    }

    pub fn reactant(
        name: &str,
        order: f64,
        cp_coeffs: ShomateCoeffs,
        initial_moles: f64,
    ) -> Result<Self, ReactionError> {
        Self::new(name, order, Role::Reactant, cp_coeffs, initial_moles)
    }

    pub fn product(
        name: &str,
        order: f64,
        cp_coeffs: ShomateCoeffs,
        initial_moles: f64,
    ) -> Result<Self, ReactionError> {
        Self::new(name, order, Role::Product, cp_coeffs, initial_moles)
    }
    /// γ·∫Cp dT along this species' leg of the Hess cycle, J per mole of extent
    pub fn enthalpy_change(&self, T: f64) -> Result<f64, ReactionError> {
        check_temperature(T)?;
        self.cp_coeffs.check_range(&self.name, T);
        let (from, to) = self.role.path(T);
        Ok(self.order * self.cp_coeffs.dh(from, to))
    }
    /// γ·∫Cp/T dT along the same leg, J/K per mole of extent
    pub fn entropy_change(&self, T: f64) -> Result<f64, ReactionError> {
        check_temperature(T)?;
        let (from, to) = self.role.path(T);
        Ok(self.order * self.cp_coeffs.ds(from, to))
    }
    /// moles of this species at extent χ
    pub fn moles_at(&self, chi: f64) -> f64 {
        self.initial_moles + self.role.sign() * self.order * chi
    }
    /// signed γ: contribution to Δγ
    pub fn signed_order(&self) -> f64 {
        self.role.sign() * self.order
    }
    /// extent of reaction that uses this species up: I/γ for a reactant going forward,
    /// -I/γ for a product going backward
    pub fn extent_limit(&self) -> f64 {
        -self.role.sign() * self.initial_moles / self.order
    }

    pub fn enthalpy_change_sym(&self) -> Expr {
        Expr::Const(self.role.sign() * self.order) * self.cp_coeffs.dh_sym()
    }

    pub fn entropy_change_sym(&self) -> Expr {
        Expr::Const(self.role.sign() * self.order) * self.cp_coeffs.ds_sym()
    }
}

pub(crate) fn check_temperature(T: f64) -> Result<(), ReactionError> {
    if T.is_finite() && T > 0.0 {
        Ok(())
    } else {
        Err(ReactionError::InputDomain(format!(
            "temperature must be positive, got {} K",
            T
        )))
    }
}
