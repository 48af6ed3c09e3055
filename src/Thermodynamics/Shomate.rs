//! # Shomate heat capacity correlation
//!
//! ## Aim
//! Closed-form sensible heat integrals of the gas phase Shomate equation as tabulated
//! in the NIST Chemistry WebBook:
//!
//! Cp = A + B*t + C*t^2 + D*t^3 + E/t^2,  t = T/1000,  Cp in J/(mol*K)
//!
//! ## Main Data Structures and Logic
//! - `ShomateCoeffs`: coefficients A..E and an optional validity range in K
//! - `dh(T1, T2)`: ∫Cp dT from T1 to T2 in J/mol. The antiderivative is written in reduced
//!   temperature so it is scaled back by 1000
//! - `ds(T1, T2)`: ∫Cp/T dT from T1 to T2 in J/(mol*K). Here dT/T = dt/t so no scaling is needed
//! - symbolic twins of Cp, ΔH and ΔS (RustedSciThe `Expr` in variable "T") counted from T_REF
//!
//! NIST tables also carry F, G, H. They only shift the absolute enthalpy and entropy and cancel
//! in every difference computed here, so `from_slice` accepts 8 values and drops the tail.
use super::GasEquilibrium::errors::ReactionError;
use super::constants::{T_REF, T_SCALE};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::warn;
use serde::{Deserialize, Serialize};

#[allow(non_upper_case_globals)]
const e2: Expr = Expr::Const(2.0);
#[allow(non_upper_case_globals)]
const e3: Expr = Expr::Const(3.0);
#[allow(non_upper_case_globals)]
const e4: Expr = Expr::Const(4.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShomateCoeffs {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    /// temperature range (K) the fit was made for
    pub t_range: Option<(f64, f64)>,
}

impl ShomateCoeffs {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64) -> Self {
        Self {
            a,
            b,
            c,
            d,
            e,
            t_range: None,
        }
    }
    /// takes A, B, C, D, E (optionally followed by NIST F, G, H)
    pub fn from_slice(coeffs: &[f64]) -> Result<Self, ReactionError> {
        match coeffs.len() {
            5 | 8 => {
                if coeffs.iter().any(|c| !c.is_finite()) {
                    return Err(ReactionError::InputDomain(format!(
                        "Shomate coefficients must be finite, got {:?}",
                        coeffs
                    )));
                }
                Ok(Self::new(
                    coeffs[0], coeffs[1], coeffs[2], coeffs[3], coeffs[4],
                ))
            }
            n => Err(ReactionError::InputDomain(format!(
                "expected 5 (A..E) or 8 (A..H) Shomate coefficients, got {}",
                n
            ))),
        }
    }

    pub fn with_range(mut self, t_min: f64, t_max: f64) -> Self {
        self.t_range = Some((t_min, t_max));
        self
    }

    pub fn in_range(&self, T: f64) -> bool {
        match self.t_range {
            Some((t_min, t_max)) => T >= t_min && T <= t_max,
            None => true,
        }
    }
    /// logs a warning when the fit is used outside the range it was made for
    pub fn check_range(&self, name: &str, T: f64) {
        if let Some((t_min, t_max)) = self.t_range {
            if !self.in_range(T) {
                warn!(
                    "Shomate fit of {} used at {} K, outside its range {} - {} K",
                    name, T, t_min, t_max
                );
            }
        }
    }

    pub fn cp(&self, T: f64) -> f64 {
        calculate_cp(T / T_SCALE, self.a, self.b, self.c, self.d, self.e)
    }
    /// ∫Cp dT from T1 to T2, J/mol
    pub fn dh(&self, T1: f64, T2: f64) -> f64 {
        let (a, b, c, d, e) = (self.a, self.b, self.c, self.d, self.e);
        T_SCALE
            * (calculate_h(T2 / T_SCALE, a, b, c, d, e) - calculate_h(T1 / T_SCALE, a, b, c, d, e))
    }
    /// ∫Cp/T dT from T1 to T2, J/(mol*K)
    pub fn ds(&self, T1: f64, T2: f64) -> f64 {
        let (a, b, c, d, e) = (self.a, self.b, self.c, self.d, self.e);
        calculate_s(T2 / T_SCALE, a, b, c, d, e) - calculate_s(T1 / T_SCALE, a, b, c, d, e)
    }
    /////////////////////////////////SYMBOLIC////////////////////////////////////////////
    pub fn cp_sym(&self) -> Expr {
        let t = reduced_T_sym();
        Expr::Const(self.a)
            + Expr::Const(self.b) * t.clone()
            + Expr::Const(self.c) * t.clone().pow(e2)
            + Expr::Const(self.d) * t.clone().pow(e3)
            + Expr::Const(self.e) / t.pow(e2)
    }
    /// ∫Cp dT from T_REF to T as a function of "T"
    pub fn dh_sym(&self) -> Expr {
        let t = reduced_T_sym();
        let (a, b, c, d, e) = (self.a, self.b, self.c, self.d, self.e);
        let h_ref = calculate_h(T_REF / T_SCALE, a, b, c, d, e);
        let h_t = Expr::Const(a) * t.clone()
            + (Expr::Const(b) * t.clone().pow(e2)) / e2
            + (Expr::Const(c) * t.clone().pow(e3)) / e3
            + (Expr::Const(d) * t.clone().pow(e4)) / e4
            - Expr::Const(e) / t;
        Expr::Const(T_SCALE) * (h_t - Expr::Const(h_ref))
    }
    /// ∫Cp/T dT from T_REF to T as a function of "T"
    pub fn ds_sym(&self) -> Expr {
        let t = reduced_T_sym();
        let (a, b, c, d, e) = (self.a, self.b, self.c, self.d, self.e);
        let s_ref = calculate_s(T_REF / T_SCALE, a, b, c, d, e);
        let s_t = Expr::Const(a) * t.clone().ln()
            + Expr::Const(b) * t.clone()
            + (Expr::Const(c) * t.clone().pow(e2)) / e2
            + (Expr::Const(d) * t.clone().pow(e3)) / e3
            - Expr::Const(e) / (e2 * t.pow(e2));
        s_t - Expr::Const(s_ref)
    }
}

fn reduced_T_sym() -> Expr {
    let T = Expr::Var("T".to_owned());
    T / Expr::Const(T_SCALE)
}
////////////////////////////////////////SHOMATE FUNCTIONS (reduced temperature)//////////////////////
pub fn calculate_cp(t: f64, a: f64, b: f64, c: f64, d: f64, e: f64) -> f64 {
    a + b * t + c * t.powi(2) + d * t.powi(3) + e / t.powi(2)
}
/// antiderivative of Cp in t, kJ/mol
pub fn calculate_h(t: f64, a: f64, b: f64, c: f64, d: f64, e: f64) -> f64 {
    a * t + (b * t.powi(2)) / 2.0 + (c * t.powi(3)) / 3.0 + (d * t.powi(4)) / 4.0 - e / t
}
/// antiderivative of Cp/t in t, J/(mol*K)
pub fn calculate_s(t: f64, a: f64, b: f64, c: f64, d: f64, e: f64) -> f64 {
    a * t.ln() + b * t + (c * t.powi(2)) / 2.0 + (d * t.powi(3)) / 3.0 - e / (2.0 * t.powi(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    // N2, NIST WebBook, 100 - 500 K
    const N2: [f64; 5] = [28.98641, 1.853978, -9.647459, 16.63537, 0.000117];
    const NH3: [f64; 5] = [19.99563, 49.77119, -15.37599, 1.921168, 0.189174];

    fn simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
        let h = (b - a) / n as f64;
        let mut sum = f(a) + f(b);
        for i in 1..n {
            let x = a + i as f64 * h;
            sum += if i % 2 == 0 { 2.0 } else { 4.0 } * f(x);
        }
        sum * h / 3.0
    }

    #[test]
    fn test_cp_of_nitrogen_at_room_temperature() {
        let n2 = ShomateCoeffs::from_slice(&N2).unwrap();
        assert_relative_eq!(n2.cp(298.15), 29.12, epsilon = 0.05);
    }

    #[test]
    fn test_zero_width_span_is_zero() {
        let nh3 = ShomateCoeffs::from_slice(&NH3).unwrap();
        assert_eq!(nh3.dh(T_REF, T_REF), 0.0);
        assert_eq!(nh3.ds(T_REF, T_REF), 0.0);
    }

    #[test]
    fn test_integrals_match_quadrature() {
        let nh3 = ShomateCoeffs::from_slice(&NH3).unwrap();
        let dh_num = simpson(|T| nh3.cp(T), 298.0, 800.0, 2000);
        let ds_num = simpson(|T| nh3.cp(T) / T, 298.0, 800.0, 2000);
        assert_relative_eq!(nh3.dh(298.0, 800.0), dh_num, max_relative = 1e-8);
        assert_relative_eq!(nh3.ds(298.0, 800.0), ds_num, max_relative = 1e-8);
        // reversed span flips the sign
        assert_relative_eq!(nh3.dh(800.0, 298.0), -dh_num, max_relative = 1e-8);
    }

    #[test]
    fn test_symbolic_matches_numeric() {
        let nh3 = ShomateCoeffs::from_slice(&NH3).unwrap();
        let T = 650.0;
        assert_relative_eq!(nh3.cp_sym().lambdify1D()(T), nh3.cp(T), epsilon = 1e-8);
        assert_relative_eq!(
            nh3.dh_sym().lambdify1D()(T),
            nh3.dh(T_REF, T),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            nh3.ds_sym().lambdify1D()(T),
            nh3.ds(T_REF, T),
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        assert!(ShomateCoeffs::from_slice(&[1.0, 2.0]).is_err());
        let eight = [1.0, 2.0, 3.0, 4.0, 5.0, -8.0, 200.0, 0.0];
        let coeffs = ShomateCoeffs::from_slice(&eight).unwrap();
        assert_eq!(coeffs.e, 5.0);
    }

    #[test]
    fn test_validity_range() {
        let n2 = ShomateCoeffs::from_slice(&N2).unwrap().with_range(100.0, 500.0);
        assert!(n2.in_range(298.0));
        assert!(!n2.in_range(700.0));
        assert!(ShomateCoeffs::from_slice(&N2).unwrap().in_range(5000.0));
    }
}
