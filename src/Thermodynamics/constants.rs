/// universal gas constant, J/(mol*K)
pub const R: f64 = 8.314;
/// reference temperature of the standard reaction data, K
pub const T_REF: f64 = 298.0;
/// standard pressure, atm. Pressures passed to the solver are in atm.
pub const P_STD_ATM: f64 = 1.0;
/// Shomate correlations are written in reduced temperature t = T/T_SCALE
pub const T_SCALE: f64 = 1000.0;
