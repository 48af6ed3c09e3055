/// process-wide numeric constants
pub mod constants;
/// chemical equilibrium of one gas-phase reaction
pub mod GasEquilibrium;
/// Shomate heat capacity correlation: Cp, sensible enthalpy and entropy, numeric and symbolic
pub mod Shomate;
