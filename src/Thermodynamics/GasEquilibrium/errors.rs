use thiserror::Error;

/// everything that can go wrong while a single (T, P) point is solved.
/// All variants are plain data so a grid scan can store them per cell.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReactionError {
    /// rejected before any integration or solve is attempted
    #[error("Input domain error: {0}")]
    InputDomain(String),
    /// reaction quotient asked for at an infeasible extent of reaction
    #[error("Reaction quotient undefined at chi = {chi}: {reason}")]
    QuotientDomain { chi: f64, reason: String },
    /// K(T) cannot be represented as a finite positive f64
    #[error(
        "Equilibrium constant overflow at T = {temperature} K: ln K = {ln_k} (reaction is effectively complete or does not proceed)"
    )]
    NumericOverflow { ln_k: f64, temperature: f64 },
    #[error(
        "No equilibrium solution found in feasible range ({lower}, {upper}) after {probes} probe rounds"
    )]
    NoBracket { lower: f64, upper: f64, probes: usize },
    #[error("Root finding did not converge after {iterations} iterations, residual {residual}")]
    NoConvergence { iterations: usize, residual: f64 },
    #[error("Task file error: {0}")]
    TaskFile(String),
}
