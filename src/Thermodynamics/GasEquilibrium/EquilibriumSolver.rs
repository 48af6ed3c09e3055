//! # Bracketed scalar root search
//!
//! The equilibrium condition of one reaction is a single equation f(χ) = Q(χ) - K = 0 on an open
//! interval whose both ends are poles or zeros of Q. Solving it is done in two stages:
//!
//! 1) `BracketSearch` - an explicit state machine `Searching -> Bracketed | Exhausted`.
//!    Every round probes two points pulled inside the interval by a relative margin; the margin
//!    shrinks geometrically from round to round so the probes walk towards the poles, and the
//!    first round also scans a few interior points. Probes where f is undefined (negative base,
//!    fractional power, overflow) are counted and skipped, they never take part in a bracket.
//! 2) `brent` - Brent's method (bisection + secant + inverse quadratic interpolation) inside the
//!    bracket. It stops when |f| is below the requested tolerance or the bracket has collapsed
//!    to `x_tol`.
use super::errors::ReactionError;
use log::debug;
use serde::{Deserialize, Serialize};

/// numerical knobs of the bracketing and the root polishing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// initial distance of the edge probes from the interval ends, as a share of its width
    pub edge_epsilon: f64,
    /// factor applied to the margin after every unsuccessful round
    pub margin_shrink: f64,
    /// maximal number of bracketing rounds
    pub max_probes: usize,
    /// evenly spaced interior probes of the first round
    pub interior_points: usize,
    /// absolute tolerance on f
    pub f_abs_tol: f64,
    /// tolerance on f relative to the target value (K)
    pub f_rel_tol: f64,
    /// absolute part of the bracket width at which the root is accepted whatever |f| is;
    /// a relative part of 4 machine epsilon is always added
    pub x_tol: f64,
    /// maximal number of Brent iterations
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            edge_epsilon: 1e-3,
            margin_shrink: 0.1,
            max_probes: 400,
            interior_points: 16,
            f_abs_tol: 0.0,
            f_rel_tol: 1e-10,
            x_tol: 1e-300,
            max_iterations: 200,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> Result<(), ReactionError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.edge_epsilon) && self.edge_epsilon < 0.5) {
            return Err(ReactionError::InputDomain(format!(
                "edge_epsilon must lie in (0, 0.5), got {}",
                self.edge_epsilon
            )));
        }
        if !(positive(self.margin_shrink) && self.margin_shrink < 1.0) {
            return Err(ReactionError::InputDomain(format!(
                "margin_shrink must lie in (0, 1), got {}",
                self.margin_shrink
            )));
        }
        if self.max_probes == 0 || self.max_iterations == 0 {
            return Err(ReactionError::InputDomain(
                "max_probes and max_iterations must be at least 1".to_owned(),
            ));
        }
        if !(self.f_abs_tol >= 0.0 && self.f_rel_tol >= 0.0 && positive(self.x_tol)) {
            return Err(ReactionError::InputDomain(
                "tolerances must be non-negative (x_tol positive)".to_owned(),
            ));
        }
        Ok(())
    }
}

/// a point where f has been evaluated to a finite value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub x: f64,
    pub f: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BracketState {
    Searching { round: usize },
    /// f(lo)*f(hi) <= 0; lo == hi when a probe hit the root exactly
    Bracketed { lo: Probe, hi: Probe },
    Exhausted { rounds: usize },
}

#[derive(Debug, Clone)]
pub struct BracketSearch {
    /// open interval; f is never evaluated at its ends
    pub lower: f64,
    pub upper: f64,
    settings: SolverSettings,
    state: BracketState,
    /// valid probes sorted by x
    probes: Vec<Probe>,
    /// number of probes where f was undefined
    pub rejected: usize,
}

impl BracketSearch {
    pub fn new(lower: f64, upper: f64, settings: SolverSettings) -> Result<Self, ReactionError> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(ReactionError::InputDomain(format!(
                "empty search interval ({}, {})",
                lower, upper
            )));
        }
        Ok(Self {
            lower,
            upper,
            settings,
            state: BracketState::Searching { round: 0 },
            probes: Vec::new(),
            rejected: 0,
        })
    }

    pub fn state(&self) -> &BracketState {
        &self.state
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    fn probe_points(&self, round: usize) -> Vec<f64> {
        let width = self.upper - self.lower;
        let margin = self.settings.edge_epsilon * self.settings.margin_shrink.powi(round as i32);
        let mut points = vec![self.lower + margin * width, self.upper - margin * width];
        if round == 0 {
            let n = self.settings.interior_points;
            points.extend((1..=n).map(|i| self.lower + width * i as f64 / (n + 1) as f64));
        }
        points
    }

    fn insert(&mut self, probe: Probe) {
        let pos = self.probes.partition_point(|p| p.x < probe.x);
        self.probes.insert(pos, probe);
    }

    fn find_sign_change(&self) -> Option<(Probe, Probe)> {
        if let Some(p) = self.probes.iter().find(|p| p.f == 0.0) {
            return Some((*p, *p));
        }
        self.probes
            .windows(2)
            .find(|w| w[0].f.signum() != w[1].f.signum())
            .map(|w| (w[0], w[1]))
    }

    /// performs one transition of the state machine and returns the new state.
    /// Terminal states are left unchanged.
    pub fn step<F>(&mut self, f: &mut F) -> &BracketState
    where
        F: FnMut(f64) -> Result<f64, ReactionError>,
    {
        let round = match self.state {
            BracketState::Searching { round } => round,
            _ => return &self.state,
        };
        let mut progressed = false;
        for x in self.probe_points(round) {
            // margin underflowed: the point fell onto a pole
            if !(x > self.lower && x < self.upper) {
                continue;
            }
            if self.probes.iter().any(|p| p.x == x) {
                continue;
            }
            progressed = true;
            match f(x) {
                Ok(v) if v.is_finite() => self.insert(Probe { x, f: v }),
                Ok(v) => {
                    debug!("probe at {} gave non-finite value {}", x, v);
                    self.rejected += 1;
                }
                Err(e) => {
                    debug!("probe at {} rejected: {}", x, e);
                    self.rejected += 1;
                }
            }
        }
        self.state = if let Some((lo, hi)) = self.find_sign_change() {
            debug!(
                "bracket found in round {}: [{}, {}], f = [{}, {}]",
                round, lo.x, hi.x, lo.f, hi.f
            );
            BracketState::Bracketed { lo, hi }
        } else if !progressed || round + 1 >= self.settings.max_probes {
            debug!(
                "bracketing exhausted after {} rounds ({} valid, {} rejected probes)",
                round + 1,
                self.probes.len(),
                self.rejected
            );
            BracketState::Exhausted { rounds: round + 1 }
        } else {
            BracketState::Searching { round: round + 1 }
        };
        &self.state
    }

    /// steps until a terminal state is reached
    pub fn run<F>(&mut self, f: &mut F) -> BracketState
    where
        F: FnMut(f64) -> Result<f64, ReactionError>,
    {
        while let BracketState::Searching { .. } = self.step(f) {}
        self.state.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult {
    pub root: f64,
    pub f_root: f64,
    pub iterations: usize,
}

/// Brent's method on a bracket with f(lo.x)*f(hi.x) <= 0. The iterate never leaves [lo.x, hi.x].
pub fn brent<F>(
    f: &mut F,
    lo: Probe,
    hi: Probe,
    f_tol: f64,
    settings: &SolverSettings,
) -> Result<RootResult, ReactionError>
where
    F: FnMut(f64) -> Result<f64, ReactionError>,
{
    let (mut xpre, mut fpre) = (lo.x, lo.f);
    let (mut xcur, mut fcur) = (hi.x, hi.f);
    if fpre == 0.0 {
        return Ok(RootResult {
            root: xpre,
            f_root: fpre,
            iterations: 0,
        });
    }
    if fcur == 0.0 {
        return Ok(RootResult {
            root: xcur,
            f_root: fcur,
            iterations: 0,
        });
    }
    if fpre.signum() == fcur.signum() {
        return Err(ReactionError::InputDomain(format!(
            "Brent called without a sign change: f({}) = {}, f({}) = {}",
            xpre, fpre, xcur, fcur
        )));
    }
    let (mut xblk, mut fblk) = (0.0, 0.0);
    let (mut spre, mut scur) = (0.0, 0.0);
    let rtol = 4.0 * f64::EPSILON;

    for i in 0..settings.max_iterations {
        if fpre != 0.0 && fcur != 0.0 && fpre.signum() != fcur.signum() {
            xblk = xpre;
            fblk = fpre;
            spre = xcur - xpre;
            scur = spre;
        }
        // keep the best estimate in xcur
        if fblk.abs() < fcur.abs() {
            xpre = xcur;
            xcur = xblk;
            xblk = xpre;
            fpre = fcur;
            fcur = fblk;
            fblk = fpre;
        }
        let delta = (settings.x_tol + rtol * xcur.abs()) / 2.0;
        let sbis = (xblk - xcur) / 2.0;
        if fcur.abs() <= f_tol || sbis.abs() < delta {
            debug!(
                "Brent converged in {} iterations: x = {}, f = {}",
                i, xcur, fcur
            );
            return Ok(RootResult {
                root: xcur,
                f_root: fcur,
                iterations: i,
            });
        }
        if spre.abs() > delta && fcur.abs() < fpre.abs() {
            let stry = if xpre == xblk {
                // secant
                -fcur * (xcur - xpre) / (fcur - fpre)
            } else {
                // inverse quadratic interpolation
                let dpre = (fpre - fcur) / (xpre - xcur);
                let dblk = (fblk - fcur) / (xblk - xcur);
                -fcur * (fblk * dblk - fpre * dpre) / (dblk * dpre * (fblk - fpre))
            };
            if 2.0 * stry.abs() < spre.abs().min(3.0 * sbis.abs() - delta) {
                spre = scur;
                scur = stry;
            } else {
                spre = sbis;
                scur = sbis;
            }
        } else {
            spre = sbis;
            scur = sbis;
        }
        xpre = xcur;
        fpre = fcur;
        if scur.abs() > delta {
            xcur += scur;
        } else {
            xcur += if sbis > 0.0 { delta } else { -delta };
        }
        fcur = f(xcur)?;
        if !fcur.is_finite() {
            return Err(ReactionError::NoConvergence {
                iterations: i + 1,
                residual: fcur,
            });
        }
    }
    Err(ReactionError::NoConvergence {
        iterations: settings.max_iterations,
        residual: fcur,
    })
}

/// bracket on the open interval (lower, upper), then polish with Brent
pub fn solve_bracketed<F>(
    f: &mut F,
    lower: f64,
    upper: f64,
    f_tol: f64,
    settings: &SolverSettings,
) -> Result<RootResult, ReactionError>
where
    F: FnMut(f64) -> Result<f64, ReactionError>,
{
    let mut search = BracketSearch::new(lower, upper, *settings)?;
    match search.run(f) {
        BracketState::Bracketed { lo, hi } => {
            if lo.x == hi.x {
                return Ok(RootResult {
                    root: lo.x,
                    f_root: lo.f,
                    iterations: 0,
                });
            }
            brent(f, lo, hi, f_tol, settings)
        }
        BracketState::Exhausted { rounds } => Err(ReactionError::NoBracket {
            lower,
            upper,
            probes: rounds,
        }),
        BracketState::Searching { round } => Err(ReactionError::NoBracket {
            lower,
            upper,
            probes: round,
        }),
    }
}
