//! Water-table model constants and calibration contract.

/// Initial decay-constant guess for the Best-Fit search [1/month].
pub const KT_INITIAL: f64 = 2.9;

/// Initial dimensionless-coefficient guess for the Best-Fit search.
pub const AN_INITIAL: f64 = 0.27;

// -- Calibration bounds, (min, max) in (hs, kt, an) search order --

/// Rainfall scale [mm].
pub const HS_BOUNDS: (f64, f64) = (0.1, 10_000.0);

/// Decay constant [1/month].
pub const KT_BOUNDS: (f64, f64) = (0.01, 50.0);

/// Dimensionless coefficient. Typically 0-1; slack above 1 so the
/// optimum is not pinned at the domain edge.
pub const AN_BOUNDS: (f64, f64) = (0.0, 1.5);

/// Iteration cap for the Best-Fit simplex search.
pub const MAX_ITERATIONS: usize = 1000;

/// Absolute and relative stopping tolerances on the residual.
pub const ABS_TOLERANCE: f64 = 1e-12;
pub const REL_TOLERANCE: f64 = 1e-9;
