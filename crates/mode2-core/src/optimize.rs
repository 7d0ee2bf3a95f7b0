//! Bounded-iteration numerical search routines.
//!
//! The calibration components need iterative minimization but the engine's
//! contract is pure computation with a hard iteration cap: exceeding the
//! cap is a normal failure outcome, never a hang. Both routines take the
//! objective as a closure and report convergence explicitly so callers can
//! map non-convergence into their own error taxonomy.

use tracing::debug;

/// Iteration cap and stopping tolerances shared by the search routines.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub max_iterations: usize,
    /// Absolute spread tolerance on the objective (simplex) or interval
    /// width (golden section).
    pub abs_tolerance: f64,
    /// Relative counterpart, scaled by the current best value.
    pub rel_tolerance: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            abs_tolerance: 1e-12,
            rel_tolerance: 1e-9,
        }
    }
}

/// Result of a bounded search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub params: Vec<f64>,
    pub objective: f64,
    pub iterations: usize,
    pub converged: bool,
}

fn clamp_into(point: &mut [f64], bounds: &[(f64, f64)]) {
    for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
        *x = x.clamp(lo, hi);
    }
}

/// Nelder-Mead downhill simplex minimization with box constraints.
///
/// Candidate points are clamped into `bounds` before evaluation, so the
/// returned parameters always lie inside the box. Non-finite objective
/// values are treated as +inf and repelled by the simplex.
pub fn nelder_mead<F>(
    mut objective: F,
    initial: &[f64],
    scale: &[f64],
    bounds: &[(f64, f64)],
    options: &SearchOptions,
) -> SearchOutcome
where
    F: FnMut(&[f64]) -> f64,
{
    assert_eq!(initial.len(), scale.len());
    assert_eq!(initial.len(), bounds.len());
    let n = initial.len();

    let mut eval = |point: &[f64]| -> f64 {
        let value = objective(point);
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    };

    // Initial simplex: the starting point plus one vertex per axis.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    let mut start = initial.to_vec();
    clamp_into(&mut start, bounds);
    simplex.push(start.clone());
    for i in 0..n {
        let mut vertex = start.clone();
        vertex[i] += scale[i];
        clamp_into(&mut vertex, bounds);
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        // Order vertices best-first.
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let best = order[0];
        let second_worst = order[n - 1];
        let worst = order[n];

        let spread = values[worst] - values[best];
        if spread.abs() <= options.abs_tolerance + options.rel_tolerance * values[best].abs() {
            converged = true;
            break;
        }
        iterations += 1;

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; n];
        for &idx in order.iter().take(n) {
            for (c, x) in centroid.iter_mut().zip(&simplex[idx]) {
                *c += x / n as f64;
            }
        }

        let blend = |from: &[f64], towards: &[f64], factor: f64| -> Vec<f64> {
            let mut point: Vec<f64> = from
                .iter()
                .zip(towards)
                .map(|(c, w)| c + factor * (c - w))
                .collect();
            clamp_into(&mut point, bounds);
            point
        };

        // Reflection.
        let reflected = blend(&centroid, &simplex[worst], 1.0);
        let f_reflected = eval(&reflected);

        if f_reflected < values[best] {
            // Expansion.
            let expanded = blend(&centroid, &simplex[worst], 2.0);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex[worst] = expanded;
                values[worst] = f_expanded;
            } else {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = f_reflected;
            continue;
        }

        // Contraction, outside or inside of the worst vertex.
        let contracted = if f_reflected < values[worst] {
            blend(&centroid, &simplex[worst], 0.5)
        } else {
            blend(&centroid, &simplex[worst], -0.5)
        };
        let f_contracted = eval(&contracted);
        if f_contracted < values[worst].min(f_reflected) {
            simplex[worst] = contracted;
            values[worst] = f_contracted;
            continue;
        }

        // Shrink everything towards the best vertex.
        let best_point = simplex[best].clone();
        for idx in 0..=n {
            if idx == best {
                continue;
            }
            let mut shrunk: Vec<f64> = simplex[idx]
                .iter()
                .zip(&best_point)
                .map(|(x, b)| b + 0.5 * (x - b))
                .collect();
            clamp_into(&mut shrunk, bounds);
            values[idx] = eval(&shrunk);
            simplex[idx] = shrunk;
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0);

    debug!(
        iterations,
        converged,
        objective = values[best],
        "nelder-mead search finished"
    );

    SearchOutcome {
        params: simplex[best].clone(),
        objective: values[best],
        iterations,
        converged,
    }
}

/// Golden-section minimization of a one-dimensional objective on [lo, hi].
///
/// Assumes the objective is unimodal on the interval; the search shrinks
/// the bracket until its width falls under the tolerances or the iteration
/// cap is reached.
pub fn golden_section<F>(mut objective: F, lo: f64, hi: f64, options: &SearchOptions) -> SearchOutcome
where
    F: FnMut(f64) -> f64,
{
    const INV_PHI: f64 = 0.618_033_988_749_894_8;

    let mut eval = |x: f64| -> f64 {
        let value = objective(x);
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    };

    let (mut a, mut b) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut x1 = b - INV_PHI * (b - a);
    let mut x2 = a + INV_PHI * (b - a);
    let mut f1 = eval(x1);
    let mut f2 = eval(x2);

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        let mid = 0.5 * (a + b);
        if (b - a).abs() <= options.abs_tolerance + options.rel_tolerance * mid.abs() {
            converged = true;
            break;
        }
        iterations += 1;

        if f1 <= f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = b - INV_PHI * (b - a);
            f1 = eval(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = a + INV_PHI * (b - a);
            f2 = eval(x2);
        }
    }

    let (best_x, best_f) = if f1 <= f2 { (x1, f1) } else { (x2, f2) };
    debug!(
        iterations,
        converged,
        objective = best_f,
        "golden-section search finished"
    );

    SearchOutcome {
        params: vec![best_x],
        objective: best_f,
        iterations,
        converged,
    }
}
