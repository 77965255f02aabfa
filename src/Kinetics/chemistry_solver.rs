//! Implicit density update of one species.
//!
//! The loss rate `L` (cm^-3 s^-1) is turned into a loss frequency `L / n_old` and the balance
//! `dn/dt = S - (L / n_old) * n` is advanced with one backward Euler step:
//!
//! `n_new = (n_old + S * dt) / (1 + (L / max(n_old, eps)) * dt)`
//!
//! and the result is clamped to a small positive floor. The update is unconditionally stable,
//! never negative, leaves the density alone when `S = L = 0`, goes to `n_old` as `dt -> 0` and to
//! the photochemical equilibrium `S * n_old / L` as `dt -> infinity`.
use crate::Grid::grid_field::GridField;
use crate::settings::SolverSettings;

/// new density of a single cell
pub fn solve_cell(density: f64, source: f64, loss: f64, dt: f64, settings: &SolverSettings) -> f64 {
    let loss_frequency = loss / density.max(settings.density_epsilon);
    let updated = (density + source * dt) / (1.0 + loss_frequency * dt);
    if updated.is_nan() {
        return settings.density_floor;
    }
    updated.max(settings.density_floor)
}

/// New density field from the current one and the aggregated source/loss rates.
pub fn solver_chemistry(
    density: &GridField,
    sources: &GridField,
    losses: &GridField,
    dt: f64,
    settings: &SolverSettings,
) -> GridField {
    debug_assert_eq!(density.shape(), sources.shape());
    debug_assert_eq!(density.shape(), losses.shape());
    let mut updated = density.clone();
    for ((n, &s), &l) in updated
        .as_mut_slice()
        .iter_mut()
        .zip(sources.as_slice())
        .zip(losses.as_slice())
    {
        *n = solve_cell(*n, s, l, dt, settings);
    }
    updated
}
