/// ready-to-run demonstrations of the chemistry: loading a reaction table, one step on a small
/// grid, a perturbed ensemble member
pub mod chemistry_examples;
