//! Random perturbation of reaction rates for ensemble runs.
//!
//! Each targeted reaction's rate is replaced by a draw from N(rate, (perturb * rate)^2), where
//! `perturb` is the relative standard deviation given in the table's `perturb` column for the
//! row the reaction came from. Applied once, right after the network is read.
use crate::Kinetics::chemistry_errors::ChemistryError;
use crate::Kinetics::reaction::Reaction;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use regex::Regex;

/// which reactions to perturb
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerturbSpec {
    All,
    /// 1-based data rows of the reaction table
    Rows(Vec<usize>),
}

impl PerturbSpec {
    /// "all" anywhere in the list wins; otherwise every token must be a row number,
    /// optionally prefixed by letters ("R12"). An empty list means no perturbation.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Option<Self>, ChemistryError> {
        if tokens.is_empty() {
            return Ok(None);
        }
        if tokens
            .iter()
            .any(|t| t.as_ref().trim().eq_ignore_ascii_case("all"))
        {
            return Ok(Some(PerturbSpec::All));
        }
        let re = Regex::new(r"^[A-Za-z]*(\d+)$")
            .map_err(|e| ChemistryError::Config(e.to_string()))?;
        let mut rows = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref().trim();
            let row = re
                .captures(token)
                .and_then(|cap| cap.get(1))
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .filter(|row| *row > 0)
                .ok_or_else(|| ChemistryError::PerturbToken(token.to_string()))?;
            rows.push(row);
        }
        Ok(Some(PerturbSpec::Rows(rows)))
    }

    pub fn targets(&self, row: usize) -> bool {
        match self {
            PerturbSpec::All => true,
            PerturbSpec::Rows(rows) => rows.contains(&row),
        }
    }
}

/// random source: fixed seed for reproducible ensembles, entropy otherwise
pub fn perturbation_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Perturbs the rates of the targeted reactions, returns how many were changed.
pub fn perturb_rates<R: Rng>(
    reactions: &mut [Reaction],
    spec: &PerturbSpec,
    rng: &mut R,
) -> Result<usize, ChemistryError> {
    if let PerturbSpec::Rows(rows) = spec {
        for row in rows {
            if !reactions.iter().any(|r| r.row == *row) {
                warn!(
                    "perturbation requested for row {} which holds no reaction, ignored",
                    row
                );
            }
        }
    }
    let mut n_perturbed = 0;
    for reaction in reactions.iter_mut().filter(|r| spec.targets(r.row)) {
        let relative_std = match reaction.perturb.as_deref() {
            Some(text) => text.parse::<f64>().map_err(|_| ChemistryError::Perturbation {
                row: reaction.row,
                reason: format!("perturb value '{}' is not a number", text),
            })?,
            None => continue,
        };
        if relative_std == 0.0 {
            continue;
        }
        let std_dev = relative_std * reaction.rate;
        let normal = Normal::new(reaction.rate, std_dev.abs()).map_err(|e| {
            ChemistryError::Perturbation {
                row: reaction.row,
                reason: e.to_string(),
            }
        })?;
        let new_rate = normal.sample(rng);
        debug!(
            "row {} ({}): rate {:e} -> {:e}",
            reaction.row,
            reaction.equation(),
            reaction.rate,
            new_rate
        );
        reaction.rate = new_rate;
        n_perturbed += 1;
    }
    info!("{} reaction rates perturbed", n_perturbed);
    Ok(n_perturbed)
}
