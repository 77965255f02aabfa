use crate::Species::species::SpeciesId;
use std::fmt;

/// one reactant or product of a reaction
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesSlot {
    pub name: String,
    pub id: SpeciesId,
}

impl SpeciesSlot {
    pub fn new(name: &str, id: SpeciesId) -> Self {
        Self {
            name: name.to_string(),
            id,
        }
    }
    pub fn is_neutral(&self) -> bool {
        self.id.is_neutral()
    }
}

/// rate multiplier (numerator / field)^exponent, field named by `denominator`
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureDependence {
    pub numerator: f64,
    pub denominator: String,
    pub exponent: f64,
}

impl TemperatureDependence {
    /// multiplier for one cell; the field value is floored so that a zero never reaches the division
    pub fn multiplier(&self, denominator_value: f64, floor: f64) -> f64 {
        (self.numerator / denominator_value.max(floor)).powf(self.exponent)
    }
}

/// One row of the reaction table (or a continuation row that inherited its species).
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    /// reactants, up to three
    pub losses: Vec<SpeciesSlot>,
    /// products, up to three
    pub sources: Vec<SpeciesSlot>,
    pub rate: f64,
    pub branching_ratio: f64,
    /// energy released per reaction event
    pub energy: f64,
    pub temperature_dependence: Option<TemperatureDependence>,
    pub piecewise_var: Option<String>,
    pub min: f64,
    pub max: f64,
    /// 0 - constant rate, >0 - temperature dependent
    pub formula_type: u32,
    /// 1-based data row of the table the reaction was read from
    pub row: usize,
    /// text of the `perturb` column (relative standard deviation); only read when the
    /// reaction is actually perturbed
    pub perturb: Option<String>,
}

impl Default for Reaction {
    fn default() -> Self {
        Self {
            losses: Vec::new(),
            sources: Vec::new(),
            rate: 0.0,
            branching_ratio: 1.0,
            energy: 0.0,
            temperature_dependence: None,
            piecewise_var: None,
            min: 0.0,
            max: 0.0,
            formula_type: 0,
            row: 0,
            perturb: None,
        }
    }
}

impl Reaction {
    pub fn n_losses(&self) -> usize {
        self.losses.len()
    }

    pub fn n_sources(&self) -> usize {
        self.sources.len()
    }
    /// only reactions with at least one reactant and one product are kept in a network
    pub fn is_complete(&self) -> bool {
        !self.losses.is_empty() && !self.sources.is_empty()
    }
    /// a row that resolved no species at all continues the previous reaction
    pub fn is_continuation(&self) -> bool {
        self.losses.is_empty() && self.sources.is_empty()
    }
    /// copies everything that describes *what* reacts from `previous`; the rate, its
    /// temperature dependence and the validity range stay this row's own
    pub fn inherit_from(&mut self, previous: &Reaction) {
        self.losses = previous.losses.clone();
        self.sources = previous.sources.clone();
        self.branching_ratio = previous.branching_ratio;
        self.energy = previous.energy;
        self.piecewise_var = previous.piecewise_var.clone();
    }
    /// piecewise validity applies only with a variable name and a non-zero range
    pub fn has_range(&self) -> bool {
        self.piecewise_var.is_some() && !(self.min == 0.0 && self.max == 0.0)
    }

    pub fn in_range(&self, value: f64) -> bool {
        !self.has_range() || (value >= self.min && value <= self.max)
    }

    pub fn is_temperature_dependent(&self) -> bool {
        self.formula_type > 0 && self.temperature_dependence.is_some()
    }
    /// rate coefficient at a cell given the value of the denominator field there
    pub fn effective_rate(&self, denominator_value: f64, floor: f64) -> f64 {
        match &self.temperature_dependence {
            Some(dependence) if self.formula_type > 0 => {
                self.rate * dependence.multiplier(denominator_value, floor)
            }
            _ => self.rate,
        }
    }
    /// "A + B -> C + D"
    pub fn equation(&self) -> String {
        let join = |slots: &[SpeciesSlot]| {
            slots
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(" + ")
        };
        format!("{} -> {}", join(&self.losses), join(&self.sources))
    }
}

fn kind_tag(slot: &SpeciesSlot) -> &'static str {
    if slot.is_neutral() { "neutral" } else { "ion" }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of Losses : {}", self.n_losses())?;
        writeln!(f, "Number of Sources : {}", self.n_sources())?;
        writeln!(f, "{} ( RR : {:e})", self.equation(), self.rate)?;
        let ids = |slots: &[SpeciesSlot]| {
            slots
                .iter()
                .map(|s| format!("{}({})", s.id.index, kind_tag(s)))
                .collect::<Vec<_>>()
                .join(" + ")
        };
        write!(
            f,
            "{} -> {} ( RR : {:e})",
            ids(&self.losses),
            ids(&self.sources),
            self.rate
        )?;
        if self.is_temperature_dependent() {
            if let Some(dep) = &self.temperature_dependence {
                write!(
                    f,
                    "\nTemperature Dependence: ({}/{})^{}",
                    dep.numerator, dep.denominator, dep.exponent
                )?;
            }
        }
        if self.has_range() {
            if let Some(var) = &self.piecewise_var {
                write!(f, "\nRange: {} <= {} <= {}", self.min, var, self.max)?;
            }
        }
        Ok(())
    }
}
