use crate::Kinetics::chemistry_errors::ChemistryError;
use crate::Kinetics::chemistry_parser::parse_reaction_rows;
use crate::Kinetics::perturbation::{PerturbSpec, perturb_rates, perturbation_rng};
use crate::Kinetics::reaction::Reaction;
use crate::Species::species::SpeciesRegistry;
use crate::Utils::load_from_file::{load_table_from_file, load_table_from_reader};
use crate::settings::ChemistrySettings;
use log::{info, warn};
use prettytable::{Cell, Row, Table};
use std::collections::BTreeSet;
use std::io::Read;

/// Ordered collection of reactions read from one reaction table.
/// Nothing changes it after loading, apart from the one-time rate perturbation done by [`ReactionNetwork::load`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionNetwork {
    reactions: Vec<Reaction>,
    origin: String,
}

impl ReactionNetwork {
    pub fn from_reactions(reactions: Vec<Reaction>, origin: &str) -> Self {
        Self {
            reactions,
            origin: origin.to_string(),
        }
    }

    pub fn from_rows(
        rows: &[Vec<String>],
        registry: &dyn SpeciesRegistry,
        origin: &str,
    ) -> Result<Self, ChemistryError> {
        let reactions = parse_reaction_rows(rows, registry, origin)?;
        Ok(Self::from_reactions(reactions, origin))
    }

    pub fn from_reader<R: Read>(
        reader: R,
        registry: &dyn SpeciesRegistry,
        origin: &str,
    ) -> Result<Self, ChemistryError> {
        let rows = load_table_from_reader(reader, origin)?;
        Self::from_rows(&rows, registry, origin)
    }

    pub fn from_file(path: &str, registry: &dyn SpeciesRegistry) -> Result<Self, ChemistryError> {
        info!("Reading Chemistry File : {}", path);
        let rows = load_table_from_file(path)?;
        Self::from_rows(&rows, registry, path)
    }

    /// Reads the chemistry file named in the settings and applies the requested rate perturbation.
    pub fn load(
        settings: &ChemistrySettings,
        registry: &dyn SpeciesRegistry,
    ) -> Result<Self, ChemistryError> {
        let mut network = Self::from_file(&settings.chemistry_file, registry)?;
        if let Some(spec) = settings.perturbation_spec()? {
            network.perturb(&spec, settings.perturb_seed)?;
        }
        Ok(network)
    }

    pub(crate) fn perturb(
        &mut self,
        spec: &PerturbSpec,
        seed: Option<u64>,
    ) -> Result<usize, ChemistryError> {
        if self.reactions.iter().all(|r| r.perturb.is_none()) {
            warn!(
                "perturbation requested but '{}' gives no perturb values",
                self.origin
            );
            return Ok(0);
        }
        let mut rng = perturbation_rng(seed);
        perturb_rates(&mut self.reactions, spec, &mut rng)
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Reaction> {
        self.reactions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reaction> {
        self.reactions.iter()
    }

    /// name of the resource the network was read from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// all field names used by temperature dependences and validity ranges, sorted
    pub fn referenced_fields(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for reaction in self.reactions.iter() {
            if reaction.is_temperature_dependent() {
                if let Some(dep) = &reaction.temperature_dependence {
                    names.insert(dep.denominator.clone());
                }
            }
            if reaction.has_range() {
                if let Some(var) = &reaction.piecewise_var {
                    names.insert(var.clone());
                }
            }
        }
        names.into_iter().collect()
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(
            [
                "row", "reaction", "rate", "branching", "heat", "formula", "range",
            ]
            .iter()
            .map(|h| Cell::new(h))
            .collect(),
        ));
        for r in self.reactions.iter() {
            let formula = match &r.temperature_dependence {
                Some(dep) if r.formula_type > 0 => format!(
                    "({}/{})^{} [type {}]",
                    dep.numerator, dep.denominator, dep.exponent, r.formula_type
                ),
                _ => "const".to_string(),
            };
            let range = match &r.piecewise_var {
                Some(var) if r.has_range() => format!("{} <= {} <= {}", r.min, var, r.max),
                _ => String::new(),
            };
            table.add_row(Row::new(vec![
                Cell::new(&r.row.to_string()),
                Cell::new(&r.equation()),
                Cell::new(&format!("{:e}", r.rate)),
                Cell::new(&r.branching_ratio.to_string()),
                Cell::new(&r.energy.to_string()),
                Cell::new(&formula),
                Cell::new(&range),
            ]));
        }
        table
    }

    pub fn pretty_print(&self) {
        println!("Reaction network from {} ({} reactions)", self.origin, self.len());
        self.to_table().printstd();
    }
}

impl<'a> IntoIterator for &'a ReactionNetwork {
    type Item = &'a Reaction;
    type IntoIter = std::slice::Iter<'a, Reaction>;
    fn into_iter(self) -> Self::IntoIter {
        self.reactions.iter()
    }
}
