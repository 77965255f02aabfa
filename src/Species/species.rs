//! # Species containers
//!
//! Neutral and ion populations tracked on the grid. Each species owns its density field plus
//! the transient source/loss fields that the chemistry rewrites every step, and the externally
//! supplied ionization rate field.
//!
//! Electrons live in the ion container as one extra slot (id = number of ion species). They may
//! appear in reactions, but their density is never integrated: it always comes from
//! [`Ions::fill_electrons`], the charge-neutrality closure.
use crate::Grid::grid_field::{GridField, GridShape};
use log::debug;

/// name under which reactions refer to electrons
pub const ELECTRON_NAME: &str = "e-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeciesKind {
    Neutral,
    Ion,
}

/// stable handle of a species: position inside its container plus the container kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpeciesId {
    pub index: usize,
    pub kind: SpeciesKind,
}

impl SpeciesId {
    pub fn neutral(index: usize) -> Self {
        Self {
            index,
            kind: SpeciesKind::Neutral,
        }
    }
    pub fn ion(index: usize) -> Self {
        Self {
            index,
            kind: SpeciesKind::Ion,
        }
    }
    pub fn is_neutral(&self) -> bool {
        self.kind == SpeciesKind::Neutral
    }
}

/// Resolves a species name used in the reaction table to its id.
pub trait SpeciesRegistry {
    fn resolve(&self, name: &str) -> Option<SpeciesId>;
}

#[derive(Debug, Clone)]
pub struct Species {
    pub name: String,
    pub density: GridField,
    pub source_rate: GridField,
    pub loss_rate: GridField,
    /// photoionization (or other external ionization) rate, supplied by the caller
    pub ionization_rate: GridField,
}

impl Species {
    pub fn new(name: &str, shape: GridShape) -> Self {
        Self {
            name: name.to_string(),
            density: GridField::zeros(shape),
            source_rate: GridField::zeros(shape),
            loss_rate: GridField::zeros(shape),
            ionization_rate: GridField::zeros(shape),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Neutrals {
    pub species: Vec<Species>,
}

impl Neutrals {
    pub fn new(names: &[&str], shape: GridShape) -> Self {
        Self {
            species: names.iter().map(|name| Species::new(name, shape)).collect(),
        }
    }
    pub fn get_species_id(&self, name: &str) -> Option<usize> {
        self.species.iter().position(|s| s.name == name)
    }
    pub fn len(&self) -> usize {
        self.species.len()
    }
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Ions {
    pub species: Vec<Species>,
    pub electrons: Species,
}

impl Ions {
    pub fn new(names: &[&str], shape: GridShape) -> Self {
        Self {
            species: names.iter().map(|name| Species::new(name, shape)).collect(),
            electrons: Species::new(ELECTRON_NAME, shape),
        }
    }
    /// id of an ion species; electrons resolve to the slot just past the last ion
    pub fn get_species_id(&self, name: &str) -> Option<usize> {
        if let Some(id) = self.species.iter().position(|s| s.name == name) {
            return Some(id);
        }
        if name == ELECTRON_NAME {
            return Some(self.species.len());
        }
        None
    }
    /// number of ion species, electrons not included
    pub fn len(&self) -> usize {
        self.species.len()
    }
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
    pub fn get(&self, id: usize) -> Option<&Species> {
        if id == self.species.len() {
            Some(&self.electrons)
        } else {
            self.species.get(id)
        }
    }
    pub fn get_mut(&mut self, id: usize) -> Option<&mut Species> {
        if id == self.species.len() {
            Some(&mut self.electrons)
        } else {
            self.species.get_mut(id)
        }
    }
    /// Charge-neutrality closure: electron density = sum of all ion densities, cell by cell.
    pub fn fill_electrons(&mut self) {
        let density = &mut self.electrons.density;
        density.fill(0.0);
        for ion in self.species.iter() {
            density.add_assign_field(&ion.density);
        }
        debug!(
            "electron density refilled from {} ion species, total {:e}",
            self.species.len(),
            density.sum()
        );
    }
}

/// Neutral and ion populations together; this is the registry the reaction parser resolves
/// names against and the state the chemistry step mutates.
#[derive(Debug, Clone)]
pub struct SpeciesPopulation {
    pub neutrals: Neutrals,
    pub ions: Ions,
}

impl SpeciesPopulation {
    pub fn new(neutrals: Neutrals, ions: Ions) -> Self {
        Self { neutrals, ions }
    }

    pub fn species(&self, id: SpeciesId) -> Option<&Species> {
        match id.kind {
            SpeciesKind::Neutral => self.neutrals.species.get(id.index),
            SpeciesKind::Ion => self.ions.get(id.index),
        }
    }

    pub fn species_mut(&mut self, id: SpeciesId) -> Option<&mut Species> {
        match id.kind {
            SpeciesKind::Neutral => self.neutrals.species.get_mut(id.index),
            SpeciesKind::Ion => self.ions.get_mut(id.index),
        }
    }

    pub fn shape(&self) -> GridShape {
        self.ions.electrons.density.shape()
    }
}

impl SpeciesRegistry for SpeciesPopulation {
    fn resolve(&self, name: &str) -> Option<SpeciesId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if let Some(id) = self.neutrals.get_species_id(name) {
            return Some(SpeciesId::neutral(id));
        }
        self.ions.get_species_id(name).map(SpeciesId::ion)
    }
}
