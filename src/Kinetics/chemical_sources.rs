//! Production and loss rates of every species from the reaction network.
//!
//! For each reaction and each cell the flux is
//! `k_eff * branching * n(loss1) * n(loss2) * ...`; it is added to the loss rate of every
//! reactant (once per occurrence, so `A + A` removes A twice) and to the source rate of every
//! product. Cells are independent of each other.
use crate::Grid::grid_field::{FieldProvider, GridField};
use crate::Kinetics::chemistry_errors::ChemistryError;
use crate::Kinetics::reaction::Reaction;
use crate::Kinetics::reaction_network::ReactionNetwork;
use crate::Species::species::SpeciesPopulation;
use log::debug;

/// by-products of one evaluation pass besides the species rates
#[derive(Debug, Clone)]
pub struct ChemicalSources {
    /// energy released by exothermic reactions per unit time, summed over reactions
    pub heating: GridField,
}

/// Start of a step: photoionization removes neutrals and produces ions.
pub fn init_sources_and_losses(population: &mut SpeciesPopulation) {
    for neutral in population.neutrals.species.iter_mut() {
        neutral.loss_rate = neutral.ionization_rate.clone();
        neutral.source_rate.fill(0.0);
    }
    for ion in population.ions.species.iter_mut() {
        ion.loss_rate.fill(0.0);
        ion.source_rate = ion.ionization_rate.clone();
    }
    population.ions.electrons.loss_rate.fill(0.0);
    population.ions.electrons.source_rate.fill(0.0);
}

/// every grid field of every species (electrons included) must live on the population grid
fn check_species_shapes(population: &SpeciesPopulation) -> Result<(), ChemistryError> {
    let shape = population.shape();
    let all = population
        .neutrals
        .species
        .iter()
        .chain(population.ions.species.iter())
        .chain(std::iter::once(&population.ions.electrons));
    for species in all {
        let species_fields = [
            ("density", &species.density),
            ("source_rate", &species.source_rate),
            ("loss_rate", &species.loss_rate),
            ("ionization_rate", &species.ionization_rate),
        ];
        for (what, field) in species_fields {
            if field.shape() != shape {
                return Err(ChemistryError::Config(format!(
                    "{} of '{}' has shape {:?}, the population lives on {:?}",
                    what,
                    species.name,
                    field.shape(),
                    shape
                )));
            }
        }
    }
    Ok(())
}

/// Checks that every species and field the network refers to is available and shaped like
/// the population, so that the per-cell pass below cannot run into a missing input.
pub fn check_inputs(
    network: &ReactionNetwork,
    population: &SpeciesPopulation,
    fields: &dyn FieldProvider,
) -> Result<(), ChemistryError> {
    check_species_shapes(population)?;
    let shape = population.shape();
    for name in network.referenced_fields() {
        match fields.get_field(&name) {
            None => return Err(ChemistryError::MissingField(name)),
            Some(field) if field.shape() != shape => {
                return Err(ChemistryError::Config(format!(
                    "field '{}' has shape {:?}, the species live on {:?}",
                    name,
                    field.shape(),
                    shape
                )));
            }
            Some(_) => {}
        }
    }
    for reaction in network.iter() {
        for slot in reaction.losses.iter().chain(reaction.sources.iter()) {
            if population.species(slot.id).is_none() {
                return Err(ChemistryError::Config(format!(
                    "reaction from row {} refers to '{}' ({:?}), which is not in the species population",
                    reaction.row, slot.name, slot.id
                )));
            }
        }
    }
    Ok(())
}

/// Flux of one reaction on every cell. Assumes [`check_inputs`] passed; anything missing
/// contributes as if absent.
pub fn reaction_flux(
    reaction: &Reaction,
    population: &SpeciesPopulation,
    fields: &dyn FieldProvider,
    field_floor: f64,
) -> GridField {
    let shape = population.shape();
    let mut flux = GridField::from_elem(shape, reaction.rate * reaction.branching_ratio);

    if reaction.is_temperature_dependent() {
        let denominator = reaction
            .temperature_dependence
            .as_ref()
            .and_then(|dep| fields.get_field(&dep.denominator));
        if let Some(denominator) = denominator {
            for (f, &t) in flux.as_mut_slice().iter_mut().zip(denominator.as_slice()) {
                *f = reaction.effective_rate(t, field_floor) * reaction.branching_ratio;
            }
        }
    }

    for slot in reaction.losses.iter() {
        if let Some(reactant) = population.species(slot.id) {
            flux.component_mul_assign(&reactant.density);
        }
    }

    if reaction.has_range() {
        let gate = reaction
            .piecewise_var
            .as_ref()
            .and_then(|name| fields.get_field(name));
        if let Some(gate) = gate {
            for (f, &value) in flux.as_mut_slice().iter_mut().zip(gate.as_slice()) {
                if !reaction.in_range(value) {
                    *f = 0.0;
                }
            }
        }
    }
    flux
}

/// Walks the network once and adds every reaction's flux to the source/loss rates.
/// Only `source_rate`/`loss_rate` of the species are written; densities stay untouched.
pub fn calc_chemical_sources(
    network: &ReactionNetwork,
    population: &mut SpeciesPopulation,
    fields: &dyn FieldProvider,
    field_floor: f64,
) -> Result<ChemicalSources, ChemistryError> {
    check_inputs(network, population, fields)?;
    Ok(accumulate_sources(network, population, fields, field_floor))
}

/// [`calc_chemical_sources`] without the input checks; callers must have run [`check_inputs`].
pub(crate) fn accumulate_sources(
    network: &ReactionNetwork,
    population: &mut SpeciesPopulation,
    fields: &dyn FieldProvider,
    field_floor: f64,
) -> ChemicalSources {
    let mut heating = GridField::zeros(population.shape());

    for reaction in network.iter() {
        let flux = reaction_flux(reaction, population, fields, field_floor);
        for slot in reaction.losses.iter() {
            if let Some(reactant) = population.species_mut(slot.id) {
                reactant.loss_rate.add_assign_field(&flux);
            }
        }
        for slot in reaction.sources.iter() {
            if let Some(product) = population.species_mut(slot.id) {
                product.source_rate.add_assign_field(&flux);
            }
        }
        if reaction.energy != 0.0 {
            heating.add_scaled(reaction.energy, &flux);
        }
    }
    debug!(
        "chemical sources from {} reactions, total heating {:e}",
        network.len(),
        heating.sum()
    );
    ChemicalSources { heating }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid::grid_field::GridShape;
    use crate::Kinetics::reaction::{SpeciesSlot, TemperatureDependence};
    use crate::Species::species::{Ions, Neutrals, SpeciesRegistry};
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn shape() -> GridShape {
        GridShape::new(4, 1, 1)
    }

    fn population() -> SpeciesPopulation {
        let mut pop = SpeciesPopulation::new(
            Neutrals::new(&["A", "B"], shape()),
            Ions::new(&["A+"], shape()),
        );
        pop.neutrals.species[0].density =
            GridField::from_vec(shape(), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        pop.neutrals.species[1].density.fill(10.0);
        pop
    }

    fn slot(pop: &SpeciesPopulation, name: &str) -> SpeciesSlot {
        SpeciesSlot::new(name, pop.resolve(name).unwrap())
    }

    #[test]
    fn test_init_from_ionization() {
        let mut pop = population();
        pop.neutrals.species[0].ionization_rate.fill(3.0);
        pop.neutrals.species[0].source_rate.fill(99.0);
        pop.ions.species[0].ionization_rate.fill(3.0);
        pop.ions.species[0].loss_rate.fill(99.0);
        init_sources_and_losses(&mut pop);
        assert_eq!(pop.neutrals.species[0].loss_rate.sum(), 12.0);
        assert_eq!(pop.neutrals.species[0].source_rate.sum(), 0.0);
        assert_eq!(pop.ions.species[0].source_rate.sum(), 12.0);
        assert_eq!(pop.ions.species[0].loss_rate.sum(), 0.0);
    }

    #[test]
    fn test_mass_action_with_repeated_reactant() {
        let mut pop = population();
        let k = 2.0e-3;
        let a = slot(&pop, "A");
        let b = slot(&pop, "B");
        let network = ReactionNetwork::from_reactions(
            vec![Reaction {
                losses: vec![a.clone(), a],
                sources: vec![b],
                rate: k,
                row: 1,
                ..Default::default()
            }],
            "test",
        );
        let fields: HashMap<String, GridField> = HashMap::new();
        init_sources_and_losses(&mut pop);
        calc_chemical_sources(&network, &mut pop, &fields, 1e-20).unwrap();
        for (i, n) in [1.0, 2.0, 3.0, 4.0].iter().enumerate() {
            let flux = k * n * n;
            assert_relative_eq!(pop.neutrals.species[1].source_rate[(i, 0, 0)], flux);
            assert_relative_eq!(pop.neutrals.species[0].loss_rate[(i, 0, 0)], 2.0 * flux);
        }
        assert_eq!(pop.neutrals.species[0].density[(3, 0, 0)], 4.0);
    }

    #[test]
    fn test_piecewise_gating_and_temperature_dependence() {
        let mut pop = population();
        let a = slot(&pop, "A");
        let b = slot(&pop, "B");
        let ion = slot(&pop, "A+");
        let reaction = Reaction {
            losses: vec![a, b],
            sources: vec![ion],
            rate: 1.0,
            branching_ratio: 0.5,
            energy: 2.0,
            temperature_dependence: Some(TemperatureDependence {
                numerator: 300.0,
                denominator: "Tn".to_string(),
                exponent: 2.0,
            }),
            piecewise_var: Some("T".to_string()),
            min: 200.0,
            max: 300.0,
            formula_type: 1,
            row: 1,
            perturb: None,
        };
        let network = ReactionNetwork::from_reactions(vec![reaction], "test");
        let mut fields = HashMap::new();
        fields.insert("Tn".to_string(), GridField::from_elem(shape(), 150.0));
        fields.insert(
            "T".to_string(),
            GridField::from_vec(shape(), vec![199.0, 200.0, 300.0, 301.0]).unwrap(),
        );
        init_sources_and_losses(&mut pop);
        let out = calc_chemical_sources(&network, &mut pop, &fields, 1e-20).unwrap();
        let source = &pop.ions.species[0].source_rate;
        // (300/150)^2 * 0.5 * n_A * n_B
        assert_eq!(source[(0, 0, 0)], 0.0);
        assert_relative_eq!(source[(1, 0, 0)], 4.0 * 0.5 * 2.0 * 10.0);
        assert_relative_eq!(source[(2, 0, 0)], 4.0 * 0.5 * 3.0 * 10.0);
        assert_eq!(source[(3, 0, 0)], 0.0);
        assert_relative_eq!(out.heating[(1, 0, 0)], 2.0 * 40.0);
        assert_eq!(out.heating[(3, 0, 0)], 0.0);
    }

    #[test]
    fn test_zero_denominator_stays_finite() {
        let pop = population();
        let reaction = Reaction {
            losses: vec![slot(&pop, "A")],
            sources: vec![slot(&pop, "B")],
            rate: 1.0,
            temperature_dependence: Some(TemperatureDependence {
                numerator: 1.0,
                denominator: "Te".to_string(),
                exponent: 0.5,
            }),
            formula_type: 1,
            ..Default::default()
        };
        let mut fields = HashMap::new();
        fields.insert("Te".to_string(), GridField::zeros(shape()));
        let flux = reaction_flux(&reaction, &pop, &fields, 1e-20);
        assert!(flux.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn test_missing_field_is_reported_before_any_write() {
        let mut pop = population();
        let reaction = Reaction {
            losses: vec![slot(&pop, "A")],
            sources: vec![slot(&pop, "B")],
            rate: 1.0,
            piecewise_var: Some("Tn".to_string()),
            min: 100.0,
            max: 200.0,
            ..Default::default()
        };
        let network = ReactionNetwork::from_reactions(vec![reaction], "test");
        pop.neutrals.species[1].source_rate.fill(5.0);
        let fields: HashMap<String, GridField> = HashMap::new();
        let result = calc_chemical_sources(&network, &mut pop, &fields, 1e-20);
        assert!(matches!(result, Err(ChemistryError::MissingField(name)) if name == "Tn"));
        assert_eq!(pop.neutrals.species[1].source_rate.sum(), 20.0);
    }

    #[test]
    fn test_misshaped_species_field_is_reported() {
        let network = ReactionNetwork::default();
        let fields: HashMap<String, GridField> = HashMap::new();

        let mut pop = population();
        pop.ions.species[0].ionization_rate = GridField::zeros(GridShape::new(5, 1, 1));
        let err = check_inputs(&network, &pop, &fields).unwrap_err();
        assert!(matches!(&err, ChemistryError::Config(msg) if msg.contains("ionization_rate of 'A+'")));

        let mut pop = population();
        pop.neutrals.species[1].density = GridField::zeros(GridShape::new(2, 2, 1));
        assert!(matches!(
            calc_chemical_sources(&network, &mut pop, &fields, 1e-20),
            Err(ChemistryError::Config(_))
        ));

        // neutrals built on another grid than the ions
        let mut pop = SpeciesPopulation::new(
            Neutrals::new(&["A"], GridShape::new(3, 1, 1)),
            Ions::new(&["A+"], shape()),
        );
        assert!(matches!(
            calc_chemical_sources(&network, &mut pop, &fields, 1e-20),
            Err(ChemistryError::Config(_))
        ));
        assert!(check_inputs(&network, &population(), &fields).is_ok());
    }

    #[test]
    fn test_species_outside_population_is_reported() {
        let mut pop = population();
        let mut ghost = slot(&pop, "B");
        ghost.id.index = 17;
        let reaction = Reaction {
            losses: vec![slot(&pop, "A")],
            sources: vec![ghost],
            rate: 1.0,
            ..Default::default()
        };
        let network = ReactionNetwork::from_reactions(vec![reaction], "test");
        let fields: HashMap<String, GridField> = HashMap::new();
        assert!(matches!(
            calc_chemical_sources(&network, &mut pop, &fields, 1e-20),
            Err(ChemistryError::Config(_))
        ));
    }
}
