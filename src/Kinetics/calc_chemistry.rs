//! One chemistry step:
//! 1) electrons from ions,
//! 2) sources/losses initialised from the ionization rates,
//! 3) reaction network walked once,
//! 4) every neutral and ion density advanced implicitly,
//! 5) electrons from the new ions.
use crate::Grid::grid_field::FieldProvider;
use crate::Kinetics::chemical_sources::{
    ChemicalSources, accumulate_sources, check_inputs, init_sources_and_losses,
};
use crate::Kinetics::chemistry_errors::ChemistryError;
use crate::Kinetics::chemistry_solver::solver_chemistry;
use crate::Kinetics::reaction_network::ReactionNetwork;
use crate::Species::species::{Species, SpeciesPopulation, SpeciesRegistry};
use crate::settings::{ChemistrySettings, SolverSettings};
use log::{debug, info};

#[derive(Debug, Clone)]
pub struct Chemistry {
    pub network: ReactionNetwork,
    pub settings: ChemistrySettings,
}

impl Chemistry {
    /// Reads the reaction table named in the settings (and perturbs it if asked to).
    /// Any load error aborts construction.
    pub fn new(
        settings: ChemistrySettings,
        registry: &dyn SpeciesRegistry,
    ) -> Result<Self, ChemistryError> {
        let network = ReactionNetwork::load(&settings, registry)?;
        info!(
            "chemistry initialised with {} reactions from '{}'",
            network.len(),
            settings.chemistry_file
        );
        Ok(Self { network, settings })
    }

    pub fn from_network(network: ReactionNetwork, settings: ChemistrySettings) -> Self {
        Self { network, settings }
    }

    /// Advances all species densities by `dt` seconds. Inputs are validated before anything
    /// is written, so on error the population is left as it was.
    pub fn calc_chemistry(
        &self,
        population: &mut SpeciesPopulation,
        fields: &dyn FieldProvider,
        dt: f64,
    ) -> Result<ChemicalSources, ChemistryError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(ChemistryError::Config(format!(
                "time step must be finite and non-negative, got {}",
                dt
            )));
        }
        check_inputs(&self.network, population, fields)?;

        population.ions.fill_electrons();
        init_sources_and_losses(population);
        let sources =
            accumulate_sources(&self.network, population, fields, self.settings.field_floor);

        let solver = &self.settings.solver;
        for neutral in population.neutrals.species.iter_mut() {
            update_density(neutral, dt, solver);
        }
        for ion in population.ions.species.iter_mut() {
            update_density(ion, dt, solver);
        }

        population.ions.fill_electrons();
        debug!("chemistry step of {} s done", dt);
        Ok(sources)
    }
}

fn update_density(species: &mut Species, dt: f64, solver: &SolverSettings) {
    species.density = solver_chemistry(
        &species.density,
        &species.source_rate,
        &species.loss_rate,
        dt,
        solver,
    );
}
