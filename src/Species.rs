/// Neutral and ion species containers, the name -> id registry used by the reaction parser, and
/// the charge-neutrality closure that derives electron density from the ions.
/// # Examples
/// ```
/// use IonoKin::Grid::grid_field::GridShape;
/// use IonoKin::Species::species::{Ions, Neutrals, SpeciesPopulation, SpeciesRegistry};
/// let shape = GridShape::new(1, 1, 4);
/// let pop = SpeciesPopulation::new(Neutrals::new(&["O", "N2"], shape), Ions::new(&["O+"], shape));
/// assert!(pop.resolve("N2").unwrap().is_neutral());
/// assert!(pop.resolve("e-").is_some());
/// ```
pub mod species;
