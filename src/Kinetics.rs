/// Error type shared by loading, configuration and step setup.
pub mod chemistry_errors;
/// A single reaction: resolved reactant and product slots, rate coefficient, optional
/// temperature dependence and optional validity range over a named field.
pub mod reaction;
/// eng
/// The module reads the reaction table. The first row names the columns, the second row holds
/// units and is skipped, every following row with a rate is one reaction.
/// Columns are found by header name, so their order in the file does not matter:
/// loss1..loss3, source1..source3, rate, branching, heat, perturb (optional), Numerator,
/// Denominator, Exponent, Piecewise, Min, Max, Formula Type.
///
/// Note:
/// 1) a row with a rate but without any species continues the previous reaction: it takes the
/// species, branching ratio, heat and Piecewise variable of that reaction and supplies its own
/// rate and range. This is how one reaction gets different rates on different temperature ranges.
/// 2) species names that the population does not track (for example "hv" or "N(2D)") are left
/// out of the reaction; a reaction left without losses or without sources is dropped.
/// 3) rows without a rate (trailing comments, notes) are skipped.
/// ----------------------------------------------------------------
/// # Examples
/// ```
/// use IonoKin::Grid::grid_field::GridShape;
/// use IonoKin::Kinetics::reaction_network::ReactionNetwork;
/// use IonoKin::Species::species::{Ions, Neutrals, SpeciesPopulation};
/// let shape = GridShape::new(1, 1, 1);
/// let pop = SpeciesPopulation::new(Neutrals::new(&["O", "N2"], shape), Ions::new(&["O+", "NO+"], shape));
/// let table = "loss1,loss2,loss3,source1,source2,source3,rate,branching,heat,Numerator,Denominator,Exponent,Piecewise,Min,Max,Formula Type
/// ,,,,,,cm3/s,,eV,,,,,,,
/// O+,N2,,NO+,N,,1.2e-12,,1.09,,,,,,,
/// ";
/// let network = ReactionNetwork::from_reader(table.as_bytes(), &pop, "inline").unwrap();
/// assert_eq!(network.len(), 1);
/// assert_eq!(network.get(0).unwrap().equation(), "O+ + N2 -> NO+");
/// ```
pub mod chemistry_parser;
/// The ordered reaction network: loading from file, rate perturbation, listing as a table
pub mod reaction_network;
/// Random perturbation of rate coefficients for ensemble runs. Targets are given as tokens:
/// "all", or a data row number with an optional letter prefix ("R12" and "12" both mean the
/// twelfth reaction row of the table).
pub mod perturbation;
/// mass-action source and loss rates of every species
pub mod chemical_sources;
/// implicit (backward Euler) density update
pub mod chemistry_solver;
/// eng
/// Top-level chemistry step. Holds the network and the numerical settings and advances a
/// species population by one time step on the whole grid.
/// # Examples
/// ```
/// use IonoKin::Grid::grid_field::{GridField, GridShape};
/// use IonoKin::Kinetics::calc_chemistry::Chemistry;
/// use IonoKin::Kinetics::reaction_network::ReactionNetwork;
/// use IonoKin::Species::species::{Ions, Neutrals, SpeciesPopulation};
/// use IonoKin::settings::ChemistrySettings;
/// use std::collections::HashMap;
/// let shape = GridShape::new(1, 1, 2);
/// let mut pop = SpeciesPopulation::new(Neutrals::new(&["O"], shape), Ions::new(&["O+"], shape));
/// let chem = Chemistry::from_network(ReactionNetwork::default(), ChemistrySettings::default());
/// pop.ions.species[0].ionization_rate.fill(5.0);
/// let fields: HashMap<String, GridField> = HashMap::new();
/// chem.calc_chemistry(&mut pop, &fields, 10.0).unwrap();
/// assert_eq!(pop.ions.electrons.density[(0, 0, 1)], 50.0);
/// ```
pub mod calc_chemistry;
