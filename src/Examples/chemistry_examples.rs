use crate::Grid::grid_field::{GridField, GridShape};
use crate::Kinetics::calc_chemistry::Chemistry;
use crate::Kinetics::chemistry_errors::ChemistryError;
use crate::Species::species::{Ions, Neutrals, SpeciesPopulation};
use crate::settings::ChemistrySettings;
use log::error;
use prettytable::{Cell, Row, Table};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

/// small Earth ionosphere network: charge exchange, dissociative recombination and one
/// reaction with different rates below and above 1000 K
const DEMO_CHEMISTRY: &str = "\
loss1,loss2,loss3,source1,source2,source3,rate,branching,heat,perturb,Numerator,Denominator,Exponent,Piecewise,Min,Max,Formula Type
,,,,,,cm3/s,,eV,,K,,,,K,K,
O+,N2,,NO+,N,,1.2e-12,,1.09,0.2,300,Ti,0.45,,,,1
O+,O2,,O2+,O,,2.1e-11,,1.55,0.2,300,Ti,0.5,,,,1
N2+,O,,NO+,N,,1.4e-10,,3.08,0.1,300,Ti,0.44,,,,1
O2+,e-,,O,O,,1.95e-7,,6.99,0.1,300,Te,0.7,,,,1
NO+,e-,,N,O,,4.0e-7,,2.75,0.1,300,Te,0.5,,,,1
N+,O2,,NO+,O,,2.6e-10,,6.67,,,,,Tn,0,1000,
,,,,,,3.1e-10,,,,,,,,1000,5000,
O,hv,,O+,e-,,0.0,,,,,,,,,,
end of network,,,,,,,,,,,,,,,,
";

const NEUTRALS: [&str; 4] = ["O", "O2", "N2", "N"];
const IONS: [&str; 5] = ["O+", "O2+", "N2+", "N+", "NO+"];

fn demo_chemistry_file() -> Result<NamedTempFile, ChemistryError> {
    let to_error = |source: std::io::Error| ChemistryError::Resource {
        path: "demo chemistry".to_string(),
        source,
    };
    let mut file = NamedTempFile::new().map_err(to_error)?;
    file.write_all(DEMO_CHEMISTRY.as_bytes()).map_err(to_error)?;
    Ok(file)
}

fn demo_settings(file: &NamedTempFile) -> ChemistrySettings {
    ChemistrySettings::with_chemistry_file(&file.path().to_string_lossy())
}

/// 2 x 2 grid of columns from 150 to 450 km
fn demo_population(shape: GridShape) -> SpeciesPopulation {
    let mut pop = SpeciesPopulation::new(Neutrals::new(&NEUTRALS, shape), Ions::new(&IONS, shape));
    let altitude = |k: usize| 150.0 + 100.0 * k as f64;
    // scale heights in km
    let profile = |n0: f64, h: f64| GridField::from_fn(shape, |_, _, k| n0 * (-(altitude(k) - 150.0) / h).exp());
    let neutral_profiles = [(1.0e10, 60.0), (1.0e9, 40.0), (3.0e10, 35.0), (1.0e7, 80.0)];
    for (neutral, (n0, h)) in pop.neutrals.species.iter_mut().zip(neutral_profiles) {
        neutral.density = profile(n0, h);
    }
    let ion_profiles = [(1.0e5, 150.0), (5.0e4, 30.0), (1.0e2, 30.0), (1.0e3, 100.0), (8.0e4, 30.0)];
    for (ion, (n0, h)) in pop.ions.species.iter_mut().zip(ion_profiles) {
        ion.density = profile(n0, h);
    }
    // photoionization of atomic oxygen
    let photo = profile(1.0e3, 60.0);
    if let Some(o) = pop.neutrals.species.get_mut(0) {
        o.ionization_rate = photo.clone();
    }
    if let Some(o_plus) = pop.ions.species.get_mut(0) {
        o_plus.ionization_rate = photo;
    }
    pop
}

fn demo_fields(shape: GridShape) -> HashMap<String, GridField> {
    let mut fields = HashMap::new();
    fields.insert(
        "Tn".to_string(),
        GridField::from_fn(shape, |_, _, k| 700.0 + 250.0 * k as f64),
    );
    fields.insert(
        "Ti".to_string(),
        GridField::from_fn(shape, |_, _, k| 800.0 + 300.0 * k as f64),
    );
    fields.insert(
        "Te".to_string(),
        GridField::from_fn(shape, |_, _, k| 1000.0 + 600.0 * k as f64),
    );
    fields
}

fn density_table(pop: &SpeciesPopulation) -> Table {
    let shape = pop.shape();
    let mut table = Table::new();
    let mut header = vec![Cell::new("species")];
    header.extend((0..shape.n_alts).map(|k| Cell::new(&format!("alt {}", k))));
    table.add_row(Row::new(header));
    let all = pop
        .neutrals
        .species
        .iter()
        .chain(pop.ions.species.iter())
        .chain(std::iter::once(&pop.ions.electrons));
    for species in all {
        let mut cells = vec![Cell::new(&species.name)];
        cells.extend((0..shape.n_alts).map(|k| Cell::new(&format!("{:.4e}", species.density[(0, 0, k)]))));
        table.add_row(Row::new(cells));
    }
    table
}

fn run_step(settings: ChemistrySettings, steps: usize, dt: f64) -> Result<(), ChemistryError> {
    let shape = GridShape::new(2, 2, 4);
    let mut pop = demo_population(shape);
    let fields = demo_fields(shape);
    let chem = Chemistry::new(settings, &pop)?;
    println!("densities before chemistry (first column), cm^-3");
    density_table(&pop).printstd();
    let mut heating = GridField::zeros(shape);
    for _ in 0..steps {
        heating = chem.calc_chemistry(&mut pop, &fields, dt)?.heating;
    }
    println!("densities after {} steps of {} s", steps, dt);
    density_table(&pop).printstd();
    println!("chemical heating of the last step, eV cm^-3 s^-1: {:?}", heating.as_slice());
    Ok(())
}

pub fn chem_examples(chemtask: usize) {
    let result = match chemtask {
        0 => {
            // READING AND LISTING THE REACTION NETWORK
            demo_chemistry_file().and_then(|file| {
                let pop = demo_population(GridShape::new(1, 1, 1));
                let chem = Chemistry::new(demo_settings(&file), &pop)?;
                chem.network.pretty_print();
                println!("fields needed: {:?}", chem.network.referenced_fields());
                Ok(())
            })
        }
        1 => {
            // ONE CHEMISTRY STEP ON A SMALL GRID
            demo_chemistry_file().and_then(|file| run_step(demo_settings(&file), 1, 10.0))
        }
        2 => {
            // ENSEMBLE MEMBER: ALL RATES WITH A perturb VALUE ARE DRAWN AROUND THEIR NOMINAL VALUE
            demo_chemistry_file().and_then(|file| {
                let mut settings = demo_settings(&file);
                settings.perturb = vec!["all".to_string()];
                settings.perturb_seed = Some(2024);
                let pop = demo_population(GridShape::new(1, 1, 1));
                Chemistry::new(settings.clone(), &pop)?.network.pretty_print();
                run_step(settings, 6, 60.0)
            })
        }
        _ => {
            println!("Wrong task number");
            Ok(())
        }
    };
    if let Err(e) = result {
        error!("chemistry example {} failed: {}", chemtask, e);
    }
}
