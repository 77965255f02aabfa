//! Reading of the reaction table.
//!
//! Row 0 holds the column names, row 1 is skipped (units), every later row is one reaction or a
//! continuation of the previous one. Columns are found by name, never by position.
use crate::Kinetics::chemistry_errors::ChemistryError;
use crate::Kinetics::reaction::{Reaction, SpeciesSlot, TemperatureDependence};
use crate::Species::species::SpeciesRegistry;
use log::{debug, info, trace};
use std::collections::HashMap;

/// header row + units row
pub const HEADER_ROWS: usize = 2;
pub const LOSS_COLUMNS: [&str; 3] = ["loss1", "loss2", "loss3"];
pub const SOURCE_COLUMNS: [&str; 3] = ["source1", "source2", "source3"];

/// Column positions of everything the parser reads, resolved once from the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    pub losses: [usize; 3],
    pub sources: [usize; 3],
    pub rate: usize,
    pub branching: usize,
    pub heat: usize,
    pub numerator: usize,
    pub denominator: usize,
    pub exponent: usize,
    pub piecewise: usize,
    pub min: usize,
    pub max: usize,
    pub formula_type: usize,
    /// the only optional column
    pub perturb: Option<usize>,
}

impl ColumnMap {
    pub fn from_header(header: &[String], origin: &str) -> Result<Self, ChemistryError> {
        let headers: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();
        let find = |name: &str| -> Result<usize, ChemistryError> {
            headers
                .get(name)
                .copied()
                .ok_or_else(|| ChemistryError::Format {
                    path: origin.to_string(),
                    reason: format!("header has no '{}' column", name),
                })
        };
        Ok(Self {
            losses: [
                find(LOSS_COLUMNS[0])?,
                find(LOSS_COLUMNS[1])?,
                find(LOSS_COLUMNS[2])?,
            ],
            sources: [
                find(SOURCE_COLUMNS[0])?,
                find(SOURCE_COLUMNS[1])?,
                find(SOURCE_COLUMNS[2])?,
            ],
            rate: find("rate")?,
            branching: find("branching")?,
            heat: find("heat")?,
            numerator: find("Numerator")?,
            denominator: find("Denominator")?,
            exponent: find("Exponent")?,
            piecewise: find("Piecewise")?,
            min: find("Min")?,
            max: find("Max")?,
            formula_type: find("Formula Type")?,
            perturb: headers.get("perturb").copied(),
        })
    }
}

/// one data row with what is needed to report errors about it
struct RowView<'a> {
    cells: &'a [String],
    index: usize,
    origin: &'a str,
}

impl<'a> RowView<'a> {
    /// missing cells of short rows read as empty
    fn cell(&self, column: usize) -> &'a str {
        self.cells.get(column).map(|c| c.trim()).unwrap_or("")
    }

    fn parse_error(&self, column: &str, value: &str) -> ChemistryError {
        ChemistryError::Parse {
            path: self.origin.to_string(),
            row: self.index,
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    fn number(&self, column: usize, name: &str) -> Result<f64, ChemistryError> {
        let text = self.cell(column);
        text.parse::<f64>()
            .map_err(|_| self.parse_error(name, text))
    }

    fn optional_number(&self, column: usize, name: &str) -> Result<Option<f64>, ChemistryError> {
        if self.cell(column).is_empty() {
            Ok(None)
        } else {
            self.number(column, name).map(Some)
        }
    }

    fn optional_text(&self, column: usize) -> Option<String> {
        let text = self.cell(column);
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    fn species(&self, columns: &[usize; 3], registry: &dyn SpeciesRegistry) -> Vec<SpeciesSlot> {
        columns
            .iter()
            .filter_map(|&column| {
                let name = self.cell(column);
                if name.is_empty() {
                    return None;
                }
                match registry.resolve(name) {
                    Some(id) => Some(SpeciesSlot::new(name, id)),
                    None => {
                        debug!(
                            "{}: row {}: species '{}' is not tracked, slot left out",
                            self.origin, self.index, name
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

/// Turns one data row into a reaction. `row_index` is the position in the whole table
/// (header = 0); species that the registry does not know are left out.
pub fn interpret_reaction_line(
    cells: &[String],
    row_index: usize,
    columns: &ColumnMap,
    registry: &dyn SpeciesRegistry,
    origin: &str,
) -> Result<Reaction, ChemistryError> {
    let row = RowView {
        cells,
        index: row_index,
        origin,
    };
    trace!("interpreting chemistry line {}: {:?}", row_index, cells);

    let numerator = row.optional_number(columns.numerator, "Numerator")?;
    let temperature_dependence = match numerator {
        Some(numerator) => {
            let denominator = row
                .optional_text(columns.denominator)
                .ok_or_else(|| row.parse_error("Denominator", ""))?;
            let exponent = row
                .optional_number(columns.exponent, "Exponent")?
                .unwrap_or(1.0);
            Some(TemperatureDependence {
                numerator,
                denominator,
                exponent,
            })
        }
        None => None,
    };
    let formula_type = match row.cell(columns.formula_type) {
        "" => 0,
        text => text
            .parse::<u32>()
            .map_err(|_| row.parse_error("Formula Type", text))?,
    };
    let perturb = columns.perturb.and_then(|column| row.optional_text(column));

    Ok(Reaction {
        losses: row.species(&columns.losses, registry),
        sources: row.species(&columns.sources, registry),
        rate: row.number(columns.rate, "rate")?,
        branching_ratio: row
            .optional_number(columns.branching, "branching")?
            .unwrap_or(1.0),
        energy: row.optional_number(columns.heat, "heat")?.unwrap_or(0.0),
        temperature_dependence,
        piecewise_var: row.optional_text(columns.piecewise),
        min: row.optional_number(columns.min, "Min")?.unwrap_or(0.0),
        max: row.optional_number(columns.max, "Max")?.unwrap_or(0.0),
        formula_type,
        row: (row_index + 1).saturating_sub(HEADER_ROWS),
        perturb,
    })
}

/// Parses all data rows of a table into reactions, resolving continuation rows against the
/// last accepted reaction.
pub fn parse_reaction_rows(
    rows: &[Vec<String>],
    registry: &dyn SpeciesRegistry,
    origin: &str,
) -> Result<Vec<Reaction>, ChemistryError> {
    if rows.len() <= HEADER_ROWS {
        return Err(ChemistryError::Format {
            path: origin.to_string(),
            reason: format!(
                "{} rows found, need a header, a units row and at least one reaction",
                rows.len()
            ),
        });
    }
    let columns = ColumnMap::from_header(&rows[0], origin)?;

    let mut reactions: Vec<Reaction> = Vec::new();
    let mut previous: Option<Reaction> = None;
    for (row_index, cells) in rows.iter().enumerate().skip(HEADER_ROWS) {
        // trailing comment rows have no rate
        if cells.get(columns.rate).map_or(true, |c| c.trim().is_empty()) {
            trace!("row {} has no rate, skipped", row_index);
            continue;
        }
        let mut reaction = interpret_reaction_line(cells, row_index, &columns, registry, origin)?;

        // second rate segment of the same reaction over another variable range
        if reaction.is_continuation() {
            match &previous {
                Some(last) => reaction.inherit_from(last),
                None => {
                    return Err(ChemistryError::Format {
                        path: origin.to_string(),
                        reason: format!(
                            "row {} continues a previous reaction, but no reaction precedes it",
                            row_index
                        ),
                    });
                }
            }
        }

        if reaction.is_complete() {
            debug!("{}", reaction);
            previous = Some(reaction.clone());
            reactions.push(reaction);
        } else {
            debug!(
                "row {} dropped: {} losses, {} sources",
                row_index,
                reaction.n_losses(),
                reaction.n_sources()
            );
        }
    }
    info!("{} reactions read from '{}'", reactions.len(), origin);
    Ok(reactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid::grid_field::GridShape;
    use crate::Species::species::{Ions, Neutrals, SpeciesId, SpeciesPopulation};

    const HEADER: &str = "loss1,loss2,loss3,source1,source2,source3,rate,branching,heat,perturb,Numerator,Denominator,Exponent,Piecewise,Min,Max,Formula Type";

    fn registry() -> SpeciesPopulation {
        let shape = GridShape::new(1, 1, 1);
        SpeciesPopulation::new(
            Neutrals::new(&["O", "N2", "O2", "N"], shape),
            Ions::new(&["O+", "N2+", "O2+", "NO+"], shape),
        )
    }

    fn table(lines: &[&str]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|l| l.split(',').map(|c| c.trim().to_string()).collect())
            .collect()
    }

    #[test]
    fn test_header_lookup_by_name() {
        let header: Vec<String> = HEADER.split(',').rev().map(String::from).collect();
        let columns = ColumnMap::from_header(&header, "reversed").unwrap();
        assert_eq!(columns.formula_type, 0);
        assert_eq!(columns.losses[0], 16);
        assert_eq!(columns.perturb, Some(7));
    }

    #[test]
    fn test_missing_header_column_is_format_error() {
        let header: Vec<String> = HEADER
            .split(',')
            .filter(|h| *h != "Exponent")
            .map(String::from)
            .collect();
        let err = ColumnMap::from_header(&header, "no_exponent").unwrap_err();
        assert!(matches!(err, ChemistryError::Format { .. }));
        assert!(err.to_string().contains("Exponent"));
    }

    #[test]
    fn test_perturb_column_is_optional() {
        let header: Vec<String> = HEADER
            .split(',')
            .filter(|h| *h != "perturb")
            .map(String::from)
            .collect();
        assert_eq!(ColumnMap::from_header(&header, "x").unwrap().perturb, None);
    }

    #[test]
    fn test_interpret_full_line() {
        let rows = table(&[
            HEADER,
            "N2+,O,,NO+,N,,1.4e-10,0.5,3.08,0.1,300,Ti,0.44,Ti,0,1500,1",
        ]);
        let columns = ColumnMap::from_header(&rows[0], "t").unwrap();
        let r = interpret_reaction_line(&rows[1], 2, &columns, &registry(), "t").unwrap();
        assert_eq!(r.losses.len(), 2);
        assert_eq!(r.losses[0].id, SpeciesId::ion(1));
        assert_eq!(r.losses[1].id, SpeciesId::neutral(0));
        assert_eq!(r.sources[0].id, SpeciesId::ion(3));
        assert_eq!(r.sources[1].id, SpeciesId::neutral(3));
        assert_eq!(r.rate, 1.4e-10);
        assert_eq!(r.branching_ratio, 0.5);
        assert_eq!(r.energy, 3.08);
        assert_eq!(r.perturb.as_deref(), Some("0.1"));
        let dep = r.temperature_dependence.as_ref().unwrap();
        assert_eq!((dep.numerator, dep.denominator.as_str(), dep.exponent), (300.0, "Ti", 0.44));
        assert_eq!(r.piecewise_var.as_deref(), Some("Ti"));
        assert_eq!((r.min, r.max, r.formula_type, r.row), (0.0, 1500.0, 1, 1));
    }

    #[test]
    fn test_defaults_for_blank_cells() {
        let rows = table(&[HEADER, "O+,N2,,NO+,N,,1.2e-12,,,,,,,,,,"]);
        let columns = ColumnMap::from_header(&rows[0], "t").unwrap();
        let r = interpret_reaction_line(&rows[1], 2, &columns, &registry(), "t").unwrap();
        assert_eq!(r.branching_ratio, 1.0);
        assert_eq!(r.energy, 0.0);
        assert_eq!(r.temperature_dependence, None);
        assert_eq!(r.piecewise_var, None);
        assert_eq!((r.min, r.max, r.formula_type), (0.0, 0.0, 0));
        assert_eq!(r.perturb, None);
        assert!(!r.has_range());
    }

    #[test]
    fn test_perturb_note_does_not_break_loading() {
        let rows = table(&[
            HEADER,
            "units",
            "O+,e-,,O,,,1e-12,,,see note,,,,,,,",
        ]);
        let reactions = parse_reaction_rows(&rows, &registry(), "t").unwrap();
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions[0].perturb.as_deref(), Some("see note"));
    }

    #[test]
    fn test_blank_exponent_defaults_to_one() {
        let rows = table(&[HEADER, "O+,N2,,NO+,N,,1.2e-12,,,,300,Tn,,,,,1"]);
        let columns = ColumnMap::from_header(&rows[0], "t").unwrap();
        let r = interpret_reaction_line(&rows[1], 2, &columns, &registry(), "t").unwrap();
        assert_eq!(r.temperature_dependence.unwrap().exponent, 1.0);
    }

    #[test]
    fn test_numerator_without_denominator_is_error() {
        let rows = table(&[HEADER, "O+,N2,,NO+,N,,1.2e-12,,,,300,,0.5,,,,1"]);
        let columns = ColumnMap::from_header(&rows[0], "t").unwrap();
        let result = interpret_reaction_line(&rows[1], 2, &columns, &registry(), "t");
        assert!(matches!(
            result,
            Err(ChemistryError::Parse { ref column, .. }) if column == "Denominator"
        ));
    }

    #[test]
    fn test_bad_number_names_row_and_column() {
        let rows = table(&[HEADER, "units", "O+,N2,,NO+,N,,1.2e-12,abc,,,,,,,,,"]);
        let err = parse_reaction_rows(&rows, &registry(), "bad.csv").unwrap_err();
        match err {
            ChemistryError::Parse {
                path,
                row,
                column,
                value,
            } => {
                assert_eq!(path, "bad.csv");
                assert_eq!(row, 2);
                assert_eq!(column, "branching");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error {:?}", other),
        }
        let rows = table(&[HEADER, "units", "O+,N2,,NO+,N,,fast,,,,,,,,,,"]);
        assert!(matches!(
            parse_reaction_rows(&rows, &registry(), "bad.csv"),
            Err(ChemistryError::Parse { .. })
        ));
        let rows = table(&[HEADER, "units", "O+,N2,,NO+,N,,1e-12,,,,,,,,,,1.5"]);
        assert!(matches!(
            parse_reaction_rows(&rows, &registry(), "bad.csv"),
            Err(ChemistryError::Parse { .. })
        ));
    }

    #[test]
    fn test_too_few_rows() {
        let rows = table(&[HEADER, "units"]);
        assert!(matches!(
            parse_reaction_rows(&rows, &registry(), "short.csv"),
            Err(ChemistryError::Format { .. })
        ));
    }

    #[test]
    fn test_first_row_continuation_is_format_error() {
        let rows = table(&[HEADER, "units", ",,,,,,2.0,,,,,,,,,,"]);
        assert!(matches!(
            parse_reaction_rows(&rows, &registry(), "cont.csv"),
            Err(ChemistryError::Format { .. })
        ));
    }

    #[test]
    fn test_half_reactions_are_dropped() {
        let rows = table(&[
            HEADER,
            "units",
            "O+,,,,,,1.0,,,,,,,,,,",
            "O,,,XX,,,1.0,,,,,,,,,,",
            "O+,N2,,NO+,N,,1.0,,,,,,,,,,",
        ]);
        let reactions = parse_reaction_rows(&rows, &registry(), "t").unwrap();
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions[0].row, 3);
    }

    #[test]
    fn test_continuation_after_dropped_row_uses_last_accepted() {
        let rows = table(&[
            HEADER,
            "units",
            "O+,N2,,NO+,N,,1.0,0.7,2.0,,,,,Tn,0,500,",
            "O,,,,,,9.0,,,,,,,,,,",
            ",,,,,,3.0,,,,,,,,500,900,",
        ]);
        let reactions = parse_reaction_rows(&rows, &registry(), "t").unwrap();
        assert_eq!(reactions.len(), 2);
        assert_eq!(reactions[1].losses, reactions[0].losses);
        assert_eq!(reactions[1].rate, 3.0);
        assert_eq!(reactions[1].branching_ratio, 0.7);
        assert_eq!(reactions[1].energy, 2.0);
        assert_eq!(reactions[1].piecewise_var.as_deref(), Some("Tn"));
        assert_eq!((reactions[1].min, reactions[1].max), (500.0, 900.0));
        assert_eq!(reactions[1].row, 3);
    }
}
