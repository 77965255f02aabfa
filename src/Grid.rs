/// Grid-shaped real fields: densities, rates, temperatures and any other per-cell quantity
/// the chemistry reads or writes. Grid geometry itself is built elsewhere; this module only
/// knows the number of cells along longitude, latitude and altitude.
/// # Examples
/// ```
/// use IonoKin::Grid::grid_field::{GridField, GridShape};
/// let shape = GridShape::new(2, 2, 3);
/// let mut temperature = GridField::from_elem(shape, 200.0);
/// temperature[(1, 1, 2)] = 950.0;
/// assert_eq!(temperature.max(), 950.0);
/// ```
pub mod grid_field;
