//! # Grid fields
//!
//! Real-valued fields over the 3-D (longitude, latitude, altitude) simulation grid.
//! Values are stored in a flat `nalgebra::DVector<f64>` with longitude running fastest,
//! so that elementwise arithmetic is plain vector arithmetic.
use nalgebra::DVector;
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

/// number of cells along each grid direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub n_lons: usize,
    pub n_lats: usize,
    pub n_alts: usize,
}

impl GridShape {
    pub fn new(n_lons: usize, n_lats: usize, n_alts: usize) -> Self {
        Self {
            n_lons,
            n_lats,
            n_alts,
        }
    }
    /// total number of cells
    pub fn n_cells(&self) -> usize {
        self.n_lons * self.n_lats * self.n_alts
    }
    /// flat position of the cell (i_lon, i_lat, i_alt)
    pub fn linear_index(&self, i_lon: usize, i_lat: usize, i_alt: usize) -> usize {
        debug_assert!(i_lon < self.n_lons && i_lat < self.n_lats && i_alt < self.n_alts);
        i_lon + self.n_lons * (i_lat + self.n_lats * i_alt)
    }
}

/// scalar field defined on every cell of the grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    shape: GridShape,
    values: DVector<f64>,
}

impl GridField {
    pub fn zeros(shape: GridShape) -> Self {
        Self {
            shape,
            values: DVector::zeros(shape.n_cells()),
        }
    }

    pub fn from_elem(shape: GridShape, value: f64) -> Self {
        Self {
            shape,
            values: DVector::from_element(shape.n_cells(), value),
        }
    }
    /// builds the field cell by cell from a function of (i_lon, i_lat, i_alt)
    pub fn from_fn<F>(shape: GridShape, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        let mut field = Self::zeros(shape);
        for i_alt in 0..shape.n_alts {
            for i_lat in 0..shape.n_lats {
                for i_lon in 0..shape.n_lons {
                    let idx = shape.linear_index(i_lon, i_lat, i_alt);
                    field.values[idx] = f(i_lon, i_lat, i_alt);
                }
            }
        }
        field
    }
    /// wraps flat values (longitude fastest); None if the length does not match the shape
    pub fn from_vec(shape: GridShape, values: Vec<f64>) -> Option<Self> {
        if values.len() != shape.n_cells() {
            return None;
        }
        Some(Self {
            shape,
            values: DVector::from_vec(values),
        })
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i_lon: usize, i_lat: usize, i_alt: usize) -> f64 {
        self.values[self.shape.linear_index(i_lon, i_lat, i_alt)]
    }

    pub fn set(&mut self, i_lon: usize, i_lat: usize, i_alt: usize, value: f64) {
        let idx = self.shape.linear_index(i_lon, i_lat, i_alt);
        self.values[idx] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        self.values.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        self.values.as_mut_slice()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    pub fn fill(&mut self, value: f64) {
        self.values.fill(value);
    }

    /// self[i] *= other[i]
    pub fn component_mul_assign(&mut self, other: &GridField) {
        debug_assert_eq!(self.shape, other.shape);
        self.values.component_mul_assign(&other.values);
    }
    /// self[i] += other[i]
    pub fn add_assign_field(&mut self, other: &GridField) {
        debug_assert_eq!(self.shape, other.shape);
        self.values += &other.values;
    }
    /// self[i] += factor * other[i]
    pub fn add_scaled(&mut self, factor: f64, other: &GridField) {
        debug_assert_eq!(self.shape, other.shape);
        self.values.axpy(factor, &other.values, 1.0);
    }

    pub fn sum(&self) -> f64 {
        self.values.sum()
    }

    pub fn min(&self) -> f64 {
        self.values.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }
}

impl Index<(usize, usize, usize)> for GridField {
    type Output = f64;
    fn index(&self, (i_lon, i_lat, i_alt): (usize, usize, usize)) -> &f64 {
        &self.values[self.shape.linear_index(i_lon, i_lat, i_alt)]
    }
}

impl IndexMut<(usize, usize, usize)> for GridField {
    fn index_mut(&mut self, (i_lon, i_lat, i_alt): (usize, usize, usize)) -> &mut f64 {
        let idx = self.shape.linear_index(i_lon, i_lat, i_alt);
        &mut self.values[idx]
    }
}

/// Source of named grid fields (temperatures and the like) referenced by reactions.
pub trait FieldProvider {
    fn get_field(&self, name: &str) -> Option<&GridField>;
}

impl FieldProvider for HashMap<String, GridField> {
    fn get_field(&self, name: &str) -> Option<&GridField> {
        self.get(name)
    }
}
