#![allow(dead_code)]

use anyhow::{anyhow, Result};
use cscribe_core::StructureCollection;
use cscribe_descriptors::{ComputeContext, DescriptorBackend, DescriptorRequest};
use cscribe_test_data::TestDataset;
use ndarray::Array2;
use std::cell::RefCell;

pub fn load(dataset: TestDataset) -> StructureCollection {
    StructureCollection::from_json(dataset.contents()).unwrap()
}

/// Value the recording backend writes for atom `row` (global index) with element `z`.
pub fn atom_value(z: u32, row: usize, col: usize) -> f64 {
    (z * 100) as f64 + row as f64 + col as f64 * 0.01
}

/// Stand-in for the descriptor library.
///
/// Returns `width` columns per atom (local requests) or per structure (global
/// requests), filled with [`atom_value`], and remembers every call.
pub struct RecordingBackend {
    pub width: usize,
    /// Rows to drop from local output, to imitate a misbehaving library
    pub drop_rows: usize,
    calls: RefCell<Vec<(DescriptorRequest, ComputeContext)>>,
}

impl RecordingBackend {
    pub fn new(width: usize) -> Self {
        RecordingBackend {
            width,
            drop_rows: 0,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(DescriptorRequest, ComputeContext)> {
        self.calls.borrow().clone()
    }

    pub fn last_request(&self) -> DescriptorRequest {
        self.calls.borrow().last().unwrap().0.clone()
    }
}

impl DescriptorBackend for RecordingBackend {
    fn create(
        &self,
        request: &DescriptorRequest,
        structures: &StructureCollection,
        context: &ComputeContext,
    ) -> Result<Array2<f64>> {
        self.calls
            .borrow_mut()
            .push((request.clone(), context.clone()));

        if request.is_local() {
            let numbers: Vec<u32> = structures.iter_numbers().map(|(_, _, z)| z).collect();
            let rows = numbers.len().saturating_sub(self.drop_rows);
            Ok(Array2::from_shape_fn((rows, self.width), |(r, c)| {
                atom_value(numbers[r], r, c)
            }))
        } else {
            Ok(Array2::from_shape_fn(
                (structures.len(), self.width),
                |(r, c)| r as f64 + c as f64 * 0.01,
            ))
        }
    }
}

pub struct FailingBackend;

impl DescriptorBackend for FailingBackend {
    fn create(
        &self,
        _request: &DescriptorRequest,
        _structures: &StructureCollection,
        _context: &ComputeContext,
    ) -> Result<Array2<f64>> {
        Err(anyhow!("species 3 not present in the provided structure"))
    }
}
