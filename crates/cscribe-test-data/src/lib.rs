//! cscribe-test-data
//!
//! Small structure datasets embedded in the crate for use in testing.
//!
//! Each dataset is a JSON document describing a collection of structures. The
//! datasets are represented as `TestDataset` objects which package the raw text
//! and can create temporary files for code that reads from disk.
use std::fs;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
/// Test Dataset
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use cscribe_test_data::TestDataset;
/// let (path, _temp) = TestDataset::h_he_chain().create_temp().unwrap();
/// let text = TestDataset::mixed_batch().contents();
/// ```
pub struct TestDataset {
    contents: &'static str,
    suffix: &'static str,
}

impl TestDataset {
    /// One linear structure: H at the origin followed by two He at x = 1 and x = 2.
    pub fn h_he_chain() -> Self {
        Self {
            contents: include_str!("../data/h_he_chain.json"),
            suffix: "json",
        }
    }
    /// Two hydrogen atoms 2.0 apart, no cell.
    pub fn hydrogen_dimer() -> Self {
        Self {
            contents: include_str!("../data/hydrogen_dimer.json"),
            suffix: "json",
        }
    }
    /// Three hydrogen atoms on a right angle.
    pub fn hydrogen_triangle() -> Self {
        Self {
            contents: include_str!("../data/hydrogen_triangle.json"),
            suffix: "json",
        }
    }
    /// The hydrogen dimer inside a cubic cell of side 8.0
    pub fn periodic_dimer() -> Self {
        Self {
            contents: include_str!("../data/periodic_dimer.json"),
            suffix: "json",
        }
    }
    /// Water, an empty structure and carbon monoxide, in that order.
    pub fn mixed_batch() -> Self {
        Self {
            contents: include_str!("../data/mixed_batch.json"),
            suffix: "json",
        }
    }

    pub fn contents(&self) -> &'static str {
        self.contents
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.contents)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }
}
