use crate::elements::ElementId;
use crate::error::DatasetError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Three lattice vectors, one per row.
pub type Cell = [[f64; 3]; 3];

/// Read access to the per-atom element identities of a structure collection.
///
/// This is all the conversions need to know about structures: how many there
/// are, how many atoms each contributes, and which element every atom is.
pub trait AtomsByStructure {
    /// Number of structures in the collection
    fn n_structures(&self) -> usize;

    /// Number of atoms of structure `structure`
    fn atom_count(&self, structure: usize) -> usize;

    /// Element identifier of atom `atom` in structure `structure`.
    fn element_of(&self, structure: usize, atom: usize) -> ElementId;

    /// Atom counts for all structures, in structure order.
    fn atoms_by_structure(&self) -> Vec<usize> {
        (0..self.n_structures())
            .map(|i| self.atom_count(i))
            .collect()
    }

    /// All elements present in the collection, in ascending order.
    fn distinct_elements(&self) -> Vec<ElementId> {
        let mut seen = BTreeSet::new();
        for i in 0..self.n_structures() {
            for j in 0..self.atom_count(i) {
                seen.insert(self.element_of(i, j));
            }
        }
        seen.into_iter().collect()
    }
}

/// A single atomic configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    numbers: Vec<ElementId>,
    positions: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cell: Option<Cell>,
}

impl Structure {
    pub fn new(numbers: Vec<ElementId>, positions: Vec<[f64; 3]>, cell: Option<Cell>) -> Self {
        Structure {
            numbers,
            positions,
            cell,
        }
    }
    pub fn size(&self) -> usize {
        self.numbers.len()
    }
    pub fn numbers(&self) -> &[ElementId] {
        &self.numbers
    }
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }
    pub fn cell(&self) -> Option<&Cell> {
        self.cell.as_ref()
    }
    pub fn is_periodic(&self) -> bool {
        self.cell.is_some()
    }
}

#[derive(Deserialize, Serialize)]
struct CollectionFile {
    structures: Vec<Structure>,
}

/// Structure Collection
///
/// An ordered set of independent structures. Either every structure carries a
/// periodic cell or none does.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StructureCollection {
    structures: Vec<Structure>,
}

impl StructureCollection {
    pub fn new(structures: Vec<Structure>) -> Result<Self, DatasetError> {
        for (i, s) in structures.iter().enumerate() {
            if s.numbers.len() != s.positions.len() {
                return Err(DatasetError::LengthMismatch {
                    structure: i,
                    numbers: s.numbers.len(),
                    positions: s.positions.len(),
                });
            }
        }

        let with_cell = structures.iter().position(Structure::is_periodic);
        let without_cell = structures.iter().position(|s| !s.is_periodic());
        if let (Some(with_cell), Some(without_cell)) = (with_cell, without_cell) {
            return Err(DatasetError::MixedPeriodicity {
                with_cell,
                without_cell,
            });
        }

        Ok(StructureCollection { structures })
    }

    /// Parse a collection from JSON of the form `{"structures": [{"numbers": [..],
    /// "positions": [[x, y, z], ..], "cell": [[..], [..], [..]]}, ..]}`.
    pub fn from_json(text: &str) -> Result<Self, DatasetError> {
        let file: CollectionFile = serde_json::from_str(text)?;
        Self::new(file.structures)
    }

    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, DatasetError> {
        let file = CollectionFile {
            structures: self.structures.clone(),
        };
        Ok(serde_json::to_string(&file)?)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
    pub fn get(&self, idx: usize) -> Option<&Structure> {
        self.structures.get(idx)
    }
    pub fn iter(&self) -> impl Iterator<Item = &Structure> {
        self.structures.iter()
    }
    /// True when the structures carry cells. An empty collection is not periodic.
    pub fn is_periodic(&self) -> bool {
        self.structures.first().is_some_and(Structure::is_periodic)
    }
    pub fn total_atoms(&self) -> usize {
        self.structures.iter().map(Structure::size).sum()
    }
    /// Element identifiers for every atom, structure by structure.
    pub fn iter_numbers(&self) -> impl Iterator<Item = (usize, usize, ElementId)> + '_ {
        self.structures
            .iter()
            .enumerate()
            .flat_map(|(i, s)| s.numbers.iter().enumerate().map(move |(j, &z)| (i, j, z)))
    }
    /// Atom counts as they would appear in the toolkit's dataset summary,
    /// e.g. "3, 0, 2".
    pub fn describe_counts(&self) -> String {
        self.structures.iter().map(Structure::size).join(", ")
    }
}

impl AtomsByStructure for StructureCollection {
    fn n_structures(&self) -> usize {
        self.structures.len()
    }
    fn atom_count(&self, structure: usize) -> usize {
        self.structures[structure].size()
    }
    fn element_of(&self, structure: usize, atom: usize) -> ElementId {
        self.structures[structure].numbers[atom]
    }
    fn distinct_elements(&self) -> Vec<ElementId> {
        let seen: BTreeSet<ElementId> = self.iter_numbers().map(|(_, _, z)| z).collect();
        seen.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cscribe_test_data::TestDataset;

    fn water() -> Structure {
        Structure::new(
            vec![8, 1, 1],
            vec![[0.0, 0.0, 0.119], [0.0, 0.763, -0.477], [0.0, -0.763, -0.477]],
            None,
        )
    }

    #[test]
    fn test_counts_and_elements() {
        let data = StructureCollection::from_json(TestDataset::mixed_batch().contents()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.atoms_by_structure(), vec![3, 0, 2]);
        assert_eq!(data.total_atoms(), 5);
        assert_eq!(data.describe_counts(), "3, 0, 2");
        assert_eq!(data.distinct_elements(), vec![1, 6, 8]);
        assert_eq!(data.element_of(2, 1), 8);
        assert!(!data.is_periodic());
    }

    #[test]
    fn test_periodic_collection() {
        let data =
            StructureCollection::from_json(TestDataset::periodic_dimer().contents()).unwrap();
        assert!(data.is_periodic());
        let cell = data.get(0).and_then(Structure::cell).unwrap();
        assert_eq!(cell[1][1], 8.0);
    }

    #[test]
    fn test_length_mismatch() {
        let broken = Structure::new(vec![1, 1], vec![[0.0; 3]], None);
        let err = StructureCollection::new(vec![water(), broken]).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::LengthMismatch {
                structure: 1,
                numbers: 2,
                positions: 1
            }
        ));
    }

    #[test]
    fn test_mixed_periodicity() {
        let mut boxed = water();
        boxed.cell = Some([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let err = StructureCollection::new(vec![water(), boxed]).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MixedPeriodicity {
                with_cell: 1,
                without_cell: 0
            }
        ));
    }

    #[test]
    fn test_json_file_round_trip() {
        let (path, _handle) = TestDataset::h_he_chain().create_temp().unwrap();
        let data = StructureCollection::read_json(&path).unwrap();
        let again = StructureCollection::from_json(&data.to_json().unwrap()).unwrap();
        assert_eq!(data, again);
        assert_eq!(again.get(0).unwrap().numbers(), &[1, 2, 2]);
    }
}
