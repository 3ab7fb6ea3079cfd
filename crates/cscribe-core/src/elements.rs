//! Element identifiers and the element index table used for stratification.
use crate::error::ConversionError;
use std::collections::BTreeMap;
use std::fmt;

/// Integer species code. In practice the atomic number.
pub type ElementId = u32;

const ELEMENT_LIST: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Chemical symbol for an atomic number, `None` outside 1..=118.
pub fn element_symbol(z: ElementId) -> Option<&'static str> {
    (z as usize)
        .checked_sub(1)
        .and_then(|idx| ELEMENT_LIST.get(idx))
        .copied()
}

/// Element Index
///
/// Maps each element identifier to a dense block index in `[0, n_elems)`.
/// Block `k` corresponds to position `k` of the list the table was built from,
/// so the order must match the species order given to the descriptor backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementIndex {
    order: Vec<ElementId>,
    index: BTreeMap<ElementId, usize>,
}

impl ElementIndex {
    /// Build the table from an explicit ordered element list.
    pub fn new(elements: &[ElementId]) -> Result<Self, ConversionError> {
        let mut index = BTreeMap::new();
        for (i, &element) in elements.iter().enumerate() {
            if index.insert(element, i).is_some() {
                return Err(ConversionError::DuplicateElement(element));
            }
        }
        Ok(ElementIndex {
            order: elements.to_vec(),
            index,
        })
    }

    /// Build the table from elements already known to be distinct and ordered,
    /// e.g. the output of [`AtomsByStructure::distinct_elements`](crate::AtomsByStructure::distinct_elements).
    pub(crate) fn from_distinct(order: Vec<ElementId>) -> Self {
        let index = order.iter().enumerate().map(|(i, &e)| (e, i)).collect();
        ElementIndex { order, index }
    }

    pub fn get(&self, element: ElementId) -> Option<usize> {
        self.index.get(&element).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.order
    }
}

impl fmt::Display for ElementIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self
            .order
            .iter()
            .map(|&z| match element_symbol(z) {
                Some(symbol) => symbol.to_string(),
                None => z.to_string(),
            })
            .collect();
        write!(f, "[{}]", labels.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(element_symbol(1), Some("H"));
        assert_eq!(element_symbol(8), Some("O"));
        assert_eq!(element_symbol(118), Some("Og"));
        assert_eq!(element_symbol(0), None);
        assert_eq!(element_symbol(119), None);
    }

    #[test]
    fn test_index_follows_list_order() {
        let idx = ElementIndex::new(&[8, 1, 6]).unwrap();
        assert_eq!(idx.get(8), Some(0));
        assert_eq!(idx.get(1), Some(1));
        assert_eq!(idx.get(6), Some(2));
        assert_eq!(idx.get(7), None);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.elements(), &[8, 1, 6]);
        assert_eq!(idx.to_string(), "[O, H, C]");
    }

    #[test]
    fn test_duplicate_element_rejected() {
        let err = ElementIndex::new(&[1, 6, 1]).unwrap_err();
        assert_eq!(err, ConversionError::DuplicateElement(1));
    }
}
