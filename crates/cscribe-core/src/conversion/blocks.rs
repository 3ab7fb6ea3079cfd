use crate::collection::AtomsByStructure;
use crate::elements::{ElementId, ElementIndex};
use crate::error::ConversionError;
use ndarray::{s, Array2, LinalgScalar};

/// Arrange a per-structure local representation in blocks by central element.
///
/// Some descriptors (symmetry functions, non-centred local MBTR) do not encode
/// the element of the central atom. Kernel methods need that information, so
/// each atom's `dim`-wide vector is placed into a zero-padded row of width
/// `dim * n_elems`, in the block belonging to the atom's own element.
///
/// With elements `[1, 2]`, `dim = 2` and a structure whose first atom is Z=1
/// and second atom is Z=2, the rows become
///
/// ```text
/// [ (atom 0), (0, 0) ]
/// [ (0, 0), (atom 1) ]
/// ```
///
/// `elems` gives the block order. When it is `None` the distinct elements of
/// `structures` are used in ascending order. Pass the same list that was given
/// to the descriptor backend so block positions agree with it.
pub fn in_blocks<T, A>(
    local: &[Array2<A>],
    structures: &T,
    elems: Option<&[ElementId]>,
) -> Result<Vec<Array2<A>>, ConversionError>
where
    T: AtomsByStructure + ?Sized,
    A: LinalgScalar,
{
    let index = match elems {
        Some(elems) => ElementIndex::new(elems)?,
        None => ElementIndex::from_distinct(structures.distinct_elements()),
    };
    in_blocks_with(local, structures, &index)
}

/// [`in_blocks`] with a prebuilt element index.
pub fn in_blocks_with<T, A>(
    local: &[Array2<A>],
    structures: &T,
    index: &ElementIndex,
) -> Result<Vec<Array2<A>>, ConversionError>
where
    T: AtomsByStructure + ?Sized,
    A: LinalgScalar,
{
    let n_structures = structures.n_structures();
    if local.len() != n_structures {
        return Err(ConversionError::StructureCountMismatch {
            structures: n_structures,
            blocks: local.len(),
        });
    }
    for (i, rep) in local.iter().enumerate() {
        let expected = structures.atom_count(i);
        if rep.nrows() != expected {
            return Err(ConversionError::AtomCountMismatch {
                structure: i,
                expected,
                rows: rep.nrows(),
            });
        }
    }

    let dim = feature_dimension(local)?;
    let n_elems = index.len();

    log::debug!(
        "Stratifying {} structures into {} element blocks {} of width {}",
        n_structures,
        n_elems,
        index,
        dim
    );

    local
        .iter()
        .enumerate()
        .map(|(i, rep)| -> Result<Array2<A>, ConversionError> {
            let mut blocks = Array2::<A>::zeros((rep.nrows(), dim * n_elems));
            for (j, atom) in rep.outer_iter().enumerate() {
                let element = structures.element_of(i, j);
                let idx = index
                    .get(element)
                    .ok_or(ConversionError::UnknownElement {
                        element,
                        structure: i,
                        atom: j,
                    })?;
                blocks
                    .slice_mut(s![j, idx * dim..(idx + 1) * dim])
                    .assign(&atom);
            }
            Ok(blocks)
        })
        .collect()
}

/// Width of the first non-empty structure; all other non-empty structures must agree.
fn feature_dimension<A>(local: &[Array2<A>]) -> Result<usize, ConversionError> {
    let mut non_empty = local.iter().enumerate().filter(|(_, rep)| rep.nrows() > 0);
    let dim = match non_empty.next() {
        Some((_, rep)) => rep.ncols(),
        None => return Err(ConversionError::UndeterminedDimension),
    };
    for (structure, rep) in non_empty {
        if rep.ncols() != dim {
            return Err(ConversionError::InconsistentDimension {
                structure,
                expected: dim,
                found: rep.ncols(),
            });
        }
    }
    Ok(dim)
}
