use crate::collection::AtomsByStructure;
use crate::error::ConversionError;
use itertools::Itertools;
use ndarray::{s, Array2, ArrayBase, Data, Ix2};

/// Running-sum offsets: `offsets[0] = 0`, `offsets[k] = offsets[k-1] + counts[k-1]`.
pub(crate) fn offsets(counts: &[usize]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(counts.len() + 1);
    offsets.push(0);
    offsets.extend(counts.iter().scan(0usize, |acc, &n| {
        *acc += n;
        Some(*acc)
    }));
    offsets
}

/// Split a flat per-atom array into one array per structure.
///
/// The descriptor backend returns local descriptors as a single
/// `(n_total_atoms, dim)` array, with the atoms of every structure
/// concatenated in structure order. Learning code expects one
/// `(n_atoms, dim)` array per structure instead. The rows belonging to
/// structure `i` are `flat[offsets[i]..offsets[i + 1]]`.
///
/// Each output array is an owned copy. A structure with zero atoms yields a
/// zero-row array of the same width.
///
/// Fails with [`ConversionError::ShapeMismatch`] if `flat` does not have
/// exactly `counts.iter().sum()` rows. A sum that does not fit in `usize` is
/// reported as `expected: usize::MAX`.
pub fn to_local<A, S>(
    counts: &[usize],
    flat: &ArrayBase<S, Ix2>,
) -> Result<Vec<Array2<A>>, ConversionError>
where
    A: Clone,
    S: Data<Elem = A>,
{
    // saturated sums never equal an array length, which is at most isize::MAX
    let expected = counts.iter().fold(0usize, |acc, &n| acc.saturating_add(n));
    let rows = flat.nrows();
    if rows != expected {
        return Err(ConversionError::ShapeMismatch { expected, rows });
    }
    let offsets = offsets(counts);

    log::debug!(
        "Splitting {} rows of width {} into {} structures",
        rows,
        flat.ncols(),
        counts.len()
    );

    Ok(offsets
        .iter()
        .tuple_windows()
        .map(|(&start, &end)| flat.slice(s![start..end, ..]).to_owned())
        .collect())
}

/// [`to_local`] with the atom counts taken from a structure collection.
pub fn to_local_for<T, A, S>(
    structures: &T,
    flat: &ArrayBase<S, Ix2>,
) -> Result<Vec<Array2<A>>, ConversionError>
where
    T: AtomsByStructure + ?Sized,
    A: Clone,
    S: Data<Elem = A>,
{
    to_local(&structures.atoms_by_structure(), flat)
}
