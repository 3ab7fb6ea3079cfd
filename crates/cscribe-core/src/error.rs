use crate::elements::ElementId;
use thiserror::Error;

/// Failures of the regrouping and stratification transforms.
///
/// Every variant is a violated precondition reported to the immediate caller.
/// The transforms never return a partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("flat array has {rows} rows but the atom counts sum to {expected}")]
    ShapeMismatch { expected: usize, rows: usize },

    #[error("element {element} (structure {structure}, atom {atom}) is not in the element list")]
    UnknownElement {
        element: ElementId,
        structure: usize,
        atom: usize,
    },

    #[error("structure {structure} has feature dimension {found}, expected {expected}")]
    InconsistentDimension {
        structure: usize,
        expected: usize,
        found: usize,
    },

    #[error("cannot infer the feature dimension: no structure contains any atoms")]
    UndeterminedDimension,

    #[error("{blocks} per-structure arrays were given for {structures} structures")]
    StructureCountMismatch { structures: usize, blocks: usize },

    #[error("structure {structure} has {expected} atoms but its array has {rows} rows")]
    AtomCountMismatch {
        structure: usize,
        expected: usize,
        rows: usize,
    },

    #[error("element {0} appears more than once in the element list")]
    DuplicateElement(ElementId),
}

/// Failures while assembling or reading a structure collection.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("structure {structure} has {numbers} element entries but {positions} positions")]
    LengthMismatch {
        structure: usize,
        numbers: usize,
        positions: usize,
    },

    #[error("structures {with_cell} and {without_cell} disagree on periodicity")]
    MixedPeriodicity {
        with_cell: usize,
        without_cell: usize,
    },

    #[error("invalid structure data: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
