//! Atom-centred symmetry functions (Behler, JCP 134, 074106 (2011)), computed by the backend.
//!
//! Two kinds of function are supported, written in the toolkit's
//! `{kind: {params}}` form:
//!
//! - `{"rad": {"eta": .., "mu": ..}}`: radial G2, gaussian of width `eta`
//!   centred at `mu`
//! - `{"ang": {"eta": .., "zeta": .., "lambd": ..}}`: angular G4
//!
//! and two parametrisation schemes that expand into `n` radial functions:
//!
//! - `{"rad_centered": {"n": ..}}`: all centred on 0, widths on a grid up to the cutoff
//! - `{"rad_shifted": {"n": ..}}`: equal widths, centres on a grid up to the cutoff
//!
//! The backend only knows a global cutoff and applies every function to every
//! element combination. It also adds G1 on its own.
use crate::backend::{self, AcsfArgs, ComputeContext, DescriptorBackend, DescriptorRequest};
use crate::error::{require_positive, ConfigError, DescriptorError};
use cscribe_core::{in_blocks, to_local_for, ElementId, StructureCollection};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Innermost point of the parametrisation grids.
const GRID_START: f64 = 0.5;
/// The grids stop one unit short of the cutoff.
const GRID_MARGIN: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymmetryFunction {
    Rad { eta: f64, mu: f64 },
    Ang { eta: f64, zeta: f64, lambd: f64 },
    RadCentered { n: usize },
    RadShifted { n: usize },
}

fn grid_spacing(n: usize, cutoff: f64) -> Result<f64, ConfigError> {
    if n < 2 {
        return Err(ConfigError::invalid("n", format!("{} is below 2", n)));
    }
    let span = cutoff - GRID_START - GRID_MARGIN;
    if span <= 0.0 {
        return Err(ConfigError::invalid(
            "cutoff",
            format!("{} is too small for a parametrisation scheme", cutoff),
        ));
    }
    Ok(span / (n - 1) as f64)
}

/// `[eta, mu]` rows for `n` radial functions centred on 0 with widths
/// `0.5 + i * delta`.
fn rad_centered(n: usize, cutoff: f64) -> Result<Vec<[f64; 2]>, ConfigError> {
    let delta = grid_spacing(n, cutoff)?;
    Ok((0..n)
        .map(|i| {
            let width = GRID_START + i as f64 * delta;
            [0.5 / (width * width), 0.0]
        })
        .collect())
}

/// `[eta, mu]` rows for `n` radial functions of width `delta` centred at
/// `0.5 + i * delta`.
fn rad_shifted(n: usize, cutoff: f64) -> Result<Vec<[f64; 2]>, ConfigError> {
    let delta = grid_spacing(n, cutoff)?;
    let eta = 0.5 / (delta * delta);
    Ok((0..n)
        .map(|i| [eta, GRID_START + i as f64 * delta])
        .collect())
}

/// Split the functions into the backend's G2 and G4 parameter tables,
/// expanding parametrisation schemes. An empty table is `None`.
pub fn make_params(
    sfs: &[SymmetryFunction],
    cutoff: f64,
) -> Result<(Option<Array2<f64>>, Option<Array2<f64>>), ConfigError> {
    let mut g2: Vec<[f64; 2]> = Vec::new();
    let mut g4: Vec<[f64; 3]> = Vec::new();

    for sf in sfs {
        match *sf {
            SymmetryFunction::Rad { eta, mu } => g2.push([eta, mu]),
            SymmetryFunction::Ang { eta, zeta, lambd } => g4.push([eta, zeta, lambd]),
            SymmetryFunction::RadCentered { n } => g2.extend(rad_centered(n, cutoff)?),
            SymmetryFunction::RadShifted { n } => g2.extend(rad_shifted(n, cutoff)?),
        }
    }

    let g2 = (!g2.is_empty()).then(|| Array2::from(g2));
    let g4 = (!g4.is_empty()).then(|| Array2::from(g4));
    Ok((g2, g4))
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymmetryFunctions {
    pub elems: Vec<ElementId>,
    pub cutoff: f64,
    #[serde(default)]
    pub sfs: Vec<SymmetryFunction>,
    /// Arrange the output in blocks by central element
    #[serde(default = "default_true")]
    pub stratify: bool,
}

impl SymmetryFunctions {
    pub const KIND: &'static str = "ds_sf";

    pub fn new(elems: Vec<ElementId>, cutoff: f64, sfs: Vec<SymmetryFunction>) -> Self {
        SymmetryFunctions {
            elems,
            cutoff,
            sfs,
            stratify: true,
        }
    }

    pub fn with_stratify(mut self, stratify: bool) -> Self {
        self.stratify = stratify;
        self
    }

    pub fn to_request(&self, periodic: bool) -> Result<DescriptorRequest, ConfigError> {
        if self.elems.is_empty() {
            return Err(ConfigError::invalid("elems", "at least one element is required"));
        }
        require_positive("cutoff", self.cutoff)?;
        let (g2_params, g4_params) = make_params(&self.sfs, self.cutoff)?;

        Ok(DescriptorRequest::Acsf(AcsfArgs {
            rcut: self.cutoff,
            g2_params,
            g4_params,
            species: self.elems.clone(),
            sparse: false,
            periodic,
        }))
    }

    pub fn compute<B>(
        &self,
        backend: &B,
        data: &StructureCollection,
        context: &ComputeContext,
    ) -> Result<Vec<Array2<f64>>, DescriptorError>
    where
        B: DescriptorBackend + ?Sized,
    {
        let request = self.to_request(data.is_periodic())?;
        let flat = backend::create(backend, Self::KIND, &request, data, context)?;
        let local = to_local_for(data, &flat)?;
        if self.stratify {
            Ok(in_blocks(&local, data, Some(self.elems.as_slice()))?)
        } else {
            Ok(local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use serde_json::json;

    #[test]
    fn test_sf_configs() {
        let sfs: Vec<SymmetryFunction> = serde_json::from_value(json!([
            {"rad": {"eta": 1.0, "mu": 0.5}},
            {"ang": {"eta": 0.1, "zeta": 2.0, "lambd": -1.0}},
            {"rad_centered": {"n": 3}}
        ]))
        .unwrap();
        assert_eq!(sfs[0], SymmetryFunction::Rad { eta: 1.0, mu: 0.5 });
        assert_eq!(
            sfs[1],
            SymmetryFunction::Ang {
                eta: 0.1,
                zeta: 2.0,
                lambd: -1.0
            }
        );
        assert_eq!(sfs[2], SymmetryFunction::RadCentered { n: 3 });

        let unknown = serde_json::from_value::<SymmetryFunction>(json!({"g5": {"eta": 1.0}}));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_make_params() {
        let sfs = vec![
            SymmetryFunction::Rad { eta: 1.0, mu: 0.0 },
            SymmetryFunction::Ang {
                eta: 0.5,
                zeta: 1.0,
                lambd: 1.0,
            },
            SymmetryFunction::Rad { eta: 2.0, mu: 1.0 },
        ];
        let (g2, g4) = make_params(&sfs, 5.0).unwrap();
        assert_eq!(g2.unwrap(), array![[1.0, 0.0], [2.0, 1.0]]);
        assert_eq!(g4.unwrap(), array![[0.5, 1.0, 1.0]]);

        let (g2, g4) = make_params(&sfs[..1], 5.0).unwrap();
        assert!(g2.is_some());
        assert!(g4.is_none());

        let (g2, g4) = make_params(&[], 5.0).unwrap();
        assert!(g2.is_none() && g4.is_none());
    }

    #[test]
    fn test_rad_centered() {
        let cutoff = 5.0;
        let (g2, _) = make_params(&[SymmetryFunction::RadCentered { n: 3 }], cutoff).unwrap();
        let g2 = g2.unwrap();
        let delta = (cutoff - 1.5) / 2.0;

        assert_eq!(g2.dim(), (3, 2));
        for i in 0..3 {
            let width = 0.5 + i as f64 * delta;
            assert_relative_eq!(g2[[i, 0]], 0.5 / (width * width));
            assert_eq!(g2[[i, 1]], 0.0);
        }
    }

    #[test]
    fn test_rad_shifted() {
        let (g2, _) = make_params(&[SymmetryFunction::RadShifted { n: 4 }], 7.5).unwrap();
        let g2 = g2.unwrap();
        // delta = 6 / 3
        assert_relative_eq!(g2[[0, 0]], 0.125);
        assert_relative_eq!(g2[[3, 0]], 0.125);
        assert_relative_eq!(g2[[0, 1]], 0.5);
        assert_relative_eq!(g2[[1, 1]], 2.5);
        assert_relative_eq!(g2[[3, 1]], 6.5);
    }

    #[test]
    fn test_scheme_limits() {
        let err = make_params(&[SymmetryFunction::RadCentered { n: 1 }], 5.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "n", .. }));

        let err = make_params(&[SymmetryFunction::RadShifted { n: 3 }], 1.2).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "cutoff", .. }));
    }

    #[test]
    fn test_request() {
        let sf = SymmetryFunctions::new(
            vec![1, 2, 3],
            6.0,
            vec![SymmetryFunction::Rad { eta: 0.3, mu: 0.1 }],
        );
        assert!(sf.stratify);
        let DescriptorRequest::Acsf(args) = sf.to_request(true).unwrap() else {
            panic!("expected an ACSF request");
        };
        assert_eq!(args.rcut, 6.0);
        assert_eq!(args.species, vec![1, 2, 3]);
        assert_eq!(args.g2_params, Some(array![[0.3, 0.1]]));
        assert!(args.g4_params.is_none());
        assert!(!args.sparse);
        assert!(args.periodic);

        let err = SymmetryFunctions::new(vec![1], 0.0, vec![])
            .to_request(false)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "cutoff", .. }));
    }
}
