//! Interface to the external descriptor library.
//!
//! The numerics live in the backend. This module only defines what a backend is
//! asked to compute, in the backend's own vocabulary.
use crate::error::DescriptorError;
use cscribe_core::{ElementId, StructureCollection};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Execution settings passed through to the backend untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeContext {
    pub n_jobs: usize,
    pub verbose: bool,
}

impl Default for ComputeContext {
    fn default() -> Self {
        ComputeContext {
            n_jobs: 1,
            verbose: false,
        }
    }
}

/// A descriptor computation capability.
///
/// For local descriptors (`Soap`, `LocalMbtr`, `Acsf`) the returned array has one
/// row per atom, with the atoms of all structures concatenated in structure
/// order. For global descriptors (`Mbtr`) it has one row per structure.
pub trait DescriptorBackend {
    fn create(
        &self,
        request: &DescriptorRequest,
        structures: &StructureCollection,
        context: &ComputeContext,
    ) -> anyhow::Result<Array2<f64>>;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "descriptor", rename_all = "snake_case")]
pub enum DescriptorRequest {
    Soap(SoapArgs),
    Mbtr(MbtrArgs),
    LocalMbtr(MbtrArgs),
    Acsf(AcsfArgs),
}

impl DescriptorRequest {
    pub fn is_local(&self) -> bool {
        !matches!(self, DescriptorRequest::Mbtr(_))
    }
    pub fn species(&self) -> &[ElementId] {
        match self {
            DescriptorRequest::Soap(args) => &args.species,
            DescriptorRequest::Mbtr(args) | DescriptorRequest::LocalMbtr(args) => &args.species,
            DescriptorRequest::Acsf(args) => &args.species,
        }
    }
    pub fn periodic(&self) -> bool {
        match self {
            DescriptorRequest::Soap(args) => args.periodic,
            DescriptorRequest::Mbtr(args) | DescriptorRequest::LocalMbtr(args) => args.periodic,
            DescriptorRequest::Acsf(args) => args.periodic,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RadialBasis {
    #[default]
    Gto,
    Polynomial,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SoapArgs {
    pub species: Vec<ElementId>,
    pub rcut: f64,
    pub nmax: usize,
    pub lmax: usize,
    pub sigma: f64,
    pub rbf: RadialBasis,
    pub crossover: bool,
    pub periodic: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MbtrArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k1: Option<MbtrTermArgs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k2: Option<MbtrTermArgs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k3: Option<MbtrTermArgs>,
    pub normalization: &'static str,
    pub normalize_gaussians: bool,
    pub flatten: bool,
    pub sparse: bool,
    pub species: Vec<ElementId>,
    pub periodic: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MbtrTermArgs {
    pub grid: Grid,
    pub geometry: Geometry,
    pub weighting: Weighting,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid {
    pub min: f64,
    pub max: f64,
    pub n: usize,
    pub sigma: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Geometry {
    pub function: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "function", rename_all = "snake_case")]
pub enum Weighting {
    Unity { cutoff: f64 },
    Exp { cutoff: f64, scale: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AcsfArgs {
    pub rcut: f64,
    /// `[eta, mu]` per radial function
    pub g2_params: Option<Array2<f64>>,
    /// `[eta, zeta, lambda]` per angular function
    pub g4_params: Option<Array2<f64>>,
    pub species: Vec<ElementId>,
    pub sparse: bool,
    pub periodic: bool,
}

/// Send `request` to the backend, logging what is asked for.
pub(crate) fn create<B>(
    backend: &B,
    kind: &str,
    request: &DescriptorRequest,
    structures: &StructureCollection,
    context: &ComputeContext,
) -> Result<Array2<f64>, DescriptorError>
where
    B: DescriptorBackend + ?Sized,
{
    if context.verbose {
        log::info!(
            "Computing {} for {} structures ({} atoms), n_jobs={}",
            kind,
            structures.len(),
            structures.total_atoms(),
            context.n_jobs
        );
        log::debug!("Atoms per structure: {}", structures.describe_counts());
    }
    log::debug!(
        "{} request: {}",
        kind,
        serde_json::to_string(request).unwrap_or_else(|e| e.to_string())
    );

    backend
        .create(request, structures, context)
        .map_err(DescriptorError::Backend)
}
