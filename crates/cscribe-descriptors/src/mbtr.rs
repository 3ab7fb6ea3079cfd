//! Many-body tensor representation (global and local), computed by the backend.
//!
//! The configuration is a mid-way point between the learning toolkit's
//! conventions and the backend's. Each term `mbtr_k` is a dictionary
//!
//! - `elems`: elements to compute the term for (must agree across terms)
//! - `start`, `stop`, `num`: the discretisation grid
//! - `broadening`: width of the gaussian placed on each contribution
//! - `acc`: contributions with a weight below this are dropped
//! - `geomf`: geometry function, one of `atomic_number` (k=1), `1/distance`,
//!   `distance` (k=2), `angle`, `cos_angle` (k=3)
//! - `weightf`: `"unity"` or `{"exp": {"ls": s}}`
//!
//! The local variant takes `elems` once, next to the terms, and the terms may
//! leave it out.
use crate::backend::{
    self, ComputeContext, DescriptorBackend, DescriptorRequest, Geometry, Grid, MbtrArgs,
    MbtrTermArgs, Weighting,
};
use crate::error::{require_positive, ConfigError, DescriptorError};
use cscribe_core::{in_blocks, to_local_for, ElementId, StructureCollection};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GeometryFunction {
    #[strum(to_string = "atomic_number")]
    AtomicNumber,
    #[strum(to_string = "1/distance")]
    InverseDistance,
    #[strum(to_string = "distance")]
    Distance,
    #[strum(to_string = "angle")]
    Angle,
    #[strum(to_string = "cos_angle")]
    CosAngle,
}

impl GeometryFunction {
    /// Name of the function in the backend's vocabulary.
    pub fn backend_name(&self) -> &'static str {
        match self {
            GeometryFunction::AtomicNumber => "atomic_number",
            GeometryFunction::InverseDistance => "inverse_distance",
            GeometryFunction::Distance => "distance",
            GeometryFunction::Angle => "angle",
            GeometryFunction::CosAngle => "cosine",
        }
    }

    /// The term (k) this function belongs to.
    pub fn degree(&self) -> usize {
        match self {
            GeometryFunction::AtomicNumber => 1,
            GeometryFunction::InverseDistance | GeometryFunction::Distance => 2,
            GeometryFunction::Angle | GeometryFunction::CosAngle => 3,
        }
    }
}

impl TryFrom<String> for GeometryFunction {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .parse()
            .map_err(|_| ConfigError::UnknownGeometryFunction(value))
    }
}

impl From<GeometryFunction> for String {
    fn from(value: GeometryFunction) -> Self {
        value.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightFunction {
    /// No weighting. Diverges for periodic structures.
    Unity,
    /// `exp(-ls * x)`
    Exp { ls: f64 },
}

impl WeightFunction {
    fn to_weighting(&self, acc: f64) -> Weighting {
        match self {
            WeightFunction::Unity => Weighting::Unity { cutoff: acc },
            WeightFunction::Exp { ls } => Weighting::Exp {
                cutoff: acc,
                scale: *ls,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    L2Each,
    NAtoms,
}

fn normalization(norm: Option<Norm>) -> &'static str {
    match norm {
        None => "none",
        Some(Norm::L2Each) => "l2_each",
        Some(Norm::NAtoms) => "n_atoms",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MbtrTerm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elems: Option<Vec<ElementId>>,
    pub start: f64,
    pub stop: f64,
    pub num: usize,
    pub geomf: GeometryFunction,
    pub weightf: WeightFunction,
    pub broadening: f64,
    pub acc: f64,
}

impl MbtrTerm {
    fn to_args(&self, k: usize) -> Result<MbtrTermArgs, ConfigError> {
        if self.geomf.degree() != k {
            return Err(ConfigError::invalid(
                "geomf",
                format!("{} cannot be used for mbtr_{}", self.geomf, k),
            ));
        }
        if self.num == 0 {
            return Err(ConfigError::invalid("num", "must be at least 1"));
        }
        if self.stop <= self.start {
            return Err(ConfigError::invalid(
                "stop",
                format!("{} is not above start {}", self.stop, self.start),
            ));
        }
        require_positive("broadening", self.broadening)?;
        require_positive("acc", self.acc)?;

        Ok(MbtrTermArgs {
            grid: Grid {
                min: self.start,
                max: self.stop,
                n: self.num,
                sigma: self.broadening,
            },
            geometry: Geometry {
                function: self.geomf.backend_name(),
            },
            weighting: self.weightf.to_weighting(self.acc),
        })
    }
}

fn default_true() -> bool {
    true
}

/// MBTR as a global descriptor: one vector per structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mbtr {
    #[serde(default)]
    pub mbtr_1: Option<MbtrTerm>,
    #[serde(default)]
    pub mbtr_2: Option<MbtrTerm>,
    #[serde(default)]
    pub mbtr_3: Option<MbtrTerm>,
    #[serde(default = "default_true")]
    pub normalize_gaussians: bool,
    #[serde(default)]
    pub norm: Option<Norm>,
    #[serde(default = "default_true")]
    pub flatten: bool,
    #[serde(default)]
    pub sparse: bool,
}

impl Mbtr {
    pub const KIND: &'static str = "ds_mbtr";

    pub fn new(
        mbtr_1: Option<MbtrTerm>,
        mbtr_2: Option<MbtrTerm>,
        mbtr_3: Option<MbtrTerm>,
    ) -> Self {
        Mbtr {
            mbtr_1,
            mbtr_2,
            mbtr_3,
            normalize_gaussians: true,
            norm: None,
            flatten: true,
            sparse: false,
        }
    }

    fn terms(&self) -> [(usize, Option<&MbtrTerm>); 3] {
        [
            (1, self.mbtr_1.as_ref()),
            (2, self.mbtr_2.as_ref()),
            (3, self.mbtr_3.as_ref()),
        ]
    }

    /// Translate into backend arguments.
    ///
    /// `species` is the element list of the whole descriptor when it is given
    /// outside the terms. Otherwise every term names its elements and all of
    /// them agree.
    fn to_args(
        &self,
        periodic: bool,
        species: Option<&[ElementId]>,
    ) -> Result<MbtrArgs, ConfigError> {
        if self.terms().iter().all(|(_, term)| term.is_none()) {
            return Err(ConfigError::NoTerms);
        }

        let mut species: Option<&[ElementId]> = species;
        let mut args: [Option<MbtrTermArgs>; 3] = [None, None, None];

        for (k, term) in self.terms() {
            let Some(term) = term else { continue };
            match (species, term.elems.as_deref()) {
                (Some(elems), Some(own)) if elems != own => {
                    return Err(ConfigError::InconsistentElements { term: k });
                }
                (None, Some(own)) => species = Some(own),
                (None, None) => {
                    return Err(ConfigError::invalid(
                        "elems",
                        format!("mbtr_{} does not list its elements", k),
                    ));
                }
                _ => {}
            }
            args[k - 1] = Some(term.to_args(k)?);
        }

        let species = species.ok_or(ConfigError::NoTerms)?.to_vec();
        if species.is_empty() {
            return Err(ConfigError::invalid("elems", "at least one element is required"));
        }
        let [k1, k2, k3] = args;

        Ok(MbtrArgs {
            k1,
            k2,
            k3,
            normalization: normalization(self.norm),
            normalize_gaussians: self.normalize_gaussians,
            flatten: self.flatten,
            sparse: self.sparse,
            species,
            periodic,
        })
    }

    pub fn to_request(&self, periodic: bool) -> Result<DescriptorRequest, ConfigError> {
        Ok(DescriptorRequest::Mbtr(self.to_args(periodic, None)?))
    }

    /// Elements shared by the configured terms.
    pub fn elems(&self) -> Option<&[ElementId]> {
        self.terms()
            .into_iter()
            .find_map(|(_, term)| term.and_then(|t| t.elems.as_deref()))
    }

    /// One row per structure, exactly as the backend returns it.
    pub fn compute<B>(
        &self,
        backend: &B,
        data: &StructureCollection,
        context: &ComputeContext,
    ) -> Result<Array2<f64>, DescriptorError>
    where
        B: DescriptorBackend + ?Sized,
    {
        let request = self.to_request(data.is_periodic())?;
        backend::create(backend, Self::KIND, &request, data, context)
    }
}

/// Local MBTR: one vector per atom, optionally stratified by central element.
///
/// Only the k=2 and k=3 terms exist for the local variant. `elems` is both the
/// species list sent to the backend and the block order when stratifying.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalMbtr {
    pub elems: Vec<ElementId>,
    #[serde(flatten)]
    pub mbtr: Mbtr,
    #[serde(default = "default_true")]
    pub stratify: bool,
}

impl LocalMbtr {
    pub const KIND: &'static str = "ds_lmbtr";

    pub fn new(
        elems: Vec<ElementId>,
        mbtr_2: Option<MbtrTerm>,
        mbtr_3: Option<MbtrTerm>,
        stratify: bool,
    ) -> Self {
        LocalMbtr {
            elems,
            mbtr: Mbtr::new(None, mbtr_2, mbtr_3),
            stratify,
        }
    }

    pub fn to_request(&self, periodic: bool) -> Result<DescriptorRequest, ConfigError> {
        if self.mbtr.mbtr_1.is_some() {
            return Err(ConfigError::UnsupportedTerm {
                kind: Self::KIND,
                term: 1,
            });
        }
        Ok(DescriptorRequest::LocalMbtr(
            self.mbtr.to_args(periodic, Some(self.elems.as_slice()))?,
        ))
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
            Ok(in_blocks(&local, data, Some(request.species()))?)
        } else {
            Ok(local)
        }
    }
}
