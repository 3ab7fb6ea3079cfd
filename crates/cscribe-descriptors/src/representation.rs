use crate::backend::{ComputeContext, DescriptorBackend, DescriptorRequest};
use crate::error::{ConfigError, DescriptorError};
use crate::mbtr::{LocalMbtr, Mbtr};
use crate::sf::SymmetryFunctions;
use crate::soap::Soap;
use cscribe_core::StructureCollection;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Any of the supported descriptors, in the toolkit's `{kind: config}` form,
/// e.g. `{"ds_sf": {"elems": [1], "cutoff": 5.0, "sfs": [..]}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Representation {
    #[serde(rename = "ds_soap")]
    Soap(Soap),
    #[serde(rename = "ds_mbtr")]
    Mbtr(Mbtr),
    #[serde(rename = "ds_lmbtr")]
    LocalMbtr(LocalMbtr),
    #[serde(rename = "ds_sf")]
    SymmetryFunctions(SymmetryFunctions),
}

/// Kinds accepted by [`Representation`].
pub const COMPONENTS: [&str; 4] = [Soap::KIND, Mbtr::KIND, LocalMbtr::KIND, SymmetryFunctions::KIND];

#[derive(Clone, Debug, PartialEq)]
pub enum RepresentationOutput {
    /// One row per structure
    Global(Array2<f64>),
    /// One `(n_atoms, dim)` array per structure
    Local(Vec<Array2<f64>>),
}

impl RepresentationOutput {
    pub fn into_global(self) -> Option<Array2<f64>> {
        match self {
            RepresentationOutput::Global(rep) => Some(rep),
            RepresentationOutput::Local(_) => None,
        }
    }
    pub fn into_local(self) -> Option<Vec<Array2<f64>>> {
        match self {
            RepresentationOutput::Local(rep) => Some(rep),
            RepresentationOutput::Global(_) => None,
        }
    }
}

impl Representation {
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, ConfigError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Representation::Soap(_) => Soap::KIND,
            Representation::Mbtr(_) => Mbtr::KIND,
            Representation::LocalMbtr(_) => LocalMbtr::KIND,
            Representation::SymmetryFunctions(_) => SymmetryFunctions::KIND,
        }
    }

    pub fn to_request(&self, periodic: bool) -> Result<DescriptorRequest, ConfigError> {
        match self {
            Representation::Soap(rep) => rep.to_request(periodic),
            Representation::Mbtr(rep) => rep.to_request(periodic),
            Representation::LocalMbtr(rep) => rep.to_request(periodic),
            Representation::SymmetryFunctions(rep) => rep.to_request(periodic),
        }
    }

    pub fn compute<B>(
        &self,
        backend: &B,
        data: &StructureCollection,
        context: &ComputeContext,
    ) -> Result<RepresentationOutput, DescriptorError>
    where
        B: DescriptorBackend + ?Sized,
    {
        Ok(match self {
            Representation::Soap(rep) => {
                RepresentationOutput::Local(rep.compute(backend, data, context)?)
            }
            Representation::Mbtr(rep) => {
                RepresentationOutput::Global(rep.compute(backend, data, context)?)
            }
            Representation::LocalMbtr(rep) => {
                RepresentationOutput::Local(rep.compute(backend, data, context)?)
            }
            Representation::SymmetryFunctions(rep) => {
                RepresentationOutput::Local(rep.compute(backend, data, context)?)
            }
        })
    }
}

impl From<Soap> for Representation {
    fn from(value: Soap) -> Self {
        Representation::Soap(value)
    }
}

impl From<Mbtr> for Representation {
    fn from(value: Mbtr) -> Self {
        Representation::Mbtr(value)
    }
}

impl From<LocalMbtr> for Representation {
    fn from(value: LocalMbtr) -> Self {
        Representation::LocalMbtr(value)
    }
}

impl From<SymmetryFunctions> for Representation {
    fn from(value: SymmetryFunctions) -> Self {
        Representation::SymmetryFunctions(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trip() {
        let config = json!({
            "ds_sf": {
                "elems": [1, 8],
                "cutoff": 5.0,
                "sfs": [{"rad": {"eta": 1.0, "mu": 0.0}}, {"rad_shifted": {"n": 3}}]
            }
        });
        let rep = Representation::from_value(config).unwrap();
        assert_eq!(rep.kind(), "ds_sf");
        assert!(COMPONENTS.contains(&rep.kind()));

        let Representation::SymmetryFunctions(sf) = &rep else {
            panic!("expected symmetry functions");
        };
        assert!(sf.stratify);
        assert_eq!(sf.sfs.len(), 2);

        let value = rep.to_value().unwrap();
        assert_eq!(value["ds_sf"]["stratify"], true);
        assert_eq!(Representation::from_value(value).unwrap(), rep);
    }

    #[test]
    fn test_unknown_kind() {
        let err = Representation::from_value(json!({"ds_acsf": {}})).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_request_dispatch() {
        let rep: Representation = Soap::new(vec![1], 4.0, 0.5, 2, 2).into();
        assert_eq!(rep.kind(), "ds_soap");
        let request = rep.to_request(false).unwrap();
        assert!(request.is_local());
        assert_eq!(request.species(), &[1]);
    }
}
