use crate::backend::{self, ComputeContext, DescriptorBackend, DescriptorRequest, RadialBasis, SoapArgs};
use crate::error::{require_positive, ConfigError, DescriptorError};
use cscribe_core::{to_local_for, ElementId, StructureCollection};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Smooth Overlap of Atomic Positions, computed by the backend.
///
/// A local descriptor: the result holds one `(n_atoms, dim)` array per
/// structure. The power spectrum already distinguishes central elements, so
/// it is not stratified.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Soap {
    pub elems: Vec<ElementId>,
    pub cutoff: f64,
    pub sigma: f64,
    pub n_max: usize,
    pub l_max: usize,
    #[serde(default)]
    pub rbf: RadialBasis,
}

impl Soap {
    pub const KIND: &'static str = "ds_soap";

    pub fn new(elems: Vec<ElementId>, cutoff: f64, sigma: f64, n_max: usize, l_max: usize) -> Self {
        Soap {
            elems,
            cutoff,
            sigma,
            n_max,
            l_max,
            rbf: RadialBasis::default(),
        }
    }

    pub fn with_rbf(mut self, rbf: RadialBasis) -> Self {
        self.rbf = rbf;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elems.is_empty() {
            return Err(ConfigError::invalid("elems", "at least one element is required"));
        }
        require_positive("cutoff", self.cutoff)?;
        require_positive("sigma", self.sigma)?;
        if self.n_max == 0 {
            return Err(ConfigError::invalid("n_max", "must be at least 1"));
        }
        Ok(())
    }

    pub fn to_request(&self, periodic: bool) -> Result<DescriptorRequest, ConfigError> {
        self.validate()?;
        Ok(DescriptorRequest::Soap(SoapArgs {
            species: self.elems.clone(),
            rcut: self.cutoff,
            nmax: self.n_max,
            lmax: self.l_max,
            sigma: self.sigma,
            rbf: self.rbf,
            crossover: true,
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
        Ok(to_local_for(data, &flat)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_arguments() {
        let soap = Soap::new(vec![1, 8], 5.0, 0.5, 4, 3);
        let request = soap.to_request(false).unwrap();
        assert_eq!(
            request,
            DescriptorRequest::Soap(SoapArgs {
                species: vec![1, 8],
                rcut: 5.0,
                nmax: 4,
                lmax: 3,
                sigma: 0.5,
                rbf: RadialBasis::Gto,
                crossover: true,
                periodic: false,
            })
        );
        assert!(soap.to_request(true).unwrap().periodic());
    }

    #[test]
    fn test_rbf_from_config() {
        let soap: Soap = serde_json::from_value(serde_json::json!({
            "elems": [1],
            "cutoff": 4.0,
            "sigma": 0.3,
            "n_max": 2,
            "l_max": 2,
            "rbf": "polynomial"
        }))
        .unwrap();
        assert_eq!(soap.rbf, RadialBasis::Polynomial);
        assert_eq!(soap.rbf.to_string(), "polynomial");

        let default: Soap = serde_json::from_value(serde_json::json!({
            "elems": [1], "cutoff": 4.0, "sigma": 0.3, "n_max": 2, "l_max": 2
        }))
        .unwrap();
        assert_eq!(default.rbf, RadialBasis::Gto);
    }

    #[test]
    fn test_invalid_parameters() {
        let err = Soap::new(vec![], 5.0, 0.5, 4, 3).to_request(false).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "elems", .. }));

        let err = Soap::new(vec![1], -1.0, 0.5, 4, 3).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "cutoff", .. }));

        let err = Soap::new(vec![1], 5.0, 0.5, 0, 3).validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid value for `n_max`: must be at least 1");
    }
}
