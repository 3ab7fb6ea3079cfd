//! # cscribe-descriptors
//!
//! Descriptor wrappers that turn toolkit-style configurations into requests for
//! an external descriptor library, and reshape what comes back.
//!
//! - [`Soap`]: SOAP, local, regrouped per structure
//! - [`Mbtr`]: MBTR, global, returned as-is
//! - [`LocalMbtr`]: local MBTR, regrouped and optionally stratified
//! - [`SymmetryFunctions`]: ACSF, regrouped and optionally stratified
//!
//! The library itself sits behind [`DescriptorBackend`].
mod backend;
mod error;
mod mbtr;
mod representation;
mod sf;
mod soap;

pub use self::backend::{
    AcsfArgs, ComputeContext, DescriptorBackend, DescriptorRequest, Geometry, Grid, MbtrArgs,
    MbtrTermArgs, RadialBasis, SoapArgs, Weighting,
};
pub use self::error::{ConfigError, DescriptorError};
pub use self::mbtr::{GeometryFunction, LocalMbtr, Mbtr, MbtrTerm, Norm, WeightFunction};
pub use self::representation::{Representation, RepresentationOutput, COMPONENTS};
pub use self::sf::{make_params, SymmetryFunction, SymmetryFunctions};
pub use self::soap::Soap;
