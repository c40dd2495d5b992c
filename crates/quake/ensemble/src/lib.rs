//! Quake Ensemble - merged binary ensemble files
//!
//! A forecast ensemble is stored as one file holding many simulated catalogs.
//! [`EnsembleReader`] walks it section by section, yielding one
//! [`quake_catalog::Catalog`] per section without holding the whole file in
//! memory. [`EnsembleWriter`] produces the same format.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod reader;
pub mod writer;

pub use config::EnsembleConfig;
pub use error::{EnsembleError, EnsembleResult};
pub use reader::{EnsembleReader, FILE_HEADER_SIZE, SECTION_HEADER_SIZE};
pub use writer::{encode_ensemble, encode_section, EnsembleWriter};
