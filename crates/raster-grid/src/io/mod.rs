//! Binary grid file codec.

pub mod header;
pub(crate) mod reader;
mod random_access;
mod writer;

pub use header::{GridHeader, Precision};
pub use random_access::CellReader;
pub use reader::GridReader;
