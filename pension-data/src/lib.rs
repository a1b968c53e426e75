//! Loading custom age factor tables from CSV.

mod loader;

pub use loader::{AgeFactorLoader, AgeFactorLoaderError, AgeFactorRecord, OVERFLOW_LABEL, RowAge};
