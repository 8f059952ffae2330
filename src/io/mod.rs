//! Reading and writing molecule files.
//!
//! SD output is the core of this module: [`SdWriter`] streams records to a
//! sink, while [`render_text`] produces the same text for a single record
//! without one. MOL2 input exists to feed the command-line tool.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub mod config;
pub mod error;
pub mod mol2;
pub mod sdf;
pub mod util;

pub use config::{PropertyFilter, WriterConfig};
pub use error::Error;
pub use sdf::{SdWriter, render_text, render_text_with_props};

use crate::model::molecule::Molecule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Sdf,
    Mol2,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Sdf => write!(f, "SDF"),
            Format::Mol2 => write!(f, "MOL2"),
        }
    }
}

/// Opens a writer on `path`, hands it to `body`, and closes it on every exit
/// path. An error from `body` wins over an error from closing.
pub fn scoped<P, F, T>(path: P, config: WriterConfig, body: F) -> Result<T, Error>
where
    P: AsRef<Path>,
    F: FnOnce(&mut SdWriter<BufWriter<File>>) -> Result<T, Error>,
{
    let mut writer = SdWriter::create(path)?.with_config(config);
    let outcome = body(&mut writer);
    let closed = writer.close();
    let value = outcome?;
    closed?;
    Ok(value)
}

/// Writes every molecule to a new SD file and returns the record count.
pub fn write_sdf<'a, P, I>(path: P, molecules: I, config: &WriterConfig) -> Result<usize, Error>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a Molecule>,
{
    scoped(path, config.clone(), |writer| {
        for mol in molecules {
            writer.write(mol, None)?;
        }
        Ok(writer.num_mols())
    })
}
