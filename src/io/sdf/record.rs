//! Record assembly: header, connection table, data items and delimiter.

use super::ctab::{self, CtabVersion};
use super::props::{self, RECORD_DELIMITER};
use crate::io::config::{PropertyFilter, WriterConfig};
use crate::io::error::Error;
use crate::model::conformer::Conformer;
use crate::model::molecule::Molecule;
use std::borrow::Cow;
use std::io::Write;

/// Renders one complete record into memory.
///
/// Nothing is written anywhere until the whole record has rendered, so a
/// failing record never leaves a partial entry behind.
pub(crate) fn render_record(
    mol: &Molecule,
    conformer_id: Option<u32>,
    config: &WriterConfig,
    record_id: Option<usize>,
) -> Result<Vec<u8>, Error> {
    let conformer = select_conformer(mol, conformer_id)?;
    let name = name_line(mol, record_id)?;

    let structure = if config.kekulize && mol.has_aromatic_bonds() {
        tracing::debug!(name = %name, "kekulizing aromatic bonds for output");
        Cow::Owned(mol.kekulized()?)
    } else {
        Cow::Borrowed(mol)
    };

    let mut buf = Vec::new();
    ctab::write_header(&mut buf, &name, conformer)?;
    match ctab::select_version(&structure, conformer, config.force_v3000) {
        CtabVersion::V2000 => ctab::write_v2000(&mut buf, &structure, conformer)?,
        CtabVersion::V3000 => ctab::write_v3000(&mut buf, &structure, conformer)?,
    }
    props::write_properties(&mut buf, &mol.properties, &config.props)?;
    writeln!(buf, "{}", RECORD_DELIMITER)?;
    Ok(buf)
}

/// Renders one record exporting every public property.
///
/// Returns exactly the text a writer with the same settings would stream for
/// one `write` call. `record_id` fills the name line when the molecule has no
/// name of its own.
pub fn render_text(
    mol: &Molecule,
    conformer_id: Option<u32>,
    kekulize: bool,
    force_v3000: bool,
    record_id: Option<usize>,
) -> Result<String, Error> {
    render_text_with_props(
        mol,
        conformer_id,
        kekulize,
        force_v3000,
        record_id,
        &PropertyFilter::AllPublic,
    )
}

pub fn render_text_with_props(
    mol: &Molecule,
    conformer_id: Option<u32>,
    kekulize: bool,
    force_v3000: bool,
    record_id: Option<usize>,
    props: &PropertyFilter,
) -> Result<String, Error> {
    let config = WriterConfig {
        props: props.clone(),
        kekulize,
        force_v3000,
    };
    let buf = render_record(mol, conformer_id, &config, record_id)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn select_conformer(mol: &Molecule, id: Option<u32>) -> Result<Option<&Conformer>, Error> {
    match id {
        None => Ok(mol.conformers().first()),
        Some(id) => mol
            .conformer(id)
            .map(Some)
            .ok_or(Error::ConformerNotFound(id)),
    }
}

/// The first header line. Names longer than the 80-column header are cut at
/// the column limit.
fn name_line(mol: &Molecule, record_id: Option<usize>) -> Result<String, Error> {
    match mol.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) if props::has_line_break(name) => {
            Err(Error::format("molecule name", "contains a line break"))
        }
        Some(name) if props::starts_with_delimiter(name) => {
            Err(Error::format("molecule name", "starts with the record delimiter"))
        }
        Some(name) => {
            let width = name.chars().count();
            if width > ctab::HEADER_LINE_WIDTH {
                tracing::debug!(width, "molecule name exceeds header width, truncating");
            }
            Ok(name.chars().take(ctab::HEADER_LINE_WIDTH).collect())
        }
        None => Ok(record_id.map(|id| id.to_string()).unwrap_or_default()),
    }
}
