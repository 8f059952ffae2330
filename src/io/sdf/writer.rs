//! Streaming SD writer session.

use super::record::render_record;
use crate::io::config::{PropertyFilter, WriterConfig};
use crate::io::error::Error;
use crate::model::molecule::Molecule;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Closed,
}

/// Writes molecules one record at a time to a byte sink.
///
/// A writer opened with [`SdWriter::create`] owns its file and releases it on
/// [`close`](SdWriter::close) or drop. A writer built with [`SdWriter::new`]
/// only flushes the caller's sink on close; the sink itself stays alive and
/// can be recovered with [`into_inner`](SdWriter::into_inner).
///
/// Settings changes apply to subsequent writes only. The session is not
/// internally synchronized; `&mut self` receivers leave serialization to the
/// caller.
#[derive(Debug)]
pub struct SdWriter<W: Write> {
    sink: Option<W>,
    owns_sink: bool,
    config: WriterConfig,
    written: usize,
    state: State,
}

impl SdWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and opens a session over it.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::create(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "opened SD output file");
        let mut writer = Self::new(BufWriter::new(file));
        writer.owns_sink = true;
        Ok(writer)
    }
}

impl<W: Write> SdWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: Some(sink),
            owns_sink: false,
            config: WriterConfig::default(),
            written: 0,
            state: State::Open,
        }
    }

    pub fn with_config(mut self, config: WriterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Replaces the property filter. An empty name list exports every public
    /// property.
    pub fn set_props(&mut self, props: impl Into<PropertyFilter>) {
        self.config.props = props.into();
    }

    pub fn props(&self) -> &PropertyFilter {
        &self.config.props
    }

    pub fn set_force_v3000(&mut self, force: bool) {
        self.config.force_v3000 = force;
    }

    pub fn force_v3000(&self) -> bool {
        self.config.force_v3000
    }

    pub fn set_kekulize(&mut self, kekulize: bool) {
        self.config.kekulize = kekulize;
    }

    pub fn kekulize(&self) -> bool {
        self.config.kekulize
    }

    /// Number of records successfully written so far.
    #[inline]
    pub fn num_mols(&self) -> usize {
        self.written
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    /// Appends one record for `mol`, using conformer `conformer_id` or the
    /// first conformer when `None`.
    ///
    /// An unnamed molecule gets the current record count on its name line.
    /// The record is rendered completely before any byte reaches the sink, so
    /// a molecule that fails to render leaves the output and the count as
    /// they were.
    pub fn write(&mut self, mol: &Molecule, conformer_id: Option<u32>) -> Result<(), Error> {
        self.open_sink()?;
        let record = render_record(mol, conformer_id, &self.config, Some(self.written))?;
        self.open_sink()?.write_all(&record)?;
        self.written += 1;
        tracing::trace!(
            record = self.written,
            atoms = mol.atom_count(),
            bytes = record.len(),
            "wrote SD record"
        );
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.open_sink()?.flush()?;
        Ok(())
    }

    /// Flushes and closes the session. Closing twice is a no-op.
    ///
    /// An owned file is released even when the final flush fails; the flush
    /// error is still returned.
    pub fn close(&mut self) -> Result<(), Error> {
        if self.state == State::Closed {
            return Ok(());
        }
        self.state = State::Closed;
        let flushed = match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        };
        if self.owns_sink {
            self.sink = None;
        }
        tracing::debug!(records = self.written, "closed SD writer");
        flushed.map_err(Error::from)
    }

    /// Flushes and returns the caller's sink. Fails with
    /// [`Error::UseAfterClose`] when the session owned its sink and has
    /// already released it.
    pub fn into_inner(mut self) -> Result<W, Error> {
        let mut sink = self.sink.take().ok_or(Error::UseAfterClose)?;
        self.state = State::Closed;
        sink.flush()?;
        Ok(sink)
    }

    fn open_sink(&mut self) -> Result<&mut W, Error> {
        match (self.state, self.sink.as_mut()) {
            (State::Open, Some(sink)) => Ok(sink),
            _ => Err(Error::UseAfterClose),
        }
    }
}

impl<W: Write> Drop for SdWriter<W> {
    fn drop(&mut self) {
        if self.state == State::Open {
            if let Err(e) = self.close() {
                tracing::warn!(error = %e, "failed to close SD writer on drop");
            }
        }
    }
}
