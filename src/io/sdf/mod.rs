//! MDL SD file output.
//!
//! A record is a molfile header and connection table (V2000 when it fits,
//! V3000 otherwise), the molecule's data items, and the `$$$$` delimiter.

pub mod ctab;
pub mod props;
pub mod record;
pub mod writer;

#[cfg(test)]
pub(crate) mod reader;

pub use record::{render_text, render_text_with_props};
pub use writer::SdWriter;
