//! A pure Rust writer for MDL SD files (V2000 and V3000 molfiles with data items).
//!
//! Molecules are written one record at a time through an [`SdWriter`] session
//! or rendered to a string with [`render_text`]. Each record carries one
//! conformer's coordinates, the molecule's properties as data items, and the
//! `$$$$` delimiter.
//!
//! # Features
//!
//! - **Format selection** — V2000 fixed-column blocks by default, promoted to
//!   V3000 when counts or coordinates do not fit, or on request
//! - **Kekulization** — Aromatic bonds are rewritten to alternating single and
//!   double bonds on a scratch copy; the caller's molecule is untouched
//! - **Property filtering** — Export every public property, or an explicit
//!   ordered list of names
//! - **Session lifecycle** — Streaming writes, flush, idempotent close, and
//!   close-on-drop
//!
//! # Quick Start
//!
//! ```
//! use sdforge::{Atom, Bond, BondOrder, Conformer, Element, Molecule};
//! use sdforge::io::{Error, SdWriter};
//!
//! let mut mol = Molecule::with_name("formaldehyde");
//! let c = mol.add_atom(Atom::new(Element::C).with_hydrogens(2));
//! let o = mol.add_atom(Atom::new(Element::O));
//! mol.add_bond(Bond::new(c, o, BondOrder::Double)).unwrap();
//! mol.add_conformer(Conformer::new_3d(0, vec![[0.0, 0.0, 0.0], [1.21, 0.0, 0.0]]))
//!     .unwrap();
//! mol.properties.set("formula", "CH2O");
//!
//! let mut writer = SdWriter::new(Vec::new());
//! writer.write(&mol, None)?;
//! assert_eq!(writer.num_mols(), 1);
//!
//! let text = String::from_utf8(writer.into_inner()?).unwrap();
//! assert!(text.starts_with("formaldehyde\n"));
//! assert!(text.contains("  2  1  0  0  0  0  0  0  0  0999 V2000\n"));
//! assert!(text.ends_with(">  <formula>\nCH2O\n\n$$$$\n"));
//! # Ok::<(), Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — SD writer session, record rendering, writer configuration, and
//!   MOL2 input
//!
//! # Data Types
//!
//! - [`Molecule`] — Atoms, bonds, conformers, and a property map
//! - [`Atom`] — Element, formal charge, isotope, parity, implicit hydrogens
//! - [`Bond`] — Bond between two atoms with order and stereo flag
//! - [`Conformer`] — One 2D or 3D coordinate set
//! - [`PropertyMap`] / [`PropertyValue`] — Ordered typed properties
//! - [`Element`], [`BondOrder`], [`BondStereo`], [`AtomParity`] — Chemical codes

mod model;

pub mod io;

pub use model::atom::Atom;
pub use model::conformer::Conformer;
pub use model::kekulize::KekulizeError;
pub use model::molecule::{Bond, ModelError, Molecule};
pub use model::property::{Property, PropertyMap, PropertyValue};
pub use model::types::{
    AtomParity, BondOrder, BondStereo, Element, ParseBondOrderError, ParseBondStereoError,
    ParseElementError,
};
