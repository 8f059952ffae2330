//! Molecular data model consumed by the SD writer.
//!
//! - [`types`] – Periodic table elements, bond orders, and stereo codes.
//! - [`atom`] – Atom with element, formal charge, isotope label, and parity.
//! - [`molecule`] – Checked molecular graph with bonds, conformers, and properties.
//! - [`conformer`] – Per-atom 2D or 3D coordinate sets.
//! - [`property`] – Ordered map of typed property values with private entries.
//! - [`kekulize`] – Aromatic bond rewriting into alternating single/double bonds.

pub mod atom;
pub mod conformer;
pub mod kekulize;
pub mod molecule;
pub mod property;
pub mod types;
