use super::atom::Atom;
use super::conformer::Conformer;
use super::property::PropertyMap;
use super::types::{BondOrder, BondStereo};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("bond references atom {index} but the molecule has {atom_count} atoms")]
    AtomOutOfRange { index: usize, atom_count: usize },

    #[error("bond connects atom {0} to itself")]
    SelfBond(usize),

    #[error("conformer {id} has {found} positions but the molecule has {expected} atoms")]
    ConformerLength {
        id: u32,
        expected: usize,
        found: usize,
    },

    #[error("conformer id {0} is already in use")]
    DuplicateConformer(u32),
}

/// A bond between two atoms. Endpoint order is preserved because wedge
/// stereo is anchored on the first atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
    pub stereo: BondStereo,
}

impl Bond {
    pub fn new(i: usize, j: usize, order: BondOrder) -> Self {
        Self {
            i,
            j,
            order,
            stereo: BondStereo::None,
        }
    }

    pub fn with_stereo(mut self, stereo: BondStereo) -> Self {
        self.stereo = stereo;
        self
    }

    #[inline]
    pub fn is_aromatic(&self) -> bool {
        self.order.is_aromatic()
    }

    /// The endpoint opposite `atom`, if `atom` is one of the two.
    pub fn partner(&self, atom: usize) -> Option<usize> {
        if self.i == atom {
            Some(self.j)
        } else if self.j == atom {
            Some(self.i)
        } else {
            None
        }
    }
}

/// Molecular graph with conformers and a property map.
///
/// Bonds and conformers are only added through checked methods, so bond
/// endpoints are always valid atom indices and every conformer holds exactly
/// one position per atom.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub name: Option<String>,
    /// Chiral flag written to the counts line.
    pub chiral: bool,
    pub properties: PropertyMap,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    conformers: Vec<Conformer>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Appends an atom and returns its index. Existing conformers are
    /// extended with a zero position so they stay aligned with the atom list.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        for conf in &mut self.conformers {
            conf.positions.push([0.0; 3]);
        }
        self.atoms.len() - 1
    }

    pub fn add_bond(&mut self, bond: Bond) -> Result<usize, ModelError> {
        let atom_count = self.atoms.len();
        for index in [bond.i, bond.j] {
            if index >= atom_count {
                return Err(ModelError::AtomOutOfRange { index, atom_count });
            }
        }
        if bond.i == bond.j {
            return Err(ModelError::SelfBond(bond.i));
        }
        self.bonds.push(bond);
        Ok(self.bonds.len() - 1)
    }

    pub fn add_conformer(&mut self, conformer: Conformer) -> Result<(), ModelError> {
        if conformer.len() != self.atoms.len() {
            return Err(ModelError::ConformerLength {
                id: conformer.id,
                expected: self.atoms.len(),
                found: conformer.len(),
            });
        }
        if self.conformer(conformer.id).is_some() {
            return Err(ModelError::DuplicateConformer(conformer.id));
        }
        self.conformers.push(conformer);
        Ok(())
    }

    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[inline]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    #[inline]
    pub fn conformers(&self) -> &[Conformer] {
        &self.conformers
    }

    pub fn conformer(&self, id: u32) -> Option<&Conformer> {
        self.conformers.iter().find(|c| c.id == id)
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn has_aromatic_bonds(&self) -> bool {
        self.bonds.iter().any(Bond::is_aromatic)
    }

    /// Replaces the order of bond `index`; used by kekulization on a scratch copy.
    pub(crate) fn set_bond_order(&mut self, index: usize, order: BondOrder) {
        if let Some(bond) = self.bonds.get_mut(index) {
            bond.order = order;
        }
    }
}
