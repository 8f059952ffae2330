use super::types::{AtomParity, Element};

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub formal_charge: i8,
    /// Mass number of an isotope label; `None` for natural abundance.
    pub isotope: Option<u16>,
    pub parity: AtomParity,
    /// Hydrogens attached to this atom that are not present as explicit atoms.
    pub hydrogens: u8,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            isotope: None,
            parity: AtomParity::None,
            hydrogens: 0,
        }
    }

    pub fn with_charge(mut self, formal_charge: i8) -> Self {
        self.formal_charge = formal_charge;
        self
    }

    pub fn with_isotope(mut self, mass_number: u16) -> Self {
        self.isotope = Some(mass_number);
        self
    }

    pub fn with_parity(mut self, parity: AtomParity) -> Self {
        self.parity = parity;
        self
    }

    pub fn with_hydrogens(mut self, hydrogens: u8) -> Self {
        self.hydrogens = hydrogens;
        self
    }
}
