//! Rewrites aromatic bonds into an explicit alternating single/double pattern.
//!
//! Every atom touching an aromatic bond is classified by comparing its current
//! valence (implicit hydrogens, non-aromatic bond orders, and one per aromatic
//! bond) with the valences allowed for its isoelectronic element. Atoms one
//! short of an allowed valence must receive exactly one double bond; the
//! double bonds are then placed by a deterministic backtracking search for a
//! perfect matching over the aromatic bonds joining such atoms.

use super::molecule::Molecule;
use super::types::{BondOrder, Element};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KekulizeError {
    #[error("aromatic atom {index} ({element}) has no supported valence model")]
    UnsupportedElement { index: usize, element: Element },

    #[error(
        "aromatic atom {index} ({element}, charge {charge}) has valence {current}, which no double bond assignment can satisfy"
    )]
    Valence {
        index: usize,
        element: Element,
        charge: i8,
        current: u16,
    },

    #[error("no alternating single/double bond pattern exists; {unmatched} aromatic atoms cannot receive a double bond")]
    NoAssignment { unmatched: usize },
}

impl Molecule {
    /// Returns a kekulized copy of this molecule. The receiver is never modified.
    pub fn kekulized(&self) -> Result<Molecule, KekulizeError> {
        let mut scratch = self.clone();
        if !self.has_aromatic_bonds() {
            return Ok(scratch);
        }

        let needs = double_bond_demand(self)?;

        // Per-atom list of (bond index, partner) over aromatic bonds whose
        // endpoints both need a double bond.
        let mut candidates: Vec<Vec<(usize, usize)>> = vec![Vec::new(); self.atom_count()];
        for (b, bond) in self.bonds().iter().enumerate() {
            if bond.is_aromatic() && needs[bond.i] && needs[bond.j] {
                candidates[bond.i].push((b, bond.j));
                candidates[bond.j].push((b, bond.i));
            }
        }

        let mut matched: Vec<Option<usize>> = vec![None; self.atom_count()];
        if !place_double_bonds(&needs, &candidates, &mut matched) {
            let unmatched = needs.iter().filter(|&&n| n).count();
            return Err(KekulizeError::NoAssignment { unmatched });
        }

        for (b, bond) in self.bonds().iter().enumerate() {
            if !bond.is_aromatic() {
                continue;
            }
            let order = if matched[bond.i] == Some(b) {
                BondOrder::Double
            } else {
                BondOrder::Single
            };
            scratch.set_bond_order(b, order);
        }

        Ok(scratch)
    }
}

/// For each atom, whether it must take one double bond from its aromatic bonds.
fn double_bond_demand(mol: &Molecule) -> Result<Vec<bool>, KekulizeError> {
    let n = mol.atom_count();
    let mut current: Vec<u16> = mol.atoms().iter().map(|a| u16::from(a.hydrogens)).collect();
    let mut aromatic = vec![false; n];

    for bond in mol.bonds() {
        let contribution = u16::from(bond.order.valence_contribution());
        current[bond.i] += contribution;
        current[bond.j] += contribution;
        if bond.is_aromatic() {
            aromatic[bond.i] = true;
            aromatic[bond.j] = true;
        }
    }

    let mut needs = vec![false; n];
    for (index, atom) in mol.atoms().iter().enumerate() {
        if !aromatic[index] {
            continue;
        }
        let effective = i16::from(atom.element.atomic_number()) - i16::from(atom.formal_charge);
        let allowed = allowed_valences(effective).ok_or(KekulizeError::UnsupportedElement {
            index,
            element: atom.element,
        })?;
        let target = allowed
            .iter()
            .map(|&v| u16::from(v))
            .find(|&v| v >= current[index]);

        match target.map(|v| v - current[index]) {
            Some(0) => {}
            Some(1) => needs[index] = true,
            _ => {
                return Err(KekulizeError::Valence {
                    index,
                    element: atom.element,
                    charge: atom.formal_charge,
                    current: current[index],
                });
            }
        }
    }

    Ok(needs)
}

/// Allowed valences, smallest first, keyed by (isoelectronic) atomic number.
fn allowed_valences(atomic_number: i16) -> Option<&'static [u8]> {
    match atomic_number {
        1 | 9 | 35 => Some(&[1]),
        4 => Some(&[2]),
        5 | 13 => Some(&[3]),
        6 | 14 | 32 => Some(&[4]),
        7 => Some(&[3, 5]),
        8 => Some(&[2]),
        15 | 33 => Some(&[3, 5, 7]),
        16 | 34 | 52 => Some(&[2, 4, 6]),
        17 | 53 => Some(&[1, 3, 5, 7]),
        _ => None,
    }
}

fn place_double_bonds(
    needs: &[bool],
    candidates: &[Vec<(usize, usize)>],
    matched: &mut [Option<usize>],
) -> bool {
    // Most constrained unmatched atom first; ties go to the lowest index.
    let next = (0..needs.len())
        .filter(|&a| needs[a] && matched[a].is_none())
        .min_by_key(|&a| {
            candidates[a]
                .iter()
                .filter(|(_, p)| matched[*p].is_none())
                .count()
        });

    let Some(atom) = next else {
        return true;
    };

    for &(bond, partner) in &candidates[atom] {
        if matched[partner].is_some() {
            continue;
        }
        matched[atom] = Some(bond);
        matched[partner] = Some(bond);
        if place_double_bonds(needs, candidates, matched) {
            return true;
        }
        matched[atom] = None;
        matched[partner] = None;
    }

    false
}
