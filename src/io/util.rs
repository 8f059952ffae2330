use crate::model::types::{BondOrder, Element};
use std::str::FromStr;

/// Infers an element from a SYBYL atom type (`C.ar`, `N.pl3`) or an atom
/// name (`CA`, `cl1`). Tries the exact symbol, then a case-normalized one,
/// then the leading letter alone.
pub fn guess_element_symbol(token: &str) -> Option<Element> {
    let base = token.split('.').next().unwrap_or(token).trim();
    let letters: String = base.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    if letters.is_empty() {
        return None;
    }

    if let Ok(element) = Element::from_str(&letters) {
        return Some(element);
    }

    let mut chars = letters.chars();
    let normalized: String = chars
        .next()
        .map(|c| c.to_ascii_uppercase())
        .into_iter()
        .chain(chars.map(|c| c.to_ascii_lowercase()))
        .collect();
    if let Ok(element) = Element::from_str(&normalized[..normalized.len().min(2)]) {
        return Some(element);
    }

    Element::from_str(&normalized[..1]).ok()
}

/// Maps a MOL2 bond type to a bond order. Amide, dummy, unknown and
/// not-connected bonds are written as single bonds.
pub fn bond_order_from_mol2(token: &str) -> Option<BondOrder> {
    match token.to_ascii_lowercase().as_str() {
        "1" | "am" | "du" | "un" | "nc" => Some(BondOrder::Single),
        "2" => Some(BondOrder::Double),
        "3" => Some(BondOrder::Triple),
        "ar" => Some(BondOrder::Aromatic),
        _ => None,
    }
}
