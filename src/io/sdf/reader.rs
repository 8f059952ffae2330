//! Minimal SD reader used to check written records by parsing them back.

use crate::io::{Format, error::Error};
use crate::model::{
    atom::Atom,
    conformer::Conformer,
    molecule::{Bond, Molecule},
    types::{AtomParity, BondOrder, BondStereo, Element},
};
use std::io::BufRead;
use std::str::FromStr;

type Lines = Vec<(usize, String)>;

pub fn read<R: BufRead>(reader: R) -> Result<Vec<Molecule>, Error> {
    let mut records = Vec::new();
    let mut current: Lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let content = line?;
        if content == "$$$$" {
            records.push(parse_record(std::mem::take(&mut current))?);
        } else {
            current.push((i + 1, content));
        }
    }
    if current.iter().any(|(_, l)| !l.trim().is_empty()) {
        return Err(sdf_error(current[0].0, "record is missing its $$$$ delimiter"));
    }
    Ok(records)
}

fn sdf_error(line: usize, details: &str) -> Error {
    Error::parse(Format::Sdf, line, details)
}

/// Connection table contents, collected before they are added to a molecule.
struct Block {
    atoms: Vec<Atom>,
    bonds: Vec<(usize, usize, BondOrder, BondStereo, usize)>,
    positions: Vec<[f64; 3]>,
    chiral: bool,
    /// Index of the first line after `M  END`.
    end: usize,
}

fn parse_record(lines: Lines) -> Result<Molecule, Error> {
    if lines.len() < 4 {
        return Err(sdf_error(
            lines.first().map_or(0, |(ln, _)| *ln),
            "record must contain a header and counts line",
        ));
    }

    let counts_ln = lines[3].0;
    let block = if lines[3].1.ends_with("V3000") {
        parse_v3000(&lines)?
    } else if lines[3].1.ends_with("V2000") {
        parse_v2000(&lines)?
    } else {
        return Err(sdf_error(counts_ln, "unknown counts line version"));
    };

    let mut mol = Molecule::new();
    if !lines[0].1.is_empty() {
        mol.name = Some(lines[0].1.clone());
    }
    mol.chiral = block.chiral;
    for atom in block.atoms {
        mol.add_atom(atom);
    }
    for (a1, a2, order, stereo, ln) in block.bonds {
        if a1 == 0 || a2 == 0 {
            return Err(sdf_error(ln, "bond references atom 0"));
        }
        mol.add_bond(Bond::new(a1 - 1, a2 - 1, order).with_stereo(stereo))
            .map_err(|e| sdf_error(ln, &e.to_string()))?;
    }

    let conformer = match lines[1].1.get(20..22) {
        Some("3D") => Some(Conformer::new_3d(0, block.positions)),
        Some("2D") => Some(Conformer::new_2d(
            0,
            block.positions.into_iter().map(|[x, y, _]| [x, y]).collect(),
        )),
        _ => None,
    };
    if let Some(conf) = conformer {
        mol.add_conformer(conf)
            .map_err(|e| sdf_error(counts_ln, &e.to_string()))?;
    }

    parse_data_items(&lines[block.end..], &mut mol)?;
    Ok(mol)
}

fn field(line: &(usize, String), range: std::ops::Range<usize>) -> &str {
    line.1.get(range).unwrap_or("").trim()
}

fn number<T: FromStr>(text: &str, ln: usize, what: &str) -> Result<T, Error> {
    text.parse::<T>()
        .map_err(|_| sdf_error(ln, &format!("invalid {what}: {text:?}")))
}

fn parse_v2000(lines: &Lines) -> Result<Block, Error> {
    let counts = &lines[3];
    let atom_count: usize = number(field(counts, 0..3), counts.0, "atom count")?;
    let bond_count: usize = number(field(counts, 3..6), counts.0, "bond count")?;

    let atom_start = 4;
    let bond_start = atom_start + atom_count;
    if lines.len() < bond_start + bond_count {
        return Err(sdf_error(counts.0, "record ended inside the atom or bond block"));
    }

    let mut block = Block {
        atoms: Vec::with_capacity(atom_count),
        bonds: Vec::with_capacity(bond_count),
        positions: Vec::with_capacity(atom_count),
        chiral: field(counts, 12..15) == "1",
        end: 0,
    };

    for line in &lines[atom_start..bond_start] {
        let ln = line.0;
        block.positions.push([
            number(field(line, 0..10), ln, "x coordinate")?,
            number(field(line, 10..20), ln, "y coordinate")?,
            number(field(line, 20..30), ln, "z coordinate")?,
        ]);
        let element =
            Element::from_str(field(line, 31..34)).map_err(|e| sdf_error(ln, &e.to_string()))?;
        let charge = match field(line, 36..39) {
            "1" => 3,
            "2" => 2,
            "3" => 1,
            "5" => -1,
            "6" => -2,
            "7" => -3,
            _ => 0,
        };
        let parity = parity_from_code(field(line, 39..42));
        block
            .atoms
            .push(Atom::new(element).with_charge(charge).with_parity(parity));
    }

    for line in &lines[bond_start..bond_start + bond_count] {
        let ln = line.0;
        let order = BondOrder::from_str(field(line, 6..9))
            .map_err(|e| sdf_error(ln, &e.to_string()))?;
        let stereo = match field(line, 9..12) {
            "1" => BondStereo::Up,
            "6" => BondStereo::Down,
            "4" => BondStereo::Either,
            "3" => BondStereo::CisTransEither,
            _ => BondStereo::None,
        };
        block.bonds.push((
            number(field(line, 0..3), ln, "bond atom")?,
            number(field(line, 3..6), ln, "bond atom")?,
            order,
            stereo,
            ln,
        ));
    }

    let mut index = bond_start + bond_count;
    let mut charges_seen = false;
    loop {
        let Some((ln, text)) = lines.get(index) else {
            return Err(sdf_error(counts.0, "missing M  END"));
        };
        index += 1;
        if text == "M  END" {
            break;
        }
        let is_charge = text.starts_with("M  CHG");
        if !is_charge && !text.starts_with("M  ISO") {
            continue;
        }
        if is_charge && !charges_seen {
            // M  CHG supersedes the atom block charge column.
            charges_seen = true;
            for atom in &mut block.atoms {
                atom.formal_charge = 0;
            }
        }
        let tokens: Vec<&str> = text[6..].split_whitespace().skip(1).collect();
        for pair in tokens.chunks(2) {
            let [atom, value] = pair else {
                return Err(sdf_error(*ln, "unpaired property entry"));
            };
            let atom: usize = number(atom, *ln, "atom index")?;
            let target = atom
                .checked_sub(1)
                .and_then(|i| block.atoms.get_mut(i))
                .ok_or_else(|| sdf_error(*ln, "property references unknown atom"))?;
            if is_charge {
                target.formal_charge = number(value, *ln, "charge")?;
            } else {
                target.isotope = Some(number(value, *ln, "mass number")?);
            }
        }
    }
    block.end = index;
    Ok(block)
}

fn parse_v3000(lines: &Lines) -> Result<Block, Error> {
    let mut joined: Vec<(usize, String)> = Vec::new();
    let mut pending: Option<(usize, String)> = None;
    let mut index = 4;
    loop {
        let Some((ln, text)) = lines.get(index) else {
            return Err(sdf_error(lines[3].0, "missing M  END"));
        };
        index += 1;
        if text == "M  END" {
            break;
        }
        let body = text
            .strip_prefix("M  V30 ")
            .ok_or_else(|| sdf_error(*ln, "expected an M  V30 line"))?;
        let (start, mut acc) = pending.take().unwrap_or((*ln, String::new()));
        match body.strip_suffix('-') {
            Some(head) => {
                acc.push_str(head);
                pending = Some((start, acc));
            }
            None => {
                acc.push_str(body);
                joined.push((start, acc));
            }
        }
    }

    let mut block = Block {
        atoms: Vec::new(),
        bonds: Vec::new(),
        positions: Vec::new(),
        chiral: false,
        end: index,
    };
    let mut section = "";
    for (ln, text) in &joined {
        let ln = *ln;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        match tokens.as_slice() {
            ["BEGIN", name] => section = *name,
            ["END", _] => section = "",
            ["COUNTS", _, _, _, _, chiral, ..] => block.chiral = *chiral == "1",
            [_, sym, x, y, z, _, extra @ ..] if section == "ATOM" => {
                block.positions.push([
                    number(x, ln, "x coordinate")?,
                    number(y, ln, "y coordinate")?,
                    number(z, ln, "z coordinate")?,
                ]);
                let element =
                    Element::from_str(sym).map_err(|e| sdf_error(ln, &e.to_string()))?;
                let mut atom = Atom::new(element);
                for kv in extra {
                    match kv.split_once('=') {
                        Some(("CHG", v)) => atom.formal_charge = number(v, ln, "charge")?,
                        Some(("MASS", v)) => atom.isotope = Some(number(v, ln, "mass")?),
                        Some(("CFG", v)) => atom.parity = parity_from_code(v),
                        _ => {}
                    }
                }
                block.atoms.push(atom);
            }
            [_, order, a1, a2, extra @ ..] if section == "BOND" => {
                let order =
                    BondOrder::from_str(order).map_err(|e| sdf_error(ln, &e.to_string()))?;
                let stereo = match extra.iter().find_map(|kv| kv.strip_prefix("CFG=")) {
                    Some("1") => BondStereo::Up,
                    Some("2") => BondStereo::Either,
                    Some("3") => BondStereo::Down,
                    _ => BondStereo::None,
                };
                block.bonds.push((
                    number(a1, ln, "bond atom")?,
                    number(a2, ln, "bond atom")?,
                    order,
                    stereo,
                    ln,
                ));
            }
            _ => {}
        }
    }
    Ok(block)
}

fn parse_data_items(lines: &[(usize, String)], mol: &mut Molecule) -> Result<(), Error> {
    let mut iter = lines.iter();
    while let Some((ln, text)) = iter.next() {
        if text.is_empty() {
            continue;
        }
        let name = text
            .strip_prefix(">  <")
            .and_then(|rest| rest.strip_suffix('>'))
            .ok_or_else(|| sdf_error(*ln, "expected a data item header"))?;
        let mut value = Vec::new();
        for (_, line) in iter.by_ref() {
            if line.is_empty() {
                break;
            }
            value.push(line.as_str());
        }
        mol.properties.set(name, value.join("\n"));
    }
    Ok(())
}

fn parity_from_code(code: &str) -> AtomParity {
    match code {
        "1" => AtomParity::Odd,
        "2" => AtomParity::Even,
        "3" => AtomParity::Either,
        _ => AtomParity::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::PropertyFilter;
    use crate::io::sdf::record::{render_text, render_text_with_props};
    use crate::io::sdf::writer::SdWriter;
    use std::io::Cursor;

    fn read_one(text: &str) -> Molecule {
        let mut mols = read(Cursor::new(text.as_bytes())).expect("parse record");
        assert_eq!(mols.len(), 1);
        mols.remove(0)
    }

    fn acetate() -> Molecule {
        let mut mol = Molecule::with_name("acetate");
        mol.chiral = true;
        let c1 = mol.add_atom(Atom::new(Element::C).with_hydrogens(3).with_isotope(13));
        let c2 = mol.add_atom(Atom::new(Element::C).with_parity(AtomParity::Even));
        let o1 = mol.add_atom(Atom::new(Element::O));
        let o2 = mol.add_atom(Atom::new(Element::O).with_charge(-1));
        mol.add_bond(Bond::new(c1, c2, BondOrder::Single).with_stereo(BondStereo::Up))
            .unwrap();
        mol.add_bond(Bond::new(c2, o1, BondOrder::Double)).unwrap();
        mol.add_bond(Bond::new(c2, o2, BondOrder::Single)).unwrap();
        mol.add_conformer(Conformer::new_3d(
            0,
            vec![
                [-1.5123, 0.0102, 0.0],
                [0.0, 0.0, 0.0],
                [0.6234, 1.0811, -0.0001],
                [0.6222, -1.0877, 0.2],
            ],
        ))
        .unwrap();
        mol.properties.set("charge", -1);
        mol.properties.set("label", "acetate ion");
        mol
    }

    fn assert_isomorphic(original: &Molecule, parsed: &Molecule) {
        assert_eq!(parsed.name, original.name);
        assert_eq!(parsed.chiral, original.chiral);
        assert_eq!(parsed.atom_count(), original.atom_count());
        for (a, b) in original.atoms().iter().zip(parsed.atoms()) {
            assert_eq!(a.element, b.element);
            assert_eq!(a.formal_charge, b.formal_charge);
            assert_eq!(a.isotope, b.isotope);
            assert_eq!(a.parity, b.parity);
        }
        assert_eq!(parsed.bonds(), original.bonds());
        let expected = original.conformers().first();
        let found = parsed.conformers().first();
        assert_eq!(expected.map(|c| c.is_3d), found.map(|c| c.is_3d));
        if let (Some(e), Some(f)) = (expected, found) {
            for (p, q) in e.positions.iter().zip(&f.positions) {
                for k in 0..3 {
                    assert!((p[k] - q[k]).abs() < 1e-4);
                }
            }
        }
    }

    #[test]
    fn v2000_roundtrip_preserves_structure() {
        let mol = acetate();
        let parsed = read_one(&render_text(&mol, None, true, false, None).unwrap());
        assert_isomorphic(&mol, &parsed);
        assert_eq!(parsed.properties.get("charge").unwrap().value.to_string(), "-1");
        assert_eq!(
            parsed.properties.get("label").unwrap().value.to_string(),
            "acetate ion"
        );
    }

    #[test]
    fn v3000_roundtrip_preserves_structure() {
        let mol = acetate();
        let parsed = read_one(&render_text(&mol, None, true, true, None).unwrap());
        assert_isomorphic(&mol, &parsed);
    }

    #[test]
    fn kekulized_roundtrip_replaces_aromatic_bonds() {
        let mut mol = Molecule::with_name("pyridine");
        mol.add_atom(Atom::new(Element::N));
        for _ in 0..5 {
            mol.add_atom(Atom::new(Element::C).with_hydrogens(1));
        }
        for i in 0..6 {
            mol.add_bond(Bond::new(i, (i + 1) % 6, BondOrder::Aromatic))
                .unwrap();
        }

        let parsed = read_one(&render_text(&mol, None, true, false, None).unwrap());
        assert_eq!(parsed.bond_count(), 6);
        let doubles = parsed
            .bonds()
            .iter()
            .filter(|b| b.order == BondOrder::Double)
            .count();
        assert_eq!(doubles, 3);
        for (a, b) in mol.bonds().iter().zip(parsed.bonds()) {
            assert_eq!((a.i, a.j), (b.i, b.j));
        }

        let raw = read_one(&render_text(&mol, None, false, false, None).unwrap());
        assert_eq!(raw.bonds(), mol.bonds());
    }

    #[test]
    fn filter_exports_only_present_requested_names() {
        let mut mol = acetate();
        mol.properties = Default::default();
        mol.properties.set("a", 1);
        mol.properties.set("b", "x");
        mol.properties.set("c", 2.5);

        let filter = PropertyFilter::from_names(["b", "z"]);
        let text = render_text_with_props(&mol, None, false, false, None, &filter).unwrap();
        let parsed = read_one(&text);
        assert_eq!(parsed.properties.len(), 1);
        assert_eq!(parsed.properties.get("b").unwrap().value.to_string(), "x");
        assert_eq!(text.matches(">  <").count(), 1);
    }

    #[test]
    fn legacy_capacity_boundary() {
        let chain = |n: usize| {
            let mut mol = Molecule::new();
            for i in 0..n {
                mol.add_atom(Atom::new(Element::C));
                if i > 0 {
                    mol.add_bond(Bond::new(i - 1, i, BondOrder::Single)).unwrap();
                }
            }
            mol
        };

        let at_ceiling = render_text(&chain(999), None, false, false, None).unwrap();
        assert_eq!(at_ceiling.lines().nth(3).unwrap(), "999998  0  0  0  0  0  0  0  0999 V2000");
        assert_eq!(read_one(&at_ceiling).atom_count(), 999);

        let above = render_text(&chain(1000), None, false, false, None).unwrap();
        assert!(above.lines().nth(3).unwrap().ends_with("V3000"));
        assert!(above.contains("M  V30 COUNTS 1000 999 0 0 0\n"));
        let parsed = read_one(&above);
        assert_eq!(parsed.atom_count(), 1000);
        assert_eq!(parsed.bond_count(), 999);

        let forced = render_text(&chain(3), None, false, true, None).unwrap();
        assert!(forced.lines().nth(3).unwrap().ends_with("V3000"));
    }

    #[test]
    fn missing_conformer_reads_back_as_zero_coordinates() {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(Element::N));
        mol.add_atom(Atom::new(Element::N));
        mol.add_bond(Bond::new(0, 1, BondOrder::Triple)).unwrap();

        let text = render_text(&mol, None, true, false, None).unwrap();
        assert!(text.lines().nth(1).unwrap().trim_end().ends_with("sdforge"));
        for line in text.lines().skip(4).take(2) {
            let coords: Vec<f64> = line[..30]
                .split_whitespace()
                .map(|v| v.parse().unwrap())
                .collect();
            assert_eq!(coords, [0.0, 0.0, 0.0]);
        }
        assert!(read_one(&text).conformers().is_empty());
    }

    #[test]
    fn streamed_file_reads_back_every_record() {
        let mut writer = SdWriter::new(Vec::new());
        let mol = acetate();
        let mut unnamed = acetate();
        unnamed.name = None;
        writer.write(&mol, None).unwrap();
        writer.write(&unnamed, None).unwrap();
        writer.write(&mol, None).unwrap();

        let data = writer.into_inner().unwrap();
        let parsed = read(Cursor::new(data)).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1].name.as_deref(), Some("1"));
        assert_isomorphic(&mol, &parsed[2]);
    }

    #[test]
    fn truncated_record_is_rejected() {
        let text = render_text(&acetate(), None, true, false, None).unwrap();
        let cut = &text[..text.len() - 5];
        assert!(matches!(
            read(Cursor::new(cut.as_bytes())),
            Err(Error::Parse { format: Format::Sdf, .. })
        ));
    }
}
