//! Tripos MOL2 input for the command-line tool.

use crate::io::{Format, error::Error, util};
use crate::model::{
    atom::Atom,
    conformer::Conformer,
    molecule::{Bond, Molecule},
    types::BondOrder,
};
use std::collections::HashMap;
use std::io::BufRead;

type Lines = [(usize, String)];

/// Reads every `@<TRIPOS>MOLECULE` entry in the stream. Each molecule gets
/// its name from the entry header and one 3D conformer from the ATOM section.
pub fn read<R: BufRead>(reader: R) -> Result<Vec<Molecule>, Error> {
    let lines = collect_lines(reader)?;

    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, (_, line))| is_section(line, "@<TRIPOS>MOLECULE"))
        .map(|(i, _)| i)
        .collect();
    if starts.is_empty() {
        return Err(Error::parse(
            Format::Mol2,
            1,
            "missing @<TRIPOS>MOLECULE section",
        ));
    }

    starts
        .iter()
        .enumerate()
        .map(|(k, &start)| {
            let end = starts.get(k + 1).copied().unwrap_or(lines.len());
            read_molecule(&lines[start..end])
        })
        .collect()
}

fn read_molecule(lines: &Lines) -> Result<Molecule, Error> {
    let header_ln = lines[0].0;
    let mut cursor = 1;
    let name = lines
        .get(cursor)
        .map(|(_, l)| l.trim().to_string())
        .unwrap_or_default();
    cursor += 1;

    let (count_line_no, count_line) = next_data_line(lines, &mut cursor)
        .ok_or_else(|| Error::parse(Format::Mol2, header_ln + 2, "missing counts line"))?;
    let (atom_count, bond_count) = parse_counts(&count_line, count_line_no)?;

    let atom_section = find_section(lines, "@<TRIPOS>ATOM").ok_or_else(|| {
        Error::parse(Format::Mol2, count_line_no, "missing @<TRIPOS>ATOM section")
    })?;
    let bond_section = find_section(lines, "@<TRIPOS>BOND");
    let atom_end = next_section(lines, atom_section + 1);

    let (mut atoms, positions, id_map, types) =
        parse_atoms(lines, atom_section + 1, atom_end, atom_count)?;
    let mut bonds = match bond_section {
        Some(section) => parse_bonds(lines, section + 1, bond_count, &id_map)?,
        None if bond_count == 0 => Vec::new(),
        None => {
            return Err(Error::parse(
                Format::Mol2,
                count_line_no,
                "missing @<TRIPOS>BOND section",
            ));
        }
    };
    localize_co2_groups(&mut atoms, &types, &mut bonds);

    let mut mol = Molecule::new();
    if !name.is_empty() && name != "*****" {
        mol.name = Some(name);
    }
    for atom in atoms {
        mol.add_atom(atom);
    }
    for (ln, bond) in bonds {
        mol.add_bond(bond)
            .map_err(|e| Error::parse(Format::Mol2, ln, e.to_string()))?;
    }
    mol.add_conformer(Conformer::new_3d(0, positions))
        .map_err(|e| Error::parse(Format::Mol2, header_ln, e.to_string()))?;
    Ok(mol)
}

fn collect_lines<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, Error> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|v| (i + 1, v)).map_err(Error::from))
        .collect()
}

fn is_section(line: &str, name: &str) -> bool {
    line.trim().eq_ignore_ascii_case(name)
}

fn find_section(lines: &Lines, name: &str) -> Option<usize> {
    lines.iter().position(|(_, line)| is_section(line, name))
}

fn next_section(lines: &Lines, from: usize) -> usize {
    lines[from.min(lines.len())..]
        .iter()
        .position(|(_, line)| line.trim_start().starts_with("@<TRIPOS>"))
        .map_or(lines.len(), |offset| from + offset)
}

fn next_data_line(lines: &Lines, cursor: &mut usize) -> Option<(usize, String)> {
    while *cursor < lines.len() {
        let (ln, content) = &lines[*cursor];
        *cursor += 1;
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Some((*ln, content.clone()));
    }
    None
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    let parts: Vec<_> = line.split_whitespace().collect();
    let atoms = parts
        .first()
        .and_then(|v| v.parse::<usize>().ok())
        .ok_or_else(|| Error::parse(Format::Mol2, line_no, "invalid atom count in counts line"))?;
    let bonds = match parts.get(1) {
        Some(v) => v.parse::<usize>().map_err(|_| {
            Error::parse(Format::Mol2, line_no, "invalid bond count in counts line")
        })?,
        None => 0,
    };
    Ok((atoms, bonds))
}

type ParsedAtoms = (
    Vec<Atom>,
    Vec<[f64; 3]>,
    HashMap<usize, usize>,
    Vec<String>,
);

fn parse_atoms(
    lines: &Lines,
    start: usize,
    end: usize,
    expected: usize,
) -> Result<ParsedAtoms, Error> {
    let mut atoms = Vec::with_capacity(expected);
    let mut positions = Vec::with_capacity(expected);
    let mut id_map = HashMap::with_capacity(expected);
    let mut types = Vec::with_capacity(expected);

    let data = lines[start.min(end)..end]
        .iter()
        .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'));
    for (ln, raw) in data.take(expected) {
        let parts: Vec<_> = raw.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(Error::parse(Format::Mol2, *ln, "invalid ATOM line"));
        }

        let atom_id = parts[0]
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Mol2, *ln, "invalid atom id in ATOM line"))?;
        let mut xyz = [0.0; 3];
        for (k, axis) in ["x", "y", "z"].iter().enumerate() {
            xyz[k] = parts[2 + k].parse::<f64>().map_err(|_| {
                Error::parse(
                    Format::Mol2,
                    *ln,
                    format!("invalid {axis} coordinate in ATOM line"),
                )
            })?;
        }

        let element = util::guess_element_symbol(parts[5])
            .or_else(|| util::guess_element_symbol(parts[1]))
            .ok_or_else(|| Error::parse(Format::Mol2, *ln, "unable to infer element"))?;

        if id_map.insert(atom_id, atoms.len()).is_some() {
            return Err(Error::parse(Format::Mol2, *ln, "duplicate atom id"));
        }
        atoms.push(Atom::new(element));
        positions.push(xyz);
        types.push(parts[5].to_string());
    }

    if atoms.len() < expected {
        return Err(Error::parse(
            Format::Mol2,
            lines.get(end.saturating_sub(1)).map_or(0, |(ln, _)| *ln),
            "ATOM section ended before expected atom count",
        ));
    }

    Ok((atoms, positions, id_map, types))
}

fn parse_bonds(
    lines: &Lines,
    start: usize,
    expected: usize,
    id_map: &HashMap<usize, usize>,
) -> Result<Vec<(usize, Bond)>, Error> {
    let mut bonds = Vec::with_capacity(expected);
    let end = next_section(lines, start);

    let data = lines[start.min(end)..end]
        .iter()
        .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'));
    for (ln, raw) in data.take(expected) {
        let parts: Vec<_> = raw.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(Error::parse(Format::Mol2, *ln, "invalid BOND line"));
        }

        let lookup = |token: &str| -> Result<usize, Error> {
            token
                .parse::<usize>()
                .ok()
                .and_then(|id| id_map.get(&id).copied())
                .ok_or_else(|| Error::parse(Format::Mol2, *ln, "bond references unknown atom id"))
        };
        let i = lookup(parts[1])?;
        let j = lookup(parts[2])?;

        let order = util::bond_order_from_mol2(parts[3])
            .ok_or_else(|| Error::parse(Format::Mol2, *ln, "unsupported bond type in BOND line"))?;

        bonds.push((*ln, Bond::new(i, j, order)));
    }

    if bonds.len() < expected {
        return Err(Error::parse(
            Format::Mol2,
            lines.get(end.saturating_sub(1)).map_or(0, |(ln, _)| *ln),
            "BOND section ended before expected bond count",
        ));
    }

    Ok(bonds)
}

/// SYBYL types carboxylate (and phosphate, sulfonate) oxygens as `O.co2`
/// joined to their centre by `ar` bonds. Each centre keeps one double bond;
/// its other `O.co2` partners become single bonds, and terminal ones carry
/// the -1 charge.
fn localize_co2_groups(atoms: &mut [Atom], types: &[String], bonds: &mut [(usize, Bond)]) {
    let is_co2 = |idx: usize| types[idx].eq_ignore_ascii_case("O.co2");

    let mut degree = vec![0usize; atoms.len()];
    for (_, bond) in bonds.iter() {
        degree[bond.i] += 1;
        degree[bond.j] += 1;
    }

    let mut has_double = vec![false; atoms.len()];
    for (_, bond) in bonds.iter_mut() {
        if bond.order != BondOrder::Aromatic {
            continue;
        }
        let (centre, oxygen) = match (is_co2(bond.i), is_co2(bond.j)) {
            (false, true) => (bond.i, bond.j),
            (true, false) => (bond.j, bond.i),
            _ => continue,
        };
        if has_double[centre] {
            bond.order = BondOrder::Single;
            if degree[oxygen] == 1 {
                atoms[oxygen].formal_charge = -1;
            }
        } else {
            bond.order = BondOrder::Double;
            has_double[centre] = true;
        }
    }
}
