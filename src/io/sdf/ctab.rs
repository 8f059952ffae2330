//! Structural block (connection table) encoder for V2000 and V3000 molfiles.

use crate::io::error::Error;
use crate::model::conformer::Conformer;
use crate::model::molecule::Molecule;
use std::io::Write;

/// Largest atom or bond count the three-column V2000 counts fields can hold.
pub const V2000_MAX_COUNT: usize = 999;

/// Widest line the CTfile header block allows.
pub const HEADER_LINE_WIDTH: usize = 80;

const PROGRAM: &str = "sdforge";
const V2000_COORD_WIDTH: usize = 10;
const V2000_CHARGE_RANGE: std::ops::RangeInclusive<i8> = -15..=15;
const V2000_MAX_MASS: u16 = 999;
const V3000_MAX_LINE: usize = 80;
const V30_PREFIX: &str = "M  V30 ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtabVersion {
    V2000,
    V3000,
}

/// Picks the block grammar for a molecule. V3000 is used when forced, when
/// either count exceeds the V2000 field capacity, or when a coordinate,
/// charge or mass number would overflow its fixed-width V2000 column.
pub fn select_version(
    mol: &Molecule,
    conformer: Option<&Conformer>,
    force_v3000: bool,
) -> CtabVersion {
    if force_v3000 {
        return CtabVersion::V3000;
    }
    if mol.atom_count() > V2000_MAX_COUNT || mol.bond_count() > V2000_MAX_COUNT {
        tracing::debug!(
            atoms = mol.atom_count(),
            bonds = mol.bond_count(),
            "counts exceed V2000 capacity, writing V3000"
        );
        return CtabVersion::V3000;
    }
    let overflows = conformer.is_some_and(|conf| {
        conf.positions
            .iter()
            .flatten()
            .any(|&v| format!("{:.4}", clean(v)).len() > V2000_COORD_WIDTH)
    });
    if overflows {
        tracing::debug!("coordinates exceed V2000 column width, writing V3000");
        return CtabVersion::V3000;
    }
    let out_of_range = mol.atoms().iter().any(|atom| {
        !V2000_CHARGE_RANGE.contains(&atom.formal_charge)
            || atom.isotope.is_some_and(|m| m > V2000_MAX_MASS)
    });
    if out_of_range {
        tracing::debug!("charge or mass number exceeds V2000 range, writing V3000");
        return CtabVersion::V3000;
    }
    CtabVersion::V2000
}

/// Writes the three header lines: name, program/dimension, and comment.
pub fn write_header<W: Write>(
    mut writer: W,
    name: &str,
    conformer: Option<&Conformer>,
) -> Result<(), Error> {
    let dimension = match conformer {
        Some(conf) if conf.is_3d => "3D",
        Some(_) => "2D",
        None => "",
    };
    writeln!(writer, "{}", name)?;
    writeln!(writer, "  {:>8}{:10}{}", PROGRAM, "", dimension)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_v2000<W: Write>(
    mut writer: W,
    mol: &Molecule,
    conformer: Option<&Conformer>,
) -> Result<(), Error> {
    writeln!(
        writer,
        "{:>3}{:>3}  0  0{:>3}  0  0  0  0  0999 V2000",
        mol.atom_count(),
        mol.bond_count(),
        u8::from(mol.chiral)
    )?;

    for (idx, atom) in mol.atoms().iter().enumerate() {
        let [x, y, z] = position(conformer, idx);
        write!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3}{:>2}{:>3}{:>3}",
            x,
            y,
            z,
            atom.element.symbol(),
            0,
            v2000_charge_code(atom.formal_charge),
            atom.parity.code()
        )?;
        writeln!(writer, "{}", "  0".repeat(9))?;
    }

    for bond in mol.bonds() {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}{:>3}  0  0  0",
            bond.i + 1,
            bond.j + 1,
            bond.order.ctfile_code(),
            bond.stereo.v2000_code()
        )?;
    }

    let charged: Vec<(usize, i32)> = mol
        .atoms()
        .iter()
        .enumerate()
        .filter(|(_, a)| a.formal_charge != 0)
        .map(|(i, a)| (i + 1, i32::from(a.formal_charge)))
        .collect();
    write_property_lines(&mut writer, "CHG", &charged)?;

    let labelled: Vec<(usize, i32)> = mol
        .atoms()
        .iter()
        .enumerate()
        .filter_map(|(i, a)| a.isotope.map(|m| (i + 1, i32::from(m))))
        .collect();
    write_property_lines(&mut writer, "ISO", &labelled)?;

    writeln!(writer, "M  END")?;
    Ok(())
}

pub fn write_v3000<W: Write>(
    mut writer: W,
    mol: &Molecule,
    conformer: Option<&Conformer>,
) -> Result<(), Error> {
    writeln!(writer, "  0  0  0     0  0            999 V3000")?;
    write_v30(&mut writer, "BEGIN CTAB")?;
    write_v30(
        &mut writer,
        &format!(
            "COUNTS {} {} 0 0 {}",
            mol.atom_count(),
            mol.bond_count(),
            u8::from(mol.chiral)
        ),
    )?;

    write_v30(&mut writer, "BEGIN ATOM")?;
    for (idx, atom) in mol.atoms().iter().enumerate() {
        let [x, y, z] = position(conformer, idx);
        let mut line = format!(
            "{} {} {:.4} {:.4} {:.4} 0",
            idx + 1,
            atom.element.symbol(),
            x,
            y,
            z
        );
        if atom.formal_charge != 0 {
            line.push_str(&format!(" CHG={}", atom.formal_charge));
        }
        if let Some(mass) = atom.isotope {
            line.push_str(&format!(" MASS={}", mass));
        }
        let parity = atom.parity.code();
        if parity != 0 {
            line.push_str(&format!(" CFG={}", parity));
        }
        write_v30(&mut writer, &line)?;
    }
    write_v30(&mut writer, "END ATOM")?;

    if mol.bond_count() > 0 {
        write_v30(&mut writer, "BEGIN BOND")?;
        for (idx, bond) in mol.bonds().iter().enumerate() {
            let mut line = format!(
                "{} {} {} {}",
                idx + 1,
                bond.order.ctfile_code(),
                bond.i + 1,
                bond.j + 1
            );
            if let Some(cfg) = bond.stereo.v3000_code() {
                line.push_str(&format!(" CFG={}", cfg));
            }
            write_v30(&mut writer, &line)?;
        }
        write_v30(&mut writer, "END BOND")?;
    }

    write_v30(&mut writer, "END CTAB")?;
    writeln!(writer, "M  END")?;
    Ok(())
}

fn position(conformer: Option<&Conformer>, atom: usize) -> [f64; 3] {
    conformer
        .and_then(|conf| conf.position(atom))
        .unwrap_or([0.0; 3])
        .map(clean)
}

/// Collapses values that print as zero to `+0.0` so `-0.0000` never appears.
fn clean(v: f64) -> f64 {
    if v.abs() < 5e-5 { 0.0 } else { v }
}

fn v2000_charge_code(charge: i8) -> u8 {
    match charge {
        3 => 1,
        2 => 2,
        1 => 3,
        -1 => 5,
        -2 => 6,
        -3 => 7,
        _ => 0,
    }
}

fn write_property_lines<W: Write>(
    writer: &mut W,
    tag: &str,
    entries: &[(usize, i32)],
) -> Result<(), Error> {
    for chunk in entries.chunks(8) {
        write!(writer, "M  {}{:>3}", tag, chunk.len())?;
        for (atom, value) in chunk {
            write!(writer, " {:>3} {:>3}", atom, value)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes one V3000 line, continuing with a trailing `-` when the content
/// does not fit in 80 columns.
fn write_v30<W: Write>(writer: &mut W, content: &str) -> Result<(), Error> {
    let room = V3000_MAX_LINE - V30_PREFIX.len();
    let mut rest = content;
    while rest.len() > room {
        let (head, tail) = rest.split_at(room - 1);
        writeln!(writer, "{}{}-", V30_PREFIX, head)?;
        rest = tail;
    }
    writeln!(writer, "{}{}", V30_PREFIX, rest)?;
    Ok(())
}
