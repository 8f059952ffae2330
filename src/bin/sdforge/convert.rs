use anyhow::{Context, Result, bail};

use sdforge::io::{PropertyFilter, SdWriter, WriterConfig, mol2};

use crate::cli::Cli;
use crate::config::build_writer_config;
use crate::display::{Context as DisplayContext, Progress};
use crate::io::{create_output, open_input, stdin_is_tty};
use crate::util::text::truncate;

const TOTAL_STEPS: u8 = 2;

pub fn run(cli: Cli, ctx: DisplayContext) -> Result<()> {
    if cli.input.is_none() && stdin_is_tty() {
        bail!(
            "No input file specified and stdin is a terminal.\n\nUsage: sdforge -i <INPUT> or pipe MOL2 data via stdin."
        );
    }

    let config = build_writer_config(&cli)?;
    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading MOL2 input");
    let input = open_input(cli.input.as_deref())?;
    let molecules = mol2::read(input).context("Failed to read MOL2 input")?;
    let atoms: usize = molecules.iter().map(|m| m.atom_count()).sum();
    tracing::info!(molecules = molecules.len(), atoms, "read MOL2 input");
    progress.complete_step(
        "Reading MOL2 input",
        &[format!("{} molecules, {} atoms", molecules.len(), atoms).as_str()],
    );

    progress.step("Writing SD records");
    let output = create_output(cli.output.as_deref())?;
    let mut writer = SdWriter::new(output).with_config(config.clone());
    for (i, mol) in molecules.iter().enumerate() {
        let name = mol.name.as_deref().unwrap_or("unnamed");
        progress.record(i + 1, &truncate(name, 24));
        writer
            .write(mol, None)
            .with_context(|| format!("Failed to write molecule {} ({})", i + 1, name))?;
    }
    writer.close().context("Failed to finalize SD output")?;
    let written = writer.num_mols();
    tracing::info!(records = written, "wrote SD output");

    let substeps = build_write_substeps(&config);
    let substeps_ref: Vec<&str> = substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Writing SD records", &substeps_ref);

    progress.finish(&format!("Wrote {} records", written));

    Ok(())
}

fn build_write_substeps(config: &WriterConfig) -> Vec<String> {
    let mut steps = Vec::new();

    steps.push(if config.kekulize {
        "Kekulize aromatic bonds".to_string()
    } else {
        "Keep aromatic bonds".to_string()
    });

    steps.push(match &config.props {
        PropertyFilter::AllPublic => "Export all public properties".to_string(),
        PropertyFilter::Names(names) => format!("Export properties: {}", names.join(", ")),
    });

    steps.push(if config.force_v3000 {
        "V3000 connection tables".to_string()
    } else {
        "V2000 connection tables (V3000 when too large)".to_string()
    });

    steps
}
