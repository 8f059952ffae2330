use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_sdf_hints(err);
        collector.collect_std_io_error(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_sdf_hints(&mut self, err: &Error) {
        use sdforge::io::{Error as IoError, Format};

        let Some(io_err) = err.chain().find_map(|e| e.downcast_ref::<IoError>()) else {
            return;
        };

        self.mark_typed();

        match io_err {
            IoError::Stream { source } => {
                self.collect_std_io_hints(source);
            }

            IoError::UseAfterClose => {
                self.add("The output was closed before all molecules were written");
                self.add("This indicates a bug — please report if reproducible");
            }

            IoError::ChemicalState(_) => {
                self.add("An aromatic ring has no valid alternating single/double bond pattern");
                self.add("Check the hydrogen count and charges on the ring atoms");
                self.add("Use --no-kekulize to write aromatic bonds (type 4) as they are");
            }

            IoError::Format { .. } => {
                self.add("SD records are line-oriented; names and values cannot span lines");
                self.add("Remove line breaks from the molecule name or property value");
                self.add("Property names cannot contain '<' or '>'");
            }

            IoError::ConformerNotFound(id) => {
                self.add(format!("No conformer with id {} exists on the molecule", id));
                self.add("Omit the conformer id to write the first conformer");
            }

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "Parser encountered an issue near line {} in {} format",
                    line, format
                ));
                self.add("Inspect the file around that line for malformed entries");
                if *format == Format::Mol2 {
                    self.add("MOL2: Verify @<TRIPOS>ATOM and @<TRIPOS>BOND sections");
                    self.add("MOL2: Check the atom and bond counts on the molecule header");
                }
            }

            IoError::Config(_) => {
                self.add("Writer config file has invalid TOML or unknown keys");
                self.add("Supported keys: props, kekulize, force-v3000");
            }
        }
    }

    fn collect_std_io_error(&mut self, err: &Error) {
        if self.has_typed_hints {
            return;
        }
        if let Some(source) = err.chain().find_map(|e| e.downcast_ref::<std::io::Error>()) {
            self.mark_typed();
            self.collect_std_io_hints(source);
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data");
                self.add("Verify the file is UTF-8 text and not truncated");
            }

            ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            ErrorKind::BrokenPipe => {
                self.add("Broken pipe — output consumer terminated");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdin") {
            self.add("Input appears to be from a terminal");
            self.add("Provide input via -i/--input or pipe data to stdin");
            return;
        }

        if msg.contains("no molecules") {
            self.add("Input appears to be empty");
            self.add("Verify the input contains @<TRIPOS>MOLECULE entries");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};
    use sdforge::io::{Error as IoError, Format};

    #[test]
    fn parse_errors_point_at_the_line() {
        let err = Error::new(IoError::parse(Format::Mol2, 14, "invalid ATOM line"));
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints[0].contains("line 14 in MOL2"));
    }

    #[test]
    fn wrapped_errors_are_found_in_the_chain() {
        let err = Err::<(), _>(IoError::format("property \"x\"", "value contains a line break"))
            .context("Failed to write molecule 3")
            .unwrap_err();
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints.iter().any(|h| h.contains("line breaks")));
    }

    #[test]
    fn terminal_input_gets_a_usage_hint() {
        let err = anyhow!("No input file specified and stdin is a terminal");
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints[1].contains("-i/--input"));
    }

    #[test]
    fn plain_errors_have_no_hints() {
        assert!(HintCollector::collect(&anyhow!("something else")).is_none());
    }
}
