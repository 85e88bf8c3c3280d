//! Parse command implementation.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use quasar_ir::Circuit;
use quasar_qasm2::{ParseError, ParserConfig, SourceLocation, parse_with_config};

use crate::OutputFormat;
use crate::resolver::SearchPathResolver;

/// Execute the parse command.
pub fn execute(
    input: &Path,
    include_dirs: &[PathBuf],
    format: OutputFormat,
    builtin_qelib1: bool,
) -> Result<()> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("Failed to read file: {}", input.display()))?;

    let config = build_config(input, include_dirs, builtin_qelib1);
    let circuit = load_circuit(input, &source, &config)?;

    match format {
        OutputFormat::Summary => print_summary(input, &circuit),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&circuit)
                .context("Failed to serialize circuit")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Includes are looked up next to the input file first, then in the
/// configured directories.
fn build_config(input: &Path, include_dirs: &[PathBuf], builtin_qelib1: bool) -> ParserConfig {
    let mut search_path = Vec::with_capacity(include_dirs.len() + 1);
    if let Some(parent) = input.parent() {
        search_path.push(parent.to_path_buf());
    }
    search_path.extend(include_dirs.iter().cloned());

    let config = ParserConfig::new().with_resolver(SearchPathResolver::new(search_path));
    if builtin_qelib1 {
        config
    } else {
        config.without_builtin_qelib1()
    }
}

/// Parse, reporting failures as `file:line:column`.
fn load_circuit(input: &Path, source: &str, config: &ParserConfig) -> Result<Circuit> {
    let circuit =
        parse_with_config(source, config).map_err(|e| located(input, source, config, &e))?;
    info!(
        file = %input.display(),
        qubits = circuit.num_qubits(),
        instructions = circuit.len(),
        "parsed"
    );
    Ok(circuit)
}

/// Errors inside included files are reported at their position in that
/// file, followed by the chain of includes that led there.
fn located(input: &Path, source: &str, config: &ParserConfig, error: &ParseError) -> anyhow::Error {
    let mut file = input.display().to_string();
    let mut text = Cow::Borrowed(source);
    let mut error = error;
    let mut included_from = Vec::new();

    while let ParseError::InInclude {
        path,
        span,
        error: inner,
    } = error
    {
        let Some(content) = config.resolve_include(path) else {
            break;
        };
        included_from.push(format!("{file}:{}", SourceLocation::locate(&text, span.start)));
        file.clone_from(path);
        text = content;
        error = inner.as_ref();
    }

    let location = SourceLocation::locate(&text, error.span().start);
    let mut message = format!("{file}:{location}: {error}");
    for site in included_from.iter().rev() {
        message.push_str("\n  included from ");
        message.push_str(site);
    }
    anyhow::anyhow!(message)
}

fn print_summary(input: &Path, circuit: &Circuit) {
    println!(
        "{} Parsed {}",
        style("✓").green().bold(),
        style(input.display()).green()
    );
    println!("  Qubits:         {}", circuit.num_qubits());
    println!("  Classical bits: {}", circuit.num_clbits());
    println!("  Instructions:   {}", circuit.len());

    let mut ops: Vec<_> = circuit.count_ops().into_iter().collect();
    ops.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (name, count) in ops {
        println!("    {:<10} {}", style(name).cyan(), count);
    }
}
