use std::io::Write;

use anyhow::Result;

use crate::args::Command;
use crate::session::{DirectorySession, Entry};

/// Runs `command` against `session`, writing its report to `out`.
pub fn run(session: &dyn DirectorySession, command: &Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Ls { path, classes } => ls(session, path, classes, out),
        Command::Tree {
            path,
            depth,
            classes,
        } => {
            writeln!(out, "{path}")?;
            tree(session, path, classes, *depth, 1, out)
        }
        Command::Members { group } => members(session, group, out),
        Command::Show { path, properties } => show(session, path, properties, out),
        Command::Namespaces => namespaces(session, out),
    }
}

fn ls(session: &dyn DirectorySession, path: &str, classes: &[String], out: &mut dyn Write) -> Result<()> {
    let entries = session.list(path, classes)?;
    tracing::info!(path, count = entries.len(), "ls completed");
    for entry in &entries {
        writeln!(out, "{:<24} {:<32} {}", entry.class, entry.name, entry.path)?;
    }
    Ok(())
}

fn tree(
    session: &dyn DirectorySession,
    path: &str,
    classes: &[String],
    depth: usize,
    level: usize,
    out: &mut dyn Write,
) -> Result<()> {
    if level > depth {
        return Ok(());
    }
    // Unfiltered so that containers of other classes are still walked.
    let entries = session.list(path, &[])?;
    for entry in &entries {
        if classes.is_empty() || classes.contains(&entry.class) {
            writeln!(out, "{}{} ({})", "  ".repeat(level), entry.name, entry.class)?;
        }
        if level < depth {
            if let Err(e) = tree(session, &entry.path, classes, depth, level + 1, out) {
                tracing::debug!(path = %entry.path, error = %e, "not descending");
            }
        }
    }
    Ok(())
}

fn members(session: &dyn DirectorySession, group: &str, out: &mut dyn Write) -> Result<()> {
    let entries = session.members(group)?;
    if entries.is_empty() {
        writeln!(out, "(no members)")?;
    }
    for Entry { class, path, .. } in &entries {
        writeln!(out, "{class:<24} {path}")?;
    }
    Ok(())
}

fn show(
    session: &dyn DirectorySession,
    path: &str,
    properties: &[String],
    out: &mut dyn Write,
) -> Result<()> {
    let details = session.show(path, properties)?;
    let core = [
        ("name", &details.entry.name),
        ("class", &details.entry.class),
        ("path", &details.entry.path),
        ("guid", &details.guid),
        ("parent", &details.parent),
        ("schema", &details.schema),
    ];
    let width = core
        .iter()
        .map(|(label, _)| label.len())
        .chain(details.properties.iter().map(|(name, _)| name.len()))
        .max()
        .unwrap_or(0);

    for (label, value) in core {
        writeln!(out, "{label:<width$}  {value}")?;
    }
    for (name, values) in &details.properties {
        match values.as_deref() {
            None | Some([]) => writeln!(out, "{name:<width$}  <not set>")?,
            Some([first, rest @ ..]) => {
                writeln!(out, "{name:<width$}  {first}")?;
                for value in rest {
                    writeln!(out, "{:<width$}  {value}", "")?;
                }
            }
        }
    }
    Ok(())
}

fn namespaces(session: &dyn DirectorySession, out: &mut dyn Write) -> Result<()> {
    for entry in session.namespaces()? {
        writeln!(out, "{:<12} {}", entry.name, entry.path)?;
    }
    Ok(())
}
