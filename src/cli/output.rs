//! User-facing output for the CLI.
//!
//! Summaries are colorized through termcolor; errors go through miette so
//! they carry their diagnostic code and help line.

use std::io::{self, Write};

use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::diagnostics::CompileError;
use crate::document::ProjectDocument;

/// Prints a one-screen summary of a compiled document. `blocks` is the
/// number of script blocks it holds.
pub fn print_summary(source: &str, document: &ProjectDocument, blocks: usize) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(stdout, "ok")?;
    stdout.reset()?;
    writeln!(
        stdout,
        " {} ({})",
        source,
        document.name.as_deref().unwrap_or("unnamed project")
    )?;

    count_line(&mut stdout, "scenes", document.scenes.len())?;
    count_line(&mut stdout, "objects", document.objects.len())?;
    count_line(&mut stdout, "variables", document.variables.len())?;
    count_line(&mut stdout, "messages", document.messages.len())?;
    count_line(&mut stdout, "functions", document.functions.len())?;
    count_line(&mut stdout, "script blocks", blocks)?;

    for object in &document.objects {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(stdout, "  {}", object.name)?;
        stdout.reset()?;
        writeln!(
            stdout,
            " [{}] {} pictures, {} sounds",
            object.id,
            object.sprite.pictures.len(),
            object.sprite.sounds.len()
        )?;
    }
    Ok(())
}

/// Prints a tree outline as-is.
pub fn print_outline(outline: &str) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    write!(stdout, "{outline}")?;
    stdout.flush()
}

/// Renders a compile error to stderr.
pub fn print_error(error: CompileError) {
    eprintln!("{:?}", Report::new(error));
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn count_line(stdout: &mut StandardStream, label: &str, count: usize) -> io::Result<()> {
    stdout.set_color(ColorSpec::new().set_bold(true))?;
    write!(stdout, "{count:>5}")?;
    stdout.reset()?;
    writeln!(stdout, " {label}")
}
