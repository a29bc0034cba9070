//! Diagnostic and value rendering for the terminal.

use std::io::{self, IsTerminal, Write};

use vesper_core::text::SourceText;
use vesper_diagnostics::{Diagnostic, DiagnosticCategory};

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Write diagnostics to stderr with their source line and a caret underline.
pub fn print_diagnostics(source: &SourceText, diagnostics: &[Diagnostic]) {
    let stderr = io::stderr();
    let color = stderr.is_terminal();
    let mut out = stderr.lock();
    for diagnostic in diagnostics {
        let _ = write_diagnostic(&mut out, source, diagnostic, color);
    }
}

fn write_diagnostic(
    out: &mut impl Write,
    source: &SourceText,
    diagnostic: &Diagnostic,
    color: bool,
) -> io::Result<()> {
    let (tint, label) = match diagnostic.category {
        DiagnosticCategory::Error => (RED, "error"),
        DiagnosticCategory::Warning => (YELLOW, "warning"),
    };
    let (tint, blue, bold, reset) = if color {
        (tint, BLUE, BOLD, RESET)
    } else {
        ("", "", "", "")
    };

    let position = source.line_column_of(diagnostic.span.start);
    writeln!(
        out,
        "{bold}{tint}{label} V{:04}{reset}{bold}: {}{reset}",
        diagnostic.code, diagnostic.message_text
    )?;
    writeln!(
        out,
        "  {blue}-->{reset} {}:{}:{}",
        source.file_name(),
        position.line + 1,
        position.column + 1
    )?;

    let line_map = source.line_map();
    let line_start = line_map.line_start(position.line);
    let line_text: &str = source
        .text()
        .get(line_start as usize..)
        .map(|rest| rest.lines().next().unwrap_or(""))
        .unwrap_or("");
    writeln!(out, "   {blue}|{reset} {}", line_text)?;

    let offset = (diagnostic.span.start - line_start) as usize;
    let width = (diagnostic.span.length as usize).max(1).min(
        line_text.len().saturating_sub(offset).max(1),
    );
    writeln!(
        out,
        "   {blue}|{reset} {:offset$}{tint}{}{reset}",
        "",
        "^".repeat(width),
        offset = offset
    )?;
    writeln!(out)
}
