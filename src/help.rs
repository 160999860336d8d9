//! Help and version text.

use std::fmt::Write;

use crate::args::flag_registry;

pub fn render_help(program: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Name:");
    let _ = writeln!(out, "\t{program} - Execute code in many languages with Docker!");
    let _ = writeln!(out);
    let _ = writeln!(out, "Usage:");
    let _ = writeln!(out, "\t{program} [options] <source files...>");
    let _ = writeln!(out, "\t<code> | {program} [options] --extension <extension>");
    let _ = writeln!(out);
    let _ = writeln!(out, "Options:");
    for def in flag_registry() {
        let _ = writeln!(out, "\t{:<36}{}", def.usage(), def.description);
    }
    out
}

pub fn render_version(program: &str) -> String {
    format!("{} {}", program, env!("CARGO_PKG_VERSION"))
}
