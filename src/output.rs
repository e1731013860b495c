//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Describe
//!
//! ```text
//! Focus 0.28, -0.33
//!     Size: 2400x1400
//!     Fit: cover
//!     Blurhash: LEHV6nWB2yk8pyo0adR*.7kCMdnj
//! ```
//!
//! ## Shift
//!
//! ```text
//! object-fit: cover;
//! object-position: 83.6% 50%;
//! ```
//!
//! ## Stamp
//!
//! ```text
//! 001 photos/dawn.jpg (2400x1400)
//!     Focus: WzEsMCwwLDI0MDAsMTQwMCwxLCJMRUhWNm5XQjJ5azhweW8wYWRSKi43a0NNZG5qIl0
//! 002 photos/broken.png
//!     Error: failed to decode photos/broken.png: ...
//!
//! Stamped 1 of 2 images
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::codec;
use crate::focus::FocusDescriptor;
use crate::stamp::Stamped;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable summary of a descriptor.
pub fn format_descriptor(focus: &FocusDescriptor) -> Vec<String> {
    let mut lines = vec![format!("Focus {}, {}", focus.x(), focus.y())];
    if focus.has_size() {
        lines.push(format!("{}Size: {}x{}", indent(1), focus.width, focus.height));
    } else {
        lines.push(format!("{}Size: unknown", indent(1)));
    }
    lines.push(format!("{}Fit: {}", indent(1), focus.fit));
    if let Some(hash) = &focus.blurhash {
        lines.push(format!("{}Blurhash: {}", indent(1), hash));
    }
    lines
}

pub fn print_descriptor(focus: &FocusDescriptor) {
    for line in format_descriptor(focus) {
        println!("{}", line);
    }
}

/// One `property: value;` line per declaration. Empty values are skipped.
pub fn format_declarations(declarations: &[(&str, String)]) -> Vec<String> {
    declarations
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(property, value)| format!("{property}: {value};"))
        .collect()
}

pub fn print_declarations(declarations: &[(&str, String)]) {
    for line in format_declarations(declarations) {
        println!("{}", line);
    }
}

/// Per-file stamp results followed by a summary line.
pub fn format_stamp_output(results: &[Stamped]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut ok = 0;
    for (i, stamped) in results.iter().enumerate() {
        let path = stamped.path.display();
        match &stamped.result {
            Ok(focus) => {
                ok += 1;
                lines.push(format!(
                    "{} {} ({}x{})",
                    format_index(i + 1),
                    path,
                    focus.width,
                    focus.height
                ));
                lines.push(format!("{}Focus: {}", indent(1), codec::encode(focus)));
            }
            Err(e) => {
                lines.push(format!("{} {}", format_index(i + 1), path));
                lines.push(format!("{}Error: {}", indent(1), e));
            }
        }
    }
    lines.push(String::new());
    lines.push(format!("Stamped {} of {} images", ok, results.len()));
    lines
}

pub fn print_stamp_output(results: &[Stamped]) {
    for line in format_stamp_output(results) {
        println!("{}", line);
    }
}
