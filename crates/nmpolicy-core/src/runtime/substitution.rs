// crates/nmpolicy-core/src/runtime/substitution.rs
// ============================================================================
// Module: Capture Substitution
// Description: Replacement of `{{ capture.<name> }}` placeholders in templates.
// Purpose: Embed resolved capture documents into the desired-state template.
// Dependencies: crate::{core, runtime::error}
// ============================================================================

//! ## Overview
//! A template references a capture with `{{ capture.<name> }}`; blanks inside
//! the braces are optional. `{{` not followed by `capture.` is ordinary text.
//! Scanning is byte-based, so templates need not be valid UTF-8 and a
//! template without references is returned byte-for-byte.
//!
//! A reference is replaced by the capture's resolved document minus its
//! trailing newline. Continuation lines are indented to the placeholder's
//! column so a placeholder alone on an indented line expands into a block at
//! that indentation. Text before the placeholder is not taken into account: a
//! multi-line capture behind `key: ` yields a first line that is not valid
//! YAML, so block captures belong on a line of their own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::CaptureName;
use crate::core::CaptureState;
use crate::core::StateDocument;
use crate::core::identifiers::is_name_byte;
use crate::runtime::error::GenerateError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Opening delimiter of a placeholder.
const OPEN: &[u8] = b"{{";
/// Closing delimiter of a placeholder.
const CLOSE: &[u8] = b"}}";
/// Namespace prefix that marks a placeholder as a capture reference.
const CAPTURE_PREFIX: &[u8] = b"capture.";
/// Maximum bytes of template text echoed back in an error.
const MAX_REFERENCE_ECHO: usize = 80;

// ============================================================================
// SECTION: References
// ============================================================================

/// A capture reference found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReference {
    /// Referenced capture.
    pub name: CaptureName,
    /// Byte offset of the opening `{{`.
    pub start: usize,
    /// Byte offset just past the closing `}}`.
    pub end: usize,
}

/// Finds every capture reference in a template, in order.
///
/// # Errors
///
/// Returns [`GenerateError::UnresolvedCaptureReference`] when a `{{ capture.`
/// sequence has no valid name or no closing `}}`.
pub fn find_capture_references(template: &[u8]) -> Result<Vec<CaptureReference>, GenerateError> {
    let mut references = Vec::new();
    let mut cursor = 0;

    while let Some(start) = find(template, cursor, OPEN) {
        let mut pos = skip_blanks(template, start + OPEN.len());
        if !template[pos ..].starts_with(CAPTURE_PREFIX) {
            cursor = start + 1;
            continue;
        }
        pos += CAPTURE_PREFIX.len();

        let name_start = pos;
        while template.get(pos).is_some_and(|&b| is_name_byte(b)) {
            pos += 1;
        }
        let name_end = pos;
        pos = skip_blanks(template, pos);

        if name_start == name_end || !template[pos ..].starts_with(CLOSE) {
            return Err(GenerateError::UnresolvedCaptureReference {
                reference: echo(template, start),
                position: start,
            });
        }
        let end = pos + CLOSE.len();
        references.push(CaptureReference {
            name: CaptureName::new(String::from_utf8_lossy(&template[name_start .. name_end])),
            start,
            end,
        });
        cursor = end;
    }
    Ok(references)
}

/// Replaces capture references in `template` with resolved capture documents.
///
/// # Errors
///
/// Returns [`GenerateError::UnresolvedCaptureReference`] for malformed
/// references and for references to captures absent from `captures`.
pub fn substitute_captures(
    template: &StateDocument,
    captures: &BTreeMap<CaptureName, CaptureState>,
) -> Result<StateDocument, GenerateError> {
    let bytes = template.as_bytes();
    let references = find_capture_references(bytes)?;
    if references.is_empty() {
        return Ok(template.clone());
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut last = 0;
    for reference in &references {
        let Some(capture) = captures.get(reference.name.as_str()) else {
            return Err(GenerateError::UnresolvedCaptureReference {
                reference: String::from_utf8_lossy(&bytes[reference.start .. reference.end])
                    .into_owned(),
                position: reference.start,
            });
        };
        out.extend_from_slice(&bytes[last .. reference.start]);
        let column = reference.start - line_start(bytes, reference.start);
        append_indented(&mut out, capture.state.as_bytes(), column);
        last = reference.end;
    }
    out.extend_from_slice(&bytes[last ..]);
    Ok(StateDocument::from(out))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Finds `needle` in `haystack` at or after `from`.
fn find(haystack: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    haystack
        .get(from ..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

/// Skips spaces and tabs.
fn skip_blanks(bytes: &[u8], mut pos: usize) -> usize {
    while matches!(bytes.get(pos), Some(b' ' | b'\t')) {
        pos += 1;
    }
    pos
}

/// Returns the offset of the first byte of the line containing `pos`.
fn line_start(bytes: &[u8], pos: usize) -> usize {
    bytes[.. pos].iter().rposition(|&b| b == b'\n').map_or(0, |newline| newline + 1)
}

/// Echoes the malformed reference starting at `start`, for diagnostics.
fn echo(bytes: &[u8], start: usize) -> String {
    let rest = &bytes[start ..];
    let line_end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
    let close_end =
        find(rest, 0, CLOSE).map_or(line_end, |close| (close + CLOSE.len()).min(line_end));
    let end = close_end.min(MAX_REFERENCE_ECHO);
    String::from_utf8_lossy(&rest[.. end]).into_owned()
}

/// Appends `content` without its trailing newline, indenting continuation
/// lines by `column` spaces.
fn append_indented(out: &mut Vec<u8>, content: &[u8], column: usize) {
    let mut content = content;
    while let Some(stripped) = content.strip_suffix(b"\n") {
        content = stripped.strip_suffix(b"\r").unwrap_or(stripped);
    }

    for (index, line) in content.split(|&b| b == b'\n').enumerate() {
        if index > 0 {
            out.push(b'\n');
            if !line.is_empty() {
                out.resize(out.len() + column, b' ');
            }
        }
        out.extend_from_slice(line);
    }
}
