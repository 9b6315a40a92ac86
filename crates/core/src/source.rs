//! Source text extraction.
//!
//! Method bodies are located with a declaration regex followed by
//! brace-depth counting. Braces inside string literals or comments are
//! counted like any other brace, so a body containing `'{'` will be cut
//! short or run long. A body whose closing brace is never found runs to
//! the end of the source, last character included.

use regex::Regex;
use std::fs;
use std::path::Path;

/// Return the text strictly between a method's opening and closing braces.
pub fn extract_method_body<'a>(source: &'a str, method_name: &str) -> Option<&'a str> {
    let pattern = format!(
        r"function\s+{}\s*\([^)]*\)(?:\s*:\s*[^{{]+)?\s*\{{",
        regex::escape(method_name)
    );
    let declaration = Regex::new(&pattern).ok()?.find(source)?;

    let start = declaration.end();
    let mut depth = 1usize;
    let mut end = source.len();

    for (offset, byte) in source.as_bytes()[start..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    end = start + offset;
                    break;
                }
            }
            _ => {}
        }
    }

    Some(&source[start..end])
}

/// Read `path` and extract the body of `method_name`.
pub fn read_method_body(path: &Path, method_name: &str) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    extract_method_body(&content, method_name).map(str::to_string)
}

/// Read lines `start..=end` (1-based) of a file, keeping line terminators.
pub fn read_line_span(path: &Path, start: usize, end: usize) -> Option<String> {
    if start == 0 || end < start {
        return None;
    }
    let content = fs::read_to_string(path).ok()?;
    let span: String = content
        .split_inclusive('\n')
        .skip(start - 1)
        .take(end - start + 1)
        .collect();
    if span.is_empty() { None } else { Some(span) }
}
