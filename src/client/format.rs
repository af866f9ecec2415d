//! Display formatting for streamed replies.

use regex::Regex;

/// Reformats accumulated reply text for display.
///
/// The completion provider emits numbered, bold-marked professor headers
/// ("1. **Dr. Euler**") followed by dash-bulleted detail lines; this strips
/// the markers into plain terminal-friendly text. The whole accumulated
/// reply is reformatted on every chunk, which keeps the output stable even
/// when a marker is split across chunk boundaries.
pub struct Formatter {
    header_regex: Regex,
    indent_regex: Regex,
}

impl Formatter {
    pub fn new() -> Self {
        Self {
            // A decimal number, a period, optional whitespace, then a
            // double-asterisk-delimited label.
            header_regex: Regex::new(r"\d+\.\s*\*\*[\w\s]+\*\*").expect("Invalid regex"),
            indent_regex: Regex::new(r"\n\s+").expect("Invalid regex"),
        }
    }

    /// Reformat accumulated content. Pure function of its input.
    pub fn format_content(&self, content: &str) -> String {
        let mut output = String::with_capacity(content.len());
        let mut cursor = 0;

        for header in self.header_regex.find_iter(content) {
            output.push_str(&self.format_section(&content[cursor..header.start()]));
            output.push_str("\n\n");
            output.push_str(header.as_str());
            output.push('\n');
            cursor = header.end();
        }
        output.push_str(&self.format_section(&content[cursor..]));

        output
    }

    /// Format the detail text between headers: list markers become bullet
    /// characters, remaining bold markers are stripped, and leading
    /// whitespace after newlines is collapsed.
    fn format_section(&self, section: &str) -> String {
        let replaced = section.replace("- **", "\n\u{2022} ").replace("**", "");
        self.indent_regex
            .replace_all(&replaced, "\n")
            .trim()
            .to_string()
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_function() {
        let formatter = Formatter::new();
        let input = "intro 1. **Professor Euler**\n- **Strengths:** clear lectures";
        assert_eq!(
            formatter.format_content(input),
            formatter.format_content(input)
        );
    }

    #[test]
    fn test_headers_are_isolated() {
        let formatter = Formatter::new();
        let output =
            formatter.format_content("Here are your matches: 1. **Professor Euler** details");
        assert!(output.contains("\n\n1. **Professor Euler**\n"));
        assert!(output.starts_with("Here are your matches:"));
    }

    #[test]
    fn test_list_markers_become_bullets() {
        let formatter = Formatter::new();
        let output =
            formatter.format_content("- **Strengths:** patient\n- **Drawbacks:** strict grader");
        assert!(output.contains("\u{2022} Strengths: patient"));
        assert!(output.contains("\u{2022} Drawbacks: strict grader"));
        assert!(!output.contains("**"));
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        let formatter = Formatter::new();
        assert_eq!(formatter.format_content("  hello  "), "hello");
        assert_eq!(formatter.format_content(""), "");
    }

    #[test]
    fn test_indent_collapse() {
        let formatter = Formatter::new();
        let output = formatter.format_content("line one\n    line two");
        assert_eq!(output, "line one\nline two");
    }

    #[test]
    fn test_partial_header_left_alone() {
        // A header split across chunk boundaries is not a match yet; the
        // next reformat over the fuller accumulator picks it up.
        let formatter = Formatter::new();
        let output = formatter.format_content("1. **Dr. Eu");
        assert!(output.contains("1. Dr. Eu"));
    }
}
