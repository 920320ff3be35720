//! Parsing of `cit <file> --list` output
//!
//! The tool prints a two-line header followed by one `name: details` line per
//! stored version. The header shape is assumed, not negotiated, so all of that
//! knowledge stays in this one function.

/// Header lines printed before the version records
const HEADER_LINES: usize = 2;

/// Extract version identifiers from the listing output
///
/// Blank lines are dropped first, then the header, then each remaining line
/// is cut at its first `:` and trimmed.
pub fn parse_version_listing(stdout: &str) -> Vec<String> {
    stdout
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .skip(HEADER_LINES)
        .map(|line| line.split(':').next().unwrap_or(line).trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_listing() {
        let output = "Versions of a.txt\n----------\nv1: created yesterday\n\nv2: created today\n";
        assert_eq!(parse_version_listing(output), vec!["v1", "v2"]);
    }

    #[test]
    fn test_header_only_listing_is_empty() {
        assert!(parse_version_listing("Versions of a.txt\n----------\n").is_empty());
        assert!(parse_version_listing("").is_empty());
    }

    #[test]
    fn test_only_text_before_first_colon_is_kept() {
        let output = "h1\nh2\n  release: 2024-01-01 10:00:00  \n";
        assert_eq!(parse_version_listing(output), vec!["release"]);
    }

    #[test]
    fn test_line_without_colon_is_used_whole() {
        let output = "h1\nh2\nplain\n";
        assert_eq!(parse_version_listing(output), vec!["plain"]);
    }

    #[test]
    fn test_crlf_output() {
        let output = "h1\r\nh2\r\nv1: a\r\nv2: b\r\n";
        assert_eq!(parse_version_listing(output), vec!["v1", "v2"]);
    }

    #[test]
    fn test_blank_lines_do_not_count_as_header() {
        let output = "\nh1\n\nh2\nv1: a\n";
        assert_eq!(parse_version_listing(output), vec!["v1"]);
    }

    #[test]
    fn test_empty_names_are_dropped() {
        let output = "h1\nh2\n: orphan details\nv1: a\n";
        assert_eq!(parse_version_listing(output), vec!["v1"]);
    }
}
