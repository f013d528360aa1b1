//! Stage 2: line breaks before always-split headers

use crate::catalog::tables::headers::content_start;
use crate::catalog::{PatternCatalog, SplitPolicy};
use crate::domain::buffer::{Lines, WorkingBuffer};
use crate::domain::guard::guarded;

/// Break before every mid-line Axis or discharge header
///
/// Content stays on the header's line. Lines without such headers pass
/// through unchanged.
pub(crate) fn split_on_headers(
    catalog: &PatternCatalog,
    buffer: WorkingBuffer,
    skipped: &mut Vec<String>,
) -> WorkingBuffer {
    let headers = catalog.headers();
    buffer.flat_map_lines(|line| {
        let floor = content_start(line);
        let breaks: Vec<_> = headers
            .find_all(line)
            .into_iter()
            .filter(|found| found.entry.split == SplitPolicy::Always && found.start > floor)
            .collect();

        let Some(first) = breaks.first() else {
            let mut lines = Lines::new();
            lines.push(line.to_string());
            return lines;
        };

        let rule_id = format!("header.{}", first.entry.id);
        let offsets: Vec<usize> = breaks.iter().map(|found| found.start).collect();
        guarded(&rule_id, line, skipped, |text| break_before(text, &offsets))
    })
}

/// Split `line` at each byte offset, dropping blank pieces
fn break_before(line: &str, offsets: &[usize]) -> Lines {
    let mut lines = Lines::new();
    let mut cursor = 0;
    for &offset in offsets.iter().chain(std::iter::once(&line.len())) {
        let piece = line[cursor..offset].trim_end();
        if !piece.trim_start().is_empty() {
            lines.push(piece.to_string());
        }
        cursor = offset;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        let catalog = PatternCatalog::builtin().unwrap();
        let mut skipped = Vec::new();
        split_on_headers(&catalog, WorkingBuffer::from_text(text), &mut skipped).into_lines()
    }

    #[test]
    fn test_each_axis_starts_a_line() {
        assert_eq!(
            split("Diagnoses: Axis I: MDD, Bereavement Axis II: Deferred Axis III: Diabetes"),
            [
                "Diagnoses:",
                "Axis I: MDD, Bereavement",
                "Axis II: Deferred",
                "Axis III: Diabetes"
            ]
        );
    }

    #[test]
    fn test_discharge_headers_start_lines() {
        assert_eq!(
            split("PREADMISSION DIAGNOSIS: MDD DISCHARGE DIAGNOSIS: MDD, improved"),
            ["PREADMISSION DIAGNOSIS: MDD", "DISCHARGE DIAGNOSIS: MDD, improved"]
        );
    }

    #[test]
    fn test_dense_only_headers_are_not_split() {
        assert_eq!(
            split("Seen today. Plan: follow up"),
            ["Seen today. Plan: follow up"]
        );
    }

    #[test]
    fn test_header_at_line_start_is_kept() {
        assert_eq!(split("  Axis IV: moderate"), ["  Axis IV: moderate"]);
    }
}
