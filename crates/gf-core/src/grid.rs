//! Row partitioning and span rebalancing for the 12-column grid.
//!
//! Rows are derived, never stored: a row is the maximal run of consecutive
//! elements whose resolved column spans fit in 12 columns at a given
//! breakpoint. Reflow after drag/drop and deletion goes through
//! [`rebalance_spans`], which always makes one row sum to exactly 12.

use crate::id::ElementId;
use crate::model::{Breakpoint, Element};

/// Total columns in the grid.
pub const GRID_COLUMNS: u8 = 12;

/// Partition `elements` into visual rows at `breakpoint`.
///
/// Lazy, finite, and restartable: the returned iterator borrows the list,
/// is `Clone`, and yields contiguous sub-slices in order. Empty input
/// yields nothing.
pub fn compute_rows(elements: &[Element], breakpoint: Breakpoint) -> Rows<'_> {
    Rows {
        rest: elements,
        breakpoint,
    }
}

/// Iterator over grid rows. See [`compute_rows`].
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    rest: &'a [Element],
    breakpoint: Breakpoint,
}

impl<'a> Iterator for Rows<'a> {
    type Item = &'a [Element];

    fn next(&mut self) -> Option<&'a [Element]> {
        if self.rest.is_empty() {
            return None;
        }

        let mut used = 0u32;
        let mut len = 0usize;
        for element in self.rest {
            let span = u32::from(element.resolved_span(self.breakpoint));
            // The first element always joins, even at full width; after
            // that the row closes as soon as it would overflow.
            if len > 0 && used + span > u32::from(GRID_COLUMNS) {
                break;
            }
            used += span;
            len += 1;
        }

        let (row, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(row)
    }
}

/// A span assigned to one element by [`rebalance_spans`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanAssignment {
    pub id: ElementId,
    pub span: u8,
}

/// Distribute the 12 columns evenly over `elements`.
///
/// Each element gets `floor(12 / N)`; the first `12 mod N` elements get
/// one extra, so the assigned spans always sum to exactly 12. The input
/// order decides who receives the remainder. Empty input yields an empty
/// mapping.
pub fn rebalance_spans(elements: &[&Element]) -> Vec<SpanAssignment> {
    if elements.is_empty() {
        return Vec::new();
    }

    let count = elements.len() as u8;
    let base = GRID_COLUMNS / count;
    let remainder = GRID_COLUMNS % count;

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| SpanAssignment {
            id: element.id,
            span: if (index as u8) < remainder { base + 1 } else { base },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ElementId;
    use crate::model::{Category, ElementKind};
    use pretty_assertions::assert_eq;

    fn spanned(id: &str, span: &str) -> Element {
        let mut el = Element::new(
            ElementId::intern(id),
            ElementKind::SingleLineInput,
            Category::LayoutParticipant,
        );
        el.properties.style.column_span = span.into();
        el
    }

    fn ids<'a>(rows: &[&'a [Element]]) -> Vec<Vec<&'a str>> {
        rows.iter()
            .map(|row| row.iter().map(|el| el.id.as_str()).collect())
            .collect()
    }

    #[test]
    fn rows_partition_by_span_arithmetic() {
        let elements = vec![
            spanned("a", "6"),
            spanned("b", "6"),
            spanned("c", "12"),
            spanned("d", "4"),
            spanned("e", "4"),
            spanned("f", "4"),
        ];
        let rows: Vec<&[Element]> = compute_rows(&elements, Breakpoint::Compact).collect();
        assert_eq!(
            ids(&rows),
            vec![vec!["a", "b"], vec!["c"], vec!["d", "e", "f"]]
        );
    }

    #[test]
    fn overflowing_element_opens_a_new_row() {
        let elements = vec![spanned("a", "8"), spanned("b", "8")];
        let rows: Vec<&[Element]> = compute_rows(&elements, Breakpoint::Compact).collect();
        assert_eq!(ids(&rows), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn non_numeric_span_defaults_to_full_width() {
        let elements = vec![spanned("a", "auto"), spanned("b", "3")];
        let rows: Vec<&[Element]> = compute_rows(&elements, Breakpoint::Compact).collect();
        assert_eq!(ids(&rows), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn rows_respect_breakpoint_overrides() {
        let mut a = spanned("a", "6");
        a.overrides
            .entry(Breakpoint::Medium)
            .or_default()
            .properties
            .style
            .column_span = Some("12".into());
        let b = spanned("b", "6");
        let elements = vec![a, b];

        let compact: Vec<&[Element]> = compute_rows(&elements, Breakpoint::Compact).collect();
        assert_eq!(ids(&compact), vec![vec!["a", "b"]]);

        let medium: Vec<&[Element]> = compute_rows(&elements, Breakpoint::Medium).collect();
        assert_eq!(ids(&medium), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let elements: Vec<Element> = Vec::new();
        assert_eq!(compute_rows(&elements, Breakpoint::Wide).count(), 0);
    }

    #[test]
    fn rows_iterator_is_restartable() {
        let elements = vec![spanned("a", "6"), spanned("b", "6"), spanned("c", "3")];
        let rows = compute_rows(&elements, Breakpoint::Compact);
        let first: Vec<usize> = rows.clone().map(<[Element]>::len).collect();
        let second: Vec<usize> = rows.map(<[Element]>::len).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn rebalance_three_way() {
        let a = spanned("a", "12");
        let b = spanned("b", "12");
        let c = spanned("c", "12");
        let spans = rebalance_spans(&[&a, &b, &c]);
        let got: Vec<u8> = spans.iter().map(|s| s.span).collect();
        assert_eq!(got, vec![4, 4, 4]);
    }

    #[test]
    fn rebalance_distributes_remainder_to_leading_elements() {
        let elements: Vec<Element> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| spanned(id, "12"))
            .collect();
        let refs: Vec<&Element> = elements.iter().collect();
        let spans = rebalance_spans(&refs);
        let got: Vec<u8> = spans.iter().map(|s| s.span).collect();
        assert_eq!(got, vec![3, 3, 2, 2, 2]);
        assert_eq!(spans.iter().map(|s| u32::from(s.span)).sum::<u32>(), 12);
    }

    #[test]
    fn rebalance_empty_input() {
        assert_eq!(rebalance_spans(&[]), Vec::new());
    }

    #[test]
    fn rebalance_singleton_takes_full_width() {
        let a = spanned("a", "4");
        let spans = rebalance_spans(&[&a]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].span, 12);
    }
}
