// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use super::{find_nodes_containing, highlight_at, locate, locate_primary, FallbackHighlight};
use crate::format::parse_html;
use crate::highlight::{HighlightManager, MarkerKind, FALLBACK_MARKER_ID};
use crate::model::{Document, OffsetBasis};

fn page(body: &str) -> Document {
    parse_html(&format!("<html><body>{body}</body></html>"), None)
}

fn matched(document: &Document, term: &str) -> Vec<String> {
    locate(document, term).occurrences().iter().map(|o| o.matched_text().to_owned()).collect()
}

#[test]
fn finds_case_insensitive_substrings_in_order() {
    let document = page("<p>The cat sat on the mat.</p>");
    let result = locate(&document, "AT");

    assert_eq!(result.term(), "AT");
    assert_eq!(result.total(), 3);
    let positions = result.occurrences().iter().map(|o| o.position()).collect::<Vec<_>>();
    assert_eq!(positions, vec![0, 1, 2]);
    assert_eq!(matched(&document, "AT"), vec!["at", "at", "at"]);
    let starts = result.occurrences().iter().map(|o| o.start_offset()).collect::<Vec<_>>();
    assert_eq!(starts, vec![5, 9, 20]);
}

#[test]
fn preserves_original_casing_of_matches() {
    let document = page("<p>Rust, rust and RUST</p>");
    assert_eq!(matched(&document, "rust"), vec!["Rust", "rust", "RUST"]);
}

#[test]
fn positions_run_across_nodes() {
    let document = page("<p>one foo</p><div><span>foo foo</span></div><p>foo</p>");
    let result = locate(&document, "foo");
    assert_eq!(result.total(), 4);
    for (index, occurrence) in result.occurrences().iter().enumerate() {
        assert_eq!(occurrence.position(), index);
    }
    assert_eq!(result.occurrences()[1].node(), result.occurrences()[2].node());
}

#[test]
fn offsets_are_relative_to_trimmed_text() {
    let document = page("<p>\n   hello world   \n</p>");
    let result = locate(&document, "world");
    let occurrence = &result.occurrences()[0];
    assert_eq!(occurrence.basis(), OffsetBasis::Trimmed);
    assert_eq!((occurrence.start_offset(), occurrence.end_offset()), (6, 11));
}

#[rstest]
#[case::script("<script>var needle = 1;</script><p>hay</p>")]
#[case::style("<style>.needle { color: red }</style><p>hay</p>")]
#[case::display_none(r#"<p style="display: none">needle</p><p>hay</p>"#)]
#[case::visibility_hidden(r#"<p style="visibility:hidden">needle</p><p>hay</p>"#)]
fn primary_skips_non_rendered_text(#[case] body: &str) {
    let document = page(body);
    assert!(locate_primary(&document, "needle").is_empty());
}

#[test]
fn hidden_text_is_still_found_by_fallback() {
    let document = page(r#"<p style="display:none">secret needle</p><p>hay</p>"#);
    let result = locate(&document, "needle");
    assert_eq!(result.total(), 1);
    let occurrence = &result.occurrences()[0];
    assert_eq!(occurrence.basis(), OffsetBasis::Full);
    assert_eq!((occurrence.start_offset(), occurrence.end_offset()), (7, 13));
}

#[test]
fn term_is_a_pattern_not_a_literal() {
    let document = page("<p>cat cut c.t</p>");
    assert_eq!(matched(&document, "c.t"), vec!["cat", "cut", "c.t"]);
    assert_eq!(matched(&document, "c[au]t"), vec!["cat", "cut"]);
}

#[test]
fn invalid_pattern_degrades_to_literal_fallback() {
    let document = page("<p>call f(x) here</p>");
    assert!(locate_primary(&document, "f(").is_empty());
    let result = locate(&document, "f(");
    assert_eq!(result.total(), 1);
    assert_eq!(result.occurrences()[0].matched_text(), "f(");
}

#[test]
fn missing_term_yields_empty_result() {
    let document = page("<p>The cat sat on the mat.</p>");
    let result = locate(&document, "xyz123");
    assert_eq!(result.total(), 0);
    assert!(find_nodes_containing(&document, "xyz123").is_empty());
}

#[test]
fn empty_term_matches_nothing() {
    let document = page("<p>anything</p>");
    assert!(locate(&document, "").is_empty());
    assert!(find_nodes_containing(&document, "").is_empty());
}

#[test]
fn find_nodes_uses_untrimmed_text_of_all_nodes() {
    let document = page("<script>Foo()</script><p> foo </p><p>bar</p><p>FOO</p>");
    let nodes = find_nodes_containing(&document, "foo");
    let texts = nodes.iter().filter_map(|n| document.text(*n)).collect::<Vec<_>>();
    assert_eq!(texts, vec!["Foo()", " foo ", "FOO"]);
}

#[test]
fn fallback_highlight_wraps_whole_node() {
    let mut document = page("<p>alpha needle beta</p><p>needle two</p>");
    let mut highlights = HighlightManager::default();

    let outcome = highlight_at(&mut document, &mut highlights, "NEEDLE", 1).expect("highlight");
    let FallbackHighlight::Node { index, highlighted } = outcome else {
        panic!("expected in-range node highlight, got {outcome:?}");
    };
    assert_eq!(index, 1);
    assert_eq!(highlighted.kind, MarkerKind::Degraded);
    assert_eq!(document.text_content(highlighted.marker), "needle two");
    let marker = document.element(highlighted.marker).expect("marker");
    assert_eq!(marker.id(), Some(FALLBACK_MARKER_ID));
}

#[test]
fn fallback_out_of_range_marks_first_node_as_substitute() {
    let mut document = page("<p>alpha needle beta</p><p>needle two</p>");
    let mut highlights = HighlightManager::default();

    let outcome = highlight_at(&mut document, &mut highlights, "needle", 7).expect("highlight");
    let FallbackHighlight::Substitute { requested, found, highlighted } = outcome else {
        panic!("expected substitute highlight, got {outcome:?}");
    };
    assert_eq!((requested, found), (7, 2));
    assert_eq!(highlighted.kind, MarkerKind::Substitute { requested: 7, found: 2 });
    assert_eq!(document.text_content(highlighted.marker), "alpha needle beta");
}

#[test]
fn fallback_with_no_candidates_is_a_no_op() {
    let mut document = page("<p>nothing here</p>");
    let before = document.to_html();
    let mut highlights = HighlightManager::default();

    assert!(highlight_at(&mut document, &mut highlights, "xyz123", 0).is_none());
    assert!(highlights.active().is_empty());
    assert_eq!(document.to_html(), before);
}
