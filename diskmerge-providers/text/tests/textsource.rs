#![expect(clippy::expect_used, reason = "tests require contextual panics")]
//! Integration tests for [`DiskTextSource`].
use std::io::{BufRead, Cursor, Read};

use diskmerge_core::{DiskSetError, Point};
use diskmerge_providers_text::{DiskTextSource, TextProviderError};
use diskmerge_test_support::fixtures::{OVERLAPPING_LINE, to_text};
use rstest::rstest;

#[rstest]
fn reads_rendered_fixture() {
    let text = to_text(&OVERLAPPING_LINE);
    let source =
        DiskTextSource::try_from_reader("line", Cursor::new(text)).expect("fixture must parse");
    assert_eq!(source.name(), "line");
    assert_eq!(source.len(), 3);
    assert_eq!(source.skipped_lines(), 0);
    assert_eq!(source.disk_set().centre(2), Point::new(2.0, 0.0));
}

#[rstest]
#[case::blank("\n\n", 2)]
#[case::two_tokens("1 2\n", 1)]
#[case::four_tokens("1 2 3 4\n", 1)]
#[case::header("x y r extra\n0 0 1\n", 1)]
#[case::crlf("0 0 1\r\n\r\n", 1)]
#[case::short_comment("# note\n", 1)]
fn malformed_lines_are_skipped(#[case] raw: &str, #[case] skipped: usize) {
    let source = DiskTextSource::try_from_reader("demo", Cursor::new(raw)).expect("input must parse");
    assert_eq!(source.skipped_lines(), skipped);
}

#[rstest]
fn tabs_and_repeated_spaces_separate_tokens() {
    let source = DiskTextSource::try_from_reader("demo", Cursor::new("  1.5\t-2   3e1  \n"))
        .expect("input must parse");
    let disk = source.disk_set()[0];
    assert_eq!(disk.centre(), Point::new(1.5, -2.0));
    assert_eq!(disk.radius(), 30.0);
}

#[rstest]
fn non_numeric_record_reports_line_and_token() {
    let err = DiskTextSource::try_from_reader("demo", Cursor::new("0 0 1\n\n2 two 1\n"))
        .expect_err("token must fail to parse");
    assert!(
        matches!(&err, TextProviderError::InvalidNumber { line: 3, token } if token == "two"),
        "unexpected error: {err:?}",
    );
    assert_eq!(err.to_string(), "line 3: `two` is not a number");
}

#[rstest]
fn three_token_comment_is_a_record() {
    let err = DiskTextSource::try_from_reader("demo", Cursor::new("0 0 1\n# comment line\n"))
        .expect_err("three tokens form a record");
    assert!(
        matches!(&err, TextProviderError::InvalidNumber { line: 2, token } if token == "#"),
        "unexpected error: {err:?}",
    );
}

#[rstest]
fn negative_radius_is_invalid_disk() {
    let err = DiskTextSource::try_from_reader("demo", Cursor::new("0 0 1\n1 1 -2\n"))
        .expect_err("negative radius must fail");
    assert!(matches!(
        err,
        TextProviderError::InvalidDisk(DiskSetError::NegativeRadius { index: 1, .. })
    ));
}

#[rstest]
fn empty_input_yields_empty_source() {
    let source = DiskTextSource::try_from_reader("demo", Cursor::new("")).expect("empty is valid");
    assert!(source.is_empty());
    assert!(source.into_disk_set().is_empty());
}

#[rstest]
fn propagates_io_error() {
    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("boom"))
        }
    }

    impl BufRead for FailingReader {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            Err(std::io::Error::other("boom"))
        }

        fn consume(&mut self, _amt: usize) {}
    }

    let err = DiskTextSource::try_from_reader("demo", FailingReader)
        .expect_err("I/O failure must propagate");
    assert!(matches!(err, TextProviderError::Io(_)));
}
