//! Cross-cutting properties of the error value

use devshare_error::{Error, ErrorCode, Severity, domain};
use rstest::rstest;

#[test]
fn coded_status_and_severity_follow_the_table() {
    for code in ErrorCode::ALL {
        let err = Error::coded(code, "x");
        assert_eq!(err.http_status(), code.http_status(), "{code}");
        assert_eq!(err.severity(), code.default_severity(), "{code}");
    }
}

#[rstest]
#[case(Severity::Debug)]
#[case(Severity::Info)]
#[case(Severity::Warning)]
fn low_severities_have_no_frames(#[case] severity: Severity) {
    let err = Error::new("x").with_severity(severity);
    assert!(err.stack_trace().is_empty());

    let err = Error::coded(ErrorCode::Conflict, "x").with_severity(severity);
    assert!(err.stack_trace().is_empty());
}

#[rstest]
#[case(Severity::Error)]
#[case(Severity::Critical)]
fn high_severities_have_frames(#[case] severity: Severity) {
    let err = Error::coded(ErrorCode::NotFound, "x").with_severity(severity);
    assert!(!err.stack_trace().is_empty());

    let err = Error::new("x").with_severity(severity);
    assert!(!err.stack_trace().is_empty());
}

fn failing_repository_call() -> Error {
    Error::coded(ErrorCode::Database, "insert failed")
}

#[test]
fn rewrapping_preserves_original_frames() {
    let original = failing_repository_call();
    let frames = original.stack_trace();
    assert!(
        frames
            .iter()
            .any(|f| f.function.contains("failing_repository_call"))
    );

    let once = Error::wrap(original, "m1");
    let twice = Error::wrap(once, "m2");
    assert_eq!(twice.stack_trace(), frames);
}

#[test]
fn classification_walks_wrapped_domain_errors() {
    let err = Error::wrap(domain::conflict("User", "email", "a@b.c"), "provision");
    assert!(err.is_conflict());
    assert!(!err.is_not_found());
    assert_eq!(err.http_status(), 409);
}
