//! Tests for mapping diesel errors to semantic database error kinds.

use diesel::result::{DatabaseErrorKind as DieselKind, Error as DieselError};
use quizsmith_error::{DatabaseError, DatabaseErrorKind, RetryableError};

fn categorize(err: DieselError) -> DatabaseError {
    DatabaseError::from(err)
}

fn db_error(kind: DieselKind, message: &str) -> DieselError {
    DieselError::DatabaseError(kind, Box::new(message.to_string()))
}

#[test]
fn no_rows_maps_to_not_found() {
    let err = categorize(DieselError::NotFound);
    assert_eq!(err.kind, DatabaseErrorKind::NotFound);
    assert!(!err.is_retryable());
}

#[test]
fn unique_violation_maps_to_conflict() {
    let err = categorize(db_error(
        DieselKind::UniqueViolation,
        "duplicate key value violates unique constraint",
    ));
    assert!(matches!(err.kind, DatabaseErrorKind::Conflict(_)));
    assert!(!err.is_retryable());
}

#[test]
fn foreign_key_violation_maps_to_constraint() {
    let err = categorize(db_error(
        DieselKind::ForeignKeyViolation,
        "violates foreign key constraint",
    ));
    assert!(matches!(err.kind, DatabaseErrorKind::Constraint(_)));
    assert!(!err.is_retryable());
}

#[test]
fn serialization_failure_is_retryable() {
    let err = categorize(db_error(
        DieselKind::SerializationFailure,
        "could not serialize access due to concurrent update",
    ));
    assert!(matches!(err.kind, DatabaseErrorKind::Serialization(_)));
    assert!(err.is_retryable());
}

#[test]
fn deadlock_message_is_retryable() {
    let err = categorize(db_error(DieselKind::Unknown, "deadlock detected"));
    assert!(matches!(err.kind, DatabaseErrorKind::Serialization(_)));
    assert!(err.is_retryable());
}

#[test]
fn cancelled_statement_maps_to_timeout() {
    let err = categorize(db_error(
        DieselKind::Unknown,
        "canceling statement due to statement timeout",
    ));
    assert!(matches!(err.kind, DatabaseErrorKind::Timeout(_)));
    assert!(err.is_retryable());
}

#[test]
fn closed_connection_is_retryable() {
    let err = categorize(db_error(
        DieselKind::ClosedConnection,
        "server closed the connection unexpectedly",
    ));
    assert!(matches!(err.kind, DatabaseErrorKind::Connection(_)));
    assert!(err.is_retryable());
}

#[test]
fn admin_shutdown_message_maps_to_connection() {
    let err = categorize(db_error(
        DieselKind::Unknown,
        "terminating connection due to administrator command",
    ));
    assert!(matches!(err.kind, DatabaseErrorKind::Connection(_)));
    assert!(err.is_retryable());
}

#[test]
fn unrecognized_errors_pass_through_unchanged() {
    let err = categorize(db_error(
        DieselKind::Unknown,
        "value too long for type character varying(20)",
    ));
    match &err.kind {
        DatabaseErrorKind::Query(message) => {
            assert!(message.contains("value too long"));
        }
        other => panic!("expected Query passthrough, got {other:?}"),
    }
    assert!(!err.is_retryable());
}
