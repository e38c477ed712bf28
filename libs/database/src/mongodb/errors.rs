use mongodb::error::{Error, ErrorKind, WriteFailure};

/// Server code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// True when a write was rejected by a unique index
pub fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// True when no server could be reached, as opposed to a failed operation
pub fn is_unavailable(err: &Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::ServerSelection { .. } | ErrorKind::ConnectionPoolCleared { .. }
    )
}

/// True when a document could not be converted to or from BSON
pub fn is_serialization(err: &Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_)
    )
}
