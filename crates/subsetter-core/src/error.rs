mod adhoc;
mod ambiguous_association;
mod invalid_restriction;
mod unknown_table;

use adhoc::AdhocError;
use ambiguous_association::AmbiguousAssociationError;
use invalid_restriction::InvalidRestrictionError;
use unknown_table::UnknownTableError;

/// Returns early with a formatted [`Error`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Creates a formatted [`Error`].
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur while building or editing an extraction model.
///
/// Structural conditions the engine recovers from on its own (a missing
/// subject, a stale closure cache, a no-op mutation) are deliberately not
/// represented here; they resolve to fallbacks or silent no-ops.
pub struct Error {
    kind: Box<ErrorKind>,
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    AmbiguousAssociation(AmbiguousAssociationError),
    InvalidRestriction(InvalidRestrictionError),
    UnknownTable(UnknownTableError),
}

impl Error {
    /// Creates an error from format arguments.
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        match args.as_str() {
            Some(s) => ErrorKind::Adhoc(AdhocError::from_static(s)).into(),
            None => ErrorKind::Adhoc(AdhocError::from_string(args.to_string())).into(),
        }
    }

    /// A restriction was requested on an unnamed association that shares its
    /// destination with an unnamed sibling.
    pub fn ambiguous_association(source: &str, destination: &str) -> Error {
        ErrorKind::AmbiguousAssociation(AmbiguousAssociationError {
            source: source.into(),
            destination: destination.into(),
        })
        .into()
    }

    /// A persisted restriction line could not be resolved against the schema.
    pub fn invalid_restriction(line: &str, reason: &str) -> Error {
        ErrorKind::InvalidRestriction(InvalidRestrictionError {
            line: line.into(),
            reason: reason.into(),
        })
        .into()
    }

    /// A table name did not resolve against the schema.
    pub fn unknown_table(name: &str) -> Error {
        ErrorKind::UnknownTable(UnknownTableError { name: name.into() }).into()
    }

    /// Returns true if this is an ambiguous-association error.
    ///
    /// Callers treat this as advisory: the overlay is untouched and the
    /// session stays usable.
    pub fn is_ambiguous_association(&self) -> bool {
        matches!(*self.kind, ErrorKind::AmbiguousAssociation(_))
    }

    pub fn is_unknown_table(&self) -> bool {
        matches!(*self.kind, ErrorKind::UnknownTable(_))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.kind {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &*self.kind {
            ErrorKind::Anyhow(err) => core::fmt::Display::fmt(err, f),
            ErrorKind::Adhoc(err) => core::fmt::Display::fmt(err, f),
            ErrorKind::AmbiguousAssociation(err) => core::fmt::Display::fmt(err, f),
            ErrorKind::InvalidRestriction(err) => core::fmt::Display::fmt(err, f),
            ErrorKind::UnknownTable(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if f.alternate() {
            f.debug_struct("Error").field("kind", &self.kind).finish()
        } else {
            core::fmt::Display::fmt(self, f)
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind: Box::new(kind),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        ErrorKind::Anyhow(err).into()
    }
}
