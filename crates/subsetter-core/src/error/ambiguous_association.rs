/// Error when a restriction targets an unnamed association whose destination
/// is shared with an unnamed sibling from the same source.
///
/// Persisted restriction records identify unnamed edges by their
/// `(from, to)` table pair, so restricting one sibling would silently apply
/// to the wrong edge on reload. The engine rejects the edit instead.
#[derive(Debug)]
pub(super) struct AmbiguousAssociationError {
    pub(super) source: Box<str>,
    pub(super) destination: Box<str>,
}

impl std::error::Error for AmbiguousAssociationError {}

impl core::fmt::Display for AmbiguousAssociationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "association from `{}` to `{}` is ambiguous; restrict it by name",
            self.source, self.destination
        )
    }
}
