/// Error when a persisted restriction line is malformed or does not resolve
/// against the loaded schema.
#[derive(Debug)]
pub(super) struct InvalidRestrictionError {
    pub(super) line: Box<str>,
    pub(super) reason: Box<str>,
}

impl std::error::Error for InvalidRestrictionError {}

impl core::fmt::Display for InvalidRestrictionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid restriction `{}`: {}", self.line, self.reason)
    }
}
