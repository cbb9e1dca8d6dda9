/// Error when a table name does not resolve against the schema.
#[derive(Debug)]
pub(super) struct UnknownTableError {
    pub(super) name: Box<str>,
}

impl std::error::Error for UnknownTableError {}

impl core::fmt::Display for UnknownTableError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown table `{}`", self.name)
    }
}
