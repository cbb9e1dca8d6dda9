/// Ad-hoc error carrying a preformatted message.
#[derive(Debug)]
pub(super) enum AdhocError {
    Static(&'static str),
    Owned(Box<str>),
}

impl AdhocError {
    pub(super) fn from_static(msg: &'static str) -> Self {
        AdhocError::Static(msg)
    }

    pub(super) fn from_string(msg: String) -> Self {
        AdhocError::Owned(msg.into_boxed_str())
    }
}

impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            AdhocError::Static(msg) => f.write_str(msg),
            AdhocError::Owned(msg) => f.write_str(msg),
        }
    }
}
