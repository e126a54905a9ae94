use crate::attr::AttrKey;

/// Errors raised by the network model.
///
/// All of them are usage errors: the caller asked for data that was never
/// computed or handed over a column that does not fit the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A required vertex attribute has not been computed yet.
    #[error("missing vertex attribute: {0}")]
    MissingAttribute(AttrKey),

    /// The attribute exists but holds text where numbers were expected
    /// (or the other way around).
    #[error("vertex attribute {0} has the wrong kind")]
    WrongAttributeKind(AttrKey),

    /// A column does not have one entry per vertex.
    #[error("vertex attribute {key} has {found} values, network has {expected} vertices")]
    LengthMismatch {
        key: AttrKey,
        expected: usize,
        found: usize,
    },

    /// The vertex id does not belong to this network.
    #[error("vertex {0} is not in the network")]
    UnknownVertex(usize),
}
