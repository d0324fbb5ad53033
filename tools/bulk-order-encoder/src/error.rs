use bulk_order_types::SignerError;

/// Broad class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Schema or tree parameters are inconsistent. A programming mistake, never transient.
    Configuration,
    /// A value does not match the shape of its declared type.
    ValueEncoding,
    /// A signature could not be produced or parsed.
    Signature,
}

/// Errors during typed-data hashing, tree construction, and signing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("type `{0}` is not defined in the schema")]
    UnknownType(String),

    #[error("field `{field}` has unresolvable type `{ty}`")]
    InvalidFieldType { field: String, ty: String },

    #[error("type `{0}` contains itself by value")]
    RecursiveType(String),

    #[error("tree height must be at least 1")]
    ZeroHeight,

    #[error("tree height {height} exceeds the maximum of {max}")]
    HeightOutOfRange { height: u32, max: u32 },

    #[error("tree height {requested} is below the minimum {minimum} for this batch")]
    HeightBelowMinimum { requested: u32, minimum: u32 },

    #[error("{leaves} leaves at start index {start_index} exceed tree capacity {capacity}")]
    CapacityExceeded { leaves: usize, start_index: usize, capacity: usize },

    #[error("`{wrapper}` must have a single member of the leaf type nested in `[2]` {height} times")]
    WrapperMismatch { wrapper: String, height: u32 },

    #[error("order index {index} is outside a batch of {orders}")]
    OrderIndexOutOfRange { index: usize, orders: usize },

    #[error("struct `{ty}` is missing field `{field}`")]
    MissingField { ty: String, field: String },

    #[error("expected a value of type `{expected}`")]
    UnexpectedValue { expected: String },

    #[error("`{ty}` expects {expected} bytes, got {actual}")]
    ByteLength { ty: String, expected: usize, actual: usize },

    #[error("`{ty}` expects {expected} elements, got {actual}")]
    ArrayLength { ty: String, expected: usize, actual: usize },

    #[error("value does not fit in `{ty}`")]
    IntegerOutOfRange { ty: String },

    #[error("malformed bulk signature: {0}")]
    MalformedSignature(&'static str),

    #[error(transparent)]
    Signer(#[from] SignerError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownType(_)
            | Error::InvalidFieldType { .. }
            | Error::RecursiveType(_)
            | Error::ZeroHeight
            | Error::HeightOutOfRange { .. }
            | Error::HeightBelowMinimum { .. }
            | Error::CapacityExceeded { .. }
            | Error::WrapperMismatch { .. }
            | Error::OrderIndexOutOfRange { .. } => ErrorKind::Configuration,
            Error::MissingField { .. }
            | Error::UnexpectedValue { .. }
            | Error::ByteLength { .. }
            | Error::ArrayLength { .. }
            | Error::IntegerOutOfRange { .. } => ErrorKind::ValueEncoding,
            Error::MalformedSignature(_) | Error::Signer(_) => ErrorKind::Signature,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
