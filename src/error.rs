use std::fmt;

/// Errors that may occur when serializing or deserializing a PHC string. Every variant is a
/// violation of the PHC string format; processing stops at the first one found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatViolation {
    /// The string to deserialize was empty
    EmptyInput,

    /// The string to deserialize did not begin with the `$` delimiter
    MissingDelimiter,

    /// The identifier is not 1-32 characters of `[a-z0-9-]`
    InvalidId(String),

    /// A version field held a value that is not a representable non-negative integer
    InvalidVersion(String),

    /// The string holds more `$`-delimited fields than the format allows
    TooManyFields {
        /// Number of fields found, including the identifier
        actual: usize,

        /// Number of fields allowed for this string
        max: usize,
    },

    /// A parameter map was present but held no entries
    EmptyParams,

    /// A parameter name is not 1-32 characters of `[a-z0-9-]`
    InvalidParamName(String),

    /// A string parameter value is not 1 or more characters of `[a-zA-Z0-9+.-]`
    InvalidParamValue {
        /// Name of the offending parameter
        name: String,

        /// The rejected value
        value: String,
    },

    /// A parameter entry was not of the form `name=value`
    MalformedParam(String),

    /// The salt or hash segment could not be decoded as base64
    InvalidBase64 {
        /// Either `"salt"` or `"hash"`
        field: &'static str,
    },

    /// Segments were left over after every recognized field was consumed
    UnrecognizedFields(Vec<String>),
}

impl std::error::Error for FormatViolation {}

impl fmt::Display for FormatViolation {
    /// Turn a `FormatViolation` into a descriptive string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatViolation::EmptyInput => write!(f, "PHC string must be non-empty"),
            FormatViolation::MissingDelimiter => {
                write!(f, "PHC string must contain a $ as first char")
            }
            FormatViolation::InvalidId(id) => {
                write!(f, "id must satisfy ^[a-z0-9-]{{1,32}}$ (got {:?})", id)
            }
            FormatViolation::InvalidVersion(v) => {
                write!(f, "version must be a non-negative 32-bit integer (got {:?})", v)
            }
            FormatViolation::TooManyFields { actual, max } => {
                write!(f, "PHC string contains too many fields: {}/{}", actual, max)
            }
            FormatViolation::EmptyParams => write!(f, "params must contain at least one entry"),
            FormatViolation::InvalidParamName(name) => write!(
                f,
                "param names must satisfy ^[a-z0-9-]{{1,32}}$ (got {:?})",
                name
            ),
            FormatViolation::InvalidParamValue { name, value } => write!(
                f,
                "param values must satisfy ^[a-zA-Z0-9+.-]+$ (got {}={:?})",
                name, value
            ),
            FormatViolation::MalformedParam(entry) => write!(
                f,
                "params must be in the format name=value (got {:?})",
                entry
            ),
            FormatViolation::InvalidBase64 { field } => {
                write!(f, "{} is not valid unpadded base64", field)
            }
            FormatViolation::UnrecognizedFields(fields) => write!(
                f,
                "PHC string contains unrecognized fields: {}",
                fields.join(",")
            ),
        }
    }
}
