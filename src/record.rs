use crate::error::FormatViolation;
use crate::grammar;
use crate::lexer;
use crate::params::{self, ParamMap};

use base64::engine::general_purpose::STANDARD_NO_PAD as b64_stdnopad;
use base64::Engine;
use std::fmt;
use std::str::FromStr;

/// The parts of a PHC string: an algorithm identifier, plus an optional version, parameter
/// map, salt, and hash.
///
/// A PHC string looks something like this:
///
/// _$argon2id$v=19$m=62500,t=18,p=2$AQIDBAUGBwg$ypJ3pKxN4aWGkwMv0TOb08OIzwrfK1SZWy64vyTLKo8_
///
/// A record is only checked against the format when it is serialized. A hash is only written
/// out when a salt is also present; a hash on its own is dropped without error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhcRecord {
    /// Identifier of the hash function, 1-32 characters of `[a-z0-9-]`
    pub id: String,

    /// Version of the hash function, written as `v=<version>`
    pub version: Option<u32>,

    /// Hash-function-specific parameters. Must hold at least one entry when present.
    pub params: Option<ParamMap>,

    /// Raw salt bytes
    pub salt: Option<Vec<u8>>,

    /// Raw hash bytes
    pub hash: Option<Vec<u8>>,
}

impl PhcRecord {
    /// Creates a record holding only an identifier.
    pub fn new<T: Into<String>>(id: T) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the version.
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the parameter map.
    pub fn params(mut self, params: ParamMap) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets the salt.
    pub fn salt<S>(mut self, salt: &S) -> Self
    where
        S: AsRef<[u8]> + ?Sized,
    {
        self.salt = Some(salt.as_ref().to_vec());
        self
    }

    /// Sets the hash. The hash is ignored by [`serialize`] unless a salt is also set.
    pub fn hash<H>(mut self, hash: &H) -> Self
    where
        H: AsRef<[u8]> + ?Sized,
    {
        self.hash = Some(hash.as_ref().to_vec());
        self
    }

    /// Validates the record and renders it as a PHC string. Same as [`serialize`].
    pub fn to_phc_string(&self) -> Result<String, FormatViolation> {
        serialize(self)
    }
}

/// Validates `record` and renders it as a PHC string.
///
/// ```rust
/// use phc_format::{serialize, ParamMap, PhcRecord};
///
/// let record = PhcRecord::new("argon2id")
///     .version(19)
///     .params(ParamMap::new().with("m", 128).with("t", 3).with("p", 2))
///     .salt(&[1, 2, 3, 4, 5, 6, 7, 8]);
///
/// assert_eq!(
///     serialize(&record).unwrap(),
///     "$argon2id$v=19$m=128,t=3,p=2$AQIDBAUGBwg"
/// );
/// ```
pub fn serialize(record: &PhcRecord) -> Result<String, FormatViolation> {
    if !grammar::is_valid_id(&record.id) {
        log::debug!("rejecting record with invalid id {:?}", record.id);
        return Err(FormatViolation::InvalidId(record.id.clone()));
    }

    let mut out = format!("${}", record.id);

    if let Some(version) = record.version {
        out.push_str(&format!("$v={}", version));
    }

    if let Some(params) = &record.params {
        let segment = params::serialize(params).map_err(|e| {
            log::debug!("rejecting params of {:?}: {}", record.id, e);
            e
        })?;

        out.push('$');
        out.push_str(&segment);
    }

    if let Some(salt) = &record.salt {
        out.push('$');
        out.push_str(&b64_stdnopad.encode(salt));

        if let Some(hash) = &record.hash {
            out.push('$');
            out.push_str(&b64_stdnopad.encode(hash));
        }
    } else if record.hash.is_some() {
        log::trace!("dropping hash of {:?} because it has no salt", record.id);
    }

    Ok(out)
}

/// Parses a PHC string into its parts.
///
/// Salt and hash fields are standard base64, with or without padding. A field made of the
/// characters the format allows but base64 does not (`.` and `-`) is rejected with
/// [`FormatViolation::InvalidBase64`] instead of having those characters skipped. An empty
/// identifier, as in `"$"`, is reported as [`FormatViolation::InvalidId`].
///
/// ```rust
/// use phc_format::{deserialize, ParamValue};
///
/// let record = deserialize("$pbkdf2$rounds=1000").unwrap();
///
/// assert_eq!(record.id, "pbkdf2");
/// let params = record.params.unwrap();
/// assert_eq!(params.get("rounds"), Some(&ParamValue::Int(1000)));
/// ```
pub fn deserialize(s: &str) -> Result<PhcRecord, FormatViolation> {
    lexer::tokenize(s).map_err(|e| {
        log::debug!("rejecting PHC string: {}", e);
        e
    })
}

impl fmt::Display for PhcRecord {
    /// Renders the record as a PHC string. Formatting fails if the record does not satisfy the
    /// format; use [`serialize`] to find out why.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serialize(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for PhcRecord {
    type Err = FormatViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        deserialize(s)
    }
}
