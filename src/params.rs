use crate::error::FormatViolation;
use crate::grammar;

use std::fmt;

/// The value of a single PHC parameter. Values that look like base-10 integers are decoded as
/// `Int`, so a value given as `Str("1000")` reads back as `Int(1000)`. Both render identically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    /// A value of 1 or more characters from `[a-zA-Z0-9+.-]`
    Str(String),

    /// An integer value, always valid
    Int(i64),
}

impl ParamValue {
    /// Returns the integer if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(n) => Some(*n),
            ParamValue::Str(_) => None,
        }
    }

    /// Returns the string if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            ParamValue::Int(_) => None,
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            ParamValue::Str(s) => grammar::is_valid_param_value(s),
            ParamValue::Int(_) => true,
        }
    }

    /// Promotes canonical decimals that fit an `i64`; anything else stays a string.
    fn from_decoded(s: &str) -> Self {
        if grammar::is_decimal(s) {
            if let Ok(n) = s.parse() {
                return ParamValue::Int(n);
            }
        }

        ParamValue::Str(String::from(s))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{}", n),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Int(n.into())
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n.into())
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(String::from(s))
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

/// An insertion-ordered map of parameter names to values.
///
/// Parameters are serialized in the order they were first inserted. Inserting a name that is
/// already present replaces its value without moving it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: Vec<(String, ParamValue)>,
}

impl ParamMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter, returning the previous value if `name` was already present.
    pub fn insert<N, V>(&mut self, name: N, value: V) -> Option<ParamValue>
    where
        N: Into<String>,
        V: Into<ParamValue>,
    {
        let name = name.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Chaining form of [`insert`](Self::insert).
    pub fn with<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<ParamValue>,
    {
        self.insert(name, value);
        self
    }

    /// Looks up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Number of parameters in the map
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<N, V> FromIterator<(N, V)> for ParamMap
where
    N: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut map = ParamMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// Validates every entry and renders the map as `name=value(,name=value)*`.
pub(crate) fn serialize(params: &ParamMap) -> Result<String, FormatViolation> {
    if params.is_empty() {
        return Err(FormatViolation::EmptyParams);
    }

    let mut out = String::new();

    for (i, (name, value)) in params.iter().enumerate() {
        if !grammar::is_valid_param_name(name) {
            return Err(FormatViolation::InvalidParamName(String::from(name)));
        }

        if !value.is_valid() {
            return Err(FormatViolation::InvalidParamValue {
                name: String::from(name),
                value: value.to_string(),
            });
        }

        if i > 0 {
            out.push(',');
        }

        out.push_str(name);
        out.push('=');
        out.push_str(&value.to_string());
    }

    Ok(out)
}

/// Parses a `name=value(,name=value)*` segment. Each entry splits on its first `=`, so a
/// value containing `=` is rejected by the value grammar rather than by the split.
pub(crate) fn deserialize(segment: &str) -> Result<ParamMap, FormatViolation> {
    let mut params = ParamMap::new();

    for entry in segment.split(',') {
        let (name, value) = match entry.split_once('=') {
            Some((name, _)) if name.is_empty() => {
                return Err(FormatViolation::MalformedParam(String::from(entry)))
            }
            Some(pair) => pair,
            None => return Err(FormatViolation::MalformedParam(String::from(entry))),
        };

        if !grammar::is_valid_param_name(name) {
            return Err(FormatViolation::InvalidParamName(String::from(name)));
        }

        if !grammar::is_valid_param_value(value) {
            return Err(FormatViolation::InvalidParamValue {
                name: String::from(name),
                value: String::from(value),
            });
        }

        params.insert(name, ParamValue::from_decoded(value));
    }

    Ok(params)
}
