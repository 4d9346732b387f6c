#![deny(missing_docs)]

//! A serializer and deserializer for the
//! [PHC string format](https://github.com/P-H-C/phc-string-format/blob/master/phc-sf-spec.md),
//! the `$`-delimited string that password hashing libraries use to store a hash together with
//! the algorithm, version, parameters, and salt that produced it.
//!
//! This crate only converts between strings and their parts. It does not compute or verify
//! hashes and it does not know anything about particular algorithms: any identifier and any
//! parameter names that satisfy the format are accepted.
//!
//! A PHC string has this shape:
//!
//! ```text
//! $<id>[$v=<version>][$<name>=<value>(,<name>=<value>)*][$<salt>[$<hash>]]
//! ```
//!
//! The salt and hash are base64 without padding.
//!
//! # Usage
//!
//! To use phc-format, add the following to your Cargo.toml:
//!
//! ```toml
//! [dependencies]
//! phc-format = "0.1.0"
//! ```
//!
//! # Examples
//!
//! Serialize a record:
//!
//! ```rust
//! use phc_format::{ParamMap, PhcRecord};
//!
//! let record = PhcRecord::new("argon2id")
//!         .version(19)
//!         .params(ParamMap::new().with("m", 4096).with("t", 3).with("p", 1))
//!         .salt(b"somesalt")
//!         .hash(b"somehash");
//!
//! assert_eq!(
//!     record.to_phc_string().unwrap(),
//!     "$argon2id$v=19$m=4096,t=3,p=1$c29tZXNhbHQ$c29tZWhhc2g"
//! );
//! ```
//!
//! Deserialize a string:
//!
//! ```rust
//! use phc_format::{ParamValue, PhcRecord};
//! use std::str::FromStr;
//!
//! let record = PhcRecord::from_str("$argon2i$m=120,t=5000,p=2,mode=fast$c29tZXNhbHQ").unwrap();
//!
//! assert_eq!(record.id, "argon2i");
//! assert_eq!(record.version, None);
//! assert_eq!(record.salt.as_deref(), Some(&b"somesalt"[..]));
//! assert_eq!(record.hash, None);
//!
//! let params = record.params.unwrap();
//! assert_eq!(params.get("t"), Some(&ParamValue::Int(5000)));
//! assert_eq!(params.get("mode"), Some(&ParamValue::from("fast")));
//! ```
//!
//! Parameter values that look like base-10 integers come back as integers, even if they were
//! serialized from strings. Their string form is unchanged:
//!
//! ```rust
//! use phc_format::{deserialize, serialize, ParamMap, ParamValue, PhcRecord};
//!
//! let record = PhcRecord::new("pbkdf2").params(ParamMap::new().with("rounds", "1000"));
//! let s = serialize(&record).unwrap();
//! let decoded = deserialize(&s).unwrap();
//!
//! assert_eq!(decoded.params.as_ref().unwrap().get("rounds"), Some(&ParamValue::Int(1000)));
//! assert_eq!(serialize(&decoded).unwrap(), s);
//! ```
//!
//! Malformed strings are rejected with a [`FormatViolation`]:
//!
//! ```rust
//! use phc_format::{deserialize, FormatViolation};
//!
//! assert_eq!(
//!     deserialize("$b$c$d$e$f"),
//!     Err(FormatViolation::TooManyFields { actual: 5, max: 4 })
//! );
//! assert_eq!(deserialize("a$invalid"), Err(FormatViolation::MissingDelimiter));
//! ```

mod error;
pub mod grammar;
mod lexer;
mod params;
mod record;

pub use error::FormatViolation;
pub use lexer::MAX_FIELDS;
pub use params::{ParamMap, ParamValue};
pub use record::{deserialize, serialize, PhcRecord};
