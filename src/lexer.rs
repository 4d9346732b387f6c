use crate::error::FormatViolation;
use crate::grammar;
use crate::params;
use crate::record::PhcRecord;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

/// Largest number of `$`-delimited fields, counting the id, when a version field is present
pub const MAX_FIELDS: usize = 5;

/// Standard alphabet, padding optional, trailing bits tolerated
const B64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

fn decode_b64(field: &'static str, s: &str) -> Result<Vec<u8>, FormatViolation> {
    B64_LENIENT
        .decode(s)
        .map_err(|_| FormatViolation::InvalidBase64 { field })
}

/// Splits a PHC string into fields and assigns each field a role.
///
/// The id comes first and a version, if any, immediately after it. The remaining fields are
/// claimed from the back: a trailing pair of base64-shaped fields is salt and hash, a single
/// one is salt. Whatever is left before that must be one parameter segment.
pub(crate) fn tokenize(s: &str) -> Result<PhcRecord, FormatViolation> {
    if s.is_empty() {
        return Err(FormatViolation::EmptyInput);
    }

    let rest = match s.strip_prefix('$') {
        Some(rest) => rest,
        None => return Err(FormatViolation::MissingDelimiter),
    };

    let mut fields: Vec<&str> = rest.split('$').collect();

    let max = if fields.get(1).copied().is_some_and(grammar::is_valid_version) {
        MAX_FIELDS
    } else {
        MAX_FIELDS - 1
    };

    if fields.len() > max {
        return Err(FormatViolation::TooManyFields {
            actual: fields.len(),
            max,
        });
    }

    // Splitting always yields at least one field; an empty id fails the id grammar below
    let id = fields.remove(0);
    if !grammar::is_valid_id(id) {
        return Err(FormatViolation::InvalidId(String::from(id)));
    }

    let mut record = PhcRecord::new(id);

    if let Some(digits) = fields.first().copied().and_then(grammar::version_digits) {
        let version: u32 = digits
            .parse()
            .map_err(|_| FormatViolation::InvalidVersion(String::from(digits)))?;

        log::trace!("{}: version {}", id, version);
        record.version = Some(version);
        fields.remove(0);
    }

    if fields.last().copied().is_some_and(grammar::is_valid_b64_field) {
        let pair = fields.len() > 1 && grammar::is_valid_b64_field(fields[fields.len() - 2]);

        if pair {
            log::trace!("{}: trailing fields are salt and hash", id);

            let hash = fields.pop().unwrap_or_default();
            let salt = fields.pop().unwrap_or_default();

            record.hash = Some(decode_b64("hash", hash)?);
            record.salt = Some(decode_b64("salt", salt)?);
        } else {
            log::trace!("{}: trailing field is salt", id);

            let salt = fields.pop().unwrap_or_default();
            record.salt = Some(decode_b64("salt", salt)?);
        }
    }

    if let Some(segment) = fields.pop() {
        log::trace!("{}: parsing params from {:?}", id, segment);
        record.params = Some(params::deserialize(segment)?);
    }

    if !fields.is_empty() {
        return Err(FormatViolation::UnrecognizedFields(
            fields.into_iter().map(String::from).collect(),
        ));
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    #[test]
    fn test_tokenize_full_string() {
        let record = tokenize(
            "$argon2id$v=19$m=128,t=3,p=2$AQIDBAUGBwg$7OU7S/azjYpnXXySR52cFWeisxk1VVjNeXqtQ8ZM/Oc",
        )
        .unwrap();

        assert_eq!(record.id, "argon2id");
        assert_eq!(record.version, Some(19));

        let params = record.params.unwrap();
        assert_eq!(params.get("m"), Some(&ParamValue::Int(128)));
        assert_eq!(params.get("t"), Some(&ParamValue::Int(3)));
        assert_eq!(params.get("p"), Some(&ParamValue::Int(2)));

        assert_eq!(record.salt, Some(vec![1, 2, 3, 4, 5, 6, 7, 8]));
        assert_eq!(record.hash.map(|h| h.len()), Some(32));
    }

    #[test]
    fn test_tokenize_id_only() {
        let record = tokenize("$argon2i").unwrap();
        assert_eq!(record, PhcRecord::new("argon2i"));
    }

    #[test]
    fn test_tokenize_params_only() {
        let record = tokenize("$pbkdf2$rounds=1000").unwrap();

        assert_eq!(record.id, "pbkdf2");
        assert_eq!(record.version, None);
        assert_eq!(record.salt, None);
        assert_eq!(record.hash, None);
        assert_eq!(
            record.params.unwrap().get("rounds"),
            Some(&ParamValue::Int(1000))
        );
    }

    #[test]
    fn test_tokenize_salt_without_params() {
        let record = tokenize("$argon2i$v=19$c29tZXNhbHQ").unwrap();

        assert_eq!(record.version, Some(19));
        assert_eq!(record.params, None);
        assert_eq!(record.salt.as_deref(), Some(&b"somesalt"[..]));
        assert_eq!(record.hash, None);
    }

    #[test]
    fn test_tokenize_salt_and_hash_without_params() {
        let record = tokenize("$scrypt$YWJjZGVmZw$c29tZSBzYWx0").unwrap();

        assert_eq!(record.params, None);
        assert_eq!(record.salt.as_deref(), Some(&b"abcdefg"[..]));
        assert_eq!(record.hash.as_deref(), Some(&b"some salt"[..]));
    }

    #[test]
    fn test_tokenize_empty_salt_and_hash() {
        let record = tokenize("$argon2id$v=19$m=1$$").unwrap();

        assert_eq!(record.salt, Some(Vec::new()));
        assert_eq!(record.hash, Some(Vec::new()));
    }

    #[test]
    fn test_tokenize_accepts_padding_free_trailing_bits() {
        let record = tokenize("$scrypt$YR").unwrap();
        assert_eq!(record.salt, Some(vec![0x61]));
    }

    #[test]
    fn test_tokenize_version_must_follow_id() {
        // A version-shaped field anywhere else is read as a parameter segment
        let err = tokenize("$argon2id$c29tZXNhbHQ$v=19").unwrap_err();
        assert_eq!(
            err,
            FormatViolation::UnrecognizedFields(vec![String::from("c29tZXNhbHQ")])
        );
    }

    #[test]
    fn test_tokenize_bad_start() {
        assert_eq!(tokenize(""), Err(FormatViolation::EmptyInput));
        assert_eq!(tokenize("a$invalid"), Err(FormatViolation::MissingDelimiter));
        assert_eq!(
            tokenize("argon2id$v=19$m=128,t=3,p=2$AQIDBAUGBwg"),
            Err(FormatViolation::MissingDelimiter)
        );
    }

    #[test]
    fn test_tokenize_too_many_fields() {
        assert_eq!(
            tokenize("$b$c$d$e$f"),
            Err(FormatViolation::TooManyFields { actual: 5, max: 4 })
        );
        assert_eq!(
            tokenize("$a$b$c$d$e$f"),
            Err(FormatViolation::TooManyFields { actual: 6, max: 4 })
        );
        assert_eq!(
            tokenize("$a$v=1$c$d$e$f"),
            Err(FormatViolation::TooManyFields { actual: 6, max: 5 })
        );
        assert_eq!(
            tokenize("$argon2id$v=19$m=128,t=3,p=2$AQIDBAUGBwg$AQIDBAUGBwg$"),
            Err(FormatViolation::TooManyFields { actual: 6, max: 5 })
        );
    }

    #[test]
    fn test_tokenize_field_count_checked_before_id() {
        assert_eq!(
            tokenize("$NOPE$b$c$d$e"),
            Err(FormatViolation::TooManyFields { actual: 5, max: 4 })
        );
    }

    #[test]
    fn test_tokenize_invalid_id() {
        let long_id = format!("${}", "a".repeat(33));

        for s in ["$", "$Argon2id", "$argon2_id$v=19", long_id.as_str()] {
            assert!(matches!(tokenize(s), Err(FormatViolation::InvalidId(_))));
        }
    }

    #[test]
    fn test_tokenize_empty_id() {
        assert_eq!(tokenize("$"), Err(FormatViolation::InvalidId(String::new())));
        assert_eq!(
            tokenize("$$c29tZXNhbHQ"),
            Err(FormatViolation::InvalidId(String::new()))
        );
    }

    #[test]
    fn test_tokenize_version_overflow() {
        assert_eq!(
            tokenize("$argon2id$v=4294967296"),
            Err(FormatViolation::InvalidVersion(String::from("4294967296")))
        );
    }

    #[test]
    fn test_tokenize_unrecognized_fields() {
        let err = tokenize("$argon2i$unrecognized$m=120,t=5000,p=2$EkCWX6pSTqWruiR0").unwrap_err();

        assert_eq!(
            err,
            FormatViolation::UnrecognizedFields(vec![String::from("unrecognized")])
        );
        assert!(err.to_string().contains("unrecognized fields"));
    }

    #[test]
    fn test_tokenize_invalid_params() {
        assert_eq!(
            tokenize("$argon2i$m=120,t5000$c29tZXNhbHQ"),
            Err(FormatViolation::MalformedParam(String::from("t5000")))
        );

        // Padding takes the trailing field out of the base64 alphabet
        assert_eq!(
            tokenize("$scrypt$c2FsdA=="),
            Err(FormatViolation::InvalidParamName(String::from("c2FsdA")))
        );

        assert!(matches!(
            tokenize("$argon2i$m=120@$c29tZXNhbHQ"),
            Err(FormatViolation::InvalidParamValue { .. })
        ));
    }

    #[test]
    fn test_tokenize_invalid_base64() {
        assert_eq!(
            tokenize("$argon2i$m=120$abc.def"),
            Err(FormatViolation::InvalidBase64 { field: "salt" })
        );
        assert_eq!(
            tokenize("$argon2i$m=120$c29tZXNhbHQ$a-b"),
            Err(FormatViolation::InvalidBase64 { field: "hash" })
        );
        assert_eq!(
            tokenize("$argon2i$c29tZXNhbHQAA$c29tZXNhbHQ"),
            Err(FormatViolation::InvalidBase64 { field: "salt" })
        );
    }
}
