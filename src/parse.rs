//! Parser for the textual representations of UUIDs.

use std::str;

use crate::{Uuid, Variant};

/// Options that control which textual representations [`Uuid::parse_with()`] accepts.
///
/// The default accepts the 8-4-4-4-12 hyphenated form only (in either letter case) and does not
/// look at the version and variant bits, so that every 128-bit value round-trips.
///
/// # Examples
///
/// ```rust
/// use uuidkit::{ParseError, ParseOptions, Uuid};
///
/// let lenient = ParseOptions::new().with_strict_hyphenation(false);
/// let x = Uuid::parse_with("{0180A8F05B847438AB50F068DECFBFD7}", lenient)?;
/// assert_eq!(x.to_string(), "0180a8f0-5b84-7438-ab50-f068decfbfd7");
///
/// let strict = ParseOptions::new().with_strict_validation(true);
/// assert!(matches!(
///     Uuid::parse_with("00000000-0000-0000-0000-000000000000", strict),
///     Err(ParseError::Variant(_))
/// ));
/// # Ok::<(), ParseError>(())
/// ```
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct ParseOptions {
    /// Accepts the hyphenated form only if `true`; if `false`, also accepts the 32-digit form
    /// without hyphens, the form wrapped in braces, and the `urn:uuid:` prefix.
    pub strict_hyphenation: bool,

    /// Rejects UUIDs whose variant is not `0b10` or whose version is not one of 1, 3, 4, 5, 6 and
    /// 7 if `true`.
    pub strict_validation: bool,
}

impl ParseOptions {
    /// Returns the default options: strict hyphenation on, strict validation off.
    pub const fn new() -> Self {
        Self {
            strict_hyphenation: true,
            strict_validation: false,
        }
    }

    /// Sets the `strict_hyphenation` option.
    pub const fn with_strict_hyphenation(mut self, value: bool) -> Self {
        self.strict_hyphenation = value;
        self
    }

    /// Sets the `strict_validation` option.
    pub const fn with_strict_validation(mut self, value: bool) -> Self {
        self.strict_validation = value;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Error parsing a string representation of UUID.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum ParseError {
    /// The input is not a well-formed UUID string.
    #[error("invalid string representation: {0}")]
    Format(#[from] FormatError),

    /// The version field is not supported (strict validation only).
    #[error("unsupported UUID version: {0}")]
    Version(u8),

    /// The variant field is not `0b10` (strict validation only).
    #[error("unsupported UUID variant: {0:?}")]
    Variant(Variant),
}

/// Details of a malformed UUID string.
///
/// Indexes are byte offsets into the whole input.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum FormatError {
    /// The input, after an accepted prefix or braces are removed, has the wrong number of bytes.
    #[error("invalid length {0}")]
    Length(usize),

    /// A non-hexadecimal character appears where a digit is expected.
    #[error("invalid character {found:?} at {index}")]
    Character { found: char, index: usize },

    /// A hyphen is missing at one of the four fixed positions.
    #[error("expected '-' at {index}")]
    Hyphen { index: usize },
}

impl Uuid {
    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation using
    /// [`ParseOptions::default()`].
    pub fn parse_str(src: &str) -> Result<Self, ParseError> {
        Self::parse_with(src, ParseOptions::new())
    }

    /// Creates an object from a string representation accepted by `options`.
    ///
    /// Either a fully decoded UUID or an error is returned; nothing else is affected.
    pub fn parse_with(src: &str, options: ParseOptions) -> Result<Self, ParseError> {
        let value = if options.strict_hyphenation {
            parse_hyphenated(src, 0)?
        } else {
            parse_lenient(src)?
        };

        if options.strict_validation {
            validate(value)
        } else {
            Ok(value)
        }
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse_str(src)
    }
}

impl TryFrom<&str> for Uuid {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl TryFrom<String> for Uuid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

fn parse_lenient(src: &str) -> Result<Uuid, FormatError> {
    let (offset, body) = if let Some(rest) = src
        .get(..9)
        .filter(|prefix| prefix.eq_ignore_ascii_case("urn:uuid:"))
        .and_then(|_| src.get(9..))
    {
        (9, rest)
    } else if let Some(rest) = src.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        (1, rest)
    } else {
        (0, src)
    };

    if body.len() == 32 {
        parse_digits(body, offset, &[])
    } else {
        parse_hyphenated(body, offset)
    }
}

fn parse_hyphenated(src: &str, offset: usize) -> Result<Uuid, FormatError> {
    if src.len() != 36 {
        return Err(FormatError::Length(src.len()));
    }
    parse_digits(src, offset, &HYPHEN_POSITIONS)
}

/// Decodes 32 hexadecimal digits, expecting a hyphen at each of `hyphens`.
fn parse_digits(src: &str, offset: usize, hyphens: &[usize]) -> Result<Uuid, FormatError> {
    debug_assert_eq!(src.len(), 32 + hyphens.len());

    let mut dst = [0u8; 16];
    let mut n_digits = 0;
    for (i, e) in src.bytes().enumerate() {
        if hyphens.contains(&i) {
            if e != b'-' {
                return Err(FormatError::Hyphen { index: offset + i });
            }
            continue;
        }

        let Some(digit) = char::from(e).to_digit(16) else {
            // non-ASCII bytes are rejected at their leading byte, which is a char boundary
            let found = src[i..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(FormatError::Character {
                found,
                index: offset + i,
            });
        };
        dst[n_digits / 2] |= (digit as u8) << if n_digits % 2 == 0 { 4 } else { 0 };
        n_digits += 1;
    }
    Ok(Uuid::from(dst))
}

fn validate(value: Uuid) -> Result<Uuid, ParseError> {
    match value.variant() {
        Variant::Var10 => {}
        variant => return Err(ParseError::Variant(variant)),
    }
    match value.version() {
        Some(_) => Ok(value),
        None => Err(ParseError::Version(value.version_num())),
    }
}

#[cfg(test)]
mod tests {
    use super::{FormatError, ParseError, ParseOptions};
    use crate::{Uuid, Variant};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Returns error to invalid string representation
    #[test]
    fn returns_error_to_invalid_string_representation() {
        let cases = [
            "",
            "not-a-uuid",
            " 0180a8f0-5b82-75b4-9fef-ecad657c30bb",
            "0180a8f0-5b84-7438-ab50-f0626f78002b ",
            " 0180a8f0-5b84-7438-ab50-f063bd5331af ",
            "+0180a8f0-5b84-7438-ab50-f06405d35edb",
            "-0180a8f0-5b84-7438-ab50-f06508df4c2d",
            "+180a8f0-5b84-7438-ab50-f066aa10a367",
            "-180a8f0-5b84-7438-ab50-f067cdce1d69",
            "0180a8f05b847438ab50f068decfbfd7",
            "0180a8f0-5b847438-ab50-f06991838802",
            "{0180a8f0-5b84-7438-ab50-f06ac2e5e082}",
            "0180a8f0-5b84-74 8-ab50-f06bed27bdc7",
            "0180a8g0-5b84-7438-ab50-f06c91175b8a",
            "0180a8f0-5b84-7438-ab50_f06d3ea24429",
            "0180a8f0-5b84-7438-ab50-f06d3ea2442é",
        ];

        for e in cases {
            assert!(
                matches!(e.parse::<Uuid>(), Err(ParseError::Format(_))),
                "{}",
                e
            );
        }
    }

    /// Reports what is wrong with malformed input
    #[test]
    fn reports_what_is_wrong_with_malformed_input() {
        assert_eq!(
            Uuid::parse_str("not-a-uuid"),
            Err(ParseError::Format(FormatError::Length(10)))
        );
        assert_eq!(
            Uuid::parse_str("0180a8g0-5b84-7438-ab50-f06c91175b8a"),
            Err(ParseError::Format(FormatError::Character {
                found: 'g',
                index: 5
            }))
        );
        assert_eq!(
            Uuid::parse_str("0180a8f0-5b84-7438-ab50_f06d3ea24429"),
            Err(ParseError::Format(FormatError::Hyphen { index: 23 }))
        );
        assert_eq!(
            Uuid::parse_str("0180a8f0-5b84-7438-ab50-f06d3ea2442é"),
            Err(ParseError::Format(FormatError::Length(37)))
        );
        assert_eq!(
            Uuid::parse_str("0180a8f0-5b84-7438-ab50-f06d3ea244é"),
            Err(ParseError::Format(FormatError::Character {
                found: 'é',
                index: 34
            }))
        );
        let lenient = ParseOptions::new().with_strict_hyphenation(false);
        assert_eq!(
            Uuid::parse_with("{0180a8f05b847438ab50f068decfbfdz}", lenient),
            Err(ParseError::Format(FormatError::Character {
                found: 'z',
                index: 32
            }))
        );
    }

    /// Accepts alternative forms only without strict hyphenation
    #[test]
    fn accepts_alternative_forms_only_without_strict_hyphenation() {
        let expected: Uuid = "0180a8f0-5b84-7438-ab50-f068decfbfd7".parse().unwrap();
        let lenient = ParseOptions::new().with_strict_hyphenation(false);
        let cases = [
            "0180a8f0-5b84-7438-ab50-f068decfbfd7",
            "0180a8f05b847438ab50f068decfbfd7",
            "0180A8F05B847438AB50F068DECFBFD7",
            "{0180a8f0-5b84-7438-ab50-f068decfbfd7}",
            "{0180a8f05b847438ab50f068decfbfd7}",
            "urn:uuid:0180a8f0-5b84-7438-ab50-f068decfbfd7",
            "URN:UUID:0180A8F0-5B84-7438-AB50-F068DECFBFD7",
        ];

        for e in cases {
            assert_eq!(Uuid::parse_with(e, lenient), Ok(expected), "{}", e);
            if e.len() != 36 {
                assert!(e.parse::<Uuid>().is_err(), "{}", e);
            }
        }

        let invalid = [
            "{0180a8f0-5b84-7438-ab50-f068decfbfd7",
            "0180a8f0-5b84-7438-ab50-f068decfbfd7}",
            "urn:uuid:{0180a8f0-5b84-7438-ab50-f068decfbfd7}",
            "0180a8f05b847438ab50f068decfbfd",
            "0180a8f05b847438-ab50f068decfbfd7",
            "urn:0180a8f0-5b84-7438-ab50-f068decfbfd7",
        ];
        for e in invalid {
            assert!(Uuid::parse_with(e, lenient).is_err(), "{}", e);
        }
    }

    /// Validates version and variant only in strict mode
    #[test]
    fn validates_version_and_variant_only_in_strict_mode() {
        let strict = ParseOptions::new().with_strict_validation(true);
        let cases = [
            ("123e4567-e89b-12d3-a456-426614174000", None),
            ("6fa459ea-ee8a-3ca4-894e-db77e160355e", None),
            ("919108f7-52d1-4320-9bac-f847db4148a8", None),
            ("886313e1-3b8a-5372-9b90-0c9aee199e5d", None),
            ("1ec9414c-232a-6b00-b3c8-9e6bdeced846", None),
            ("017f22e2-79b0-7cc3-98c4-dc0c0c07398f", None),
            (
                "00000000-0000-0000-0000-000000000000",
                Some(ParseError::Variant(Variant::VarNil)),
            ),
            (
                "ffffffff-ffff-ffff-ffff-ffffffffffff",
                Some(ParseError::Variant(Variant::VarMax)),
            ),
            (
                "123e4567-e89b-12d3-6456-426614174000",
                Some(ParseError::Variant(Variant::Var0)),
            ),
            (
                "123e4567-e89b-12d3-c456-426614174000",
                Some(ParseError::Variant(Variant::Var110)),
            ),
            (
                "123e4567-e89b-22d3-a456-426614174000",
                Some(ParseError::Version(2)),
            ),
            (
                "123e4567-e89b-82d3-a456-426614174000",
                Some(ParseError::Version(8)),
            ),
            (
                "123e4567-e89b-02d3-a456-426614174000",
                Some(ParseError::Version(0)),
            ),
        ];

        for (text, err) in cases {
            let lax: Uuid = text.parse().unwrap();
            assert_eq!(
                Uuid::parse_with(text, strict),
                err.map_or(Ok(lax), Err),
                "{}",
                text
            );
        }
    }

    /// Round-trips arbitrary 128-bit values
    #[test]
    fn round_trips_arbitrary_128_bit_values() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..10_000 {
            let e = Uuid::from(rng.gen::<u128>());
            assert_eq!(e.encode().parse(), Ok(e));
            assert_eq!(Uuid::parse_str(&e.to_string().to_uppercase()), Ok(e));
        }
        for e in [Uuid::NIL, Uuid::MAX] {
            assert_eq!(e.to_string().parse(), Ok(e));
        }
    }

    /// Formats parsed strings in normalized form
    #[test]
    fn formats_parsed_strings_in_normalized_form() {
        let lenient = ParseOptions::new().with_strict_hyphenation(false);
        let cases = [
            ("F81D4FAE-7DEC-11D0-A765-00A0C91E6BF6", "f81d4fae-7dec-11d0-a765-00a0c91e6bf6"),
            ("f81d4fae7dec11d0a76500a0c91e6bf6", "f81d4fae-7dec-11d0-a765-00a0c91e6bf6"),
            ("{F81D4FAE-7dec-11d0-A765-00a0c91e6bf6}", "f81d4fae-7dec-11d0-a765-00a0c91e6bf6"),
        ];
        for (text, normalized) in cases {
            let e = Uuid::parse_with(text, lenient).unwrap();
            assert_eq!(&e.encode() as &str, normalized);
        }
    }

    /// Formats errors for humans
    #[test]
    fn formats_errors_for_humans() {
        assert_eq!(
            ParseError::from(FormatError::Length(10)).to_string(),
            "invalid string representation: invalid length 10"
        );
        assert_eq!(
            ParseError::Version(2).to_string(),
            "unsupported UUID version: 2"
        );
    }
}
