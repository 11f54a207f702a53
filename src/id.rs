#[cfg(not(feature = "std"))]
use core as std;

use crate::{MAX_COUNTER_HI, MAX_COUNTER_LO, MAX_TIMESTAMP};
use fstr::FStr;
use std::{fmt, str};

/// Represents a LexID and provides converters and comparison operators.
///
/// # Examples
///
/// ```rust
/// use lexid::LexId;
///
/// let x = "03ejjvsposwlgelf8gq5haibm".parse::<LexId>()?;
/// assert_eq!(x.to_string(), "03ejjvsposwlgelf8gq5haibm");
///
/// let y = LexId::from(0x0198de8648930007fbff001a00000042u128);
/// assert_eq!(y.to_u128(), 0x0198de8648930007fbff001a00000042u128);
/// # Ok::<(), lexid::ParseError>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[repr(transparent)]
pub struct LexId([u8; 16]);

impl LexId {
    /// Creates an object from a 128-bit unsigned integer.
    pub const fn from_u128(int_value: u128) -> Self {
        Self(int_value.to_be_bytes())
    }

    /// Returns the 128-bit unsigned integer representation.
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Creates an object from a 16-byte big-endian byte array.
    pub const fn from_bytes(array_value: [u8; 16]) -> Self {
        Self(array_value)
    }

    /// Returns the big-endian byte array representation.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Returns a reference to the underlying big-endian byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates an object from field values, returning an error if any argument is out of the
    /// value range of the field.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lexid::LexId;
    ///
    /// let x = LexId::try_from_fields(0x0198de864893, 0x0007fb, 0xff001a, 0x42)?;
    /// assert_eq!(x.encode(), "03ejjvsposwlgelf8gq5haibm");
    ///
    /// assert!(LexId::try_from_fields(1 << 48, 0, 0, 0).is_err());
    /// # Ok::<(), lexid::RangeError>(())
    /// ```
    pub const fn try_from_fields(
        timestamp: u64,
        counter_hi: u32,
        counter_lo: u32,
        entropy: u32,
    ) -> Result<Self, RangeError> {
        if timestamp > MAX_TIMESTAMP {
            Err(RangeError::new("timestamp"))
        } else if counter_hi > MAX_COUNTER_HI {
            Err(RangeError::new("counter_hi"))
        } else if counter_lo > MAX_COUNTER_LO {
            Err(RangeError::new("counter_lo"))
        } else {
            Ok(Self::from_u128(
                (timestamp as u128) << 80
                    | (counter_hi as u128) << 56
                    | (counter_lo as u128) << 32
                    | entropy as u128,
            ))
        }
    }

    /// Creates an object from field values.
    ///
    /// # Panics
    ///
    /// Panics if any argument is out of the value range of the field.
    pub const fn from_fields(
        timestamp: u64,
        counter_hi: u32,
        counter_lo: u32,
        entropy: u32,
    ) -> Self {
        match Self::try_from_fields(timestamp, counter_hi, counter_lo, entropy) {
            Ok(object) => object,
            Err(_) => panic!("invalid field value"),
        }
    }

    /// Returns the 48-bit `timestamp` field value.
    pub const fn timestamp(&self) -> u64 {
        (self.to_u128() >> 80) as u64
    }

    /// Returns the 24-bit `counter_hi` field value.
    pub const fn counter_hi(&self) -> u32 {
        (self.to_u128() >> 56) as u32 & MAX_COUNTER_HI
    }

    /// Returns the 24-bit `counter_lo` field value.
    pub const fn counter_lo(&self) -> u32 {
        (self.to_u128() >> 32) as u32 & MAX_COUNTER_LO
    }

    /// Returns the 32-bit `entropy` field value.
    pub const fn entropy(&self) -> u32 {
        self.to_u128() as u32
    }

    /// Creates an object from a 25-digit string representation.
    ///
    /// This method accepts uppercase letters in the argument, while the encoder always uses
    /// lowercase letters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lexid::LexId;
    ///
    /// let x = LexId::try_from_str("034sq6iu8qoy9nmqv46q6chxg")?;
    /// let y = "034SQ6IU8QOY9NMQV46Q6CHXG".parse::<LexId>()?;
    /// assert_eq!(x, y);
    /// # Ok::<(), lexid::ParseError>(())
    /// ```
    pub fn try_from_str(str_value: &str) -> Result<Self, ParseError> {
        if str_value.len() != 25 {
            return Err(ParseError::invalid_length(str_value.len()));
        }

        let mut int_value = 0u128;
        for (position, digit) in str_value.chars().enumerate() {
            let n = digit
                .to_digit(36)
                .ok_or(ParseError::invalid_digit(digit, position))?;
            int_value = int_value
                .checked_mul(36)
                .and_then(|value| value.checked_add(n as u128))
                .ok_or(ParseError::out_of_range())?;
        }
        Ok(Self::from_u128(int_value))
    }

    /// Returns the 25-digit canonical string representation stored in a stack-allocated
    /// string-like type that can be handled like [`String`] through common traits.
    ///
    /// This method is primarily for `no_std` environments where heap-allocated string types are
    /// not readily available. Use the [`fmt::Display`] trait usually to obtain the canonical
    /// string representation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lexid::LexId;
    ///
    /// let x = "034sq6iu8qoy9nmqv46q6chxg".parse::<LexId>()?;
    /// let y = x.encode();
    /// assert_eq!(y, "034sq6iu8qoy9nmqv46q6chxg");
    /// assert_eq!(format!("{}", y), "034sq6iu8qoy9nmqv46q6chxg");
    /// # Ok::<(), lexid::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<25> {
        const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

        // 25 base-36 digits represent up to 36^25 - 1 > u128::MAX, so the quotient always
        // reaches zero within the buffer
        let mut buffer = [0u8; 25];
        let mut int_value = self.to_u128();
        for e in buffer.iter_mut().rev() {
            *e = DIGITS[(int_value % 36) as usize];
            int_value /= 36;
        }
        debug_assert!(int_value == 0);
        debug_assert!(buffer.is_ascii());
        // SAFETY: `buffer` consists solely of ASCII digit characters
        unsafe { FStr::from_inner_unchecked(buffer) }
    }
}

impl From<u128> for LexId {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<LexId> for u128 {
    fn from(object: LexId) -> Self {
        object.to_u128()
    }
}

impl From<[u8; 16]> for LexId {
    /// Creates an object from a 16-byte big-endian byte array.
    fn from(value: [u8; 16]) -> Self {
        Self::from_bytes(value)
    }
}

impl From<LexId> for [u8; 16] {
    /// Returns the big-endian byte array representation.
    fn from(object: LexId) -> Self {
        object.to_bytes()
    }
}

impl AsRef<[u8]> for LexId {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl str::FromStr for LexId {
    type Err = ParseError;

    /// Creates an object from a 25-digit string representation.
    fn from_str(str_value: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(str_value)
    }
}

impl fmt::Display for LexId {
    /// Returns the 25-digit canonical string representation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lexid::LexId;
    ///
    /// let x = "034sq6iu8qoy9nmqv46q6chxg".parse::<LexId>()?;
    /// assert_eq!(format!("{}", x), "034sq6iu8qoy9nmqv46q6chxg");
    /// assert_eq!(format!("{:30}", x), "034sq6iu8qoy9nmqv46q6chxg     ");
    /// assert_eq!(format!("{:->30}", x), "-----034sq6iu8qoy9nmqv46q6chxg");
    /// assert_eq!(format!("{:.^9.5}", x), "..034sq..");
    /// # Ok::<(), lexid::ParseError>(())
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.encode().as_str())
    }
}

/// An error parsing an invalid string representation of LexID.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
}

#[derive(Clone, Eq, PartialEq, Debug)]
enum ParseErrorKind {
    InvalidLength { n_bytes: usize },
    InvalidDigit { digit: char, position: usize },
    OutOfRange,
}

impl ParseError {
    /// Creates an `InvalidLength` variant from the actual length in bytes.
    const fn invalid_length(n_bytes: usize) -> Self {
        Self {
            kind: ParseErrorKind::InvalidLength { n_bytes },
        }
    }

    /// Creates an `InvalidDigit` variant from the character and its position found.
    const fn invalid_digit(digit: char, position: usize) -> Self {
        Self {
            kind: ParseErrorKind::InvalidDigit { digit, position },
        }
    }

    /// Creates an `OutOfRange` variant.
    const fn out_of_range() -> Self {
        Self {
            kind: ParseErrorKind::OutOfRange,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse string as LexID: ")?;
        match self.kind {
            ParseErrorKind::InvalidLength { n_bytes } => {
                write!(f, "invalid length: {} bytes", n_bytes)
            }
            ParseErrorKind::InvalidDigit { digit, position } => {
                write!(f, "invalid digit {:?} at {}", digit, position)
            }
            ParseErrorKind::OutOfRange => write!(f, "out of 128-bit value range"),
        }
    }
}

/// An error converting a field value that is out of the value range of the field.
///
/// This error is also reported by a generator when the clock reading does not fit in the
/// 48-bit `timestamp` field or reads the reserved value of zero.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct RangeError {
    field: &'static str,
}

impl RangeError {
    pub(crate) const fn new(field: &'static str) -> Self {
        Self { field }
    }

    /// Returns the name of the offending field.
    pub const fn field(&self) -> &'static str {
        self.field
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not create LexID: field `{}` out of range",
            self.field
        )
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod with_std {
    use super::{LexId, ParseError, RangeError};

    impl TryFrom<String> for LexId {
        type Error = ParseError;

        fn try_from(value: String) -> Result<Self, Self::Error> {
            Self::try_from_str(&value)
        }
    }

    impl From<LexId> for String {
        fn from(object: LexId) -> Self {
            object.encode().into()
        }
    }

    impl std::error::Error for ParseError {}

    impl std::error::Error for RangeError {}
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod with_serde {
    use super::{fmt, str, LexId};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for LexId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for LexId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl de::Visitor<'_> for VisitorImpl {
        type Value = LexId;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a LexID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Self::Value::try_from_str(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            match <[u8; 16]>::try_from(value) {
                Ok(array_value) => Ok(Self::Value::from_bytes(array_value)),
                Err(err) => match str::from_utf8(value) {
                    Ok(str_value) => self.visit_str(str_value),
                    _ => Err(de::Error::custom(err)),
                },
            }
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> Result<Self::Value, E> {
            Ok(Self::Value::from_u128(value))
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{LexId, ParseErrorKind};

    #[cfg(feature = "default_rng")]
    use crate::LexIdGenerator;

    const MAX_UINT48: u64 = (1 << 48) - 1;
    const MAX_UINT24: u32 = (1 << 24) - 1;
    const MAX_UINT32: u32 = u32::MAX;

    /// Returns a collection of prepared cases in ascending numeric order
    #[allow(clippy::type_complexity)]
    fn prepare_cases() -> &'static [((u64, u32, u32, u32), &'static str)] {
        &[
            ((0, 0, 0, 0), "0000000000000000000000000"),
            ((0, 0, 0, 1), "0000000000000000000000001"),
            ((0, 0, 0, MAX_UINT32), "0000000000000000001z141z3"),
            ((0, 0, 1, 0), "0000000000000000001z141z4"),
            ((0, 0, MAX_UINT24, 0), "00000000000000jpia7ql4hs0"),
            ((0, 1, 0, 0), "00000000000000jpia9pm8jr4"),
            ((0, MAX_UINT24, 0, 0), "0000000005gv2r2kjwr7n8xs0"),
            ((1, 0, 0, 0), "0000000005gv2rma270x9hhj4"),
            (
                (0x1785aaffcfb, 0x2c9e31, 0x8e5a71, 0xa2f1b3c4),
                "034sq6iu8qoy9nmqv46q6chxg",
            ),
            (
                (0x198de864893, 0x7fb, 0xff001a, 0x42),
                "03ejjvsposwlgelf8gq5haibm",
            ),
            ((MAX_UINT48, 0, 0, 0), "f5lxx1zz5k6tp71geeh2db7k0"),
            (
                (MAX_UINT48, MAX_UINT24, MAX_UINT24, MAX_UINT32),
                "f5lxx1zz5pnorynqglhzmsp33",
            ),
        ]
    }

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        for (fields, text) in prepare_cases() {
            let from_fields = LexId::from_fields(fields.0, fields.1, fields.2, fields.3);
            assert_eq!(Ok(from_fields), text.parse());
            assert_eq!(Ok(from_fields), text.to_uppercase().parse());

            let int_value = u128::from_str_radix(text, 36).unwrap();
            assert_eq!(from_fields.to_u128(), int_value);
            assert_eq!(from_fields.to_bytes(), int_value.to_be_bytes());
            assert_eq!(
                (
                    from_fields.timestamp(),
                    from_fields.counter_hi(),
                    from_fields.counter_lo(),
                    from_fields.entropy(),
                ),
                *fields
            );

            assert_eq!(&from_fields.encode() as &str, *text);
            #[cfg(feature = "std")]
            assert_eq!(&from_fields.to_string(), text);
        }
    }

    /// Returns error if an invalid string representation is supplied
    #[test]
    fn returns_error_if_an_invalid_string_representation_is_supplied() {
        use ParseErrorKind::*;

        let cases = [
            ("", InvalidLength { n_bytes: 0 }),
            ("034sq6iu8qoy9nmqv46q6chx", InvalidLength { n_bytes: 24 }),
            ("034sq6iu8qoy9nmqv46q6chxg0", InvalidLength { n_bytes: 26 }),
            (" 034sq6iu8qoy9nmqv46q6chxg", InvalidLength { n_bytes: 26 }),
            ("034sq6iu8qoy9nmqv46q6chxg ", InvalidLength { n_bytes: 26 }),
            ("+034sq6iu8qoy9nmqv46q6chxg", InvalidLength { n_bytes: 26 }),
            ("03漢sq6iu8qoy9nmqv46q6chxg", InvalidLength { n_bytes: 27 }),
            (
                "+34sq6iu8qoy9nmqv46q6chxg",
                InvalidDigit {
                    digit: '+',
                    position: 0,
                },
            ),
            (
                "-34sq6iu8qoy9nmqv46q6chxg",
                InvalidDigit {
                    digit: '-',
                    position: 0,
                },
            ),
            (
                "034sq6iu_qoy9nmqv46q6chxg",
                InvalidDigit {
                    digit: '_',
                    position: 8,
                },
            ),
            (
                "034sq6iu8qoy9nm v46q6chxg",
                InvalidDigit {
                    digit: ' ',
                    position: 15,
                },
            ),
            (
                "034sq6iu8qoy9nmqv46q6ch\tg",
                InvalidDigit {
                    digit: '\t',
                    position: 23,
                },
            ),
            (
                "03漢q6iu8qoy9nmqv46q6chx",
                InvalidDigit {
                    digit: '漢',
                    position: 2,
                },
            ),
            (
                "034sq6iu🤣9nmqv46q6chxg",
                InvalidDigit {
                    digit: '🤣',
                    position: 8,
                },
            ),
            ("f5lxx1zz5pnorynqglhzmsp34", OutOfRange),
            ("zzzzzzzzzzzzzzzzzzzzzzzzz", OutOfRange),
        ];

        for (text, kind) in cases {
            let result = text.parse::<LexId>();
            assert!(result.is_err());
            assert_eq!(result.unwrap_err().kind, kind);
        }
    }

    /// Returns error unless field values are within respective ranges
    #[test]
    fn returns_error_unless_field_values_are_within_respective_ranges() {
        assert!(LexId::try_from_fields(0, 0, 0, 0).is_ok());
        assert!(LexId::try_from_fields(MAX_UINT48, MAX_UINT24, MAX_UINT24, MAX_UINT32).is_ok());

        let e = LexId::try_from_fields(MAX_UINT48 + 1, 0, 0, 0);
        assert_eq!(e.unwrap_err().field(), "timestamp");
        let e = LexId::try_from_fields(u64::MAX, 0, 0, 0);
        assert_eq!(e.unwrap_err().field(), "timestamp");

        let e = LexId::try_from_fields(0, MAX_UINT24 + 1, 0, 0);
        assert_eq!(e.unwrap_err().field(), "counter_hi");
        let e = LexId::try_from_fields(0, u32::MAX, 0, 0);
        assert_eq!(e.unwrap_err().field(), "counter_hi");

        let e = LexId::try_from_fields(0, 0, MAX_UINT24 + 1, 0);
        assert_eq!(e.unwrap_err().field(), "counter_lo");
        let e = LexId::try_from_fields(0, 0, u32::MAX, 0);
        assert_eq!(e.unwrap_err().field(), "counter_lo");
    }

    /// Has symmetric converters from/to various values
    #[test]
    fn has_symmetric_converters_from_to_various_values() {
        let cases = [
            LexId::from_fields(0, 0, 0, 0),
            LexId::from_fields(MAX_UINT48, 0, 0, 0),
            LexId::from_fields(0, MAX_UINT24, 0, 0),
            LexId::from_fields(0, 0, MAX_UINT24, 0),
            LexId::from_fields(0, 0, 0, MAX_UINT32),
            LexId::from_fields(MAX_UINT48, MAX_UINT24, MAX_UINT24, MAX_UINT32),
        ];

        #[cfg(feature = "default_rng")]
        let cases = {
            let mut v = cases.to_vec();
            let mut g = LexIdGenerator::new();
            for _ in 0..1000 {
                v.push(g.generate().unwrap());
            }
            v
        };

        for e in cases {
            assert_eq!(LexId::try_from_str(&e.encode()).unwrap(), e);
            assert_eq!(e.encode().parse::<LexId>().unwrap(), e);
            #[cfg(feature = "std")]
            assert_eq!(e.to_string().parse::<LexId>().unwrap(), e);
            #[cfg(feature = "std")]
            assert_eq!(LexId::try_from(String::from(e)).unwrap(), e);
            assert_eq!(LexId::from_u128(e.to_u128()), e);
            assert_eq!(LexId::from(u128::from(e)), e);
            assert_eq!(LexId::from_bytes(e.to_bytes()), e);
            assert_eq!(LexId::from(<[u8; 16]>::from(e)), e);
            assert_eq!(LexId::from_bytes(*e.as_bytes()), e);
            assert_eq!(
                LexId::from_fields(e.timestamp(), e.counter_hi(), e.counter_lo(), e.entropy()),
                e
            );
        }
    }

    /// Supports comparison operators
    #[test]
    fn supports_comparison_operators() {
        #[cfg(feature = "std")]
        let hash = {
            use std::hash::BuildHasher as _;
            let s = std::collections::hash_map::RandomState::new();
            move |value: &LexId| s.hash_one(value)
        };

        let ordered = [
            LexId::from_fields(0, 0, 0, 0),
            LexId::from_fields(0, 0, 0, 1),
            LexId::from_fields(0, 0, 0, MAX_UINT32),
            LexId::from_fields(0, 0, 1, 0),
            LexId::from_fields(0, 0, MAX_UINT24, 0),
            LexId::from_fields(0, 1, 0, 0),
            LexId::from_fields(0, MAX_UINT24, 0, 0),
            LexId::from_fields(1, 0, 0, 0),
            LexId::from_fields(2, 0, 0, 0),
        ];

        #[cfg(feature = "default_rng")]
        let ordered = {
            let mut v = ordered.to_vec();
            let mut g = LexIdGenerator::new();
            for _ in 0..1000 {
                v.push(g.generate().unwrap());
            }
            v
        };

        let mut prev = &ordered[0];
        for curr in &ordered[1..] {
            assert_ne!(curr, prev);
            assert_ne!(prev, curr);
            #[cfg(feature = "std")]
            assert_ne!(hash(curr), hash(prev));
            assert!(curr > prev);
            assert!(curr >= prev);
            assert!(prev < curr);
            assert!(prev <= curr);

            // text order agrees with numeric order
            assert!(prev.encode().as_str() < curr.encode().as_str());

            let clone = &curr.clone();
            assert_eq!(curr, clone);
            assert_eq!(clone, curr);
            #[cfg(feature = "std")]
            assert_eq!(hash(curr), hash(clone));
            assert!(curr >= clone);
            assert!(clone >= curr);
            assert!(curr <= clone);
            assert!(clone <= curr);

            prev = curr;
        }
    }
}
