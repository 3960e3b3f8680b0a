//! Literal text to value conversion.
//!
//! The lexer has already checked literal spelling, so a parse failure here
//! is an internal fault: it is logged at error level and reported as
//! [`AstError::MalformedLiteral`].
//!
//! # Examples
//!
//! ```
//! use ferrule_ast::literal::{parse_float, parse_integer, FloatSemantics};
//!
//! // A leading zero does not select octal.
//! assert_eq!(parse_integer("0100", 32).unwrap().to_u64(), Some(100));
//! assert_eq!(parse_integer("0x1F", 32).unwrap().to_u64(), Some(31));
//!
//! let half = parse_float("0.5", FloatSemantics::IeeeSingle).unwrap();
//! assert_eq!(half.to_f64(), 0.5);
//! ```

use std::fmt;

use ferrule_log::error;
use num_bigint::{BigInt, BigUint};

use crate::error::{AstError, AstResult};

/// Floating-point precision of a builtin float type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatSemantics {
    /// IEEE 754 binary32
    IeeeSingle,
    /// IEEE 754 binary64
    IeeeDouble,
}

impl FloatSemantics {
    /// Storage width in bits.
    #[must_use]
    pub const fn bit_width(self) -> u32 {
        match self {
            FloatSemantics::IeeeSingle => 32,
            FloatSemantics::IeeeDouble => 64,
        }
    }

    /// Name used in builtin type spellings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FloatSemantics::IeeeSingle => "FPIEEE32",
            FloatSemantics::IeeeDouble => "FPIEEE64",
        }
    }

    /// Significand bits, including the implicit leading bit.
    const fn precision(self) -> i64 {
        match self {
            FloatSemantics::IeeeSingle => 24,
            FloatSemantics::IeeeDouble => 53,
        }
    }

    /// Exponent of the smallest normal value.
    const fn min_exponent(self) -> i64 {
        match self {
            FloatSemantics::IeeeSingle => -126,
            FloatSemantics::IeeeDouble => -1022,
        }
    }

    /// Exponent of the largest finite value.
    const fn max_exponent(self) -> i64 {
        match self {
            FloatSemantics::IeeeSingle => 127,
            FloatSemantics::IeeeDouble => 1023,
        }
    }
}

/// A fixed-width integer of arbitrary size.
///
/// The value is held as its unsigned bit pattern; `Display` prints the
/// two's complement signed interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApInt {
    bits: BigUint,
    bit_width: u32,
}

impl ApInt {
    /// Creates a value of `bit_width` bits, truncating `value` to fit.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::InvalidBitWidth`] for a width of zero.
    pub fn new(value: BigUint, bit_width: u32) -> AstResult<Self> {
        if bit_width == 0 {
            return Err(AstError::InvalidBitWidth(bit_width));
        }
        Ok(Self {
            bits: truncate(value, bit_width),
            bit_width,
        })
    }

    /// Width in bits.
    #[must_use]
    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Unsigned bit pattern.
    #[must_use]
    pub fn as_unsigned(&self) -> &BigUint {
        &self.bits
    }

    /// Returns `true` if the sign bit is set.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.bits.bit(u64::from(self.bit_width - 1))
    }

    /// Two's complement signed value.
    #[must_use]
    pub fn to_signed(&self) -> BigInt {
        let unsigned = BigInt::from(self.bits.clone());
        if self.is_negative() {
            unsigned - (BigInt::from(1u8) << self.bit_width)
        } else {
            unsigned
        }
    }

    /// Unsigned value if it fits in a `u64`.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        match self.bits.to_u64_digits().as_slice() {
            [] => Some(0),
            [digit] => Some(*digit),
            _ => None,
        }
    }

    /// Zero-extends or truncates to `bit_width`.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::InvalidBitWidth`] for a width of zero.
    pub fn zext_or_trunc(self, bit_width: u32) -> AstResult<Self> {
        Self::new(self.bits, bit_width)
    }
}

impl fmt::Display for ApInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_signed())
    }
}

fn truncate(value: BigUint, bit_width: u32) -> BigUint {
    if value.bits() <= u64::from(bit_width) {
        return value;
    }
    let mask = (BigUint::from(1u8) << bit_width) - 1u8;
    value & mask
}

/// A floating-point value rounded to a precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApFloat {
    semantics: FloatSemantics,
    value: f64,
}

impl ApFloat {
    /// Precision.
    #[must_use]
    pub fn semantics(&self) -> FloatSemantics {
        self.semantics
    }

    /// The value; exact for both precisions.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for ApFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

fn malformed(text: &str, reason: &'static str) -> AstError {
    error!("internal fault: literal '{text}' reached value extraction: {reason}");
    AstError::MalformedLiteral {
        text: text.to_string(),
        reason,
    }
}

/// Parses integer literal text into a `bit_width`-bit value.
///
/// Text with a leading `0` followed by a decimal digit is decimal. Otherwise
/// `0x`, `0o` and `0b` prefixes select the radix. The parsed value is
/// zero-extended or truncated to `bit_width`.
///
/// # Errors
///
/// Returns [`AstError::MalformedLiteral`] for text that is not an integer
/// and [`AstError::InvalidBitWidth`] for a zero width.
pub fn parse_integer(text: &str, bit_width: u32) -> AstResult<ApInt> {
    if bit_width == 0 {
        return Err(AstError::InvalidBitWidth(bit_width));
    }

    let bytes = text.as_bytes();
    let leading_zero_decimal = bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit();
    let (digits, radix) = if leading_zero_decimal {
        (text, 10)
    } else {
        split_radix_prefix(text)
    };

    if digits.is_empty() || !digits.bytes().all(|b| char::from(b).is_digit(radix)) {
        return Err(malformed(text, "invalid digit for radix"));
    }

    let value = BigUint::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| malformed(text, "invalid digit for radix"))?;
    ApInt::new(value, bit_width)
}

fn split_radix_prefix(text: &str) -> (&str, u32) {
    let prefixes: [(&str, u32); 6] = [
        ("0x", 16),
        ("0X", 16),
        ("0o", 8),
        ("0O", 8),
        ("0b", 2),
        ("0B", 2),
    ];
    prefixes
        .iter()
        .find_map(|&(prefix, radix)| text.strip_prefix(prefix).map(|rest| (rest, radix)))
        .unwrap_or((text, 10))
}

/// Parses float literal text, rounding to nearest with ties to even.
///
/// Decimal and hexadecimal (`0x1.8p3`) text are both rounded once, directly
/// to the requested precision. Values past the largest finite value become
/// infinity; values below the subnormal range become zero.
///
/// # Errors
///
/// Returns [`AstError::MalformedLiteral`] for text that is not a number.
pub fn parse_float(text: &str, semantics: FloatSemantics) -> AstResult<ApFloat> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        let (mantissa, exponent) = parse_hex_float(hex).map_err(|reason| malformed(text, reason))?;
        return Ok(ApFloat {
            semantics,
            value: round_binary(&mantissa, exponent, semantics),
        });
    }

    let value = match semantics {
        FloatSemantics::IeeeSingle => text.parse::<f32>().map(f64::from),
        FloatSemantics::IeeeDouble => text.parse::<f64>(),
    }
    .map_err(|_| malformed(text, "not a decimal floating-point number"))?;

    Ok(ApFloat {
        semantics,
        value,
    })
}

/// Splits hexadecimal float text into an exact `mantissa * 2^exponent`.
fn parse_hex_float(hex: &str) -> Result<(BigUint, i64), &'static str> {
    let (significand, exponent) = match hex.find(['p', 'P']) {
        Some(pos) => (&hex[..pos], &hex[pos + 1..]),
        None => (hex, "0"),
    };
    let exponent: i64 = exponent.parse().map_err(|_| "invalid binary exponent")?;

    let (int_part, frac_part) = significand.split_once('.').unwrap_or((significand, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err("missing hexadecimal digits");
    }

    let digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).collect();
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err("invalid hexadecimal digit");
    }
    let mantissa = BigUint::parse_bytes(&digits, 16).ok_or("invalid hexadecimal digit")?;

    let frac_bits = i64::try_from(frac_part.len() * 4).map_err(|_| "fraction too long")?;
    let exponent = exponent
        .checked_sub(frac_bits)
        .ok_or("binary exponent out of range")?;
    Ok((mantissa, exponent))
}

/// Rounds the exact value `mantissa * 2^exponent` to `semantics`, once, with
/// ties to even.
fn round_binary(mantissa: &BigUint, exponent: i64, semantics: FloatSemantics) -> f64 {
    let bits = mantissa.bits();
    if bits == 0 {
        return 0.0;
    }
    let bits = i64::try_from(bits).unwrap_or(i64::MAX);
    let precision = semantics.precision();

    // Exponent of the leading bit; rounding can only raise it.
    let top = exponent.saturating_add(bits - 1);
    if top > semantics.max_exponent() {
        return f64::INFINITY;
    }

    // Exponent of the last kept bit, pinned for subnormal results.
    let lsb = top
        .saturating_sub(precision - 1)
        .max(semantics.min_exponent() - (precision - 1));
    let shift = lsb.saturating_sub(exponent);

    let kept = if shift <= 0 {
        // `shift > -precision` here, so the shifted value stays small.
        mantissa << shift.unsigned_abs()
    } else if shift > bits {
        // Below half of the smallest subnormal.
        return 0.0;
    } else {
        let shift = shift.unsigned_abs();
        let kept = mantissa >> shift;
        let rest = mantissa - (&kept << shift);
        let half = BigUint::from(1u8) << (shift - 1);
        if rest > half || (rest == half && kept.bit(0)) {
            kept + 1u8
        } else {
            kept
        }
    };

    let kept = match kept.to_u64_digits().as_slice() {
        [] => return 0.0,
        [digit] => *digit,
        _ => return f64::INFINITY,
    };
    let kept_bits = i64::from(u64::BITS - kept.leading_zeros());
    if lsb + kept_bits - 1 > semantics.max_exponent() {
        return f64::INFINITY;
    }

    // `kept < 2^54` and the product is representable, so both steps are exact.
    #[allow(clippy::cast_precision_loss)]
    let kept = kept as f64;
    kept * exact_power_of_two(lsb)
}

/// `2^exponent` for exponents within the binary64 range, subnormals included.
fn exact_power_of_two(exponent: i64) -> f64 {
    debug_assert!((-1074..=1023).contains(&exponent));
    let bits = if exponent >= -1022 {
        (exponent + 1023).unsigned_abs() << 52
    } else {
        1u64 << (exponent + 1074).unsigned_abs()
    };
    f64::from_bits(bits)
}
