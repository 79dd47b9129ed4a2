use std::fmt;
use std::str::FromStr;

use crate::errors::ParseError;

/// Largest integer width that parses into a native fixed-width integer.
pub const MAX_NATIVE_WIDTH: usize = 64;

/// The closed set of argument kinds understood by the encoder.
///
/// Arrays are one-dimensional: the element of a `DynamicArray` or
/// `FixedArray` is always a scalar kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentType {
    Address,
    Bool,
    String,
    Bytes,
    FixedBytes(usize),
    Int(usize),
    Uint(usize),
    DynamicArray(Box<ArgumentType>),
    FixedArray(Box<ArgumentType>, usize),
}

impl ArgumentType {
    /// Whether values of this kind are encoded in the tail of a tuple.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ArgumentType::String | ArgumentType::Bytes | ArgumentType::DynamicArray(_) => true,
            ArgumentType::FixedArray(element, _) => element.is_dynamic(),
            _ => false,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            ArgumentType::DynamicArray(_) | ArgumentType::FixedArray(..)
        )
    }

    fn parse_scalar(token: &str) -> Result<Self, ParseError> {
        let unknown = || ParseError::UnknownType(token.to_string());
        match token {
            "address" => return Ok(ArgumentType::Address),
            "bool" => return Ok(ArgumentType::Bool),
            "string" => return Ok(ArgumentType::String),
            "bytes" => return Ok(ArgumentType::Bytes),
            "int" => return Ok(ArgumentType::Int(256)),
            "uint" => return Ok(ArgumentType::Uint(256)),
            _ => {}
        }

        if let Some(size) = token.strip_prefix("bytes") {
            return parse_width(size)
                .and_then(ArgumentType::fixed_bytes)
                .ok_or_else(unknown);
        }

        let (signed, width) = if let Some(width) = token.strip_prefix("uint") {
            (false, width)
        } else if let Some(width) = token.strip_prefix("int") {
            (true, width)
        } else {
            return Err(unknown());
        };
        parse_width(width)
            .and_then(|width| ArgumentType::integer(signed, width))
            .ok_or_else(unknown)
    }

    /// `bytesN`, for `N` in `1..=32`.
    pub fn fixed_bytes(size: usize) -> Option<Self> {
        (1..=32)
            .contains(&size)
            .then_some(ArgumentType::FixedBytes(size))
    }

    /// `intN` or `uintN`, for `N` a multiple of 8 in `8..=256`.
    pub fn integer(signed: bool, width: usize) -> Option<Self> {
        if width == 0 || width > 256 || width % 8 != 0 {
            return None;
        }
        Some(if signed {
            ArgumentType::Int(width)
        } else {
            ArgumentType::Uint(width)
        })
    }
}

// Digits only: rejects signs, whitespace and leading zeros such as "uint08".
fn parse_width(digits: &str) -> Option<usize> {
    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return None;
    }
    digits.parse().ok()
}

impl FromStr for ArgumentType {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let Some(begin) = token.find('[') else {
            return ArgumentType::parse_scalar(token);
        };

        let element = ArgumentType::parse_scalar(&token[..begin])?;
        let suffix = &token[begin..];
        let inner = suffix
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| ParseError::UnknownType(token.to_string()))?;
        if inner.contains('[') || inner.contains(']') {
            return Err(ParseError::NestedArray(token.to_string()));
        }
        if inner.is_empty() {
            return Ok(ArgumentType::DynamicArray(Box::new(element)));
        }
        match parse_width(inner) {
            Some(len) if len > 0 => Ok(ArgumentType::FixedArray(Box::new(element), len)),
            _ => Err(ParseError::UnknownType(token.to_string())),
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentType::Address => write!(f, "address"),
            ArgumentType::Bool => write!(f, "bool"),
            ArgumentType::String => write!(f, "string"),
            ArgumentType::Bytes => write!(f, "bytes"),
            ArgumentType::FixedBytes(size) => write!(f, "bytes{size}"),
            ArgumentType::Int(width) => write!(f, "int{width}"),
            ArgumentType::Uint(width) => write!(f, "uint{width}"),
            ArgumentType::DynamicArray(element) => write!(f, "{element}[]"),
            ArgumentType::FixedArray(element, len) => write!(f, "{element}[{len}]"),
        }
    }
}
