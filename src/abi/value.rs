//! Conversion of command-line strings into typed ABI values.
//!
//! Integers of at most 64 bits are held in native fixed-width integers after
//! an explicit range check against the declared width. Wider integers have no
//! native representation here and are uniformly held as 256-bit values.

use std::fmt;

use ethers::types::{Address, I256, U256};

use super::types::{ArgumentType, MAX_NATIVE_WIDTH};
use crate::errors::ParseError;

/// A value whose representation exactly matches its declared [`ArgumentType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    Address(Address),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    FixedBytes(Vec<u8>),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    BigUint(U256),
    BigInt(I256),
    Array {
        kind: ArgumentType,
        items: Vec<ParsedValue>,
    },
}

/// Parses `value` according to the type token `kind`, e.g. `("uint8[]", "[1,2]")`.
pub fn parse_value(kind: &str, value: &str) -> Result<ParsedValue, ParseError> {
    kind.parse::<ArgumentType>()?.parse_value(value)
}

/// Parses one argument per declared type. The counts must match exactly.
pub fn parse_arguments(
    types: &[ArgumentType],
    args: &[String],
) -> Result<Vec<ParsedValue>, ParseError> {
    if types.len() != args.len() {
        return Err(ParseError::ArityMismatch {
            expected: types.len(),
            got: args.len(),
        });
    }
    types
        .iter()
        .zip(args)
        .map(|(kind, arg)| kind.parse_value(arg))
        .collect()
}

impl ArgumentType {
    pub fn parse_value(&self, value: &str) -> Result<ParsedValue, ParseError> {
        match self {
            ArgumentType::DynamicArray(element) => Ok(ParsedValue::Array {
                kind: self.clone(),
                items: parse_elements(element, value)?,
            }),
            ArgumentType::FixedArray(element, len) => {
                let items = parse_elements(element, value)?;
                if items.len() != *len {
                    return Err(ParseError::ArrayLength {
                        kind: self.to_string(),
                        expected: *len,
                        got: items.len(),
                    });
                }
                Ok(ParsedValue::Array {
                    kind: self.clone(),
                    items,
                })
            }
            scalar => parse_scalar(scalar, value),
        }
    }
}

fn parse_elements(element: &ArgumentType, value: &str) -> Result<Vec<ParsedValue>, ParseError> {
    split_array(value)?
        .iter()
        .map(|item| parse_scalar(element, item))
        .collect()
}

fn parse_scalar(kind: &ArgumentType, value: &str) -> Result<ParsedValue, ParseError> {
    match kind {
        ArgumentType::Address => parse_address(value).map(ParsedValue::Address),
        ArgumentType::Bool => match value {
            "true" => Ok(ParsedValue::Bool(true)),
            "false" => Ok(ParsedValue::Bool(false)),
            _ => Err(ParseError::invalid(kind, value, "expected true or false")),
        },
        ArgumentType::String => Ok(ParsedValue::String(value.to_string())),
        ArgumentType::Bytes => decode_hex(kind, value).map(ParsedValue::Bytes),
        ArgumentType::FixedBytes(size) => {
            let bytes = decode_hex(kind, value)?;
            if bytes.len() != *size {
                return Err(ParseError::invalid(
                    kind,
                    value,
                    format!("expected {size} bytes got {}", bytes.len()),
                ));
            }
            Ok(ParsedValue::FixedBytes(bytes))
        }
        ArgumentType::Uint(width) if *width <= MAX_NATIVE_WIDTH => parse_native_uint(*width, value),
        ArgumentType::Int(width) if *width <= MAX_NATIVE_WIDTH => parse_native_int(*width, value),
        ArgumentType::Uint(width) => parse_big_uint(*width, value).map(ParsedValue::BigUint),
        ArgumentType::Int(width) => parse_big_int(*width, value).map(ParsedValue::BigInt),
        ArgumentType::DynamicArray(_) | ArgumentType::FixedArray(..) => {
            Err(ParseError::NestedArray(value.to_string()))
        }
    }
}

/// Parses a 20-byte address written as 40 hex characters, with or without `0x`.
pub fn parse_address(value: &str) -> Result<Address, ParseError> {
    let digits = strip_hex_prefix(value);
    if digits.len() != 40 {
        return Err(ParseError::invalid(
            ArgumentType::Address,
            value,
            "expected 40 hex characters",
        ));
    }
    let bytes =
        hex::decode(digits).map_err(|e| ParseError::invalid(ArgumentType::Address, value, e))?;
    Ok(Address::from_slice(&bytes))
}

fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

fn decode_hex(kind: &ArgumentType, value: &str) -> Result<Vec<u8>, ParseError> {
    hex::decode(strip_hex_prefix(value)).map_err(|e| ParseError::invalid(kind, value, e))
}

fn is_decimal(digits: &str) -> bool {
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_native_uint(width: usize, value: &str) -> Result<ParsedValue, ParseError> {
    let kind = ArgumentType::Uint(width);
    if !is_decimal(value) {
        return Err(ParseError::invalid(&kind, value, "invalid number"));
    }
    let n: u64 = value
        .parse()
        .map_err(|e| ParseError::invalid(&kind, value, e))?;
    if width < 64 && n >> width != 0 {
        return Err(ParseError::invalid(
            &kind,
            value,
            format!("value out of range for {width} bits"),
        ));
    }
    // Range checked above, the casts never truncate.
    Ok(match width {
        8 => ParsedValue::Uint8(n as u8),
        16 => ParsedValue::Uint16(n as u16),
        24 | 32 => ParsedValue::Uint32(n as u32),
        _ => ParsedValue::Uint64(n),
    })
}

fn parse_native_int(width: usize, value: &str) -> Result<ParsedValue, ParseError> {
    let kind = ArgumentType::Int(width);
    if !is_decimal(value.strip_prefix('-').unwrap_or(value)) {
        return Err(ParseError::invalid(&kind, value, "invalid number"));
    }
    let n: i64 = value
        .parse()
        .map_err(|e| ParseError::invalid(&kind, value, e))?;
    if width < 64 {
        let bound = 1i64 << (width - 1);
        if n < -bound || n >= bound {
            return Err(ParseError::invalid(
                &kind,
                value,
                format!("value out of range for {width} bits"),
            ));
        }
    }
    Ok(match width {
        8 => ParsedValue::Int8(n as i8),
        16 => ParsedValue::Int16(n as i16),
        24 | 32 => ParsedValue::Int32(n as i32),
        _ => ParsedValue::Int64(n),
    })
}

fn parse_big_uint(width: usize, value: &str) -> Result<U256, ParseError> {
    let kind = ArgumentType::Uint(width);
    if !is_decimal(value) {
        return Err(ParseError::invalid(&kind, value, "invalid number"));
    }
    let n = U256::from_dec_str(value).map_err(|e| ParseError::invalid(&kind, value, e))?;
    if n.bits() > width {
        return Err(ParseError::invalid(
            &kind,
            value,
            format!("value out of range for {width} bits"),
        ));
    }
    Ok(n)
}

fn parse_big_int(width: usize, value: &str) -> Result<I256, ParseError> {
    let kind = ArgumentType::Int(width);
    let (negative, digits) = match value.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, value),
    };
    if !is_decimal(digits) {
        return Err(ParseError::invalid(&kind, value, "invalid number"));
    }
    let magnitude =
        U256::from_dec_str(digits).map_err(|e| ParseError::invalid(&kind, value, e))?;
    let bound = U256::one() << (width - 1);
    let in_range = if negative {
        magnitude <= bound
    } else {
        magnitude < bound
    };
    if !in_range {
        return Err(ParseError::invalid(
            &kind,
            value,
            format!("value out of range for {width} bits"),
        ));
    }
    let raw = if negative {
        (!magnitude).overflowing_add(U256::one()).0
    } else {
        magnitude
    };
    Ok(I256::from_raw(raw))
}

/// Validates an array literal and splits it into its top-level elements.
///
/// Double quotes suspend the interpretation of brackets, commas and spaces
/// and are themselves dropped. Unquoted whitespace is ignored.
pub fn split_array(value: &str) -> Result<Vec<String>, ParseError> {
    let unbalanced = || ParseError::UnbalancedArray(value.to_string());
    let value = value.trim();
    if value.len() < 2 || !value.starts_with('[') || !value.ends_with(']') {
        return Err(unbalanced());
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut touched = false;
    let mut quoted = false;
    let mut closed = false;
    let mut depth: i32 = 0;

    for c in value.chars() {
        if closed {
            return Err(unbalanced());
        }
        if c == '"' {
            quoted = !quoted;
            touched = true;
            continue;
        }
        if quoted {
            current.push(c);
            continue;
        }
        match c {
            c if c.is_whitespace() => {}
            '[' => {
                depth += 1;
                if depth > 1 {
                    return Err(ParseError::NestedArray(value.to_string()));
                }
            }
            ']' => {
                depth -= 1;
                if depth < 0 {
                    return Err(unbalanced());
                }
                closed = depth == 0;
            }
            ',' => {
                items.push(std::mem::take(&mut current));
                touched = true;
            }
            c => {
                current.push(c);
                touched = true;
            }
        }
    }

    if quoted || depth != 0 {
        return Err(unbalanced());
    }
    if touched {
        items.push(current);
    }
    Ok(items)
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    write!(f, "0x{}", hex::encode(bytes))
}

/// Renders values back into the literal syntax accepted by [`parse_value`].
impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedValue::Address(address) => write_hex(f, address.as_bytes()),
            ParsedValue::Bool(b) => write!(f, "{b}"),
            ParsedValue::String(s) => write!(f, "{s}"),
            ParsedValue::Bytes(bytes) | ParsedValue::FixedBytes(bytes) => write_hex(f, bytes),
            ParsedValue::Uint8(n) => write!(f, "{n}"),
            ParsedValue::Uint16(n) => write!(f, "{n}"),
            ParsedValue::Uint32(n) => write!(f, "{n}"),
            ParsedValue::Uint64(n) => write!(f, "{n}"),
            ParsedValue::Int8(n) => write!(f, "{n}"),
            ParsedValue::Int16(n) => write!(f, "{n}"),
            ParsedValue::Int32(n) => write!(f, "{n}"),
            ParsedValue::Int64(n) => write!(f, "{n}"),
            ParsedValue::BigUint(n) => write!(f, "{n}"),
            ParsedValue::BigInt(n) => write!(f, "{n}"),
            ParsedValue::Array { items, .. } => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    match item {
                        ParsedValue::String(s) => write!(f, "\"{s}\"")?,
                        other => write!(f, "{other}")?,
                    }
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_address_case_agnostic() {
        let lower = parse_value("address", "0xf5bc9107916b91a3ea5966cd2e51655d21b7eb02").unwrap();
        let mixed = parse_value("address", "F5Bc9107916B91A3Ea5966cd2e51655D21B7Eb02").unwrap();
        assert_eq!(lower, mixed);
        assert_eq!(
            lower.to_string(),
            "0xf5bc9107916b91a3ea5966cd2e51655d21b7eb02"
        );
    }

    #[test]
    fn test_reject_bad_addresses() {
        for value in ["0x1234", "0xzz00000000000000000000000000000000000000", ""] {
            assert!(matches!(
                parse_value("address", value),
                Err(ParseError::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn test_parse_bool_and_string() {
        assert_eq!(parse_value("bool", "true"), Ok(ParsedValue::Bool(true)));
        assert_eq!(parse_value("bool", "false"), Ok(ParsedValue::Bool(false)));
        assert!(parse_value("bool", "yes").is_err());
        assert_eq!(
            parse_value("string", "hello, world"),
            Ok(ParsedValue::String("hello, world".to_string()))
        );
    }

    #[test]
    fn test_parse_fixed_bytes() {
        assert_eq!(
            parse_value("bytes4", "a9059cbb"),
            Ok(ParsedValue::FixedBytes(vec![0xa9, 0x05, 0x9c, 0xbb]))
        );
        assert_eq!(
            parse_value("bytes2", "0xbeef"),
            Ok(ParsedValue::FixedBytes(vec![0xbe, 0xef]))
        );
        assert!(parse_value("bytes4", "a9059c").is_err());
        assert!(parse_value("bytes1", "zz").is_err());
    }

    #[test]
    fn test_native_integer_widths() {
        assert_eq!(parse_value("uint8", "255"), Ok(ParsedValue::Uint8(255)));
        assert!(parse_value("uint8", "256").is_err());
        assert_eq!(
            parse_value("uint24", "16777215"),
            Ok(ParsedValue::Uint32(16_777_215))
        );
        assert!(parse_value("uint24", "16777216").is_err());
        assert_eq!(
            parse_value("uint64", "18446744073709551615"),
            Ok(ParsedValue::Uint64(u64::MAX))
        );
        assert_eq!(parse_value("int8", "-128"), Ok(ParsedValue::Int8(-128)));
        assert!(parse_value("int8", "128").is_err());
        assert_eq!(
            parse_value("int40", "-549755813888"),
            Ok(ParsedValue::Int64(-549_755_813_888))
        );
        assert!(parse_value("uint16", "-1").is_err());
        assert!(parse_value("uint16", "1.5").is_err());
    }

    #[test]
    fn test_big_integer_widths() {
        assert_eq!(
            parse_value("uint256", "42"),
            Ok(ParsedValue::BigUint(U256::from(42u64)))
        );
        assert_eq!(
            parse_value("uint72", "4722366482869645213695"),
            Ok(ParsedValue::BigUint(
                U256::from_dec_str("4722366482869645213695").unwrap()
            ))
        );
        assert!(parse_value("uint72", "4722366482869645213696").is_err());
        assert_eq!(
            parse_value("int", "-5"),
            Ok(ParsedValue::BigInt(I256::from_dec_str("-5").unwrap()))
        );
        assert!(parse_value("int72", "2361183241434822606848").is_err());
        assert!(parse_value("int72", "-2361183241434822606848").is_ok());
        assert!(parse_value("uint256", "").is_err());
        assert!(parse_value("uint256", "0x10").is_err());
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(
            parse_value("uint7", "1"),
            Err(ParseError::UnknownType("uint7".to_string()))
        );
    }

    #[test]
    fn test_parse_dynamic_array() {
        let value = parse_value("uint8[]", "[1,2,3]").unwrap();
        let ParsedValue::Array { items, .. } = &value else {
            panic!("expected array, got {value:?}");
        };
        assert_eq!(
            items,
            &vec![
                ParsedValue::Uint8(1),
                ParsedValue::Uint8(2),
                ParsedValue::Uint8(3)
            ]
        );
        assert_eq!(value.to_string(), "[1,2,3]");
    }

    #[test]
    fn test_unbalanced_arrays() {
        for value in ["[1,2", "1,2]", "[1,2]]", "[1][2]", "[\"a,b]", "["] {
            assert!(
                parse_value("uint8[]", value).is_err(),
                "{value} should be rejected"
            );
        }
        assert!(matches!(
            parse_value("uint8[]", "[1,2"),
            Err(ParseError::UnbalancedArray(_))
        ));
        assert!(matches!(
            parse_value("uint8[]", "[[1],[2]]"),
            Err(ParseError::NestedArray(_))
        ));
    }

    #[test]
    fn test_quoted_array_elements() {
        let value = parse_value("string[]", r#"["a, b", "[c]", ""]"#).unwrap();
        assert_eq!(
            value,
            ParsedValue::Array {
                kind: "string[]".parse().unwrap(),
                items: vec![
                    ParsedValue::String("a, b".to_string()),
                    ParsedValue::String("[c]".to_string()),
                    ParsedValue::String(String::new()),
                ],
            }
        );
    }

    #[test]
    fn test_fixed_array_length() {
        assert!(parse_value("bool[2]", "[true, false]").is_ok());
        assert_eq!(
            parse_value("bool[2]", "[true]"),
            Err(ParseError::ArrayLength {
                kind: "bool[2]".to_string(),
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(
            parse_value("address[]", "[]"),
            Ok(ParsedValue::Array {
                kind: "address[]".parse().unwrap(),
                items: vec![],
            })
        );
    }

    #[test]
    fn test_array_element_failure() {
        assert!(matches!(
            parse_value("uint8[]", "[1,300]"),
            Err(ParseError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_arity_mismatch() {
        let types = vec![ArgumentType::Address, ArgumentType::Uint(256)];
        let args = vec!["0x0000000000000000000000000000000000000000".to_string()];
        assert_eq!(
            parse_arguments(&types, &args),
            Err(ParseError::ArityMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    proptest! {
        #[test]
        fn prop_uint64_round_trip(n in any::<u64>()) {
            let parsed = parse_value("uint64", &n.to_string()).unwrap();
            prop_assert_eq!(parsed.to_string(), n.to_string());
        }

        #[test]
        fn prop_int32_round_trip(n in any::<i32>()) {
            let parsed = parse_value("int32", &n.to_string()).unwrap();
            prop_assert_eq!(parsed, ParsedValue::Int32(n));
        }

        #[test]
        fn prop_int256_round_trip(n in any::<i128>()) {
            let parsed = parse_value("int256", &n.to_string()).unwrap();
            prop_assert_eq!(parsed.to_string(), n.to_string());
        }

        #[test]
        fn prop_address_round_trip(bytes in prop::array::uniform20(any::<u8>())) {
            let text = format!("0x{}", hex::encode(bytes));
            let parsed = parse_value("address", &text).unwrap();
            prop_assert_eq!(parsed.to_string(), text);
        }
    }
}
