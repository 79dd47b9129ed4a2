//! Contract ABI packing.
//!
//! Values are laid out as a tuple: every static value occupies its head
//! slot(s) directly, every dynamic value occupies one head word holding the
//! byte offset of its tail, measured from the start of the tuple.

use ethers::types::U256;

use super::types::ArgumentType;
use super::value::ParsedValue;
use crate::errors::ParseError;

const WORD: usize = 32;

/// Packs `values` as one ABI tuple.
///
/// Values built by hand rather than by `parse_value` are checked first: fixed
/// bytes longer than a word are rejected.
pub fn encode(values: &[ParsedValue]) -> Result<Vec<u8>, ParseError> {
    values.iter().try_for_each(check)?;
    Ok(pack(values))
}

/// Packs a single value as a one-element tuple.
pub fn encode_single(value: &ParsedValue) -> Result<Vec<u8>, ParseError> {
    encode(std::slice::from_ref(value))
}

fn check(value: &ParsedValue) -> Result<(), ParseError> {
    match value {
        ParsedValue::FixedBytes(bytes) if bytes.is_empty() || bytes.len() > WORD => {
            Err(ParseError::invalid(
                "fixed bytes",
                format!("0x{}", hex::encode(bytes)),
                format!("expected 1 to {WORD} bytes got {}", bytes.len()),
            ))
        }
        ParsedValue::Array { items, .. } => items.iter().try_for_each(check),
        _ => Ok(()),
    }
}

fn pack(values: &[ParsedValue]) -> Vec<u8> {
    let head_size: usize = values.iter().map(head_len).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for value in values {
        if is_dynamic(value) {
            head.extend_from_slice(&usize_word(head_size + tail.len()));
            tail.extend(encode_tail(value));
        } else {
            head.extend(encode_static(value));
        }
    }

    head.extend(tail);
    head
}

fn is_dynamic(value: &ParsedValue) -> bool {
    match value {
        ParsedValue::String(_) | ParsedValue::Bytes(_) => true,
        ParsedValue::Array { kind, .. } => kind.is_dynamic(),
        _ => false,
    }
}

fn head_len(value: &ParsedValue) -> usize {
    match value {
        ParsedValue::Array {
            kind: ArgumentType::FixedArray(..),
            items,
        } if !is_dynamic(value) => items.len() * WORD,
        _ => WORD,
    }
}

fn encode_static(value: &ParsedValue) -> Vec<u8> {
    match value {
        ParsedValue::Array { items, .. } => items.iter().flat_map(encode_static).collect(),
        scalar => word(scalar).to_vec(),
    }
}

fn encode_tail(value: &ParsedValue) -> Vec<u8> {
    match value {
        ParsedValue::String(s) => length_prefixed(s.as_bytes()),
        ParsedValue::Bytes(bytes) => length_prefixed(bytes),
        ParsedValue::Array {
            kind: ArgumentType::DynamicArray(_),
            items,
        } => {
            let mut out = usize_word(items.len()).to_vec();
            out.extend(pack(items));
            out
        }
        ParsedValue::Array { items, .. } => pack(items),
        scalar => word(scalar).to_vec(),
    }
}

fn length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let padded = bytes.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD + padded);
    out.extend_from_slice(&usize_word(bytes.len()));
    out.extend_from_slice(bytes);
    out.resize(WORD + padded, 0);
    out
}

fn usize_word(n: usize) -> [u8; WORD] {
    uint_word(U256::from(n))
}

fn uint_word(n: U256) -> [u8; WORD] {
    let mut out = [0u8; WORD];
    n.to_big_endian(&mut out);
    out
}

fn int_word(n: i64) -> [u8; WORD] {
    let fill = if n < 0 { 0xff } else { 0x00 };
    let mut out = [fill; WORD];
    out[WORD - 8..].copy_from_slice(&n.to_be_bytes());
    out
}

fn word(value: &ParsedValue) -> [u8; WORD] {
    match value {
        ParsedValue::Address(address) => {
            let mut out = [0u8; WORD];
            out[WORD - 20..].copy_from_slice(address.as_bytes());
            out
        }
        ParsedValue::Bool(b) => uint_word(U256::from(u8::from(*b))),
        ParsedValue::FixedBytes(bytes) => {
            let mut out = [0u8; WORD];
            out[..bytes.len()].copy_from_slice(bytes);
            out
        }
        ParsedValue::Uint8(n) => uint_word(U256::from(*n)),
        ParsedValue::Uint16(n) => uint_word(U256::from(*n)),
        ParsedValue::Uint32(n) => uint_word(U256::from(*n)),
        ParsedValue::Uint64(n) => uint_word(U256::from(*n)),
        ParsedValue::Int8(n) => int_word(i64::from(*n)),
        ParsedValue::Int16(n) => int_word(i64::from(*n)),
        ParsedValue::Int32(n) => int_word(i64::from(*n)),
        ParsedValue::Int64(n) => int_word(*n),
        ParsedValue::BigUint(n) => uint_word(*n),
        ParsedValue::BigInt(n) => uint_word(n.into_raw()),
        // Dynamic values never reach a head slot.
        ParsedValue::String(_) | ParsedValue::Bytes(_) | ParsedValue::Array { .. } => {
            [0u8; WORD]
        }
    }
}
