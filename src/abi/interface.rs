use ethers::abi::{Abi, ParamType};
use log::debug;

use super::types::ArgumentType;
use crate::errors::ParseError;

/// A contract ABI loaded from its JSON description.
#[derive(Debug, Clone)]
pub struct Interface {
    abi: Abi,
}

impl Interface {
    pub fn from_json(bytes: &[u8]) -> Result<Self, ParseError> {
        let abi: Abi =
            serde_json::from_slice(bytes).map_err(|e| ParseError::Interface(e.to_string()))?;
        Ok(Interface { abi })
    }

    /// Looks up the input types of `name`, or of the constructor when `name`
    /// is empty. A contract without a declared constructor takes no arguments.
    pub fn resolve(&self, name: &str) -> Result<Vec<ArgumentType>, ParseError> {
        let params: Vec<&ParamType> = if name.is_empty() {
            match self.abi.constructor() {
                Some(constructor) => constructor.inputs.iter().map(|p| &p.kind).collect(),
                None => Vec::new(),
            }
        } else {
            let function = self
                .abi
                .function(name)
                .map_err(|_| ParseError::UnknownMethod(name.to_string()))?;
            function.inputs.iter().map(|p| &p.kind).collect()
        };
        debug!("Resolved '{name}' to {} inputs", params.len());
        params.into_iter().map(argument_type).collect()
    }
}

fn argument_type(param: &ParamType) -> Result<ArgumentType, ParseError> {
    match param {
        ParamType::Array(element) => Ok(ArgumentType::DynamicArray(Box::new(scalar(element)?))),
        ParamType::FixedArray(element, len) => {
            Ok(ArgumentType::FixedArray(Box::new(scalar(element)?), *len))
        }
        other => scalar(other),
    }
}

// Tuples, nested arrays and widths outside the type grammar are rejected.
fn scalar(param: &ParamType) -> Result<ArgumentType, ParseError> {
    let unknown = || ParseError::UnknownType(param.to_string());
    match param {
        ParamType::Address => Ok(ArgumentType::Address),
        ParamType::Bool => Ok(ArgumentType::Bool),
        ParamType::String => Ok(ArgumentType::String),
        ParamType::Bytes => Ok(ArgumentType::Bytes),
        ParamType::FixedBytes(size) => ArgumentType::fixed_bytes(*size).ok_or_else(unknown),
        ParamType::Int(width) => ArgumentType::integer(true, *width).ok_or_else(unknown),
        ParamType::Uint(width) => ArgumentType::integer(false, *width).ok_or_else(unknown),
        _ => Err(unknown()),
    }
}
