//! Call data compilation.
//!
//! [`InterfaceCompiler`] packs all arguments as one ABI tuple using the types
//! declared in a contract ABI. [`SignatureCompiler`] only knows a signature
//! string and packs every argument on its own, concatenating the segments.
//! The two agree whenever at most one argument is dynamic; with two or more
//! dynamic arguments the signature-only output places each offset relative to
//! its own segment rather than to the whole tuple.

use log::debug;

use crate::abi::{encode, encode_single, parse_arguments, Interface, MethodSignature, Selector};
use crate::errors::ParseError;

pub trait CallDataCompiler {
    fn compile(&self, args: &[String]) -> Result<Vec<u8>, ParseError>;
}

/// Compiles against a method (or the constructor, for an empty name) of a
/// contract ABI.
#[derive(Debug)]
pub struct InterfaceCompiler<'a> {
    interface: &'a Interface,
    method: String,
}

impl<'a> InterfaceCompiler<'a> {
    pub fn new(interface: &'a Interface, method: impl Into<String>) -> Self {
        InterfaceCompiler {
            interface,
            method: method.into(),
        }
    }

    pub fn constructor(interface: &'a Interface) -> Self {
        Self::new(interface, "")
    }
}

impl CallDataCompiler for InterfaceCompiler<'_> {
    fn compile(&self, args: &[String]) -> Result<Vec<u8>, ParseError> {
        let types = self.interface.resolve(&self.method)?;
        let values = parse_arguments(&types, args)?;

        let mut data = Vec::new();
        if !self.method.is_empty() {
            let selector = Selector::of(&MethodSignature::canonical(&self.method, &types));
            debug!("Selector for {}: {selector}", self.method);
            data.extend_from_slice(selector.as_bytes());
        }
        data.extend(encode(&values)?);
        Ok(data)
    }
}

/// Compiles from a bare signature string such as `transfer(address,uint256)`.
#[derive(Debug, Clone)]
pub struct SignatureCompiler {
    signature: MethodSignature,
    with_selector: bool,
}

impl SignatureCompiler {
    /// A method call: the packed arguments are prefixed with the selector.
    pub fn call(signature: &str) -> Result<Self, ParseError> {
        Ok(SignatureCompiler {
            signature: MethodSignature::parse(signature)?,
            with_selector: true,
        })
    }

    /// Constructor arguments: no selector.
    pub fn constructor(signature: &str) -> Result<Self, ParseError> {
        Ok(SignatureCompiler {
            signature: MethodSignature::parse(signature)?,
            with_selector: false,
        })
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }
}

impl CallDataCompiler for SignatureCompiler {
    fn compile(&self, args: &[String]) -> Result<Vec<u8>, ParseError> {
        let values = parse_arguments(&self.signature.inputs, args)?;

        let mut data = Vec::new();
        if self.with_selector {
            debug!(
                "Selector for {}: {}",
                self.signature.name, self.signature.selector
            );
            data.extend_from_slice(self.signature.selector.as_bytes());
        }
        for value in &values {
            data.extend(encode_single(value)?);
        }
        Ok(data)
    }
}

/// Decodes a bytecode file: hex text with an optional `0x` prefix.
pub fn decode_bytecode(text: &str) -> Result<Vec<u8>, ParseError> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| ParseError::invalid("bytecode", trimmed, e))
}

/// Deployment data: the creation bytecode followed by the constructor arguments.
pub fn deploy_data(bytecode: &[u8], constructor_data: &[u8]) -> Vec<u8> {
    [bytecode, constructor_data].concat()
}
