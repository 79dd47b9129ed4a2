use std::fmt;
use std::str::FromStr;

use ethers::utils::keccak256;

use super::types::ArgumentType;
use crate::errors::ParseError;

/// The first four bytes of the keccak-256 hash of a canonical signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    pub fn of(text: &str) -> Self {
        let hash = keccak256(text.as_bytes());
        Selector([hash[0], hash[1], hash[2], hash[3]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// A method signature such as `transfer(address,uint256)`.
///
/// `constructor(...)` and an empty name both denote the contract constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    pub inputs: Vec<ArgumentType>,
    pub selector: Selector,
}

impl MethodSignature {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let normalized: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let invalid = || ParseError::InvalidSignature(text.to_string());

        let open = normalized.find('(').ok_or_else(invalid)?;
        let close = normalized.find(')').ok_or_else(invalid)?;
        if open < 1
            || close < open
            || close != normalized.len() - 1
            || normalized[open + 1..].contains('(')
        {
            return Err(invalid());
        }

        let name = normalized[..open].to_string();
        let interior = &normalized[open + 1..close];
        let inputs = if interior.is_empty() {
            Vec::new()
        } else {
            interior
                .split(',')
                .map(ArgumentType::from_str)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(MethodSignature {
            selector: Selector::of(&normalized),
            name,
            inputs,
        })
    }

    pub fn is_constructor(&self) -> bool {
        self.name.is_empty() || self.name == "constructor"
    }

    /// Canonical signature text, e.g. `f(uint256,string)`.
    pub fn canonical(name: &str, inputs: &[ArgumentType]) -> String {
        let types: Vec<String> = inputs.iter().map(ToString::to_string).collect();
        format!("{name}({})", types.join(","))
    }
}

impl FromStr for MethodSignature {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MethodSignature::parse(s)
    }
}
