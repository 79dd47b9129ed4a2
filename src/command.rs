use ethers::types::Address;
use log::debug;

use crate::config::Config;
use crate::errors::ValidationError;

/// The three transaction shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Plain value transfer, `ethsign ether`.
    Transfer,
    /// Contract method invocation, `ethsign call`.
    Call,
    /// Contract creation, `ethsign deploy`.
    Deploy,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Transfer => "ether",
            Command::Call => "call",
            Command::Deploy => "deploy",
        }
    }
}

/// Where the transaction data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// No data at all.
    Empty,
    /// Raw message bytes attached to a transfer.
    Message(Vec<u8>),
    /// A signature string plus its arguments.
    Signature { signature: String, args: Vec<String> },
    /// A method name resolved in the `--abi` file; empty for the constructor.
    Interface { method: String, args: Vec<String> },
}

/// A classified request: what to build, before any file is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub recipient: Option<Address>,
    pub data: DataSource,
}

fn is_signature(token: &str) -> bool {
    token.contains('(')
}

/// `0x`-prefixed hex is decoded, anything else is taken as UTF-8 text.
fn message_bytes(message: &str) -> Vec<u8> {
    message
        .strip_prefix("0x")
        .and_then(|digits| hex::decode(digits).ok())
        .unwrap_or_else(|| message.as_bytes().to_vec())
}

fn split_first(args: &[String]) -> (String, Vec<String>) {
    match args.split_first() {
        Some((first, rest)) => (first.clone(), rest.to_vec()),
        None => (String::new(), Vec::new()),
    }
}

/// Applies the per-command flag rules and decides how the data is compiled.
pub fn classify(config: &Config) -> Result<Invocation, ValidationError> {
    let command = config.command;
    let has_abi = config.abi.is_some();
    let args = &config.args;

    if command != Command::Deploy && config.bin.is_some() {
        return Err(ValidationError::UnexpectedBytecode);
    }

    let (recipient, data) = match command {
        Command::Transfer => {
            let to = config
                .to
                .ok_or(ValidationError::MissingRecipient(command.name()))?;
            let data = match args.as_slice() {
                [] => DataSource::Empty,
                [message] => DataSource::Message(message_bytes(message)),
                _ => return Err(ValidationError::TooManyArguments(args.len())),
            };
            (Some(to), data)
        }
        Command::Call => {
            let to = config
                .to
                .ok_or(ValidationError::MissingRecipient(command.name()))?;
            let data = match args.first() {
                None if has_abi => DataSource::Empty,
                None => return Err(ValidationError::MissingMethod),
                Some(first) if !has_abi || is_signature(first) => {
                    let (signature, args) = split_first(args);
                    DataSource::Signature { signature, args }
                }
                Some(_) => {
                    let (method, args) = split_first(args);
                    DataSource::Interface { method, args }
                }
            };
            (Some(to), data)
        }
        Command::Deploy => {
            if config.to.is_some() {
                return Err(ValidationError::RecipientForbidden);
            }
            if config.bin.is_none() {
                return Err(ValidationError::MissingBytecode);
            }
            // With an ABI every positional is a constructor argument.
            let data = if has_abi {
                DataSource::Interface {
                    method: String::new(),
                    args: args.clone(),
                }
            } else if args.is_empty() {
                DataSource::Signature {
                    signature: "constructor()".to_string(),
                    args: Vec::new(),
                }
            } else {
                let (signature, args) = split_first(args);
                DataSource::Signature { signature, args }
            };
            (None, data)
        }
    };

    debug!("Classified '{}' as {data:?}", command.name());
    Ok(Invocation {
        command,
        recipient,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::KeySource;
    use ethers::types::U256;
    use std::path::PathBuf;

    fn base(command: Command, args: &[&str]) -> Config {
        Config {
            command,
            args: args.iter().map(|s| s.to_string()).collect(),
            abi: None,
            bin: None,
            chain_id: 1337,
            key: KeySource::Key(PathBuf::from("key.txt")),
            to: None,
            value: U256::zero(),
            gas_price: U256::from(1_000_000_000u64),
            gas_limit: U256::from(100_000u64),
            nonce: 0,
        }
    }

    fn recipient() -> Address {
        Address::from_low_u64_be(0xaa)
    }

    #[test]
    fn test_transfer_requires_recipient() {
        let config = base(Command::Transfer, &[]);
        assert_eq!(
            classify(&config),
            Err(ValidationError::MissingRecipient("ether"))
        );
    }

    #[test]
    fn test_transfer_with_message() {
        let mut config = base(Command::Transfer, &["hello"]);
        config.to = Some(recipient());
        let invocation = classify(&config).unwrap();
        assert_eq!(invocation.recipient, Some(recipient()));
        assert_eq!(invocation.data, DataSource::Message(b"hello".to_vec()));

        config.args = vec!["0xbeef".to_string()];
        assert_eq!(
            classify(&config).unwrap().data,
            DataSource::Message(vec![0xbe, 0xef])
        );

        config.args = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            classify(&config),
            Err(ValidationError::TooManyArguments(2))
        );
    }

    #[test]
    fn test_plain_transfer_has_no_data() {
        let mut config = base(Command::Transfer, &[]);
        config.to = Some(recipient());
        assert_eq!(classify(&config).unwrap().data, DataSource::Empty);
    }

    #[test]
    fn test_call_requires_method_without_abi() {
        let mut config = base(Command::Call, &[]);
        config.to = Some(recipient());
        assert_eq!(classify(&config), Err(ValidationError::MissingMethod));

        config.abi = Some(PathBuf::from("token.abi"));
        assert_eq!(classify(&config).unwrap().data, DataSource::Empty);
    }

    #[test]
    fn test_call_requires_recipient() {
        let config = base(Command::Call, &["transfer(address,uint256)"]);
        assert_eq!(
            classify(&config),
            Err(ValidationError::MissingRecipient("call"))
        );
    }

    #[test]
    fn test_call_by_signature_and_by_name() {
        let mut config = base(Command::Call, &["transfer(address,uint256)", "0x01", "5"]);
        config.to = Some(recipient());
        assert_eq!(
            classify(&config).unwrap().data,
            DataSource::Signature {
                signature: "transfer(address,uint256)".to_string(),
                args: vec!["0x01".to_string(), "5".to_string()],
            }
        );

        config.abi = Some(PathBuf::from("token.abi"));
        config.args = vec!["transfer".to_string(), "0x01".to_string()];
        assert_eq!(
            classify(&config).unwrap().data,
            DataSource::Interface {
                method: "transfer".to_string(),
                args: vec!["0x01".to_string()],
            }
        );
    }

    #[test]
    fn test_call_rejects_bytecode() {
        let mut config = base(Command::Call, &["f()"]);
        config.to = Some(recipient());
        config.bin = Some(PathBuf::from("c.bin"));
        assert_eq!(classify(&config), Err(ValidationError::UnexpectedBytecode));
    }

    #[test]
    fn test_deploy_rules() {
        let config = base(Command::Deploy, &[]);
        assert_eq!(classify(&config), Err(ValidationError::MissingBytecode));

        let mut config = base(Command::Deploy, &[]);
        config.bin = Some(PathBuf::from("c.bin"));
        config.to = Some(recipient());
        assert_eq!(classify(&config), Err(ValidationError::RecipientForbidden));
    }

    #[test]
    fn test_deploy_defaults_to_empty_constructor() {
        let mut config = base(Command::Deploy, &[]);
        config.bin = Some(PathBuf::from("c.bin"));
        let invocation = classify(&config).unwrap();
        assert_eq!(invocation.recipient, None);
        assert_eq!(
            invocation.data,
            DataSource::Signature {
                signature: "constructor()".to_string(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_deploy_with_abi_takes_all_arguments() {
        let mut config = base(Command::Deploy, &["Token", "1000"]);
        config.bin = Some(PathBuf::from("c.bin"));
        config.abi = Some(PathBuf::from("c.abi"));
        assert_eq!(
            classify(&config).unwrap().data,
            DataSource::Interface {
                method: String::new(),
                args: vec!["Token".to_string(), "1000".to_string()],
            }
        );
    }

    #[test]
    fn test_deploy_with_abi_keeps_parenthesized_argument() {
        let mut config = base(Command::Deploy, &["Token (v2)", "1000"]);
        config.bin = Some(PathBuf::from("c.bin"));
        config.abi = Some(PathBuf::from("c.abi"));
        assert_eq!(
            classify(&config).unwrap().data,
            DataSource::Interface {
                method: String::new(),
                args: vec!["Token (v2)".to_string(), "1000".to_string()],
            }
        );

        config.args = vec![];
        assert_eq!(
            classify(&config).unwrap().data,
            DataSource::Interface {
                method: String::new(),
                args: vec![],
            }
        );
    }
}
