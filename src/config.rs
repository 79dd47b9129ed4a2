//! Command-line flags and the immutable [`Config`] built from them.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ethers::types::{Address, U256};
use ethers::utils::{parse_ether, parse_units};

use crate::abi::parse_address;
use crate::command::Command;
use crate::errors::ValidationError;
use crate::prelude::Result;
use crate::signer::KeySource;

pub const DEFAULT_CHAIN_ID: u64 = 1337;

const EXAMPLES: &str = "\
EXAMPLES
  Sending ether:
    ethsign ether --to 0x0000000000000000000000000000000000000000 --key keyfile.json --value 0.05

  Transfer ERC-20 tokens:
    ethsign call \"transfer(address,uint256)\" 0xffffffffffffffffffffffffffffffffffffffff 42 --to 0x1234567890123456789012345678901234567890 --key keyfile.json

  Function call from contract ABI:
    ethsign call funcName arg1 arg2 --to 0x0000000000000000000000000000000000000000 --abi contract.abi --key keyfile.txt

  Contract deployment, with constructor arguments:
    ethsign deploy arg1 arg2 --abi contract.abi --bin contract.bin --key keyfile.json
    ethsign deploy \"constructor(string,uint256)\" arg1 arg2 --bin contract.bin --key keyfile.json";

#[derive(Parser, Debug)]
#[command(
    name = "ethsign",
    version,
    about = "Compile and sign EVM transactions offline",
    after_help = EXAMPLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Send ether, optionally with a raw message as transaction data
    Ether(CommandArgs),
    /// Call a contract method, from a signature or an ABI method name
    Call(CommandArgs),
    /// Deploy a contract from its bytecode
    Deploy(CommandArgs),
}

#[derive(Args, Debug)]
pub struct CommandArgs {
    /// Method signature or name, followed by its arguments
    #[arg(allow_negative_numbers = true)]
    pub args: Vec<String>,

    #[command(flatten)]
    pub flags: TxFlags,
}

#[derive(Args, Debug)]
pub struct TxFlags {
    /// Contract ABI file
    #[arg(long, value_name = "FILE")]
    pub abi: Option<PathBuf>,

    /// Contract compiled bytecode file
    #[arg(long, value_name = "FILE")]
    pub bin: Option<PathBuf>,

    /// The chain id, for EIP-155 signing (1 mainnet, 1337 geth private chain)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CHAIN_ID)]
    pub chain: u64,

    /// File containing either a raw hex private key or a keystore
    #[arg(long, value_name = "FILE")]
    pub key: Option<PathBuf>,

    /// Encrypted keystore file, a passphrase prompt will occur
    #[arg(long, value_name = "FILE")]
    pub keystore: Option<PathBuf>,

    /// Recipient of the ether, or the contract being called
    #[arg(long, value_name = "ADDRESS")]
    pub to: Option<String>,

    /// Amount of ether to send with the transaction
    #[arg(long, value_name = "ETHER", default_value = "0", allow_negative_numbers = true)]
    pub value: String,

    /// Gas price in gwei
    #[arg(long = "gasPrice", value_name = "GWEI", default_value = "1", allow_negative_numbers = true)]
    pub gas_price: String,

    /// Maximum amount of gas the transaction may consume
    #[arg(long = "gasLimit", value_name = "N", default_value = "100000", allow_negative_numbers = true)]
    pub gas_limit: String,

    /// Next nonce of the signing address
    #[arg(long, value_name = "N", default_value = "0", allow_negative_numbers = true)]
    pub nonce: String,
}

/// Everything one invocation needs, validated once and passed by reference
/// through every stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub command: Command,
    pub args: Vec<String>,
    pub abi: Option<PathBuf>,
    pub bin: Option<PathBuf>,
    pub chain_id: u64,
    pub key: KeySource,
    pub to: Option<Address>,
    /// Wei.
    pub value: U256,
    /// Wei.
    pub gas_price: U256,
    pub gas_limit: U256,
    pub nonce: u64,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let (command, CommandArgs { args, flags }) = match cli.command {
            CliCommand::Ether(a) => (Command::Transfer, a),
            CliCommand::Call(a) => (Command::Call, a),
            CliCommand::Deploy(a) => (Command::Deploy, a),
        };

        let value = parse_amount("value", &flags.value, |v| parse_ether(v))?;
        let gas_price = parse_amount("gasPrice", &flags.gas_price, |v| {
            parse_units(v, "gwei").map(U256::from)
        })?;
        let gas_limit = parse_amount("gasLimit", &flags.gas_limit, |v| {
            U256::from_dec_str(v).map_err(|e| e.to_string())
        })?;
        let nonce = parse_integer("nonce", &flags.nonce)?;

        let key = match (flags.key, flags.keystore) {
            (Some(_), Some(_)) => return Err(ValidationError::ConflictingKeys.into()),
            (Some(path), None) => KeySource::Key(path),
            (None, Some(path)) => KeySource::Keystore(path),
            (None, None) => return Err(ValidationError::MissingKey.into()),
        };

        let to = flags.to.as_deref().map(parse_address).transpose()?;

        Ok(Config {
            command,
            args,
            abi: flags.abi,
            bin: flags.bin,
            chain_id: flags.chain,
            key,
            to,
            value,
            gas_price,
            gas_limit,
            nonce,
        })
    }
}

fn check_sign(flag: &'static str, value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim_start().starts_with('-') {
        return Err(ValidationError::Negative {
            flag,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn parse_amount<E: ToString>(
    flag: &'static str,
    value: &str,
    parse: impl Fn(&str) -> std::result::Result<U256, E>,
) -> std::result::Result<U256, ValidationError> {
    check_sign(flag, value)?;
    parse(value.trim()).map_err(|_| ValidationError::InvalidNumber {
        flag,
        value: value.to_string(),
    })
}

fn parse_integer(flag: &'static str, value: &str) -> std::result::Result<u64, ValidationError> {
    check_sign(flag, value)?;
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            flag,
            value: value.to_string(),
        })
}
