//! Offline compiler and signer for EVM transactions.
//!
//! A request flows through the stages in order: [`Config`] (validated flags),
//! [`command::classify`] (transaction shape), [`UnsignedTransactionBuilder`]
//! (call data and fields), [`signer`] (key material and signature) and finally
//! [`SignedTransaction::to_hex`].

pub mod abi;
pub mod calldata;
pub mod command;
pub mod config;
mod errors;
pub mod prelude;
pub mod signer;
mod unsigned;

pub use abi::{ArgumentType, MethodSignature, ParsedValue, Selector};
pub use command::{classify, Command, DataSource, Invocation};
pub use config::{Cli, Config};
pub use errors::{Error, ErrorKind, ParseError, ValidationError};
pub use signer::{KeyMaterial, KeySource, PassphraseSource, TerminalPassphrase};
pub use unsigned::{SignedTransaction, UnsignedTransaction, UnsignedTransactionBuilder};

use prelude::Result;

/// Runs the whole pipeline and returns the signed transaction as `0x` hex.
///
/// Every validation happens before any file is read, and nothing is signed
/// unless the transaction was built completely.
pub fn run(config: &Config, passphrase: &dyn PassphraseSource) -> Result<String> {
    let invocation = classify(config)?;
    let tx = UnsignedTransactionBuilder::new(config).build(&invocation)?;
    let wallet = signer::load_wallet(&config.key, passphrase)?;
    let signed = signer::sign_transaction(tx, &wallet)?;
    Ok(signed.to_hex())
}
