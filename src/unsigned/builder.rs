use std::path::Path;

use log::{debug, info};

use crate::abi::Interface;
use crate::calldata::{
    decode_bytecode, deploy_data, CallDataCompiler, InterfaceCompiler, SignatureCompiler,
};
use crate::command::{Command, DataSource, Invocation};
use crate::config::Config;
use crate::errors::{Error, ValidationError};
use crate::prelude::Result;
use crate::unsigned::UnsignedTransaction;

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::io(path, e))
}

#[derive(Debug)]
pub struct UnsignedTransactionBuilder<'a> {
    config: &'a Config,
}

impl<'a> UnsignedTransactionBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        UnsignedTransactionBuilder { config }
    }

    pub fn build(&self, invocation: &Invocation) -> Result<UnsignedTransaction> {
        let mut data = self.call_data(invocation)?;

        if invocation.command == Command::Deploy {
            let path = self
                .config
                .bin
                .as_deref()
                .ok_or(ValidationError::MissingBytecode)?;
            let text = String::from_utf8_lossy(&read_file(path)?).into_owned();
            let bytecode = decode_bytecode(&text)?;
            debug!("Bytecode: {} bytes", bytecode.len());
            data = deploy_data(&bytecode, &data);
        }

        let tx = UnsignedTransaction {
            nonce: self.config.nonce,
            to: invocation.recipient,
            value: self.config.value,
            gas_price: self.config.gas_price,
            gas_limit: self.config.gas_limit,
            data,
            chain_id: self.config.chain_id,
        };
        info!(
            "Built {} transaction: nonce {}, {} bytes of data",
            invocation.command.name(),
            tx.nonce,
            tx.data.len()
        );
        Ok(tx)
    }

    fn call_data(&self, invocation: &Invocation) -> Result<Vec<u8>> {
        let data = match &invocation.data {
            DataSource::Empty => Vec::new(),
            DataSource::Message(message) => message.clone(),
            DataSource::Signature { signature, args } => {
                let compiler = if invocation.command == Command::Deploy {
                    SignatureCompiler::constructor(signature)?
                } else {
                    SignatureCompiler::call(signature)?
                };
                compiler.compile(args)?
            }
            DataSource::Interface { method, args } => {
                let path = self
                    .config
                    .abi
                    .as_deref()
                    .ok_or(ValidationError::MissingMethod)?;
                let interface = Interface::from_json(&read_file(path)?)?;
                InterfaceCompiler::new(&interface, method.as_str()).compile(args)?
            }
        };
        Ok(data)
    }
}
