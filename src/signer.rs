//! Key material classification and transaction signing.
//!
//! A key file holding exactly [`RAW_KEY_LEN`] bytes is the hex text of a raw
//! secp256k1 scalar; any other length is taken to be an encrypted keystore.
//! This means a raw key file with a trailing newline is treated as a keystore.
//! The key file is read once; a keystore is decrypted from those same bytes.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use log::{debug, info};

use crate::errors::Error;
use crate::prelude::Result;
use crate::unsigned::{SignedTransaction, UnsignedTransaction};

/// Byte length of a raw private key file: 32 bytes as hex text.
pub const RAW_KEY_LEN: usize = 64;

/// Where the signing key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// `--key`: classified by file length.
    Key(PathBuf),
    /// `--keystore`: always an encrypted keystore.
    Keystore(PathBuf),
}

impl KeySource {
    pub fn path(&self) -> &Path {
        match self {
            KeySource::Key(path) | KeySource::Keystore(path) => path,
        }
    }
}

/// The raw bytes of a key file, tagged by how they must be turned into a key.
#[derive(Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    RawPrivateKey(Vec<u8>),
    EncryptedKeystore(Vec<u8>),
}

// Never print key bytes.
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterial::RawPrivateKey(_) => f.write_str("RawPrivateKey(..)"),
            KeyMaterial::EncryptedKeystore(bytes) => f
                .debug_struct("EncryptedKeystore")
                .field("len", &bytes.len())
                .finish_non_exhaustive(),
        }
    }
}

impl KeyMaterial {
    pub fn classify(bytes: Vec<u8>) -> Self {
        if bytes.len() == RAW_KEY_LEN {
            KeyMaterial::RawPrivateKey(bytes)
        } else {
            KeyMaterial::EncryptedKeystore(bytes)
        }
    }

    pub fn load(source: &KeySource) -> Result<Self> {
        let path = source.path();
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        Ok(match source {
            KeySource::Key(_) => KeyMaterial::classify(bytes),
            KeySource::Keystore(_) => KeyMaterial::EncryptedKeystore(bytes),
        })
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, KeyMaterial::RawPrivateKey(_))
    }

    /// Turns the loaded bytes into a wallet. A keystore asks `passphrase`
    /// exactly once, a raw key never does.
    pub fn unlock(&self, passphrase: &dyn PassphraseSource) -> Result<LocalWallet> {
        match self {
            KeyMaterial::RawPrivateKey(bytes) => parse_raw_key(bytes),
            KeyMaterial::EncryptedKeystore(bytes) => {
                let passphrase = passphrase.passphrase()?;
                decrypt_keystore(bytes, &passphrase)
            }
        }
    }
}

/// Supplies the passphrase of an encrypted keystore. Called at most once.
pub trait PassphraseSource {
    fn passphrase(&self) -> Result<String>;
}

/// Masked prompt on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPassphrase;

impl PassphraseSource for TerminalPassphrase {
    fn passphrase(&self) -> Result<String> {
        rpassword::prompt_password("Passphrase: ").map_err(|e| Error::Passphrase(e.to_string()))
    }
}

fn parse_raw_key(bytes: &[u8]) -> Result<LocalWallet> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| Error::PrivateKeyParse(e.to_string()))?;
    let scalar = hex::decode(text).map_err(|e| Error::PrivateKeyParse(e.to_string()))?;
    LocalWallet::from_bytes(&scalar).map_err(|e| Error::PrivateKeyParse(e.to_string()))
}

// The keystore reader only takes a path, so the bytes are staged in a private
// temporary file that is removed on drop.
fn decrypt_keystore(bytes: &[u8], passphrase: &str) -> Result<LocalWallet> {
    let mut staged =
        tempfile::NamedTempFile::new().map_err(|e| Error::io(std::env::temp_dir(), e))?;
    if let Err(e) = staged.write_all(bytes).and_then(|_| staged.flush()) {
        return Err(Error::io(staged.path(), e));
    }
    LocalWallet::decrypt_keystore(staged.path(), passphrase)
        .map_err(|e| Error::Keystore(e.to_string()))
}

/// Reads the key file and turns it into a wallet, prompting for a passphrase
/// when the file is a keystore.
pub fn load_wallet(source: &KeySource, passphrase: &dyn PassphraseSource) -> Result<LocalWallet> {
    let material = KeyMaterial::load(source)?;
    debug!("Key material from {}: {material:?}", source.path().display());

    let wallet = material.unlock(passphrase)?;
    info!("Signing with {:?}", wallet.address());
    Ok(wallet)
}

/// Signs `tx` with EIP-155 replay protection for its chain id.
pub fn sign_transaction(tx: UnsignedTransaction, wallet: &LocalWallet) -> Result<SignedTransaction> {
    let wallet = wallet.clone().with_chain_id(tx.chain_id);
    let typed: TypedTransaction = tx.to_request().into();
    let signature = wallet
        .sign_transaction_sync(&typed)
        .map_err(|e| Error::SignatureFailure(e.to_string()))?;
    Ok(SignedTransaction::new(tx, signature))
}
