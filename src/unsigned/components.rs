use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, Signature, TransactionRequest, U256};

/// A legacy transaction ready to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub nonce: u64,
    pub to: Option<Address>, // None creates a contract
    pub value: U256,         // wei
    pub gas_price: U256,     // wei
    pub gas_limit: U256,
    pub data: Vec<u8>,
    pub chain_id: u64, // EIP-155
}

impl UnsignedTransaction {
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    pub fn to_request(&self) -> TransactionRequest {
        let request = TransactionRequest::new()
            .nonce(self.nonce)
            .value(self.value)
            .gas_price(self.gas_price)
            .gas(self.gas_limit)
            .data(Bytes::from(self.data.clone()))
            .chain_id(self.chain_id);
        match self.to {
            Some(to) => request.to(to),
            None => request,
        }
    }
}

/// An [`UnsignedTransaction`] with its single signature attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    pub transaction: UnsignedTransaction,
    pub signature: Signature,
}

impl SignedTransaction {
    pub fn new(transaction: UnsignedTransaction, signature: Signature) -> Self {
        SignedTransaction {
            transaction,
            signature,
        }
    }

    /// Canonical RLP serialization of the signed legacy transaction.
    pub fn raw(&self) -> Bytes {
        let typed: TypedTransaction = self.transaction.to_request().into();
        typed.rlp_signed(&self.signature)
    }

    /// `0x` followed by the lowercase hex of [`SignedTransaction::raw`].
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.raw()))
    }
}
