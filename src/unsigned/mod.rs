mod builder;
mod components;

pub use builder::UnsignedTransactionBuilder;
pub use components::{SignedTransaction, UnsignedTransaction};
