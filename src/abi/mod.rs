pub mod encoder;
pub mod interface;
pub mod signature;
pub mod types;
pub mod value;

pub use encoder::{encode, encode_single};
pub use interface::Interface;
pub use signature::{MethodSignature, Selector};
pub use types::ArgumentType;
pub use value::{parse_address, parse_arguments, parse_value, ParsedValue};
