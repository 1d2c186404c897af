//! Access-control descriptors
//!
//! Documents are encrypted under a conditional access descriptor of the form
//! "the caller is address A OR the caller is address B". The descriptor is an
//! ordered list of clauses joined by boolean combinators; order is preserved
//! exactly because encryption networks apply the combinators positionally.

pub mod descriptor;
pub mod encoder;

pub use descriptor::{
    AccessCondition, AccessDescriptor, AccessEntry, BoolOperator, ReturnValueTest,
    USER_ADDRESS_PARAM,
};
pub use encoder::{encode_access_policy, AccessPolicyEncoder, DEFAULT_CHAIN};
