//! Builds the owner-or-requester descriptor documents are encrypted under

use super::descriptor::{AccessCondition, AccessDescriptor, AccessEntry, BoolOperator};

/// Chain access conditions are evaluated on unless configured otherwise
pub const DEFAULT_CHAIN: &str = "filecoin";

/// Encode "caller is `owner` OR caller is `requester`" on `chain`
///
/// The owner clause always comes first. When there is no owner, or the owner
/// is the requester, the descriptor holds the requester clause alone.
pub fn encode_access_policy(owner: Option<&str>, requester: &str, chain: &str) -> AccessDescriptor {
    let requester_clause = AccessEntry::Condition(AccessCondition::user_address(chain, requester));

    match owner.filter(|o| !o.is_empty() && !o.eq_ignore_ascii_case(requester)) {
        Some(owner) => AccessDescriptor::new(vec![
            AccessEntry::Condition(AccessCondition::user_address(chain, owner)),
            AccessEntry::Operator { operator: BoolOperator::Or },
            requester_clause,
        ]),
        None => AccessDescriptor::new(vec![requester_clause]),
    }
}

/// Access policy encoder bound to one chain
#[derive(Debug, Clone)]
pub struct AccessPolicyEncoder {
    chain: String,
}

impl AccessPolicyEncoder {
    pub fn new(chain: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
        }
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }

    pub fn encode(&self, owner: Option<&str>, requester: &str) -> AccessDescriptor {
        encode_access_policy(owner, requester, &self.chain)
    }
}

impl Default for AccessPolicyEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_CHAIN)
    }
}
