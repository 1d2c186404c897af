//! Descriptor types and evaluation

use serde::{Deserialize, Serialize};

/// Placeholder the encryption network substitutes with the caller's address
pub const USER_ADDRESS_PARAM: &str = ":userAddress";

/// Boolean combinator between two clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOperator {
    And,
    Or,
}

impl BoolOperator {
    fn combine(self, lhs: bool, rhs: bool) -> bool {
        match self {
            BoolOperator::And => lhs && rhs,
            BoolOperator::Or => lhs || rhs,
        }
    }
}

/// Comparison applied to the value a condition's method returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnValueTest {
    pub comparator: String,
    pub value: String,
}

/// A single on-chain predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCondition {
    pub contract_address: String,
    pub standard_contract_type: String,
    pub chain: String,
    pub method: String,
    pub parameters: Vec<String>,
    pub return_value_test: ReturnValueTest,
}

impl AccessCondition {
    /// Condition satisfied only when the caller is `address`
    pub fn user_address(chain: &str, address: &str) -> Self {
        Self {
            contract_address: String::new(),
            standard_contract_type: String::new(),
            chain: chain.to_string(),
            method: String::new(),
            parameters: vec![USER_ADDRESS_PARAM.to_string()],
            return_value_test: ReturnValueTest {
                comparator: "=".to_string(),
                value: address.to_string(),
            },
        }
    }

    /// Evaluate offline against a caller address
    ///
    /// Only plain `:userAddress =` clauses can be decided without a chain
    /// query; anything else evaluates to `false`.
    pub fn is_satisfied_by(&self, address: &str) -> bool {
        let is_address_check = self.method.is_empty()
            && self.parameters.first().map(String::as_str) == Some(USER_ADDRESS_PARAM)
            && self.return_value_test.comparator == "=";

        is_address_check && self.return_value_test.value.eq_ignore_ascii_case(address)
    }
}

/// One element of a descriptor: a clause or a combinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccessEntry {
    Operator { operator: BoolOperator },
    Condition(AccessCondition),
}

/// Ordered access descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessDescriptor {
    entries: Vec<AccessEntry>,
}

impl AccessDescriptor {
    pub fn new(entries: Vec<AccessEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[AccessEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clauses only, in order
    pub fn conditions(&self) -> impl Iterator<Item = &AccessCondition> {
        self.entries.iter().filter_map(|entry| match entry {
            AccessEntry::Condition(condition) => Some(condition),
            AccessEntry::Operator { .. } => None,
        })
    }

    /// Evaluate the descriptor left to right for `address`
    ///
    /// Adjacent clauses with no combinator between them are joined with
    /// `and`. An empty descriptor permits nobody.
    pub fn permits(&self, address: &str) -> bool {
        let mut result: Option<bool> = None;
        let mut pending: Option<BoolOperator> = None;

        for entry in &self.entries {
            match entry {
                AccessEntry::Operator { operator } => pending = Some(*operator),
                AccessEntry::Condition(condition) => {
                    let value = condition.is_satisfied_by(address);
                    result = Some(match result {
                        None => value,
                        Some(acc) => pending.take().unwrap_or(BoolOperator::And).combine(acc, value),
                    });
                }
            }
        }

        result.unwrap_or(false)
    }
}
