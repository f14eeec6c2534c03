// Balloons wallet
// A plain accounting counter gating AI feature usage.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::utils::current_millis;
use crate::value_objects::{AiFeature, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: UserId,
    pub balance: u64,
    pub updated_at: i64,
}

impl Wallet {
    pub fn new(user_id: UserId, balance: u64) -> Self {
        Self {
            user_id,
            balance,
            updated_at: current_millis(),
        }
    }

    pub fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
        self.updated_at = current_millis();
    }

    pub fn ensure_covers(&self, cost: u64) -> DomainResult<()> {
        if self.balance < cost {
            return Err(DomainError::Conflict(format!(
                "insufficient balloons: balance {} < cost {}",
                self.balance, cost
            )));
        }
        Ok(())
    }

    pub fn debit(&mut self, cost: u64) -> DomainResult<()> {
        self.ensure_covers(cost)?;
        self.balance -= cost;
        self.updated_at = current_millis();
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditRequest {
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturePrice {
    pub feature: AiFeature,
    pub cost: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub feature: AiFeature,
    pub cost: u64,
    pub balance: u64,
    pub imported_tasks: usize,
    pub imported_budget_lines: usize,
    pub data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_refuses_overdraft() {
        let mut wallet = Wallet::new(UserId("u".to_string()), 3);
        assert!(wallet.debit(5).is_err());
        assert_eq!(wallet.balance, 3);
        wallet.debit(3).expect("debit");
        assert_eq!(wallet.balance, 0);
    }

    #[test]
    fn credit_saturates() {
        let mut wallet = Wallet::new(UserId("u".to_string()), u64::MAX - 1);
        wallet.credit(10);
        assert_eq!(wallet.balance, u64::MAX);
    }
}
