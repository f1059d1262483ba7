//! In-memory currency ledger.
//!
//! Stands in for the account service when playing offline. Balances live
//! only for the lifetime of the process.

use std::collections::HashMap;

use async_trait::async_trait;
use branchline_domain::CurrencyKind;
use tokio::sync::RwLock;

use crate::infrastructure::ports::{CurrencyLedgerPort, LedgerError};

#[derive(Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<CurrencyKind, u32>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(kind: CurrencyKind, amount: u32) -> Self {
        Self {
            balances: RwLock::new(HashMap::from([(kind, amount)])),
        }
    }
}

#[async_trait]
impl CurrencyLedgerPort for InMemoryLedger {
    async fn spend(&self, kind: &CurrencyKind, amount: u32) -> Result<(), LedgerError> {
        let mut balances = self.balances.write().await;
        let balance = balances.entry(kind.clone()).or_insert(0);
        if *balance < amount {
            return Err(LedgerError::InsufficientFunds {
                kind: kind.clone(),
                needed: amount,
            });
        }
        *balance -= amount;
        tracing::debug!(currency = %kind, amount, remaining = *balance, "Currency spent");
        Ok(())
    }

    async fn grant(&self, kind: &CurrencyKind, amount: u32) -> Result<(), LedgerError> {
        let mut balances = self.balances.write().await;
        let balance = balances.entry(kind.clone()).or_insert(0);
        *balance = balance.saturating_add(amount);
        tracing::debug!(currency = %kind, amount, balance = *balance, "Currency granted");
        Ok(())
    }

    async fn balance(&self, kind: &CurrencyKind) -> Result<u32, LedgerError> {
        Ok(self.balances.read().await.get(kind).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jetons() -> CurrencyKind {
        CurrencyKind::from("jetons")
    }

    #[tokio::test]
    async fn spend_debits_balance() {
        let ledger = InMemoryLedger::with_balance(jetons(), 3);

        ledger.spend(&jetons(), 2).await.expect("spend should succeed");

        assert_eq!(ledger.balance(&jetons()).await.expect("balance"), 1);
    }

    #[tokio::test]
    async fn spend_over_balance_fails_without_debit() {
        let ledger = InMemoryLedger::with_balance(jetons(), 1);

        let result = ledger.spend(&jetons(), 3).await;

        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds { needed: 3, .. })
        ));
        assert_eq!(ledger.balance(&jetons()).await.expect("balance"), 1);
    }

    #[tokio::test]
    async fn grant_credits_unknown_currency() {
        let ledger = InMemoryLedger::new();
        let coins = CurrencyKind::from("coins");

        ledger.grant(&coins, 4).await.expect("grant should succeed");

        assert_eq!(ledger.balance(&coins).await.expect("balance"), 4);
        assert_eq!(ledger.balance(&jetons()).await.expect("balance"), 0);
    }
}
