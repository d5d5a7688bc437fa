//! Account system port.

use async_trait::async_trait;

use crate::domain::{AccountId, RippleError};

/// The external account system. Only the contributor-removed cascade uses
/// it. Removal must be idempotent: removing an account that is already gone
/// succeeds.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn remove_account(&self, account_id: AccountId) -> Result<(), RippleError>;
}
