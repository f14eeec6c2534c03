use tracing::info;

use crate::{AppError, AppState};
use gala_domain::{UserId, Wallet};

pub async fn get_wallet(state: &AppState, user_id: &str) -> Result<Wallet, AppError> {
    let user_id = parse_user_id(user_id)?;
    let _guard = state.wallet_lock.lock().await;
    load_or_open(state, &user_id).await
}

/// Caller must hold `wallet_lock`.
pub(crate) async fn load_or_open(state: &AppState, user_id: &UserId) -> Result<Wallet, AppError> {
    if let Some(wallet) = state.wallet_repo.load_wallet(user_id).await? {
        return Ok(wallet);
    }
    let wallet = Wallet::new(user_id.clone(), state.config.starting_balloons);
    state.wallet_repo.save_wallet(&wallet).await?;
    info!(user_id = %user_id, balance = wallet.balance, "opened balloon wallet");
    Ok(wallet)
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".to_string()));
    }
    Ok(UserId(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build_state, STARTING_BALLOONS};

    #[tokio::test]
    async fn wallet_opens_with_starting_balance() {
        let state = build_state();
        let wallet = get_wallet(&state, " user-9 ").await.expect("wallet");
        assert_eq!(wallet.user_id, UserId("user-9".to_string()));
        assert_eq!(wallet.balance, STARTING_BALLOONS);
        assert!(matches!(get_wallet(&state, "").await, Err(AppError::BadRequest(_))));
    }
}
