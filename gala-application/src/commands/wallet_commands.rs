use tracing::info;

use crate::queries::wallet_queries;
use crate::{AppError, AppState};
use gala_domain::{CreditRequest, Wallet};

pub async fn credit_wallet(state: &AppState, user_id: &str, payload: CreditRequest) -> Result<Wallet, AppError> {
    let user_id = wallet_queries::parse_user_id(user_id)?;
    if payload.amount == 0 {
        return Err(AppError::BadRequest("amount must be positive".to_string()));
    }
    let _guard = state.wallet_lock.lock().await;
    let mut wallet = wallet_queries::load_or_open(state, &user_id).await?;
    wallet.credit(payload.amount);
    state.wallet_repo.save_wallet(&wallet).await?;
    info!(user_id = %user_id, amount = payload.amount, balance = wallet.balance, "balloons credited");
    Ok(wallet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::wallet_queries::get_wallet;
    use crate::test_support::{build_state, STARTING_BALLOONS};

    #[tokio::test]
    async fn credit_adds_to_starting_balance() {
        let state = build_state();
        let wallet = credit_wallet(&state, "user-2", CreditRequest { amount: 15 })
            .await
            .expect("credit");
        assert_eq!(wallet.balance, STARTING_BALLOONS + 15);
        assert_eq!(get_wallet(&state, "user-2").await.expect("wallet").balance, STARTING_BALLOONS + 15);
        assert!(matches!(
            credit_wallet(&state, "user-2", CreditRequest { amount: 0 }).await,
            Err(AppError::BadRequest(_))
        ));
    }
}
