use std::collections::HashMap;

use tracing::info;

use crate::queries::pricing_queries;
use crate::{AppError, AppState};
use gala_domain::FeaturePrice;

/// Re-reads the pricing file. A missing file means default prices.
pub async fn reload_pricing(state: &AppState) -> Result<Vec<FeaturePrice>, AppError> {
    let loaded = state
        .pricing_repo
        .load_pricing(&state.config.pricing_path)
        .await?;
    info!(path = %state.config.pricing_path, overrides = loaded.len(), "pricing loaded");
    *state.pricing.write().await = loaded;
    Ok(pricing_queries::list_prices(state).await)
}

/// The new price goes live only once the file is written. The write lock is
/// held across the save so concurrent updates reach the file in order.
pub async fn update_price(state: &AppState, payload: FeaturePrice) -> Result<Vec<FeaturePrice>, AppError> {
    {
        let mut pricing = state.pricing.write().await;
        let mut next: HashMap<_, _> = pricing.clone();
        next.insert(payload.feature, payload.cost);
        state
            .pricing_repo
            .save_pricing(&state.config.pricing_path, &next)
            .await?;
        *pricing = next;
    }
    info!(feature = %payload.feature, cost = payload.cost, "feature price updated");
    Ok(pricing_queries::list_prices(state).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::anyhow;
    use async_trait::async_trait;

    use super::*;
    use crate::test_support::build_state;
    use gala_domain::ports::PricingRepository;
    use gala_domain::AiFeature;

    struct UnwritablePricing;

    #[async_trait]
    impl PricingRepository for UnwritablePricing {
        async fn load_pricing(&self, _path: &str) -> anyhow::Result<HashMap<AiFeature, u64>> {
            Ok(HashMap::new())
        }

        async fn save_pricing(&self, path: &str, _prices: &HashMap<AiFeature, u64>) -> anyhow::Result<()> {
            Err(anyhow!("{} is read-only", path))
        }
    }

    #[tokio::test]
    async fn failed_save_keeps_the_old_price() {
        let mut state = build_state();
        state.pricing_repo = Arc::new(UnwritablePricing);
        let err = update_price(
            &state,
            FeaturePrice {
                feature: AiFeature::GenerateSpeech,
                cost: 7,
            },
        )
        .await
        .expect_err("save failure");
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(pricing_queries::feature_cost(&state, AiFeature::GenerateSpeech).await, 2);
        assert!(state.pricing.read().await.is_empty());
    }

    #[tokio::test]
    async fn price_override_survives_reload() {
        let state = build_state();
        let prices = reload_pricing(&state).await.expect("reload");
        let plan = prices
            .iter()
            .find(|price| price.feature == AiFeature::GenerateEventPlan)
            .expect("plan");
        assert_eq!(plan.cost, 10);

        update_price(
            &state,
            FeaturePrice {
                feature: AiFeature::GenerateEventPlan,
                cost: 4,
            },
        )
        .await
        .expect("update");
        state.pricing.write().await.clear();
        reload_pricing(&state).await.expect("reload");
        assert_eq!(pricing_queries::feature_cost(&state, AiFeature::GenerateEventPlan).await, 4);
        assert_eq!(pricing_queries::feature_cost(&state, AiFeature::GenerateSpeech).await, 2);
    }
}
