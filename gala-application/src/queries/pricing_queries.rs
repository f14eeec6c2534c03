use crate::AppState;
use gala_domain::{AiFeature, FeaturePrice};

pub async fn feature_cost(state: &AppState, feature: AiFeature) -> u64 {
    let pricing = state.pricing.read().await;
    pricing
        .get(&feature)
        .copied()
        .unwrap_or_else(|| feature.default_cost())
}

pub async fn list_prices(state: &AppState) -> Vec<FeaturePrice> {
    let pricing = state.pricing.read().await;
    AiFeature::ALL
        .iter()
        .map(|feature| FeaturePrice {
            feature: *feature,
            cost: pricing
                .get(feature)
                .copied()
                .unwrap_or_else(|| feature.default_cost()),
        })
        .collect()
}
