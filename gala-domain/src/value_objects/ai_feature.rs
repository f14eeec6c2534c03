// AI feature value object
// Each feature maps to one named edge function on the AI gateway.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiFeature {
    GenerateEventPlan,
    GenerateTimeline,
    GenerateDecorations,
    GenerateSpeech,
    SuggestGifts,
    GenerateIcebreakers,
    FindFlights,
    VendorSearch,
}

impl AiFeature {
    pub const ALL: [AiFeature; 8] = [
        AiFeature::GenerateEventPlan,
        AiFeature::GenerateTimeline,
        AiFeature::GenerateDecorations,
        AiFeature::GenerateSpeech,
        AiFeature::SuggestGifts,
        AiFeature::GenerateIcebreakers,
        AiFeature::FindFlights,
        AiFeature::VendorSearch,
    ];

    /// Edge function name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AiFeature::GenerateEventPlan => "generate-event-plan",
            AiFeature::GenerateTimeline => "generate-timeline",
            AiFeature::GenerateDecorations => "generate-decorations",
            AiFeature::GenerateSpeech => "generate-speech",
            AiFeature::SuggestGifts => "suggest-gifts",
            AiFeature::GenerateIcebreakers => "generate-icebreakers",
            AiFeature::FindFlights => "find-flights",
            AiFeature::VendorSearch => "vendor-search",
        }
    }

    /// Balloons charged when no pricing override is configured.
    pub fn default_cost(&self) -> u64 {
        match self {
            AiFeature::GenerateEventPlan => 10,
            AiFeature::GenerateTimeline => 5,
            AiFeature::FindFlights | AiFeature::VendorSearch => 3,
            AiFeature::GenerateDecorations
            | AiFeature::GenerateSpeech
            | AiFeature::SuggestGifts
            | AiFeature::GenerateIcebreakers => 2,
        }
    }

    /// Whether the response carries tasks that get imported onto the board.
    pub fn imports_tasks(&self) -> bool {
        matches!(self, AiFeature::GenerateEventPlan | AiFeature::GenerateTimeline)
    }
}

impl fmt::Display for AiFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiFeature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        AiFeature::ALL
            .iter()
            .copied()
            .find(|feature| feature.as_str() == normalized)
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown ai feature '{}'", normalized)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_function_names() {
        assert_eq!(
            "Generate-Event-Plan".parse::<AiFeature>(),
            Ok(AiFeature::GenerateEventPlan)
        );
        assert_eq!("vendor-search".parse::<AiFeature>(), Ok(AiFeature::VendorSearch));
        assert!("write-poem".parse::<AiFeature>().is_err());
    }

    #[test]
    fn serde_name_matches_function_name() {
        for feature in AiFeature::ALL {
            let json = serde_json::to_string(&feature).expect("json");
            assert_eq!(json, format!("\"{}\"", feature.as_str()));
        }
    }
}
