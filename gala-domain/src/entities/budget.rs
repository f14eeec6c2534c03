// Budget line entity and summary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::utils::{current_millis, normalize_optional_text};
use crate::value_objects::{BudgetLineId, EventId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub id: BudgetLineId,
    pub event_id: EventId,
    pub category: String,
    pub label: String,
    pub amount: f64,
    pub paid: bool,
    pub created_at: i64,
}

impl BudgetLine {
    pub fn create(event_id: EventId, input: NewBudgetLine) -> DomainResult<Self> {
        if !input.amount.is_finite() || input.amount < 0.0 {
            return Err(DomainError::InvalidInput("amount must be a non-negative number".to_string()));
        }
        let category = normalize_optional_text(Some(input.category))
            .map(|value| value.to_lowercase())
            .unwrap_or_else(|| "other".to_string());
        let label = normalize_optional_text(input.label).unwrap_or_else(|| category.clone());
        Ok(Self {
            id: BudgetLineId::new(),
            event_id,
            category,
            label,
            amount: input.amount,
            paid: input.paid,
            created_at: current_millis(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewBudgetLine {
    pub category: String,
    pub label: Option<String>,
    pub amount: f64,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub budget: f64,
    pub planned: f64,
    pub paid: f64,
    pub remaining: f64,
    pub over_budget: bool,
    pub by_category: Vec<CategoryTotal>,
}

impl BudgetSummary {
    pub fn from_lines(budget: f64, lines: &[BudgetLine]) -> Self {
        let planned: f64 = lines.iter().map(|line| line.amount).sum();
        let paid: f64 = lines.iter().filter(|line| line.paid).map(|line| line.amount).sum();
        let mut categories: BTreeMap<&str, f64> = BTreeMap::new();
        for line in lines {
            *categories.entry(line.category.as_str()).or_default() += line.amount;
        }
        Self {
            budget,
            planned,
            paid,
            remaining: budget - planned,
            over_budget: planned > budget,
            by_category: categories
                .into_iter()
                .map(|(category, amount)| CategoryTotal {
                    category: category.to_string(),
                    amount,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(event_id: EventId, category: &str, amount: f64, paid: bool) -> BudgetLine {
        BudgetLine::create(
            event_id,
            NewBudgetLine {
                category: category.to_string(),
                label: None,
                amount,
                paid,
            },
        )
        .expect("line")
    }

    #[test]
    fn summary_groups_by_category() {
        let event_id = EventId::new();
        let lines = vec![
            line(event_id, "Catering", 400.0, true),
            line(event_id, "venue", 900.0, false),
            line(event_id, "catering", 100.0, false),
        ];
        let summary = BudgetSummary::from_lines(1000.0, &lines);
        assert_eq!(summary.planned, 1400.0);
        assert_eq!(summary.paid, 400.0);
        assert_eq!(summary.remaining, -400.0);
        assert!(summary.over_budget);
        assert_eq!(summary.by_category.len(), 2);
        assert_eq!(summary.by_category[0].category, "catering");
        assert_eq!(summary.by_category[0].amount, 500.0);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let input = NewBudgetLine {
            category: "venue".to_string(),
            amount: -5.0,
            ..NewBudgetLine::default()
        };
        assert!(BudgetLine::create(EventId::new(), input).is_err());
    }
}
