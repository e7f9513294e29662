// ==========================================
// Grain Receiving - Quality Evaluator
// ==========================================
// A sample value passes a rubric when min <= value <= max.
// Acceptance: every rubric passes, or the product has more than one
// rubric and exactly one of them fails.
// ==========================================

use crate::domain::master::QualityRange;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricResult {
    pub rubric_code: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub accepted: bool,
    pub results: Vec<RubricResult>, // in range order
}

impl QualityVerdict {
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }
}

pub struct QualityEvaluator;

impl QualityEvaluator {
    /// Evaluates one sample against the ranges of its product.
    ///
    /// Every range needs a value; rubrics measured but not ranged for
    /// the product are ignored.
    pub fn evaluate(
        ranges: &[QualityRange],
        values: &BTreeMap<String, f64>,
    ) -> EngineResult<QualityVerdict> {
        let missing: Vec<String> = ranges
            .iter()
            .filter(|r| !values.contains_key(&r.rubric_code))
            .map(|r| r.rubric_code.clone())
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::IncompleteQualityAnalysis { missing });
        }

        let mut results = Vec::with_capacity(ranges.len());
        for range in ranges {
            let value = values
                .get(&range.rubric_code)
                .copied()
                .unwrap_or(f64::NAN);
            if !value.is_finite() {
                return Err(EngineError::InvalidQualityValue {
                    rubric_code: range.rubric_code.clone(),
                    value,
                });
            }
            results.push(RubricResult {
                rubric_code: range.rubric_code.clone(),
                value,
                min: range.min,
                max: range.max,
                passed: range.contains(value),
            });
        }

        let failed = results.iter().filter(|r| !r.passed).count();
        let accepted = failed == 0 || (results.len() > 1 && failed == 1);
        debug!(rubrics = results.len(), failed, accepted, "sample evaluated");

        Ok(QualityVerdict { accepted, results })
    }
}
