//! Explain output for organized candidate sets
//!
//! Deterministic, human-readable; also serializable for tooling.

use std::fmt;

use serde::Serialize;

use super::candidates::CandidateSet;
use super::cost::FilterCandidate;

/// Role of a candidate after organizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateRole {
    /// Unconditioned best filter
    Best,
    /// Depends on the join order cardinality
    Residual,
}

impl CandidateRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateRole::Best => "BEST",
            CandidateRole::Residual => "RESIDUAL",
        }
    }
}

/// One explained candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainCandidate {
    pub index: u32,
    pub role: CandidateRole,
    pub container: String,
    pub est_elements: f64,
    pub selectivity: f64,
    pub build_cost: f64,
    pub slope: f64,
    pub break_even: f64,
}

impl ExplainCandidate {
    fn new(candidate: &FilterCandidate, role: CandidateRole) -> Self {
        Self {
            index: candidate.index().0,
            role,
            container: candidate.container().as_str().to_string(),
            est_elements: candidate.est_elements(),
            selectivity: candidate.selectivity(),
            build_cost: candidate.build_cost(),
            slope: candidate.slope(),
            break_even: candidate.break_even(),
        }
    }
}

/// The choice made for one join order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainChoice {
    pub ref_key: Option<u32>,
    pub cardinality: f64,
    pub chosen_index: Option<u32>,
    pub gain: Option<f64>,
}

impl ExplainChoice {
    pub fn new(
        ref_key: Option<u32>,
        cardinality: f64,
        chosen: Option<&FilterCandidate>,
    ) -> Self {
        Self {
            ref_key,
            cardinality,
            chosen_index: chosen.map(|c| c.index().0),
            gain: chosen.map(|c| c.gain(cardinality)),
        }
    }
}

/// Explain output for one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterExplain {
    pub table: String,
    pub best_count: usize,
    pub candidates: Vec<ExplainCandidate>,
    pub choice: Option<ExplainChoice>,
}

impl FilterExplain {
    /// Explains an organized set; `None` means the table has no candidates
    pub fn from_set(table: impl Into<String>, set: Option<&CandidateSet>) -> Self {
        let (best_count, candidates) = match set {
            Some(set) => (
                set.best_count(),
                set.iter()
                    .enumerate()
                    .map(|(i, c)| {
                        let role = if i < set.best_count() {
                            CandidateRole::Best
                        } else {
                            CandidateRole::Residual
                        };
                        ExplainCandidate::new(c, role)
                    })
                    .collect(),
            ),
            None => (0, Vec::new()),
        };

        Self {
            table: table.into(),
            best_count,
            candidates,
            choice: None,
        }
    }

    pub fn with_choice(mut self, choice: ExplainChoice) -> Self {
        self.choice = Some(choice);
        self
    }
}

impl fmt::Display for FilterExplain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== ROWID FILTERS: {} ===", self.table)?;

        if self.candidates.is_empty() {
            writeln!(f, "Candidates: none")?;
        } else {
            writeln!(f, "Best filters: {}", self.best_count)?;
            writeln!(f, "Candidates:")?;
            for c in &self.candidates {
                writeln!(
                    f,
                    "  - index {} [{}] rows={:.0} sel={:.4} b={:.4} a={:.4} x0={:.2}",
                    c.index,
                    c.role.as_str(),
                    c.est_elements,
                    c.selectivity,
                    c.build_cost,
                    c.slope,
                    c.break_even
                )?;
            }
        }

        if let Some(choice) = &self.choice {
            let ref_key = choice
                .ref_key
                .map_or_else(|| "none".to_string(), |k| k.to_string());
            writeln!(
                f,
                "Join order: ref key {}, cardinality {:.0}",
                ref_key, choice.cardinality
            )?;
            match (choice.chosen_index, choice.gain) {
                (Some(index), Some(gain)) => {
                    writeln!(f, "Chosen: index {} (gain {:.4})", index, gain)?
                }
                _ => writeln!(f, "Chosen: none")?,
            }
        }

        Ok(())
    }
}
