// Filter chain — ordered inclusion criteria combined with logical AND.
//
// Evaluation short-circuits: a rejected record is attributed to the first
// criterion it failed, and later criteria never see it. That matters for the
// stateful chain-local duplicate guard, which only remembers records that
// reached it.

pub mod criteria;
pub mod traits;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::CoreError;
use crate::records::Record;
use criteria::{
    Accessible, Complete, CriterionKind, English, NotDuplicate, PeerReviewed, Recent, Relevant,
};
use traits::Criterion;

/// A record that failed the chain, with the first criterion it failed.
#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    pub record: Record,
    pub criterion: String,
    /// Set when the failure came from a malformed field rather than a "no".
    #[serde(skip)]
    pub error: Option<CoreError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterOutcome {
    pub kept: Vec<Record>,
    pub rejected: Vec<Rejection>,
    /// Criterion names in chain order.
    pub criteria: Vec<String>,
}

impl FilterOutcome {
    /// Rejection counts per criterion, in chain order (zero counts included).
    pub fn rejections_by_criterion(&self) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> =
            self.criteria.iter().map(|c| (c.clone(), 0)).collect();
        for rejection in &self.rejected {
            *counts.entry(rejection.criterion.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Records rejected because a field they needed was malformed.
    pub fn malformed_count(&self) -> usize {
        self.rejected.iter().filter(|r| r.error.is_some()).count()
    }
}

/// An ordered, configurable set of criteria.
#[derive(Default)]
pub struct FilterChain {
    criteria: Vec<Box<dyn Criterion>>,
}

impl FilterChain {
    /// An empty chain admits every record unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a criterion to the end of the chain.
    pub fn with(mut self, criterion: impl Criterion + 'static) -> Self {
        self.criteria.push(Box::new(criterion));
        self
    }

    pub fn push(&mut self, criterion: Box<dyn Criterion>) {
        self.criteria.push(criterion);
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Build the chain named by `config.criteria`, in that order.
    pub fn from_config(config: &Config) -> Self {
        let mut chain = Self::new();
        for kind in &config.criteria {
            chain.push(build_criterion(*kind, config));
        }
        chain
    }

    /// Run every record through the chain.
    ///
    /// Criterion state is reset first, so each call is an independent pass.
    pub fn apply(&mut self, records: Vec<Record>) -> FilterOutcome {
        for criterion in &mut self.criteria {
            criterion.reset();
        }

        let before = records.len();
        let mut kept = Vec::with_capacity(before);
        let mut rejected = Vec::new();

        for record in records {
            match self.first_failure(&record) {
                None => kept.push(record),
                Some((criterion, error)) => rejected.push(Rejection {
                    record,
                    criterion,
                    error,
                }),
            }
        }

        info!(
            before,
            after = kept.len(),
            rejected = rejected.len(),
            "Applied inclusion criteria"
        );

        FilterOutcome {
            kept,
            rejected,
            criteria: self.criteria.iter().map(|c| c.name().to_string()).collect(),
        }
    }

    fn first_failure(&mut self, record: &Record) -> Option<(String, Option<CoreError>)> {
        for criterion in &mut self.criteria {
            match criterion.admits(record) {
                Ok(true) => continue,
                Ok(false) => return Some((criterion.name().to_string(), None)),
                Err(e) => {
                    warn!(
                        criterion = criterion.name(),
                        error = %e,
                        title = record.title().unwrap_or_default(),
                        "Malformed field, excluding record from criterion"
                    );
                    return Some((criterion.name().to_string(), Some(e)));
                }
            }
        }
        None
    }
}

/// Instantiate a built-in criterion with its settings from `config`.
pub fn build_criterion(kind: CriterionKind, config: &Config) -> Box<dyn Criterion> {
    match kind {
        CriterionKind::PeerReviewed => Box::new(PeerReviewed),
        CriterionKind::Recent => Box::new(Recent {
            current_year: config.current_year(),
            window_years: config.recency_years,
        }),
        CriterionKind::Relevant => Box::new(Relevant::new(config.relevance_terms.as_slice())),
        CriterionKind::English => Box::new(English),
        CriterionKind::NotDuplicate => Box::new(NotDuplicate::default()),
        CriterionKind::Accessible => Box::new(Accessible),
        CriterionKind::Complete => Box::new(Complete),
    }
}
