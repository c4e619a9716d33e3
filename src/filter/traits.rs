// Criterion trait — one inclusion rule of a review protocol.
//
// Criteria are pluggable: the chain is configuration, not hardwired logic.
// Most criteria are pure functions of a single record; the chain-local
// duplicate guard is the exception and keeps its own identity state, which is
// why `admits` takes `&mut self` and chains call `reset` before every pass.

use crate::error::Result;
use crate::records::Record;

pub trait Criterion {
    /// Short stable name used in rejection reports.
    fn name(&self) -> &str;

    /// Whether the record passes this criterion.
    ///
    /// An `Err` means the record carried a malformed field the criterion
    /// needed; the chain treats it as a failure of this criterion only.
    fn admits(&mut self, record: &Record) -> Result<bool>;

    /// Clear any per-pass state. Pure criteria have none.
    fn reset(&mut self) {}
}

/// Adapter so any closure can join a chain.
pub struct FnCriterion<F> {
    name: String,
    check: F,
}

impl<F> FnCriterion<F>
where
    F: FnMut(&Record) -> bool,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> Criterion for FnCriterion<F>
where
    F: FnMut(&Record) -> bool,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn admits(&mut self, record: &Record) -> Result<bool> {
        Ok((self.check)(record))
    }
}
