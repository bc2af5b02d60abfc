//! Observable state of one calculation.
//!
//! The front end reads `loading`, `error` and `result` to decide what to
//! show: a progress line while brackets are fetched, the breakdown table on
//! success, or the generic error notice.

use tax_core::TaxBreakdown;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationState {
    pub loading: bool,
    pub error: bool,
    pub result: Option<TaxBreakdown>,
}

impl CalculationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new submission. The previous result is kept until replaced.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = false;
    }

    pub fn succeed(
        &mut self,
        breakdown: TaxBreakdown,
    ) {
        self.loading = false;
        self.result = Some(breakdown);
    }

    /// Retrieval failed; any earlier breakdown is discarded.
    pub fn fail(&mut self) {
        self.loading = false;
        self.error = true;
        self.result = None;
    }

    /// The breakdown to display, if any.
    ///
    /// Never returns a result while loading or alongside an error.
    pub fn visible_result(&self) -> Option<&TaxBreakdown> {
        if self.loading || self.error {
            return None;
        }
        self.result.as_ref()
    }
}
