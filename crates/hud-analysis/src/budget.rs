//! Per-request cap on oracle calls

/// Counts down the oracle calls one request may still make
#[derive(Debug, Clone, Copy)]
pub struct CallBudget {
    remaining: Option<usize>,
}

impl CallBudget {
    pub fn limited(calls: usize) -> Self {
        Self {
            remaining: Some(calls),
        }
    }

    pub fn unlimited() -> Self {
        Self { remaining: None }
    }

    /// Spend one call; false once the budget is exhausted
    pub fn take(&mut self) -> bool {
        match &mut self.remaining {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }

    pub fn remaining(&self) -> Option<usize> {
        self.remaining
    }
}
