//! Holdings amount input
//!
//! Keeps the user's pending text apart from the committed multiplier. The
//! committed value only changes on an explicit confirmation, and only to a
//! valid, finite, non-negative number rounded to 8 fractional digits
//! (one satoshi).

use thiserror::Error;

/// Multiplier used before the user confirms anything
pub const DEFAULT_HOLDINGS_AMOUNT: f64 = 1.0;

/// Fractional digits kept on confirmation
pub const AMOUNT_DECIMALS: usize = 8;

/// Input errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Pending text is not a usable amount
    #[error("Invalid holdings amount: {0:?}")]
    InvalidMultiplier(String),
}

/// Pending text plus committed multiplier
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingsInput {
    pending: String,
    committed: f64,
}

impl Default for HoldingsInput {
    fn default() -> Self {
        Self::new(DEFAULT_HOLDINGS_AMOUNT)
    }
}

impl HoldingsInput {
    /// Start with `committed` and its textual form as the pending text
    ///
    /// A committed value that would not pass [`parse_amount`] is replaced by
    /// [`DEFAULT_HOLDINGS_AMOUNT`].
    pub fn new(committed: f64) -> Self {
        let committed = valid_amount_or_default(committed);
        Self {
            pending: committed.to_string(),
            committed,
        }
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn committed(&self) -> f64 {
        self.committed
    }

    /// Replace the pending text; never touches the committed value
    pub fn set_pending(&mut self, text: impl Into<String>) {
        self.pending = text.into();
    }

    /// Confirmation is offered only for non-empty text that differs from
    /// the committed value
    pub fn can_confirm(&self) -> bool {
        !self.pending.is_empty() && self.pending != self.committed.to_string()
    }

    /// Parse the pending text and commit it
    ///
    /// On error the committed value is left as it was.
    pub fn confirm(&mut self) -> Result<f64, InputError> {
        let amount = parse_amount(&self.pending)?;
        if amount != self.committed {
            tracing::debug!(from = self.committed, to = amount, "Holdings amount committed");
        }
        self.committed = amount;
        Ok(amount)
    }
}

/// `amount` rounded as [`parse_amount`] would, or the default if invalid
pub fn valid_amount_or_default(amount: f64) -> f64 {
    match parse_amount(&amount.to_string()) {
        Ok(valid) => valid,
        Err(_) => {
            tracing::warn!(
                amount,
                fallback = DEFAULT_HOLDINGS_AMOUNT,
                "Invalid holdings amount, using default"
            );
            DEFAULT_HOLDINGS_AMOUNT
        }
    }
}

/// Parse a decimal amount and round it to [`AMOUNT_DECIMALS`] places
pub fn parse_amount(text: &str) -> Result<f64, InputError> {
    let invalid = || InputError::InvalidMultiplier(text.to_string());

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }

    format!("{:.*}", AMOUNT_DECIMALS, value)
        .parse::<f64>()
        .map(|rounded| if rounded == 0.0 { 0.0 } else { rounded })
        .map_err(|_| invalid())
}
