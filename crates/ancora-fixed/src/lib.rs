//! # ancora-fixed
//!
//! Deterministic 18-decimal fixed-point arithmetic for the Ancora
//! protocol.
//!
//! Every price, market signal, weight, ratio and token amount in the
//! system is a [`Fixed`]: an unsigned scaled integer with `10^18`
//! fractional resolution. Arithmetic is explicit about failure.
//! Overflow, underflow and division by zero are errors, never silent
//! wrap-around, and multiplication/division widen through a 256-bit
//! intermediate so that products of realistic amounts and prices never
//! lose precision.
//!
//! ## Modules
//!
//! - [`fixed`] — the [`Fixed`] type and its operations

pub mod fixed;

pub use fixed::{Fixed, SCALE};

/// Error types for fixed-point operations.
#[derive(Debug, thiserror::Error)]
pub enum FixedError {
    /// The result exceeds the representable range.
    #[error("fixed-point overflow")]
    Overflow,

    /// Subtraction below zero.
    #[error("fixed-point underflow")]
    Underflow,

    /// Division by zero.
    #[error("fixed-point division by zero")]
    DivisionByZero,

    /// A decimal string could not be parsed.
    #[error("invalid decimal number: {0}")]
    InvalidNumber(String),
}

/// Convenience result type for fixed-point operations.
pub type Result<T> = std::result::Result<T, FixedError>;
