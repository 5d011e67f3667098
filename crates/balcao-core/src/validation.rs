//! # Validation Module
//!
//! Input validation utilities for Balcão POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Embedding application                                     │
//! │  └── Format checks, immediate operator feedback                     │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - business rule validation                    │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── CHECK constraints (amounts ≥ 0, enum values)                   │
//! │  ├── UNIQUE partial index (single open session)                     │
//! │  └── Foreign key constraints                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_CUSTOMER_LEN, MAX_DESCRIPTION_LEN, MAX_OPERATOR_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an amount that must be strictly positive, in centavos.
///
/// Used for recorded movements, counted closings, and receivable values:
/// a zero-value sale or sangria is operator error, not a business event.
///
/// ## Example
/// ```rust
/// use balcao_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents(5_000).is_ok());
/// assert!(validate_amount_cents(0).is_err());
/// assert!(validate_amount_cents(-100).is_err());
/// ```
pub fn validate_amount_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates an opening float, in centavos.
///
/// Zero is allowed: a register may legitimately open without change.
pub fn validate_opening_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "opening amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a counted closing amount, in centavos.
///
/// Zero is allowed: an emptied register counts to zero.
pub fn validate_counted_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "counted amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates the operator identity string.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
pub fn validate_operator(operator: &str) -> ValidationResult<()> {
    let operator = operator.trim();

    if operator.is_empty() {
        return Err(ValidationError::Required {
            field: "operator".to_string(),
        });
    }

    if operator.chars().count() > MAX_OPERATOR_LEN {
        return Err(ValidationError::TooLong {
            field: "operator".to_string(),
            max: MAX_OPERATOR_LEN,
        });
    }

    Ok(())
}

/// Validates an optional free-text description.
///
/// Empty is fine (movements fall back to their kind's default label);
/// only the length is bounded.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

/// Validates a receivable's customer name.
///
/// ## Rules
/// - Must not be empty
/// - At most 120 characters
pub fn validate_customer(customer: &str) -> ValidationResult<()> {
    let customer = customer.trim();

    if customer.is_empty() {
        return Err(ValidationError::Required {
            field: "customer".to_string(),
        });
    }

    if customer.chars().count() > MAX_CUSTOMER_LEN {
        return Err(ValidationError::TooLong {
            field: "customer".to_string(),
            max: MAX_CUSTOMER_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use balcao_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount_cents() {
        assert!(validate_amount_cents(1).is_ok());
        assert!(validate_amount_cents(50_000).is_ok());

        assert!(validate_amount_cents(0).is_err());
        assert!(validate_amount_cents(-500).is_err());
    }

    #[test]
    fn test_validate_opening_and_counted_allow_zero() {
        assert!(validate_opening_cents(0).is_ok());
        assert!(validate_opening_cents(10_000).is_ok());
        assert!(validate_opening_cents(-1).is_err());

        assert!(validate_counted_cents(0).is_ok());
        assert!(validate_counted_cents(-1).is_err());
    }

    #[test]
    fn test_validate_operator() {
        assert!(validate_operator("Operador").is_ok());
        assert!(validate_operator("").is_err());
        assert!(validate_operator("   ").is_err());
        assert!(validate_operator(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("").is_ok());
        assert!(validate_description("Depósito bancário").is_ok());
        assert!(validate_description(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_customer() {
        assert!(validate_customer("João Silva").is_ok());
        assert!(validate_customer("").is_err());
        assert!(validate_customer(&"x".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
