//! Coarse field validation for diagram create / update / solve requests.
//!
//! These checks only bound the shape of the input. Full sudoku legality is
//! checked by [`crate::sudoku`] when a diagram is solved, so a diagram may be
//! stored with a definition that later turns out to be malformed.

use crate::error::CoreError;
use crate::types::DbId;

/// Entity name used in `NotFound` errors.
pub const ENTITY: &str = "Diagram";

/// Maximum raw length of a stored definition, in characters.
pub const MAX_DEFINITION_LENGTH: usize = 10_000;

/// Maximum length of a diagram display name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Validate a diagram id taken from the request path.
pub fn validate_id(id: DbId) -> Result<(), CoreError> {
    if id <= 0 {
        return Err(CoreError::Validation("id must be a positive integer".into()));
    }
    Ok(())
}

/// Validate a raw definition (non-blank, <= 10000 characters).
pub fn validate_definition(definition: &str) -> Result<(), CoreError> {
    if definition.trim().is_empty() {
        return Err(CoreError::Validation("definition must be provided".into()));
    }
    if definition.chars().count() > MAX_DEFINITION_LENGTH {
        return Err(CoreError::Validation(format!(
            "definition length must be <= {MAX_DEFINITION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional display name (<= 100 characters).
pub fn validate_name(name: Option<&str>) -> Result<(), CoreError> {
    if let Some(name) = name {
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(CoreError::Validation(format!(
                "name length must be <= {MAX_NAME_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Checks shared by create and update: definition first, then name.
pub fn validate_fields(name: Option<&str>, definition: &str) -> Result<(), CoreError> {
    validate_definition(definition)?;
    validate_name(name)
}
