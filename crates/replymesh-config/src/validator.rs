//! Preferences validation.

use replymesh_protocols::error::ConfigError;

use crate::schema::{
    MAX_DAILY_LIMIT, MAX_REPLY_LENGTH, MIN_DAILY_LIMIT, MIN_REPLY_LENGTH, Preferences,
};

/// Validate a full preferences record.
///
/// An empty credential is allowed here — it only blocks generation, not
/// saving. The numeric bounds are inclusive on both ends.
pub fn validate(prefs: &Preferences) -> Result<(), ConfigError> {
    if prefs.max_length < MIN_REPLY_LENGTH || prefs.max_length > MAX_REPLY_LENGTH {
        return Err(ConfigError::invalid(
            "max_length",
            format!(
                "must be between {} and {}, got {}",
                MIN_REPLY_LENGTH, MAX_REPLY_LENGTH, prefs.max_length
            ),
        ));
    }

    if prefs.daily_limit < MIN_DAILY_LIMIT || prefs.daily_limit > MAX_DAILY_LIMIT {
        return Err(ConfigError::invalid(
            "daily_limit",
            format!(
                "must be between {} and {}, got {}",
                MIN_DAILY_LIMIT, MAX_DAILY_LIMIT, prefs.daily_limit
            ),
        ));
    }

    Ok(())
}
