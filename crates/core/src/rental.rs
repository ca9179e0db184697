//! Rental domain rules.

use chrono::NaiveDate;

use crate::error::CoreError;

/// Status assigned to a rental on admission.
pub const STATUS_ONGOING: &str = "ongoing";

/// Validate a requested rental date range.
///
/// Both dates must be present and the range must not be inverted. A
/// single-day rental (`start == end`) is valid.
pub fn validate_rental_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate), CoreError> {
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(CoreError::Validation(
                "start_date and end_date are required".into(),
            ))
        }
    };

    if start > end {
        return Err(CoreError::Validation(
            "start_date must not be after end_date".into(),
        ));
    }

    Ok((start, end))
}
