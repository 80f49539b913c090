//! Birthday celebration banner
//!
//! Shown once per user per day, tracked with a storage flag.

use crate::credentials::CredentialStore;
use crate::models::UserProfile;
use crate::storage::StorageError;
use chrono::{Datelike, NaiveDate};
use tracing::info;

/// Month/day match; Feb 29 birthdays fall on Feb 28 in non-leap years
pub fn is_birthday(date_of_birth: NaiveDate, today: NaiveDate) -> bool {
    if date_of_birth.month() == today.month() && date_of_birth.day() == today.day() {
        return true;
    }

    date_of_birth.month() == 2
        && date_of_birth.day() == 29
        && today.month() == 2
        && today.day() == 28
        && NaiveDate::from_ymd_opt(today.year(), 2, 29).is_none()
}

/// True the first time it is asked on the user's birthday; marks the flag
pub fn take_celebration(
    credentials: &CredentialStore,
    user: &UserProfile,
    today: NaiveDate,
) -> Result<bool, StorageError> {
    let Some(dob) = user.birth_date() else {
        return Ok(false);
    };
    if !is_birthday(dob, today) {
        return Ok(false);
    }

    let user_id = user.id.to_string();
    if credentials.birthday_celebrated(&user_id, today) {
        return Ok(false);
    }

    credentials.mark_birthday_celebrated(&user_id, today)?;
    info!("Happy birthday, {}", user.full_name);
    Ok(true)
}
