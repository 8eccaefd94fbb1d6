//! Date and money arithmetic for membership billing.
//!
//! Everything here is pure: no storage, no clock. Amounts are integer cents,
//! dates are calendar days.

use chrono::{Days, NaiveDate};

use crate::domain::MembershipStatus;
use crate::error::{AppError, Result};

/// End of a membership period: `start_date` plus `duration_days` whole days.
pub fn compute_end_date(start_date: NaiveDate, duration_days: i64) -> Result<NaiveDate> {
    if duration_days < 0 {
        return Err(AppError::InvalidArgument(format!(
            "Duration cannot be negative: {} days",
            duration_days
        )));
    }

    start_date
        .checked_add_days(Days::new(duration_days as u64))
        .ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "{} plus {} days is outside the supported calendar",
                start_date, duration_days
            ))
        })
}

/// Remaining amount owed. Never negative; the full price when nothing was paid.
pub fn compute_balance(price_cents: i64, payments: &[i64]) -> i64 {
    let paid = payments
        .iter()
        .fold(0i64, |total, amount| total.saturating_add(*amount));
    price_cents.saturating_sub(paid).max(0)
}

/// Largest installment count a price can be split into.
pub const MAX_INSTALLMENT_COUNT: u32 = 120;

/// Split `price_cents` into `count` equal shares. The division remainder goes
/// to the last installment so the shares always sum to the price exactly.
pub fn distribute_installments(price_cents: i64, count: u32) -> Result<Vec<i64>> {
    if count == 0 {
        return Err(AppError::InvalidArgument(
            "Installment count must be at least 1".to_string(),
        ));
    }
    if count > MAX_INSTALLMENT_COUNT {
        return Err(AppError::InvalidArgument(format!(
            "Installment count cannot exceed {}, got {}",
            MAX_INSTALLMENT_COUNT, count
        )));
    }
    if price_cents < 0 {
        return Err(AppError::InvalidArgument(
            "Price cannot be negative".to_string(),
        ));
    }

    let count_i64 = i64::from(count);
    let share = price_cents / count_i64;
    let remainder = price_cents % count_i64;

    let mut installments = vec![share; count as usize];
    if let Some(last) = installments.last_mut() {
        *last += remainder;
    }
    Ok(installments)
}

/// A balance is overdue once the period it belongs to has ended.
pub fn is_overdue(end_date: NaiveDate, balance_due_cents: i64, today: NaiveDate) -> bool {
    balance_due_cents > 0 && today > end_date
}

/// Active through the whole of `end_date`, expired the day after.
pub fn status_on(end_date: NaiveDate, today: NaiveDate) -> MembershipStatus {
    if today <= end_date {
        MembershipStatus::Active
    } else {
        MembershipStatus::Expired
    }
}

pub fn next_due_date(end_date: NaiveDate, balance_due_cents: i64) -> Option<NaiveDate> {
    (balance_due_cents > 0).then_some(end_date)
}

/// Render cents as a plain decimal amount, e.g. `150050` -> `"1500.50"`.
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_date_crosses_month_boundaries() {
        assert_eq!(compute_end_date(date(2025, 1, 1), 90).unwrap(), date(2025, 4, 1));
        assert_eq!(compute_end_date(date(2025, 4, 1), 90).unwrap(), date(2025, 6, 30));
        assert_eq!(compute_end_date(date(2024, 2, 28), 1).unwrap(), date(2024, 2, 29));
        assert_eq!(compute_end_date(date(2025, 2, 28), 1).unwrap(), date(2025, 3, 1));
        assert_eq!(compute_end_date(date(2025, 12, 15), 30).unwrap(), date(2026, 1, 14));
        assert_eq!(compute_end_date(date(2025, 3, 9), 0).unwrap(), date(2025, 3, 9));
    }

    #[test]
    fn test_end_date_rejects_negative_duration() {
        assert!(matches!(
            compute_end_date(date(2025, 1, 1), -1),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_end_date_round_trips() {
        let starts = [
            date(2024, 1, 31),
            date(2024, 2, 29),
            date(2025, 12, 31),
            date(1999, 12, 31),
            date(2100, 2, 28),
        ];
        for start in starts {
            for days in [0i64, 1, 28, 29, 30, 31, 90, 365, 366, 1000] {
                let end = compute_end_date(start, days).unwrap();
                assert_eq!(end - chrono::Duration::days(days), start, "{} + {}", start, days);
            }
        }
    }

    #[test]
    fn test_balance_never_negative() {
        assert_eq!(compute_balance(150_000, &[]), 150_000);
        assert_eq!(compute_balance(150_000, &[50_000, 25_000]), 75_000);
        assert_eq!(compute_balance(150_000, &[150_000]), 0);
        assert_eq!(compute_balance(150_000, &[100_000, 100_000]), 0);
        assert_eq!(compute_balance(0, &[]), 0);
    }

    #[test]
    fn test_installments_sum_to_price() {
        for price in [0i64, 1, 99, 100, 150_000, 100_001, 999_999] {
            for count in 1u32..=12 {
                let parts = distribute_installments(price, count).unwrap();
                assert_eq!(parts.len(), count as usize);
                assert_eq!(parts.iter().sum::<i64>(), price, "{} / {}", price, count);
            }
        }
    }

    #[test]
    fn test_installment_remainder_goes_last() {
        assert_eq!(
            distribute_installments(100_000, 3).unwrap(),
            vec![33_333, 33_333, 33_334]
        );
        assert_eq!(distribute_installments(2, 3).unwrap(), vec![0, 0, 2]);
        assert_eq!(distribute_installments(150_000, 1).unwrap(), vec![150_000]);
    }

    #[test]
    fn test_installments_reject_bad_input() {
        assert!(matches!(
            distribute_installments(150_000, 0),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            distribute_installments(-1, 2),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            distribute_installments(150_000, MAX_INSTALLMENT_COUNT + 1),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            distribute_installments(150_000, u32::MAX),
            Err(AppError::InvalidArgument(_))
        ));
        assert_eq!(
            distribute_installments(150_000, MAX_INSTALLMENT_COUNT).unwrap().len(),
            MAX_INSTALLMENT_COUNT as usize
        );
    }

    #[test]
    fn test_overdue_only_after_end_with_balance() {
        let end = date(2025, 4, 1);
        assert!(!is_overdue(end, 500, date(2025, 4, 1)));
        assert!(is_overdue(end, 500, date(2025, 4, 2)));
        assert!(!is_overdue(end, 0, date(2025, 4, 2)));
    }

    #[test]
    fn test_status_boundary_is_inclusive() {
        let end = date(2025, 4, 1);
        assert_eq!(status_on(end, date(2025, 3, 31)), MembershipStatus::Active);
        assert_eq!(status_on(end, date(2025, 4, 1)), MembershipStatus::Active);
        assert_eq!(status_on(end, date(2025, 4, 2)), MembershipStatus::Expired);
    }

    #[test]
    fn test_next_due_date() {
        let end = date(2025, 4, 1);
        assert_eq!(next_due_date(end, 1), Some(end));
        assert_eq!(next_due_date(end, 0), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(150_000), "1500.00");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(format_amount(-250), "-2.50");
    }
}
