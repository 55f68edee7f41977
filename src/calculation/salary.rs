//! Salary computation from completed task hours.
//!
//! This is the arithmetic behind payroll generation:
//!
//! ```text
//! total_hours   = Σ task hours
//! regular_hours = min(total_hours, 160)
//! overtime_hours = max(0, total_hours - 160)
//! regular_pay   = rate × regular_hours + base_salary
//! overtime_pay  = rate × 1.5 × overtime_hours
//! total_salary  = regular_pay + overtime_pay
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::TaskHours;

use super::monthly_overtime::{OVERTIME_MULTIPLIER, STANDARD_MONTHLY_HOURS, split_monthly_hours};

/// Every figure of a salary computation, for persistence and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// Contributing tasks and their hours.
    pub completed_tasks: Vec<TaskHours>,
    /// Sum of task hours.
    pub total_hours: Decimal,
    /// Hours paid at the ordinary rate.
    pub regular_hours: Decimal,
    /// Hours beyond the monthly threshold.
    pub overtime_hours: Decimal,
    /// Hourly rate applied.
    pub hourly_rate: Decimal,
    /// Base salary added to regular pay.
    pub base_salary: Decimal,
    /// rate × regular_hours + base_salary.
    pub regular_pay: Decimal,
    /// rate × 1.5 × overtime_hours.
    pub overtime_pay: Decimal,
    /// regular_pay + overtime_pay.
    pub total_salary: Decimal,
}

/// Computes a month's salary from the hours of completed tasks.
///
/// The result depends only on its inputs, so the same tasks, rate and
/// base salary always produce the same figures.
///
/// # Examples
///
/// ```
/// use hotel_ops::calculation::compute_salary;
/// use hotel_ops::models::TaskHours;
/// use rust_decimal::Decimal;
///
/// let tasks = vec![
///     TaskHours { task_id: 1, hours: Decimal::from(100) },
///     TaskHours { task_id: 2, hours: Decimal::from(70) },
/// ];
/// let salary = compute_salary(tasks, Decimal::from(20), Decimal::ZERO);
///
/// assert_eq!(salary.regular_pay, Decimal::from(3200));
/// assert_eq!(salary.overtime_pay, Decimal::from(300));
/// assert_eq!(salary.total_salary, Decimal::from(3500));
/// ```
pub fn compute_salary(
    completed_tasks: Vec<TaskHours>,
    hourly_rate: Decimal,
    base_salary: Decimal,
) -> SalaryBreakdown {
    let total_hours: Decimal = completed_tasks.iter().map(|t| t.hours).sum();
    let split = split_monthly_hours(total_hours, STANDARD_MONTHLY_HOURS);

    let regular_pay = hourly_rate * split.regular_hours + base_salary;
    let overtime_pay = hourly_rate * OVERTIME_MULTIPLIER * split.overtime_hours;

    SalaryBreakdown {
        completed_tasks,
        total_hours,
        regular_hours: split.regular_hours,
        overtime_hours: split.overtime_hours,
        hourly_rate,
        base_salary,
        regular_pay,
        overtime_pay,
        total_salary: regular_pay + overtime_pay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tasks(hours: &[&str]) -> Vec<TaskHours> {
        hours
            .iter()
            .enumerate()
            .map(|(i, h)| TaskHours {
                task_id: i as i64 + 1,
                hours: dec(h),
            })
            .collect()
    }

    // =========================================================================
    // SAL-001: worked example from the pay policy
    // =========================================================================

    #[test]
    fn test_170_hours_at_20_dollars() {
        let salary = compute_salary(tasks(&["80", "90"]), dec("20"), Decimal::ZERO);

        assert_eq!(salary.total_hours, dec("170"));
        assert_eq!(salary.regular_hours, dec("160"));
        assert_eq!(salary.overtime_hours, dec("10"));
        assert_eq!(salary.regular_pay, dec("3200"));
        assert_eq!(salary.overtime_pay, dec("300"));
        assert_eq!(salary.total_salary, dec("3500"));
    }

    // =========================================================================
    // SAL-002: threshold boundaries
    // =========================================================================

    #[test]
    fn test_exactly_160_hours() {
        let salary = compute_salary(tasks(&["160"]), dec("20"), Decimal::ZERO);
        assert_eq!(salary.regular_hours, dec("160"));
        assert_eq!(salary.overtime_hours, Decimal::ZERO);
        assert_eq!(salary.overtime_pay, Decimal::ZERO);
        assert_eq!(salary.total_salary, dec("3200"));
    }

    #[test]
    fn test_161_hours() {
        let salary = compute_salary(tasks(&["100", "61"]), dec("20"), Decimal::ZERO);
        assert_eq!(salary.regular_hours, dec("160"));
        assert_eq!(salary.overtime_hours, dec("1"));
        assert_eq!(salary.overtime_pay, dec("30"));
    }

    // =========================================================================
    // SAL-003: base salary only lands in regular pay
    // =========================================================================

    #[test]
    fn test_base_salary_added_to_regular_pay() {
        let salary = compute_salary(tasks(&["10"]), dec("15"), dec("1000"));
        assert_eq!(salary.regular_pay, dec("1150"));
        assert_eq!(salary.overtime_pay, Decimal::ZERO);
        assert_eq!(salary.total_salary, dec("1150"));
    }

    #[test]
    fn test_no_tasks_pays_base_salary() {
        let salary = compute_salary(Vec::new(), dec("25"), dec("500"));
        assert_eq!(salary.total_hours, Decimal::ZERO);
        assert_eq!(salary.total_salary, dec("500"));
        assert!(salary.completed_tasks.is_empty());
    }

    // =========================================================================
    // SAL-004: fractional hours flow through unrounded
    // =========================================================================

    #[test]
    fn test_fractional_hours_are_not_rounded() {
        let salary = compute_salary(tasks(&["1.25", "2.5"]), dec("10"), Decimal::ZERO);
        assert_eq!(salary.total_hours, dec("3.75"));
        assert_eq!(salary.regular_pay, dec("37.5"));
    }

    #[test]
    fn test_contributing_tasks_are_preserved() {
        let input = tasks(&["4", "6"]);
        let salary = compute_salary(input.clone(), dec("20"), Decimal::ZERO);
        assert_eq!(salary.completed_tasks, input);
    }

    // =========================================================================
    // SAL-005: invariants
    // =========================================================================

    proptest! {
        #[test]
        fn prop_total_is_sum_of_parts(
            quarter_hours in proptest::collection::vec(0u32..400, 0..40),
            rate_cents in 1u32..10_000,
            base in 0u32..5_000,
        ) {
            let input: Vec<TaskHours> = quarter_hours
                .iter()
                .enumerate()
                .map(|(i, q)| TaskHours { task_id: i as i64, hours: Decimal::new(*q as i64 * 25, 2) })
                .collect();
            let rate = Decimal::new(rate_cents as i64, 2);
            let base = Decimal::from(base);

            let salary = compute_salary(input.clone(), rate, base);

            prop_assert_eq!(salary.total_salary, salary.regular_pay + salary.overtime_pay);
            prop_assert_eq!(salary.regular_hours + salary.overtime_hours, salary.total_hours);
            prop_assert!(salary.regular_hours <= STANDARD_MONTHLY_HOURS);
            prop_assert!(salary.overtime_hours >= Decimal::ZERO);
            prop_assert!(salary.overtime_hours == Decimal::ZERO || salary.regular_hours == STANDARD_MONTHLY_HOURS);

            // Same inputs, same figures.
            prop_assert_eq!(compute_salary(input, rate, base), salary);
        }
    }
}
