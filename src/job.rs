//! Operator Job
//!
//! Metadata entered on the home screen before a comparison starts.

use chrono::{DateTime, Local};

use crate::auth::Role;

/// Printing presses offered in the job form
pub const MACHINES: &[&str] = &["Gidue", "X4", "X6", "Gallus"];

#[derive(Debug, Clone, PartialEq)]
pub struct OperatorJob {
    pub operator: String,
    /// Zákazka
    pub job_number: String,
    /// Produkt
    pub product: String,
    /// Stroj
    pub machine: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: String,
    pub role: Role,
}

impl OperatorJob {
    /// Empty job for the role; admins are prefilled as operator "admin"
    pub fn new(role: Role, now: DateTime<Local>) -> Self {
        Self {
            operator: if role.is_admin() { "admin".to_string() } else { String::new() },
            job_number: String::new(),
            product: String::new(),
            machine: String::new(),
            date: form_date(now),
            time: form_time(now),
            role,
        }
    }

    /// Labels of required fields that are still blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            (&self.operator, "meno operátora"),
            (&self.job_number, "číslo zákazky"),
            (&self.product, "číslo produktu"),
            (&self.machine, "stroj"),
            (&self.date, "dátum"),
            (&self.time, "čas"),
        ];
        required
            .iter()
            .filter(|(value, _)| value.trim().is_empty())
            .map(|(_, label)| *label)
            .collect()
    }
}

/// Value for `<input type="date">`
pub fn form_date(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Value for `<input type="time">`
pub fn form_time(now: DateTime<Local>) -> String {
    now.format("%H:%M").to_string()
}

/// Slovak locale timestamp, e.g. "16. 10. 2026 14:03:05"
pub fn sk_timestamp(now: DateTime<Local>) -> String {
    now.format("%-d. %-m. %Y %-H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 4).unwrap()
    }

    #[test]
    fn test_admin_prefilled_operator() {
        let job = OperatorJob::new(Role::Admin, at());
        assert_eq!(job.operator, "admin");
        assert_eq!(job.date, "2026-03-07");
        assert_eq!(job.time, "09:05");
        assert_eq!(OperatorJob::new(Role::Operator, at()).operator, "");
    }

    #[test]
    fn test_missing_fields() {
        let mut job = OperatorJob::new(Role::Admin, at());
        assert_eq!(job.missing_fields(), vec!["číslo zákazky", "číslo produktu", "stroj"]);
        job.job_number = "Z-1001".to_string();
        job.product = "P-77".to_string();
        job.machine = MACHINES[1].to_string();
        assert!(job.missing_fields().is_empty());
    }

    #[test]
    fn test_sk_timestamp() {
        assert_eq!(sk_timestamp(at()), "7. 3. 2026 9:05:04");
    }
}
