use chrono::{Local, NaiveDateTime, SubsecRound};

pub mod dashboard;
pub mod department;
pub mod employee;
pub mod overtime;

/// Wall-clock time stamped onto created/modified columns, in whole seconds
/// to match `DATETIME`.
fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn timestamps_carry_no_fractional_seconds() {
        assert_eq!(now().nanosecond(), 0);
    }
}
