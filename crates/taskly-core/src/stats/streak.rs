//! Consecutive-day streak tracking.

use chrono::NaiveDate;

use super::record::StatsRecord;

impl StatsRecord {
    /// Count a qualifying activity on `today`.
    ///
    /// Same-day calls after the first are no-ops. Returns whether the
    /// streak counters changed.
    pub fn record_activity(&mut self, today: NaiveDate) -> bool {
        if self.last_active_date == Some(today) {
            return false;
        }
        let continues = self
            .last_active_date
            .and_then(|last| last.succ_opt())
            .is_some_and(|next| next == today);
        self.streak = if continues { self.streak + 1 } else { 1 };
        self.best_streak = self.best_streak.max(self.streak);
        self.last_active_date = Some(today);
        true
    }
}
