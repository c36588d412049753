use chrono::{DateTime, SubsecRound, Utc};
use portfolio_shared_contracts::time::TimeService;

/// Wall clock, truncated to whole seconds so that stored timestamps stay
/// readable in the backup log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    #[tracing::instrument(level = "trace", skip(self))]
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    #[test]
    fn now_has_no_subsecond_part() {
        assert_eq!(TimeServiceImpl.now().nanosecond(), 0);
    }
}
