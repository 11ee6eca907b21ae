//! Usage state
//!
//! Derives a promotion's redemption eligibility and a display-ready usage
//! tier from its raw counters. The backend owns the counters; everything here
//! is a pure reshaping of an already-fetched snapshot, and the authoritative
//! redemption check still happens server-side at apply time.

/// Raw usage counters for a promotion, as reported by the backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct UsageCounters {
    /// Global redemptions so far, across all users.
    pub current: u32,

    /// Global redemption cap. Zero means unlimited.
    pub limit: u32,

    /// Whether the current viewing user has already redeemed this promotion.
    ///
    /// Per-user flag, distinct from the global counter.
    pub is_used: bool,
}

/// Display tier for a promotion's usage progress, at the 50/70/90/100
/// percentage thresholds. Styling and messaging only — eligibility is decided
/// solely by [`UsageState::can_redeem`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum UsageTier {
    /// Under half of the cap has been used.
    Healthy,

    /// At least 50% used.
    Caution,

    /// At least 70% used.
    Warning,

    /// At least 90% used.
    Critical,

    /// The cap has been reached.
    Exhausted,
}

/// Derived usage state for a promotion.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UsageState {
    /// Progress-bar fill in `[0, 100]`.
    ///
    /// Unlimited promotions report 100 here — a display convention inherited
    /// from the storefront, not a signal that the promotion is spent. The
    /// figure saturates at 100 whenever the counter meets the cap.
    pub fill_percentage: u8,

    /// Redemptions left under the cap, or `None` when the cap is unlimited.
    ///
    /// Callers must branch on `None` before treating this as an eligibility
    /// figure; it is clamped at zero and never negative.
    pub remaining: Option<u32>,

    /// Display tier for styling and messaging.
    pub tier: UsageTier,

    /// Whether the current user can still redeem this promotion.
    ///
    /// The single boolean that gates any apply/copy-code action: false as
    /// soon as the user has redeemed it, or the global cap is exhausted.
    pub can_redeem: bool,
}

impl UsageCounters {
    /// Create counters from the backend's raw figures.
    pub fn new(current: u32, limit: u32, is_used: bool) -> Self {
        Self {
            current,
            limit,
            is_used,
        }
    }

    /// Whether the promotion has no global redemption cap.
    pub fn is_unlimited(&self) -> bool {
        self.limit == 0
    }

    /// Derive the display state and redemption eligibility.
    pub fn evaluate(&self) -> UsageState {
        if self.is_unlimited() {
            return UsageState {
                fill_percentage: 100,
                remaining: None,
                tier: UsageTier::Healthy,
                can_redeem: !self.is_used,
            };
        }

        let remaining = self.limit.saturating_sub(self.current);
        let fill_percentage = bounded_fill(self.current, self.limit);

        UsageState {
            fill_percentage,
            remaining: Some(remaining),
            tier: tier_for(fill_percentage),
            can_redeem: !self.is_used && remaining > 0,
        }
    }
}

/// Fill percentage for a bounded cap, saturating at 100.
fn bounded_fill(current: u32, limit: u32) -> u8 {
    if current >= limit {
        return 100;
    }

    let scaled = u64::from(current) * 100 / u64::from(limit);

    // current < limit, so the ratio is strictly below 100.
    u8::try_from(scaled).unwrap_or(100)
}

fn tier_for(fill_percentage: u8) -> UsageTier {
    match fill_percentage {
        100.. => UsageTier::Exhausted,
        90.. => UsageTier::Critical,
        70.. => UsageTier::Warning,
        50.. => UsageTier::Caution,
        _ => UsageTier::Healthy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_saturates_at_one_hundred() {
        let state = UsageCounters::new(120, 100, false).evaluate();

        assert_eq!(state.fill_percentage, 100);
        assert_eq!(state.remaining, Some(0));
        assert_eq!(state.tier, UsageTier::Exhausted);
    }

    #[test]
    fn used_flag_blocks_redemption_regardless_of_remaining() {
        let state = UsageCounters::new(50, 100, true).evaluate();

        assert_eq!(state.remaining, Some(50));
        assert!(!state.can_redeem);
    }

    #[test]
    fn exhausted_cap_blocks_redemption() {
        let state = UsageCounters::new(10, 10, false).evaluate();

        assert_eq!(state.remaining, Some(0));
        assert!(!state.can_redeem);
    }

    #[test]
    fn unlimited_cap_reports_full_fill_but_stays_redeemable() {
        let state = UsageCounters::new(1_000_000, 0, false).evaluate();

        assert_eq!(state.fill_percentage, 100);
        assert_eq!(state.remaining, None);
        assert_eq!(state.tier, UsageTier::Healthy);
        assert!(state.can_redeem);
    }

    #[test]
    fn unlimited_cap_still_honours_per_user_flag() {
        let state = UsageCounters::new(3, 0, true).evaluate();

        assert!(!state.can_redeem);
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(UsageCounters::new(0, 100, false).evaluate().tier, UsageTier::Healthy);
        assert_eq!(UsageCounters::new(49, 100, false).evaluate().tier, UsageTier::Healthy);
        assert_eq!(UsageCounters::new(50, 100, false).evaluate().tier, UsageTier::Caution);
        assert_eq!(UsageCounters::new(70, 100, false).evaluate().tier, UsageTier::Warning);
        assert_eq!(UsageCounters::new(90, 100, false).evaluate().tier, UsageTier::Critical);
        assert_eq!(UsageCounters::new(100, 100, false).evaluate().tier, UsageTier::Exhausted);
    }

    #[test]
    fn partial_fill_truncates_downward() {
        let state = UsageCounters::new(1, 3, false).evaluate();

        assert_eq!(state.fill_percentage, 33);
        assert_eq!(state.remaining, Some(2));
        assert!(state.can_redeem);
    }
}
