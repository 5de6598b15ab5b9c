//! Interval timers for the three gameplay rules.
//!
//! Timers are armed when play begins and cancelled when it ends. The engine
//! pulls due firings one at a time, in chronological order, so a host that
//! polls late still replays every firing at its scheduled instant.

use rugflip_core::types::Millis;

/// The timed rules, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    PassiveIncome,
    ObstacleSpawn,
    ObstacleExpiry,
}

/// A repeating timer with a fixed period.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Millis,
    next_due: Option<Millis>,
}

impl IntervalTimer {
    /// Create a cancelled timer. Periods below 1 ms are raised to 1 ms.
    pub fn new(period: Millis) -> Self {
        Self {
            period: period.max(1),
            next_due: None,
        }
    }

    /// (Re)start the timer; the first firing is one period after `now`.
    pub fn arm(&mut self, now: Millis) {
        self.next_due = Some(now.saturating_add(self.period));
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.next_due
    }

    pub fn period(&self) -> Millis {
        self.period
    }

    /// Consume the pending firing and schedule the following one.
    fn fire(&mut self) -> Option<Millis> {
        let due = self.next_due?;
        self.next_due = Some(due.saturating_add(self.period));
        Some(due)
    }
}

/// The income, spawn, and expiry timers of one engine.
#[derive(Debug, Clone)]
pub struct RuleTimers {
    pub passive_income: IntervalTimer,
    pub obstacle_spawn: IntervalTimer,
    pub obstacle_expiry: IntervalTimer,
}

impl RuleTimers {
    pub fn new(income_ms: Millis, spawn_ms: Millis, expiry_ms: Millis) -> Self {
        Self {
            passive_income: IntervalTimer::new(income_ms),
            obstacle_spawn: IntervalTimer::new(spawn_ms),
            obstacle_expiry: IntervalTimer::new(expiry_ms),
        }
    }

    pub fn arm_all(&mut self, now: Millis) {
        self.passive_income.arm(now);
        self.obstacle_spawn.arm(now);
        self.obstacle_expiry.arm(now);
    }

    pub fn cancel_all(&mut self) {
        self.passive_income.cancel();
        self.obstacle_spawn.cancel();
        self.obstacle_expiry.cancel();
    }

    pub fn is_armed(&self) -> bool {
        self.passive_income.is_armed()
            || self.obstacle_spawn.is_armed()
            || self.obstacle_expiry.is_armed()
    }

    /// Earliest pending firing across all timers.
    pub fn next_due(&self) -> Option<Millis> {
        self.timers().filter_map(|(_, t)| t.next_due()).min()
    }

    /// Pop the earliest firing due at or before `now`. Ties go to the rule
    /// listed first in [`Rule`].
    pub fn pop_due(&mut self, now: Millis) -> Option<(Rule, Millis)> {
        let mut earliest: Option<(Rule, Millis)> = None;
        for (rule, timer) in self.timers() {
            if let Some(due) = timer.next_due() {
                if due <= now && !matches!(earliest, Some((_, best)) if best <= due) {
                    earliest = Some((rule, due));
                }
            }
        }

        let (rule, _) = earliest?;
        let due = self.timer_mut(rule).fire()?;
        Some((rule, due))
    }

    fn timers(&self) -> impl Iterator<Item = (Rule, &IntervalTimer)> {
        [
            (Rule::PassiveIncome, &self.passive_income),
            (Rule::ObstacleSpawn, &self.obstacle_spawn),
            (Rule::ObstacleExpiry, &self.obstacle_expiry),
        ]
        .into_iter()
    }

    fn timer_mut(&mut self, rule: Rule) -> &mut IntervalTimer {
        match rule {
            Rule::PassiveIncome => &mut self.passive_income,
            Rule::ObstacleSpawn => &mut self.obstacle_spawn,
            Rule::ObstacleExpiry => &mut self.obstacle_expiry,
        }
    }
}
