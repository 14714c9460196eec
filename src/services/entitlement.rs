//! Entitlement evaluation.
//!
//! Derives a user's access level from their (optional) subscription row and
//! the current instant. Pure and total: no I/O, no failure cases. Storage only
//! ever holds `trial` or `active`; `expired` and `none` exist only here.

use crate::entities::{SubscriptionStatus, subscription_entity as subscriptions};
use crate::models::{Entitlement, EntitlementStatus};
use chrono::{DateTime, Duration, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const NANOS_PER_DAY: i64 = MILLIS_PER_DAY * 1_000_000;

/// Classify access for `subscription` at `now`. Rules apply in order and the
/// first match wins; every boundary uses a strict `now < end` comparison.
pub fn evaluate(subscription: Option<&subscriptions::Model>, now: DateTime<Utc>) -> Entitlement {
    let Some(sub) = subscription else {
        return Entitlement {
            status: EntitlementStatus::None,
            is_active: false,
            is_trial_active: false,
            is_subscription_active: false,
            days_left: None,
        };
    };

    let is_trial_active =
        sub.status == SubscriptionStatus::Trial && sub.trial_end.is_some_and(|end| now < end);
    // an active row without an end date is incomplete and grants nothing
    let is_subscription_active = sub.status == SubscriptionStatus::Active
        && sub.subscription_end.is_some_and(|end| now < end);

    let (status, days_left) = if is_trial_active {
        let days_left = sub
            .trial_end
            .map(|end| ceil_days(end - now));
        (EntitlementStatus::Trial, days_left)
    } else if is_subscription_active {
        (EntitlementStatus::Active, None)
    } else if sub.status == SubscriptionStatus::Trial && sub.trial_end.is_some_and(|end| end <= now)
    {
        (EntitlementStatus::Expired, None)
    } else {
        (EntitlementStatus::None, None)
    };

    Entitlement {
        status,
        is_active: is_trial_active || is_subscription_active,
        is_trial_active,
        is_subscription_active,
        days_left,
    }
}

/// Whole days remaining, rounded up. Any positive remainder counts as a day.
fn ceil_days(remaining: Duration) -> i64 {
    match remaining.num_nanoseconds() {
        Some(nanos) => ceil_div(nanos, NANOS_PER_DAY),
        // beyond ~292 years; millisecond precision is plenty there
        None => ceil_div(remaining.num_milliseconds(), MILLIS_PER_DAY).max(1),
    }
}

fn ceil_div(value: i64, unit: i64) -> i64 {
    value.div_euclid(unit) + i64::from(value.rem_euclid(unit) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn d0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()
    }

    fn trial(end: DateTime<Utc>) -> subscriptions::Model {
        subscriptions::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            status: SubscriptionStatus::Trial,
            trial_start: Some(end - Duration::days(7)),
            trial_end: Some(end),
            subscription_start: None,
            subscription_end: None,
            stripe_payment_intent_id: None,
            created_at: end - Duration::days(7),
            updated_at: end - Duration::days(7),
        }
    }

    fn active(end: Option<DateTime<Utc>>) -> subscriptions::Model {
        subscriptions::Model {
            status: SubscriptionStatus::Active,
            trial_start: None,
            trial_end: None,
            subscription_start: Some(d0()),
            subscription_end: end,
            ..trial(d0())
        }
    }

    #[test]
    fn test_absent_subscription_is_none() {
        let e = evaluate(None, d0());
        assert_eq!(e.status, EntitlementStatus::None);
        assert_eq!(e.days_left, None);
        assert!(!e.is_trial_active);
        assert!(!e.is_subscription_active);
        assert!(!e.is_active);
    }

    #[test]
    fn test_trial_mid_window_counts_remaining_days() {
        let sub = trial(d0() + Duration::days(7));
        let e = evaluate(Some(&sub), d0() + Duration::days(3));
        assert_eq!(e.status, EntitlementStatus::Trial);
        assert_eq!(e.days_left, Some(4));
        assert!(e.is_trial_active);
        assert!(e.is_active);
        assert!(!e.has_premium_access());
    }

    #[test]
    fn test_trial_days_left_rounds_up_and_is_at_least_one() {
        let end = d0() + Duration::days(7);
        let sub = trial(end);

        let e = evaluate(Some(&sub), end - Duration::milliseconds(1));
        assert_eq!(e.days_left, Some(1));

        let e = evaluate(Some(&sub), end - Duration::days(2) - Duration::hours(1));
        assert_eq!(e.days_left, Some(3));

        let e = evaluate(Some(&sub), d0());
        assert_eq!(e.days_left, Some(7));
    }

    #[test]
    fn test_sub_millisecond_remainder_still_counts_a_day() {
        let end = d0() + Duration::days(7);
        let sub = trial(end);

        let e = evaluate(Some(&sub), end - Duration::microseconds(500));
        assert!(e.is_trial_active);
        assert_eq!(e.days_left, Some(1));

        let e = evaluate(Some(&sub), end - Duration::nanoseconds(1));
        assert_eq!(e.days_left, Some(1));
    }

    #[test]
    fn test_trial_end_equal_to_now_is_expired() {
        let end = d0() + Duration::days(7);
        let e = evaluate(Some(&trial(end)), end);
        assert_eq!(e.status, EntitlementStatus::Expired);
        assert!(!e.is_trial_active);
        assert_eq!(e.days_left, None);
    }

    #[test]
    fn test_trial_in_the_past_is_expired() {
        let e = evaluate(Some(&trial(d0())), d0() + Duration::days(30));
        assert_eq!(e.status, EntitlementStatus::Expired);
        assert!(!e.is_active);
    }

    #[test]
    fn test_trial_without_end_date_is_none() {
        let mut sub = trial(d0());
        sub.trial_end = None;
        assert_eq!(evaluate(Some(&sub), d0()).status, EntitlementStatus::None);
    }

    #[test]
    fn test_active_subscription() {
        let sub = active(Some(d0() + Duration::days(30)));
        let e = evaluate(Some(&sub), d0() + Duration::days(1));
        assert_eq!(e.status, EntitlementStatus::Active);
        assert_eq!(e.days_left, None);
        assert!(e.is_subscription_active);
        assert!(e.has_premium_access());
    }

    #[test]
    fn test_active_without_end_date_is_none() {
        let e = evaluate(Some(&active(None)), d0());
        assert_eq!(e.status, EntitlementStatus::None);
        assert!(!e.is_subscription_active);
        assert!(!e.has_premium_access());
    }

    #[test]
    fn test_lapsed_active_subscription_is_none() {
        let end = d0() + Duration::days(30);
        let e = evaluate(Some(&active(Some(end))), end);
        assert_eq!(e.status, EntitlementStatus::None);
    }
}
