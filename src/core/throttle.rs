use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Sliding-window limit on recurrence applications per owning user.
///
/// Work over the limit is queued, not dropped: [`UserThrottle::reserve`] hands
/// back the earliest start that keeps at most `limit` starts in any `period`.
#[derive(Debug, Clone)]
pub struct UserThrottle {
    limit: usize,
    period: Duration,
    windows: HashMap<Uuid, VecDeque<DateTime<Utc>>>,
}

impl UserThrottle {
    pub fn new(limit: usize, period: Duration) -> Self {
        Self {
            limit: limit.max(1),
            period,
            windows: HashMap::new(),
        }
    }

    /// Books the next start slot for `user_id`, which is `now` unless the window is full.
    pub fn reserve(&mut self, user_id: Uuid, now: DateTime<Utc>) -> DateTime<Utc> {
        let window = self.windows.entry(user_id).or_default();
        while let Some(oldest) = window.front() {
            if now - *oldest >= self.period {
                window.pop_front();
            } else {
                break;
            }
        }
        let start = if window.len() >= self.limit {
            let blocking = window[window.len() - self.limit];
            (blocking + self.period).max(now)
        } else {
            now
        };
        window.push_back(start);
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn limits_each_user_independently() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut throttle = UserThrottle::new(2, Duration::seconds(60));
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert_eq!(throttle.reserve(alice, now), now);
        assert_eq!(throttle.reserve(alice, now), now);
        assert_eq!(throttle.reserve(alice, now), now + Duration::seconds(60));
        assert_eq!(throttle.reserve(bob, now), now);
    }

    #[test]
    fn queued_starts_stay_within_the_limit() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut throttle = UserThrottle::new(2, Duration::seconds(60));
        let user = Uuid::new_v4();

        let starts: Vec<_> = (0..5).map(|_| throttle.reserve(user, now)).collect();
        assert_eq!(
            starts,
            vec![
                now,
                now,
                now + Duration::seconds(60),
                now + Duration::seconds(60),
                now + Duration::seconds(120),
            ]
        );
    }

    #[test]
    fn window_slides_after_period() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut throttle = UserThrottle::new(1, Duration::seconds(60));
        let user = Uuid::new_v4();

        assert_eq!(throttle.reserve(user, now), now);
        let later = now + Duration::seconds(30);
        assert_eq!(throttle.reserve(user, later), now + Duration::seconds(60));
        let after = now + Duration::seconds(200);
        assert_eq!(throttle.reserve(user, after), after);
    }
}
