use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{TimeZone, Utc};

use crate::workflows::recruitment::scheduling::{SchedulingError, TokenCache};

#[test]
fn token_is_reused_while_valid() {
    let cache = TokenCache::default();
    let fetches = AtomicU32::new(0);
    let refresh = || {
        fetches.fetch_add(1, Ordering::SeqCst);
        Ok(("token-1".to_string(), 3600))
    };

    let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    let first = cache.get_or_refresh(start, refresh).expect("fetch");
    assert_eq!(first, "token-1");
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    // Two meeting-creation calls within the validity window share one fetch.
    let soon = start + chrono::Duration::seconds(30);
    let second = cache
        .get_or_refresh(soon, || {
            fetches.fetch_add(1, Ordering::SeqCst);
            Ok(("token-2".to_string(), 3600))
        })
        .expect("cached");
    assert_eq!(second, "token-1");
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn token_refreshes_inside_the_sixty_second_margin() {
    let cache = TokenCache::default();
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    cache
        .get_or_refresh(start, || Ok(("token-1".to_string(), 3600)))
        .expect("fetch");

    // 3541s in: expiry minus 59s, inside the refresh margin.
    let near_expiry = start + chrono::Duration::seconds(3541);
    let refreshed = cache
        .get_or_refresh(near_expiry, || Ok(("token-2".to_string(), 3600)))
        .expect("refresh");
    assert_eq!(refreshed, "token-2");

    // The fresh token is then served from cache again.
    let after = near_expiry + chrono::Duration::seconds(10);
    let cached = cache
        .get_or_refresh(after, || Ok(("token-3".to_string(), 3600)))
        .expect("cached");
    assert_eq!(cached, "token-2");
}

#[test]
fn token_still_cached_just_outside_the_margin() {
    let cache = TokenCache::default();
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    cache
        .get_or_refresh(start, || Ok(("token-1".to_string(), 3600)))
        .expect("fetch");

    // 3539s in: one second before the margin opens, still reused.
    let near = start + chrono::Duration::seconds(3539);
    let cached = cache
        .get_or_refresh(near, || Ok(("token-2".to_string(), 3600)))
        .expect("cached");
    assert_eq!(cached, "token-1");
}

#[test]
fn refresh_failures_propagate_and_leave_the_cache_empty() {
    let cache = TokenCache::default();
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    let err = cache
        .get_or_refresh(start, || {
            Err(SchedulingError::Token("auth rejected".to_string()))
        })
        .expect_err("refresh fails");
    assert!(matches!(err, SchedulingError::Token(_)));

    // The next call retries instead of serving a stale token.
    let token = cache
        .get_or_refresh(start, || Ok(("token-1".to_string(), 3600)))
        .expect("retry");
    assert_eq!(token, "token-1");
}
