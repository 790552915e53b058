use std::cell::Cell;
use std::time::Duration;

use scrobcli::error::ApiError;
use scrobcli::retry::{RetryPolicy, with_retry};

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
    }
}

#[test]
fn test_default_policy_constants() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.base_delay, Duration::from_millis(1000));
}

#[test]
fn test_delay_doubles_per_attempt() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay(1), Duration::from_millis(1000));
    assert_eq!(policy.delay(2), Duration::from_millis(2000));
    assert_eq!(policy.delay(3), Duration::from_millis(4000));

    let short = RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(10),
    };
    assert_eq!(short.delay(1), Duration::from_millis(10));
    assert_eq!(short.delay(2), Duration::from_millis(20));
    assert_eq!(short.delay(3), Duration::from_millis(40));
}

#[test]
fn test_should_retry_only_transient_errors() {
    let policy = RetryPolicy::default();

    assert!(policy.should_retry(&ApiError::RateLimit, 1));
    assert!(policy.should_retry(&ApiError::Server { status: 502 }, 1));

    assert!(!policy.should_retry(&ApiError::Auth, 1));
    assert!(!policy.should_retry(
        &ApiError::Protocol {
            status: 400,
            message: "bad request".to_string(),
        },
        1
    ));
    assert!(!policy.should_retry(
        &ApiError::Handshake("missing oauth_token".to_string()),
        1
    ));
    assert!(!policy.should_retry(
        &ApiError::Remote {
            code: 9,
            message: "Invalid session key".to_string(),
        },
        1
    ));
}

#[test]
fn test_should_retry_respects_attempt_budget() {
    let policy = RetryPolicy::default();

    // Three total attempts: retries are allowed after the first and second
    // attempts, never after the third
    assert!(policy.should_retry(&ApiError::RateLimit, 1));
    assert!(policy.should_retry(&ApiError::RateLimit, 2));
    assert!(!policy.should_retry(&ApiError::RateLimit, 3));
    assert!(!policy.should_retry(&ApiError::RateLimit, 4));
}

#[tokio::test]
async fn test_with_retry_makes_exactly_three_attempts_then_surfaces() {
    let calls = Cell::new(0u32);

    let result: Result<u32, ApiError> = with_retry(&fast_policy(), |_| {
        calls.set(calls.get() + 1);
        async { Err(ApiError::Server { status: 500 }) }
    })
    .await;

    assert_eq!(calls.get(), 3);
    assert!(matches!(result, Err(ApiError::Server { status: 500 })));
}

#[tokio::test]
async fn test_with_retry_recovers_on_third_attempt() {
    let calls = Cell::new(0u32);

    let result = with_retry(&fast_policy(), |attempt| {
        calls.set(calls.get() + 1);
        async move {
            if attempt < 3 {
                Err(ApiError::RateLimit)
            } else {
                Ok(42)
            }
        }
    })
    .await;

    assert_eq!(calls.get(), 3);
    assert_eq!(result.unwrap(), 42);
}

#[tokio::test]
async fn test_with_retry_passes_incrementing_attempt_numbers() {
    let seen = std::cell::RefCell::new(Vec::new());

    let _ = with_retry(&fast_policy(), |attempt| {
        seen.borrow_mut().push(attempt);
        async { Err::<(), _>(ApiError::RateLimit) }
    })
    .await;

    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_with_retry_does_not_retry_fatal_errors() {
    let calls = Cell::new(0u32);

    let result: Result<u32, ApiError> = with_retry(&fast_policy(), |_| {
        calls.set(calls.get() + 1);
        async { Err(ApiError::Auth) }
    })
    .await;

    assert_eq!(calls.get(), 1);
    assert!(matches!(result, Err(ApiError::Auth)));
}
