//! End-to-end behavior through the public service surface

use serde_json::json;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tessera_api::{
    ActionRequest, ActionValue, CallError, ErrorKind, KernelLimits, KernelService, RingBufferAction, SortedSetAction,
};
use tessera_session::SessionConfig;

fn service() -> KernelService {
    tessera_tracing::init_test_tracing();
    KernelService::new(SessionConfig::default(), KernelLimits::default()).unwrap()
}

#[test]
fn stateless_kernels_match_reference_values() {
    let service = service();

    assert_eq!(
        service.sha256_hex(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(service.fibonacci(10).unwrap(), 55);
    assert_eq!(service.prime_sieve(10).unwrap(), vec![2, 3, 5, 7]);
    assert_eq!(service.count_primes(10).unwrap(), 4);
    assert_eq!(service.slugify("Hello, World!"), "hello-world");
    assert_eq!(service.extract_emails("a@b.com and broken@"), vec!["a@b.com"]);
    assert!(service.is_palindrome("A man, a plan, a canal: Panama"));
    assert_eq!(service.count_unique_words("the quick brown fox jumps over the lazy dog THE"), 8);
    assert_eq!(service.filter_positive(&[1, -2, 0, 3]), vec![1, 3]);
    assert_eq!(service.sum_list(&[1, 2, 3, 4, 5, -10, 20]).unwrap(), 25);
    assert_eq!(service.parallel_sum(&(1..=100_000).collect::<Vec<i64>>()).unwrap(), 5_000_050_000);

    let freq = service.word_frequencies(&["apple", "Banana", "APPLE", "cherry", "banana", "Apple"]);
    assert_eq!(freq["apple"], 3);
    assert_eq!(freq["banana"], 2);
    assert_eq!(freq["cherry"], 1);

    let product = service
        .matrix_multiply(&[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0, 7.0, 8.0], 2, 2, 2)
        .unwrap();
    assert_eq!(product, vec![19.0, 22.0, 43.0, 50.0]);
}

#[test]
fn validation_failures_are_typed() {
    let service = service();

    let err = service.safe_divide(10.0, 0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!((service.safe_divide(10.0, 3.0).unwrap() - 3.3333).abs() < 1e-4);

    let err = service.safe_parse_int("12abc").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(service.safe_parse_int("  -42 ").unwrap(), -42);

    let err = service.matrix_multiply(&[1.0; 3], &[1.0; 4], 2, 2, 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn oversized_requests_are_rejected() {
    let service = service();

    assert_eq!(service.count_primes(10_000_001).unwrap_err().kind(), ErrorKind::Resource);
    assert_eq!(service.prime_sieve(10_000_001).unwrap_err().kind(), ErrorKind::Resource);
    assert_eq!(
        service.matrix_multiply(&[], &[], 501, 0, 0).unwrap_err().kind(),
        ErrorKind::Resource
    );
}

#[test]
fn json_session_flow() {
    let service = service();
    let id = service.create_session().unwrap();

    for value in [10, 20, 30, 40, 50, 60] {
        let request = ActionRequest::new("add").with_value(ActionValue::Int(value));
        service.session_action("moving_avg", &id, &request).unwrap();
    }
    let status = service
        .session_action("moving_avg", &id, &ActionRequest::new("status"))
        .unwrap();
    assert_eq!(status, json!({"action": "status", "average": 40.0, "count": 5}));

    for value in 1..=9 {
        let request = ActionRequest::new("push").with_value(ActionValue::Int(value));
        service.session_action("ring_buffer", &id, &request).unwrap();
    }
    let status = service
        .session_action("ring_buffer", &id, &ActionRequest::new("status"))
        .unwrap();
    assert_eq!(status["values"], json!([2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]));
    assert_eq!(status["latest"], json!(9.0));
    assert_eq!(status["is_full"], json!(true));

    for value in [50, 10, 30, 10] {
        let request = ActionRequest::new("insert").with_value(ActionValue::Int(value));
        service.session_action("sorted_set", &id, &request).unwrap();
    }
    let range = service
        .session_action("sorted_set", &id, &ActionRequest::new("range").with_range(10, 30))
        .unwrap();
    assert_eq!(range, json!({"action": "range", "low": 10, "high": 30, "items": [10, 30]}));
}

#[test]
fn unknown_routes_are_validation_failures() {
    let service = service();
    let id = service.create_session().unwrap();

    let err = service
        .session_action("sorted_set", &id, &ActionRequest::new("pop"))
        .unwrap_err();
    assert!(matches!(err, CallError::UnknownAction { kernel: "sorted_set", .. }));

    let err = service
        .session_action("heap", &id, &ActionRequest::new("status"))
        .unwrap_err();
    assert_eq!(err, CallError::UnknownKernel("heap".to_string()));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn unknown_sessions_are_lookup_failures() {
    let service = service();

    let err = service.ring_buffer("not-a-session", RingBufferAction::Status).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);

    let err = service
        .sorted_set("6f1c2a53-0d2e-4f7b-9b7a-2d9c8f1e0a11", SortedSetAction::Status)
        .unwrap_err();
    assert!(matches!(err, CallError::SessionNotFound(_)));
}

#[test]
fn idle_sessions_expire_and_active_ones_survive() {
    tessera_tracing::init_test_tracing();
    let config = SessionConfig {
        idle_timeout: Duration::from_millis(150),
        reap_interval: Duration::from_millis(10),
        ..SessionConfig::default()
    };
    let service = KernelService::new(config, KernelLimits::default()).unwrap();

    let idle = service.create_session().unwrap();
    let active = service.create_session().unwrap();

    let until = Instant::now() + Duration::from_millis(400);
    while Instant::now() < until {
        service.sorted_set(&active, SortedSetAction::Status).unwrap();
        thread::sleep(Duration::from_millis(20));
    }

    assert_eq!(
        service.sorted_set(&idle, SortedSetAction::Status).unwrap_err().kind(),
        ErrorKind::Lookup
    );
    assert!(service.sorted_set(&active, SortedSetAction::Status).is_ok());
    service.shutdown();
}

#[test]
fn concurrent_callers_share_one_service() {
    let service = Arc::new(service());
    let id = service.create_session().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let service = Arc::clone(&service);
            let id = id.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    service.sorted_set(&id, SortedSetAction::Insert(t * 100 + i)).unwrap();
                    service.fibonacci(20).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let status = service.session_action("sorted_set", &id, &ActionRequest::new("status")).unwrap();
    assert_eq!(status["length"], 400);

    let stats = service.stats();
    assert_eq!(stats.api_calls, 1 + 800 + 1);
    assert_eq!(stats.total_requests, stats.api_calls);
}
