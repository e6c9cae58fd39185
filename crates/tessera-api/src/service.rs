//! The context object hosts call into

use crate::actions::{
    ActionRequest, MovingAverageAction, MovingAverageReply, RingBufferAction, RingBufferReply, SessionAction,
    SortedSetAction, SortedSetReply,
};
use crate::error::{CallError, Result};
use crate::limits::KernelLimits;
use std::collections::HashMap;
use tessera_core::ops::{linalg, parallel, parse, sequence, sieve, text};
use tessera_session::{SessionConfig, SessionId, SessionRegistry, StatsCounter, StatsSnapshot};

/// Owns the session registry and request counters for one host.
///
/// Construct one per process (or per test) and share it by reference or
/// `Arc`. Every kernel and session call counts as one API request.
#[derive(Debug)]
pub struct KernelService {
    registry: SessionRegistry,
    stats: StatsCounter,
    limits: KernelLimits,
}

impl KernelService {
    /// Start a service with a running session reaper
    pub fn new(config: SessionConfig, limits: KernelLimits) -> tessera_session::Result<Self> {
        let registry = SessionRegistry::new(config)?;
        tracing::info!(
            version = Self::version(),
            max_fibonacci_n = limits.max_fibonacci_n,
            max_sieve_n = limits.max_sieve_n,
            max_matrix_dim = limits.max_matrix_dim,
            "Kernel service started"
        );
        Ok(Self {
            registry,
            stats: StatsCounter::new(),
            limits,
        })
    }

    /// [`new`](Self::new) with both configurations read from the environment
    pub fn from_env() -> tessera_session::Result<Self> {
        Self::new(SessionConfig::from_env(), KernelLimits::from_env())
    }

    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn limits(&self) -> &KernelLimits {
        &self.limits
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Count a request the host served without calling a kernel (page loads, health checks)
    pub fn record_request(&self, is_api: bool) {
        self.stats.record_request(is_api);
    }

    /// Stop the session reaper. Later session calls still work.
    pub fn shutdown(&self) {
        self.registry.shutdown();
        tracing::info!("Kernel service shut down");
    }

    fn begin(&self, kernel: &'static str) {
        self.stats.record_request(true);
        tracing::trace!(kernel, "Kernel call");
    }

    fn finish<T>(kernel: &'static str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            tracing::debug!(kernel, kind = %err.kind(), error = %err, "Kernel call failed");
        }
        result
    }

    pub fn sha256_hex(&self, data: &[u8]) -> String {
        self.begin("sha256");
        tessera_core::hash::digest_hex(data)
    }

    pub fn fibonacci(&self, n: u64) -> Result<u64> {
        self.begin("fibonacci");
        let result = self
            .limits
            .check_fibonacci(n)
            .and_then(|()| sequence::fibonacci(n).map_err(CallError::from));
        Self::finish("fibonacci", result)
    }

    pub fn sum_list(&self, items: &[i64]) -> Result<i64> {
        self.begin("sum_list");
        Self::finish("sum_list", sequence::sum_list(items).map_err(CallError::from))
    }

    pub fn filter_positive(&self, items: &[i64]) -> Vec<i64> {
        self.begin("filter_positive");
        sequence::filter_positive(items)
    }

    pub fn parallel_sum(&self, items: &[i64]) -> Result<i64> {
        self.begin("parallel_sum");
        let result = self
            .limits
            .check_parallel(items.len())
            .and_then(|()| parallel::parallel_sum(items).map_err(CallError::from));
        Self::finish("parallel_sum", result)
    }

    pub fn prime_sieve(&self, n: usize) -> Result<Vec<usize>> {
        self.begin("prime_sieve");
        let result = self.limits.check_sieve(n).map(|()| sieve::prime_sieve(n));
        Self::finish("prime_sieve", result)
    }

    pub fn count_primes(&self, n: usize) -> Result<usize> {
        self.begin("count_primes");
        let result = self.limits.check_sieve(n).map(|()| sieve::count_primes(n));
        Self::finish("count_primes", result)
    }

    pub fn matrix_multiply(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>> {
        self.begin("matrix_multiply");
        let result = self
            .limits
            .check_matrix(m, k, n)
            .and_then(|()| linalg::matrix_multiply(a, b, m, k, n).map_err(CallError::from));
        Self::finish("matrix_multiply", result)
    }

    pub fn word_frequencies<S: AsRef<str>>(&self, words: &[S]) -> HashMap<String, u64> {
        self.begin("word_frequencies");
        text::word_frequencies(words)
    }

    pub fn count_unique_words(&self, input: &str) -> usize {
        self.begin("count_unique_words");
        text::count_unique_words(input)
    }

    pub fn is_palindrome(&self, input: &str) -> bool {
        self.begin("is_palindrome");
        text::is_palindrome(input)
    }

    pub fn slugify(&self, input: &str) -> String {
        self.begin("slugify");
        text::slugify(input)
    }

    pub fn extract_emails(&self, input: &str) -> Vec<String> {
        self.begin("extract_emails");
        text::extract_emails(input)
    }

    pub fn safe_parse_int(&self, input: &str) -> Result<i64> {
        self.begin("safe_parse_int");
        Self::finish("safe_parse_int", parse::safe_parse_int(input).map_err(CallError::from))
    }

    pub fn safe_divide(&self, a: f64, b: f64) -> Result<f64> {
        self.begin("safe_divide");
        Self::finish("safe_divide", parse::safe_divide(a, b).map_err(CallError::from))
    }

    /// Open a session with fresh kernels; returns its id as text
    pub fn create_session(&self) -> Result<String> {
        self.begin("create_session");
        let result = self.registry.create().map(|id| id.to_string()).map_err(CallError::from);
        Self::finish("create_session", result)
    }

    /// Close a session explicitly instead of waiting for idle eviction
    pub fn close_session(&self, session_id: &str) -> Result<()> {
        self.begin("close_session");
        let result = resolve(session_id).and_then(|id| {
            if self.registry.remove(&id) {
                Ok(())
            } else {
                Err(CallError::SessionNotFound(session_id.to_string()))
            }
        });
        Self::finish("close_session", result)
    }

    pub fn moving_average(&self, session_id: &str, action: MovingAverageAction) -> Result<MovingAverageReply> {
        self.run_action(session_id, action)
    }

    pub fn ring_buffer(&self, session_id: &str, action: RingBufferAction) -> Result<RingBufferReply> {
        self.run_action(session_id, action)
    }

    pub fn sorted_set(&self, session_id: &str, action: SortedSetAction) -> Result<SortedSetReply> {
        self.run_action(session_id, action)
    }

    /// Route a loosely-typed request to a session kernel by name
    /// (`moving_avg`, `ring_buffer` or `sorted_set`) and return the reply as JSON.
    pub fn session_action(&self, kernel: &str, session_id: &str, request: &ActionRequest) -> Result<serde_json::Value> {
        if kernel == MovingAverageAction::KERNEL {
            self.parse_and_run::<MovingAverageAction>(session_id, request)
        } else if kernel == RingBufferAction::KERNEL {
            self.parse_and_run::<RingBufferAction>(session_id, request)
        } else if kernel == SortedSetAction::KERNEL {
            self.parse_and_run::<SortedSetAction>(session_id, request)
        } else {
            self.begin("session_action");
            Self::finish("session_action", Err(CallError::UnknownKernel(kernel.to_string())))
        }
    }

    fn parse_and_run<A: SessionAction + std::fmt::Debug>(&self, session_id: &str, request: &ActionRequest) -> Result<serde_json::Value> {
        let reply = match A::parse(request) {
            Ok(action) => self.run_action(session_id, action)?,
            Err(err) => {
                self.begin(A::KERNEL);
                return Self::finish(A::KERNEL, Err(err));
            }
        };
        serde_json::to_value(reply).map_err(|err| CallError::Validation(err.to_string()))
    }

    #[tracing::instrument(level = "debug", skip(self, action), fields(kernel = A::KERNEL, ?action))]
    fn run_action<A: SessionAction + std::fmt::Debug>(&self, session_id: &str, action: A) -> Result<A::Reply> {
        self.begin(A::KERNEL);
        let result = resolve(session_id).and_then(|id| {
            self.registry
                .with_session(&id, |kernels| action.apply(kernels))
                .map_err(CallError::from)
        });
        Self::finish(A::KERNEL, result)
    }
}

fn resolve(session_id: &str) -> Result<SessionId> {
    session_id.parse::<SessionId>().map_err(CallError::from)
}
