//! Per-session verbs and their replies

use crate::error::{CallError, Result};
use serde::{Deserialize, Serialize};
use tessera_session::SessionKernels;

/// Numeric argument of an action, kept as an integer when sent as one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionValue {
    Int(i64),
    Float(f64),
}

impl ActionValue {
    pub fn as_f64(self) -> f64 {
        match self {
            ActionValue::Int(v) => v as f64,
            ActionValue::Float(v) => v,
        }
    }

    /// Integral value; fractional or out-of-range floats are rejected
    pub fn as_i64(self) -> Result<i64> {
        match self {
            ActionValue::Int(v) => Ok(v),
            ActionValue::Float(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => Ok(v as i64),
            ActionValue::Float(v) => Err(CallError::Validation(format!("Expected an integer value, got {v}"))),
        }
    }
}

impl Default for ActionValue {
    fn default() -> Self {
        ActionValue::Int(0)
    }
}

/// Loosely-typed action request as a host receives it.
///
/// Missing fields take the same defaults the demo front end used:
/// `value` 0, `low` 0, `high` 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionRequest {
    pub action: String,
    pub value: ActionValue,
    pub low: i64,
    pub high: i64,
}

impl Default for ActionRequest {
    fn default() -> Self {
        Self {
            action: String::new(),
            value: ActionValue::default(),
            low: 0,
            high: 100,
        }
    }
}

impl ActionRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: ActionValue) -> Self {
        self.value = value;
        self
    }

    pub fn with_range(mut self, low: i64, high: i64) -> Self {
        self.low = low;
        self.high = high;
        self
    }
}

/// A typed verb against one kernel of a session bundle
pub trait SessionAction: Sized {
    type Reply: Serialize;

    /// Kernel name used in routing and error messages
    const KERNEL: &'static str;

    fn parse(request: &ActionRequest) -> Result<Self>;

    fn apply(self, kernels: &mut SessionKernels) -> Self::Reply;
}

fn unknown<T>(kernel: &'static str, request: &ActionRequest) -> Result<T> {
    Err(CallError::UnknownAction {
        kernel,
        action: request.action.clone(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovingAverageAction {
    Add(f64),
    Clear,
    Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageReply {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub average: f64,
    pub count: usize,
}

impl SessionAction for MovingAverageAction {
    type Reply = MovingAverageReply;
    const KERNEL: &'static str = "moving_avg";

    fn parse(request: &ActionRequest) -> Result<Self> {
        match request.action.as_str() {
            "add" => Ok(Self::Add(request.value.as_f64())),
            "clear" => Ok(Self::Clear),
            "status" => Ok(Self::Status),
            _ => unknown(Self::KERNEL, request),
        }
    }

    fn apply(self, kernels: &mut SessionKernels) -> MovingAverageReply {
        let avg = &mut kernels.moving_average;
        let (action, value) = match self {
            Self::Add(v) => {
                avg.add(v);
                ("add", Some(v))
            }
            Self::Clear => {
                avg.clear();
                ("clear", None)
            }
            Self::Status => ("status", None),
        };
        MovingAverageReply {
            action,
            value,
            average: avg.average(),
            count: avg.count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RingBufferAction {
    Push(f64),
    Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingBufferReply {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub values: Vec<f64>,
    pub latest: Option<f64>,
    pub is_full: bool,
    pub length: usize,
}

impl SessionAction for RingBufferAction {
    type Reply = RingBufferReply;
    const KERNEL: &'static str = "ring_buffer";

    fn parse(request: &ActionRequest) -> Result<Self> {
        match request.action.as_str() {
            "push" => Ok(Self::Push(request.value.as_f64())),
            "status" => Ok(Self::Status),
            _ => unknown(Self::KERNEL, request),
        }
    }

    fn apply(self, kernels: &mut SessionKernels) -> RingBufferReply {
        let ring = &mut kernels.ring_buffer;
        let (action, value) = match self {
            Self::Push(v) => {
                ring.push(v);
                ("push", Some(v))
            }
            Self::Status => ("status", None),
        };
        RingBufferReply {
            action,
            value,
            values: ring.to_list(),
            latest: ring.latest().copied(),
            is_full: ring.is_full(),
            length: ring.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortedSetAction {
    Insert(i64),
    Remove(i64),
    Contains(i64),
    Range { low: i64, high: i64 },
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SortedSetReply {
    Insert {
        value: i64,
        inserted: bool,
        items: Vec<i64>,
        length: usize,
    },
    Remove {
        value: i64,
        removed: bool,
        items: Vec<i64>,
        length: usize,
    },
    Contains {
        value: i64,
        found: bool,
    },
    Range {
        low: i64,
        high: i64,
        items: Vec<i64>,
    },
    Status {
        items: Vec<i64>,
        length: usize,
    },
}

impl SessionAction for SortedSetAction {
    type Reply = SortedSetReply;
    const KERNEL: &'static str = "sorted_set";

    fn parse(request: &ActionRequest) -> Result<Self> {
        match request.action.as_str() {
            "insert" => Ok(Self::Insert(request.value.as_i64()?)),
            "remove" => Ok(Self::Remove(request.value.as_i64()?)),
            "contains" => Ok(Self::Contains(request.value.as_i64()?)),
            "range" => Ok(Self::Range {
                low: request.low,
                high: request.high,
            }),
            "status" => Ok(Self::Status),
            _ => unknown(Self::KERNEL, request),
        }
    }

    fn apply(self, kernels: &mut SessionKernels) -> SortedSetReply {
        let set = &mut kernels.ordered_set;
        match self {
            Self::Insert(value) => {
                let inserted = set.insert(value);
                SortedSetReply::Insert {
                    value,
                    inserted,
                    items: set.to_list(),
                    length: set.len(),
                }
            }
            Self::Remove(value) => {
                let removed = set.remove(&value);
                SortedSetReply::Remove {
                    value,
                    removed,
                    items: set.to_list(),
                    length: set.len(),
                }
            }
            Self::Contains(value) => SortedSetReply::Contains {
                value,
                found: set.contains(&value),
            },
            Self::Range { low, high } => SortedSetReply::Range {
                low,
                high,
                items: set.range(&low, &high).to_vec(),
            },
            Self::Status => SortedSetReply::Status {
                items: set.to_list(),
                length: set.len(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_session::SessionConfig;

    fn kernels() -> SessionKernels {
        SessionKernels::new(&SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let request: ActionRequest = serde_json::from_str(r#"{"action": "range"}"#).unwrap();
        assert_eq!(request.value, ActionValue::Int(0));
        assert_eq!((request.low, request.high), (0, 100));
    }

    #[test]
    fn test_value_keeps_integers_exact() {
        let request: ActionRequest = serde_json::from_str(r#"{"action": "insert", "value": 9007199254740993}"#).unwrap();
        assert_eq!(request.value.as_i64().unwrap(), 9_007_199_254_740_993);

        let request: ActionRequest = serde_json::from_str(r#"{"action": "push", "value": 2.5}"#).unwrap();
        assert_eq!(request.value, ActionValue::Float(2.5));
    }

    #[test]
    fn test_fractional_set_value_rejected() {
        let request = ActionRequest::new("insert").with_value(ActionValue::Float(1.5));
        assert!(matches!(SortedSetAction::parse(&request), Err(CallError::Validation(_))));

        let request = ActionRequest::new("insert").with_value(ActionValue::Float(4.0));
        assert_eq!(SortedSetAction::parse(&request).unwrap(), SortedSetAction::Insert(4));
    }

    #[test]
    fn test_unknown_action() {
        let err = RingBufferAction::parse(&ActionRequest::new("pop")).unwrap_err();
        assert_eq!(
            err,
            CallError::UnknownAction {
                kernel: "ring_buffer",
                action: "pop".to_string()
            }
        );
        assert_eq!(err.to_string(), "Unknown ring_buffer action 'pop'");
    }

    #[test]
    fn test_moving_average_actions() {
        let mut kernels = kernels();
        MovingAverageAction::Add(10.0).apply(&mut kernels);
        let reply = MovingAverageAction::Add(20.0).apply(&mut kernels);
        assert_eq!(reply.average, 15.0);
        assert_eq!(reply.count, 2);

        let reply = MovingAverageAction::Clear.apply(&mut kernels);
        assert_eq!((reply.average, reply.count), (0.0, 0));
    }

    #[test]
    fn test_ring_buffer_reply() {
        let mut kernels = kernels();
        let reply = RingBufferAction::Status.apply(&mut kernels);
        assert_eq!(reply.latest, None);
        assert!(reply.values.is_empty());

        let reply = RingBufferAction::Push(3.5).apply(&mut kernels);
        assert_eq!(reply.latest, Some(3.5));
        assert_eq!(reply.length, 1);
        assert!(!reply.is_full);
    }

    #[test]
    fn test_sorted_set_reply_shape() {
        let mut kernels = kernels();
        for v in [5, 1, 9, 5] {
            SortedSetAction::Insert(v).apply(&mut kernels);
        }
        let reply = SortedSetAction::Range { low: 0, high: 5 }.apply(&mut kernels);
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["action"], "range");
        assert_eq!(json["items"], serde_json::json!([1, 5]));

        let reply = SortedSetAction::Remove(9).apply(&mut kernels);
        assert_eq!(
            reply,
            SortedSetReply::Remove {
                value: 9,
                removed: true,
                items: vec![1, 5],
                length: 2
            }
        );
    }
}
