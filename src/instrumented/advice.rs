//! Around-advice for tracked operations
//!
//! A [`TrackedOperation`] pairs a stable operation identifier with an ordered
//! list of [`Advice`] fixed at construction time. Invoking it runs every
//! advice's before-phase in list order, then the delegate, then every
//! after-phase in reverse order, so the first advice wraps all the others.
//!
//! # Store layout
//! - `{id}` - call counter
//! - `{id}:inputs` - serialized argument tuples, one per call
//! - `{id}:outputs` - results, one per successful call

use std::future::Future;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

// == Advice ==
/// Cross-cutting behaviour applied around a tracked operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    /// Increment the operation's call counter before delegating
    CountCalls,
    /// Append the serialized input before delegating and the output after
    RecordHistory,
}

/// Advice applied to operations unless configured otherwise: counting wraps
/// history, which wraps the delegate call.
pub const DEFAULT_ADVICE: [Advice; 2] = [Advice::CountCalls, Advice::RecordHistory];

// == Tracked Operation ==
/// An operation whose calls are counted and recorded in the store.
#[derive(Debug)]
pub struct TrackedOperation {
    id: String,
    advice: Vec<Advice>,
    /// Keeps `inputs[i]` and `outputs[i]` paired when calls overlap.
    history_lock: Mutex<()>,
}

impl TrackedOperation {
    /// Creates an operation with [`DEFAULT_ADVICE`].
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            advice: DEFAULT_ADVICE.to_vec(),
            history_lock: Mutex::new(()),
        }
    }

    /// Creates an operation wrapped in `advice`.
    ///
    /// Counting always wraps history, so `advice` must list each kind at most
    /// once and in [`DEFAULT_ADVICE`] order. Anything else is rejected with
    /// `InvalidRequest`.
    pub fn with_advice(id: impl Into<String>, advice: Vec<Advice>) -> Result<Self> {
        validate_advice(&advice)?;
        Ok(Self {
            id: id.into(),
            advice,
            history_lock: Mutex::new(()),
        })
    }

    /// Stable identifier under which calls are counted and recorded.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn advice(&self) -> &[Advice] {
        &self.advice
    }

    // == Invoke ==
    /// Runs `delegate` wrapped in this operation's advice.
    ///
    /// `args` are the call's arguments as stored bytes; they are serialized
    /// into the inputs history. The output is recorded only if the delegate
    /// succeeds, so a failed call is counted and leaves an input without a
    /// matching output.
    pub async fn invoke<S, F, Fut, T>(&self, store: &S, args: &[&[u8]], delegate: F) -> Result<T>
    where
        S: KeyValueStore + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
        T: AsRef<[u8]>,
    {
        let _history_guard = if self.advice.contains(&Advice::RecordHistory) {
            Some(self.history_lock.lock().await)
        } else {
            None
        };

        let input = serialize_args(args);
        for advice in &self.advice {
            self.before(*advice, store, &input).await?;
        }

        let output = delegate().await?;

        for advice in self.advice.iter().rev() {
            self.after(*advice, store, output.as_ref()).await?;
        }

        Ok(output)
    }

    async fn before<S>(&self, advice: Advice, store: &S, input: &[u8]) -> Result<()>
    where
        S: KeyValueStore + ?Sized,
    {
        match advice {
            Advice::CountCalls => {
                let count = store.incr(&self.id).await?;
                debug!("{} call #{}", self.id, count);
            }
            Advice::RecordHistory => {
                store.rpush(&inputs_key(&self.id), input.to_vec()).await?;
            }
        }
        Ok(())
    }

    async fn after<S>(&self, advice: Advice, store: &S, output: &[u8]) -> Result<()>
    where
        S: KeyValueStore + ?Sized,
    {
        if advice == Advice::RecordHistory {
            store.rpush(&outputs_key(&self.id), output.to_vec()).await?;
        }
        Ok(())
    }
}

/// Accepts `advice` only if it is an ordered subsequence of [`DEFAULT_ADVICE`].
fn validate_advice(advice: &[Advice]) -> Result<()> {
    let mut remaining = DEFAULT_ADVICE.iter();
    for requested in advice {
        if !remaining.any(|allowed| allowed == requested) {
            return Err(CacheError::InvalidRequest(format!(
                "advice {:?} must list each of {:?} at most once, in that order",
                advice, DEFAULT_ADVICE
            )));
        }
    }
    Ok(())
}

// == Store Keys ==
/// List key holding the serialized inputs of `operation`.
pub fn inputs_key(operation: &str) -> String {
    format!("{}:inputs", operation)
}

/// List key holding the outputs of `operation`.
pub fn outputs_key(operation: &str) -> String {
    format!("{}:outputs", operation)
}

/// Reads the call counter of `operation`; zero if it was never called.
pub async fn call_count<S>(store: &S, operation: &str) -> Result<u64>
where
    S: KeyValueStore + ?Sized,
{
    match store.get(operation).await? {
        None => Ok(0),
        Some(raw) => std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| {
                CacheError::decode(format!("call counter '{}' is not a number", operation))
            }),
    }
}

// == Argument Serialization ==
/// Serializes call arguments as a JSON array.
///
/// UTF-8 arguments become JSON strings; anything else becomes an array of
/// byte values.
pub fn serialize_args(args: &[&[u8]]) -> Vec<u8> {
    let values: Vec<Value> = args
        .iter()
        .map(|arg| match std::str::from_utf8(arg) {
            Ok(text) => Value::String(text.to_string()),
            Err(_) => Value::Array(arg.iter().map(|b| Value::from(*b)).collect()),
        })
        .collect();
    Value::Array(values).to_string().into_bytes()
}
