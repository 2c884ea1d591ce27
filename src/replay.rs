//! Replay Module
//!
//! Renders the recorded call history of a tracked operation in call order.

use std::fmt;

use serde_json::Value;

use crate::error::Result;
use crate::instrumented::{call_count, inputs_key, outputs_key};
use crate::store::KeyValueStore;

// == Replay ==
/// Snapshot of one operation's call history.
///
/// Each [`Replay::load`] re-reads the store, so a later load reflects calls
/// recorded since the previous one. Iterating the same snapshot again always
/// yields the same entries.
#[derive(Debug, Clone)]
pub struct Replay {
    operation: String,
    count: u64,
    inputs: Vec<Vec<u8>>,
    outputs: Vec<Vec<u8>>,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayEntry {
    /// Zero-based position in call order
    pub index: usize,
    /// The call's arguments, rendered as a tuple
    pub input: String,
    /// The call's result
    pub output: String,
}

impl Replay {
    /// Reads the counter and history lists of `operation` from `store`.
    pub async fn load<S>(store: &S, operation: &str) -> Result<Self>
    where
        S: KeyValueStore + ?Sized,
    {
        let count = call_count(store, operation).await?;
        let inputs = store.range(&inputs_key(operation)).await?;
        let outputs = store.range(&outputs_key(operation)).await?;

        Ok(Self {
            operation: operation.to_string(),
            count,
            inputs,
            outputs,
        })
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Value of the operation's call counter when the snapshot was taken.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Number of complete input/output pairs.
    pub fn len(&self) -> usize {
        self.inputs.len().min(self.outputs.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lazily yields recorded calls in call order.
    ///
    /// Inputs and outputs are paired by position; when one list is longer
    /// the unmatched tail is skipped.
    pub fn entries(&self) -> impl Iterator<Item = ReplayEntry> + '_ {
        self.inputs
            .iter()
            .zip(&self.outputs)
            .enumerate()
            .map(|(index, (input, output))| ReplayEntry {
                index,
                input: format_input(input),
                output: String::from_utf8_lossy(output).into_owned(),
            })
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.operation, self.count)?;
        for entry in self.entries() {
            write!(f, "\n{}(*{}) -> {}", self.operation, entry.input, entry.output)?;
        }
        Ok(())
    }
}

/// Renders a serialized argument list as a tuple, e.g. `("foo",)`.
///
/// Entries that are not a JSON array are shown as lossy UTF-8.
fn format_input(raw: &[u8]) -> String {
    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Array(args)) => {
            let parts: Vec<String> = args.iter().map(Value::to_string).collect();
            match parts.len() {
                1 => format!("({},)", parts[0]),
                _ => format!("({})", parts.join(", ")),
            }
        }
        _ => String::from_utf8_lossy(raw).into_owned(),
    }
}
