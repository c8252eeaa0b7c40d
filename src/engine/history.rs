//! Record of the moves a run has made.

use crate::graph::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Which node's transition list produced a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionSource {
    /// The active node's own transitions.
    Local,
    /// The Common node's transitions.
    Common,
}

/// Record of a single committed move.
///
/// `to` is `None` when the move ended the run, either through a terminal
/// edge or by entering an Exit node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeTransition {
    /// The node that was active before the move
    pub from: NodeId,
    /// The Real node activated by the move
    pub to: Option<NodeId>,
    /// Hub nodes passed through, in order
    pub via: Vec<NodeId>,
    pub source: TransitionSource,
    /// When the move was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered, optionally bounded history of moves.
///
/// When a limit is set the oldest entries are discarded first.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use tickgraph::engine::{NodeTransition, RunHistory, TransitionSource};
/// use tickgraph::graph::NodeId;
///
/// let mut history = RunHistory::new(Some(2));
/// for to in 1..=3 {
///     history.record(NodeTransition {
///         from: NodeId(to - 1),
///         to: Some(NodeId(to)),
///         via: Vec::new(),
///         source: TransitionSource::Local,
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.get_path(), vec![NodeId(1), NodeId(2), NodeId(3)]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunHistory {
    transitions: VecDeque<NodeTransition>,
    limit: Option<usize>,
}

impl RunHistory {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            transitions: VecDeque::new(),
            limit,
        }
    }

    /// Append a move, evicting the oldest entry when over the limit.
    pub fn record(&mut self, transition: NodeTransition) {
        if self.limit == Some(0) {
            return;
        }
        self.transitions.push_back(transition);
        if let Some(limit) = self.limit {
            while self.transitions.len() > limit {
                self.transitions.pop_front();
            }
        }
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &NodeTransition> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&NodeTransition> {
        self.transitions.back()
    }

    /// Real nodes visited, starting at the oldest retained `from`.
    ///
    /// Hubs are not part of the path and a run-ending move adds nothing.
    pub fn get_path(&self) -> Vec<NodeId> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().filter_map(|t| t.to));
        path
    }

    /// Time between the oldest and newest retained moves.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(from: u32, to: Option<u32>) -> NodeTransition {
        NodeTransition {
            from: NodeId(from),
            to: to.map(NodeId),
            via: Vec::new(),
            source: TransitionSource::Local,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = RunHistory::new(None);
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn get_path_returns_node_sequence() {
        let mut history = RunHistory::new(None);
        history.record(step(0, Some(2)));
        history.record(step(2, Some(5)));
        history.record(step(5, None));

        assert_eq!(history.get_path(), vec![NodeId(0), NodeId(2), NodeId(5)]);
        assert_eq!(history.last().map(|t| t.to), Some(None));
    }

    #[test]
    fn zero_limit_disables_recording() {
        let mut history = RunHistory::new(Some(0));
        history.record(step(0, Some(1)));
        assert!(history.is_empty());
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = RunHistory::new(None);
        history.record(step(0, Some(1)));
        std::thread::sleep(Duration::from_millis(10));
        history.record(step(1, Some(2)));

        assert!(history.duration().unwrap() >= Duration::from_millis(10));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = RunHistory::new(Some(4));
        history.record(step(0, Some(1)));

        let json = serde_json::to_string(&history).unwrap();
        let restored: RunHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.last(), history.last());
    }
}
