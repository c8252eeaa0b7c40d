//! Structural validation of graphs.
//!
//! Every check runs and contributes its own `Validation`; the results are
//! combined so that a broken graph reports all of its problems at once.

use super::error::{GraphIntegrityError, IntegrityViolation};
use super::node::{KindTag, Node, NodeId};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<IntegrityViolation>>;

fn verdict(violations: Vec<IntegrityViolation>) -> Check {
    let checks: Vec<Check> = violations.into_iter().map(Validation::fail).collect();
    if checks.is_empty() {
        Validation::success(())
    } else {
        Validation::all_vec(checks).map(|_| ())
    }
}

fn check_ids<C>(nodes: &[Node<C>], next_id: u32) -> Check {
    let mut seen = HashSet::new();
    let mut violations = Vec::new();
    for node in nodes {
        if !seen.insert(node.id()) {
            violations.push(IntegrityViolation::DuplicateNodeId { id: node.id() });
        }
        if node.id().0 >= next_id {
            violations.push(IntegrityViolation::StaleIdCounter {
                next_id,
                id: node.id(),
            });
        }
    }
    verdict(violations)
}

fn check_root(root: Option<NodeId>, kinds: &HashMap<NodeId, KindTag>) -> Check {
    let violation = match root {
        None => Some(IntegrityViolation::MissingRoot),
        Some(root) => match kinds.get(&root) {
            None => Some(IntegrityViolation::UnknownRoot { root }),
            Some(KindTag::Real) => None,
            Some(kind) => Some(IntegrityViolation::RootNotReal { root, kind: *kind }),
        },
    };
    verdict(violation.into_iter().collect())
}

fn check_transitions<C>(nodes: &[Node<C>], kinds: &HashMap<NodeId, KindTag>) -> Check {
    let mut violations = Vec::new();
    for node in nodes {
        if node.tag() == KindTag::Exit && !node.transitions().is_empty() {
            violations.push(IntegrityViolation::ExitHasTransitions {
                node: node.id(),
                count: node.transitions().len(),
            });
        }
        for transition in node.transitions() {
            let Some(target) = transition.target() else {
                continue;
            };
            match kinds.get(&target) {
                None => violations.push(IntegrityViolation::DanglingTarget {
                    node: node.id(),
                    priority: transition.priority(),
                    target,
                }),
                Some(KindTag::Common) => violations.push(IntegrityViolation::TargetsCommon {
                    node: node.id(),
                    priority: transition.priority(),
                    target,
                }),
                Some(_) => {}
            }
        }
    }
    verdict(violations)
}

fn check_common<C>(nodes: &[Node<C>]) -> Check {
    let mut commons = nodes
        .iter()
        .filter(|n| n.tag() == KindTag::Common)
        .map(Node::id);
    let first = commons.next();
    let violations = match first {
        Some(first) => commons
            .map(|second| IntegrityViolation::MultipleCommon { first, second })
            .collect(),
        None => Vec::new(),
    };
    verdict(violations)
}

/// Validate a node set, accumulating every violation.
pub(crate) fn validate<C>(
    nodes: &[Node<C>],
    root: Option<NodeId>,
    next_id: u32,
) -> Result<(), GraphIntegrityError> {
    let kinds: HashMap<NodeId, KindTag> = nodes.iter().map(|n| (n.id(), n.tag())).collect();

    let checks = vec![
        check_ids(nodes, next_id),
        check_root(root, &kinds),
        check_transitions(nodes, &kinds),
        check_common(nodes),
    ];

    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(GraphIntegrityError::new(
            errors.iter().cloned().collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Idle;
    use crate::graph::transition::Transition;

    fn real(id: u32) -> Node<()> {
        Node::real(NodeId(id), format!("real_{id}"), || Box::new(Idle))
    }

    #[test]
    fn valid_graph_passes() {
        let nodes = vec![
            real(0).with_transition(Transition::to(NodeId(1))),
            Node::exit(NodeId(1), "done"),
        ];

        assert!(validate(&nodes, Some(NodeId(0)), 2).is_ok());
    }

    #[test]
    fn empty_graph_has_no_root() {
        let nodes: Vec<Node<()>> = Vec::new();

        let err = validate(&nodes, None, 0).unwrap_err();
        assert_eq!(err.violations, vec![IntegrityViolation::MissingRoot]);
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let nodes = vec![
            real(0).with_transition(Transition::to(NodeId(7))),
            real(0),
            Node::exit(NodeId(1), "done").with_transition(Transition::terminal()),
            Node::common(NodeId(2), "any"),
            Node::common(NodeId(3), "any again"),
        ];

        let err = validate(&nodes, Some(NodeId(9)), 4).unwrap_err();

        assert_eq!(err.violations.len(), 5);
        assert!(err.contains(&IntegrityViolation::DuplicateNodeId { id: NodeId(0) }));
        assert!(err.contains(&IntegrityViolation::UnknownRoot { root: NodeId(9) }));
        assert!(err.contains(&IntegrityViolation::DanglingTarget {
            node: NodeId(0),
            priority: 0,
            target: NodeId(7),
        }));
        assert!(err.contains(&IntegrityViolation::ExitHasTransitions {
            node: NodeId(1),
            count: 1,
        }));
        assert!(err.contains(&IntegrityViolation::MultipleCommon {
            first: NodeId(2),
            second: NodeId(3),
        }));
    }

    #[test]
    fn root_must_be_real() {
        let nodes: Vec<Node<()>> = vec![Node::hub(NodeId(0), "hub")];

        let err = validate(&nodes, Some(NodeId(0)), 1).unwrap_err();
        assert_eq!(
            err.violations,
            vec![IntegrityViolation::RootNotReal {
                root: NodeId(0),
                kind: KindTag::Hub,
            }]
        );
    }

    #[test]
    fn transitions_may_not_enter_common_node() {
        let nodes = vec![
            real(0).with_transition(Transition::to(NodeId(1))),
            Node::common(NodeId(1), "any"),
        ];

        let err = validate(&nodes, Some(NodeId(0)), 2).unwrap_err();
        assert!(err.contains(&IntegrityViolation::TargetsCommon {
            node: NodeId(0),
            priority: 0,
            target: NodeId(1),
        }));
    }

    #[test]
    fn id_counter_must_lead_node_ids() {
        let nodes = vec![real(0), real(5)];

        let err = validate(&nodes, Some(NodeId(0)), 3).unwrap_err();
        assert_eq!(
            err.violations,
            vec![IntegrityViolation::StaleIdCounter {
                next_id: 3,
                id: NodeId(5),
            }]
        );
    }

    #[test]
    fn terminal_edges_need_no_target() {
        let nodes = vec![real(0).with_transition(Transition::terminal())];
        assert!(validate(&nodes, Some(NodeId(0)), 1).is_ok());
    }

    #[test]
    fn error_message_lists_every_violation() {
        let nodes = vec![real(0), real(0)];

        let err = validate(&nodes, None, 1).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("more than one node"));
        assert!(message.contains("no root"));
    }
}
