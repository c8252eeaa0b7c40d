//! Transition selection and hub resolution.
//!
//! Both steps only evaluate conditions; neither touches behaviours. The
//! engine commits a move only after resolution has fully succeeded, so a
//! failing condition anywhere along a hub chain leaves the run untouched.

use super::error::EngineError;
use super::history::TransitionSource;
use crate::graph::{first_satisfied, Graph, Node, NodeId, NodeKind};
use tracing::debug;

/// The transition chosen for this tick, before hubs are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Selection {
    pub source: TransitionSource,
    pub target: Option<NodeId>,
}

/// Where a selected transition ultimately leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Destination {
    /// A hub on the way had no satisfied transition; nothing moves.
    Stay,
    /// Activate a Real node.
    Enter {
        node: NodeId,
        via: Vec<NodeId>,
        source: TransitionSource,
    },
    /// End the run, through an Exit node or a terminal edge.
    Finish {
        exit: Option<NodeId>,
        via: Vec<NodeId>,
        source: TransitionSource,
    },
}

fn scan<C>(node: &Node<C>, ctx: &mut C) -> Result<Option<Option<NodeId>>, EngineError> {
    first_satisfied(node.transitions(), ctx)
        .map(|found| found.map(|t| t.target()))
        .map_err(|(priority, source)| EngineError::Condition {
            node: node.id(),
            priority,
            source,
        })
}

/// Pick the transition to follow from `active`.
///
/// The Common node is polled first and wins over the active node's own
/// transitions.
pub(crate) fn select<C>(
    graph: &Graph<C>,
    active: NodeId,
    ctx: &mut C,
) -> Result<Option<Selection>, EngineError> {
    if let Some(common) = graph.common_node() {
        if let Some(target) = scan(common, ctx)? {
            return Ok(Some(Selection {
                source: TransitionSource::Common,
                target,
            }));
        }
    }

    let Some(node) = graph.get_node(active) else {
        return Ok(None);
    };
    Ok(scan(node, ctx)?.map(|target| Selection {
        source: TransitionSource::Local,
        target,
    }))
}

/// Follow `selection` through any hubs to its final destination.
///
/// Fails with [`EngineError::GraphCycle`] when more hubs than the graph has
/// nodes are crossed in one call.
pub(crate) fn resolve<C>(
    graph: &Graph<C>,
    selection: Selection,
    ctx: &mut C,
) -> Result<Destination, EngineError> {
    let limit = graph.node_count();
    let source = selection.source;
    let mut via = Vec::new();
    let mut target = selection.target;

    loop {
        let Some(id) = target else {
            return Ok(Destination::Finish {
                exit: None,
                via,
                source,
            });
        };
        let Some(node) = graph.get_node(id) else {
            // Validated graphs never dangle; treat it as a terminal edge.
            return Ok(Destination::Finish {
                exit: None,
                via,
                source,
            });
        };

        match node.kind() {
            NodeKind::Real(_) => {
                return Ok(Destination::Enter {
                    node: id,
                    via,
                    source,
                })
            }
            NodeKind::Exit => {
                return Ok(Destination::Finish {
                    exit: Some(id),
                    via,
                    source,
                })
            }
            NodeKind::Common => return Ok(Destination::Stay),
            NodeKind::Hub => {
                via.push(id);
                if via.len() > limit {
                    return Err(EngineError::GraphCycle {
                        start: via[0],
                        limit,
                    });
                }
                debug!(hub = %id, "passing through hub");
                match scan(node, ctx)? {
                    Some(next) => target = next,
                    None => {
                        debug!(hub = %id, "hub has no satisfied transition, move abandoned");
                        return Ok(Destination::Stay);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Condition, Idle};
    use crate::graph::{GraphId, Transition};

    #[derive(Default)]
    struct Ctx {
        interrupt: bool,
        local: bool,
        fork_left: bool,
    }

    fn real(id: u32) -> Node<Ctx> {
        Node::real(NodeId(id), format!("real_{id}"), || Box::new(Idle))
    }

    fn when(f: fn(&Ctx) -> bool) -> Condition<Ctx> {
        Condition::new(move |c: &mut Ctx| f(c))
    }

    fn graph(nodes: Vec<Node<Ctx>>) -> Graph<Ctx> {
        let next = nodes.iter().map(|n| n.id().0 + 1).max().unwrap_or(0);
        Graph::from_parts(GraphId::new(), nodes, Some(NodeId(0)), next).unwrap()
    }

    #[test]
    fn common_transition_wins_over_local() {
        let g = graph(vec![
            real(0).with_transition(Transition::to(NodeId(1)).when(when(|c| c.local))),
            real(1),
            real(2),
            Node::common(NodeId(3), "any")
                .with_transition(Transition::to(NodeId(2)).when(when(|c| c.interrupt))),
        ]);
        let mut ctx = Ctx {
            interrupt: true,
            local: true,
            ..Ctx::default()
        };

        let selection = select(&g, NodeId(0), &mut ctx).unwrap().unwrap();
        assert_eq!(selection.source, TransitionSource::Common);
        assert_eq!(selection.target, Some(NodeId(2)));

        ctx.interrupt = false;
        let selection = select(&g, NodeId(0), &mut ctx).unwrap().unwrap();
        assert_eq!(selection.source, TransitionSource::Local);
        assert_eq!(selection.target, Some(NodeId(1)));
    }

    #[test]
    fn nothing_selected_when_no_condition_holds() {
        let g = graph(vec![
            real(0).with_transition(Transition::to(NodeId(1)).when(when(|c| c.local))),
            real(1),
        ]);

        assert!(select(&g, NodeId(0), &mut Ctx::default()).unwrap().is_none());
    }

    #[test]
    fn hubs_resolve_to_real_node() {
        let g = graph(vec![
            real(0),
            Node::hub(NodeId(1), "fork")
                .with_transition(Transition::to(NodeId(2)).when(when(|c| c.fork_left)))
                .with_transition(Transition::to(NodeId(3))),
            Node::hub(NodeId(2), "left").with_transition(Transition::to(NodeId(4))),
            real(3),
            real(4),
        ]);
        let selection = Selection {
            source: TransitionSource::Local,
            target: Some(NodeId(1)),
        };

        let mut ctx = Ctx {
            fork_left: true,
            ..Ctx::default()
        };
        assert_eq!(
            resolve(&g, selection, &mut ctx).unwrap(),
            Destination::Enter {
                node: NodeId(4),
                via: vec![NodeId(1), NodeId(2)],
                source: TransitionSource::Local,
            }
        );

        assert_eq!(
            resolve(&g, selection, &mut Ctx::default()).unwrap(),
            Destination::Enter {
                node: NodeId(3),
                via: vec![NodeId(1)],
                source: TransitionSource::Local,
            }
        );
    }

    #[test]
    fn exit_and_terminal_edges_finish() {
        let g = graph(vec![
            real(0),
            Node::hub(NodeId(1), "hub").with_transition(Transition::to(NodeId(2))),
            Node::exit(NodeId(2), "exit"),
        ]);

        let through_hub = Selection {
            source: TransitionSource::Local,
            target: Some(NodeId(1)),
        };
        assert_eq!(
            resolve(&g, through_hub, &mut Ctx::default()).unwrap(),
            Destination::Finish {
                exit: Some(NodeId(2)),
                via: vec![NodeId(1)],
                source: TransitionSource::Local,
            }
        );

        let terminal = Selection {
            source: TransitionSource::Common,
            target: None,
        };
        assert_eq!(
            resolve(&g, terminal, &mut Ctx::default()).unwrap(),
            Destination::Finish {
                exit: None,
                via: Vec::new(),
                source: TransitionSource::Common,
            }
        );
    }

    #[test]
    fn dead_end_hub_abandons_move() {
        let g = graph(vec![
            real(0),
            Node::hub(NodeId(1), "gate")
                .with_transition(Transition::to(NodeId(0)).when(when(|c| c.local))),
        ]);
        let selection = Selection {
            source: TransitionSource::Local,
            target: Some(NodeId(1)),
        };

        assert_eq!(
            resolve(&g, selection, &mut Ctx::default()).unwrap(),
            Destination::Stay
        );
    }

    #[test]
    fn hub_cycle_is_detected() {
        let g = graph(vec![
            real(0),
            Node::hub(NodeId(1), "ping").with_transition(Transition::to(NodeId(2))),
            Node::hub(NodeId(2), "pong").with_transition(Transition::to(NodeId(1))),
        ]);
        let selection = Selection {
            source: TransitionSource::Local,
            target: Some(NodeId(1)),
        };

        let err = resolve(&g, selection, &mut Ctx::default()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::GraphCycle {
                start: NodeId(1),
                limit: 3,
            }
        ));
    }

    #[test]
    fn failing_hub_condition_names_the_hub() {
        let g = graph(vec![
            real(0),
            Node::hub(NodeId(1), "broken").with_transition(
                Transition::to(NodeId(0)).when(Condition::try_new(|_: &mut Ctx| Err("nan".into()))),
            ),
        ]);
        let selection = Selection {
            source: TransitionSource::Local,
            target: Some(NodeId(1)),
        };

        let err = resolve(&g, selection, &mut Ctx::default()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Condition {
                node: NodeId(1),
                priority: 0,
                ..
            }
        ));
    }
}
