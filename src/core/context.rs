//! The shared per-run context.

/// Mutable value shared by every condition, behaviour, and handler of a run.
///
/// The engine builds one context from the host's owner handle each time a
/// run starts, and drops it when the run stops or reaches an exit.
///
/// # Example
///
/// ```rust
/// use tickgraph::core::PermanentState;
///
/// #[derive(Clone)]
/// struct Npc {
///     name: String,
/// }
///
/// struct Blackboard {
///     npc: Npc,
///     alerted: bool,
/// }
///
/// impl PermanentState for Blackboard {
///     type Owner = Npc;
///
///     fn create(owner: &Npc) -> Self {
///         Blackboard {
///             npc: owner.clone(),
///             alerted: false,
///         }
///     }
/// }
///
/// let ctx = Blackboard::create(&Npc { name: "guard".into() });
/// assert_eq!(ctx.npc.name, "guard");
/// assert!(!ctx.alerted);
/// ```
pub trait PermanentState: Sized {
    /// Host-provided handle bound with `StateMachine::set_up`.
    type Owner;

    /// Build a fresh context for a new run.
    fn create(owner: &Self::Owner) -> Self;
}

impl PermanentState for () {
    type Owner = ();

    fn create(_owner: &()) -> Self {}
}
