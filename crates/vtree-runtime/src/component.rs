use vtree_types::VNode;

/// A unit of UI: state, the actions that change it, and the view of it.
///
/// `reduce` and `view` must be pure; the runtime calls them once per
/// dispatched action.
pub trait Component {
    type State;
    type Action;

    fn init_state(&self) -> Self::State;

    /// Compute the state that follows `state` under `action`.
    fn reduce(&self, state: &Self::State, action: Self::Action) -> Self::State;

    fn view(&self, state: &Self::State) -> VNode;
}
