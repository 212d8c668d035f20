use tracing::debug;
use vtree_diff::{diff_with_config, DiffConfig, DiffStats};
use vtree_host::{apply, mount, HostTree};
use vtree_types::VNode;

use crate::component::Component;
use crate::error::RuntimeResult;

/// Outcome of one update cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleReport<N> {
    /// Patches applied, by kind.
    pub stats: DiffStats,
    /// Root host node after the cycle.
    pub root: N,
}

/// A component rendered into a host tree.
///
/// Holds the current state and the virtual tree last applied to the host.
/// Each [`dispatch`](Self::dispatch) runs reduce, view, diff and apply to
/// completion before returning.
pub struct Mounted<C: Component, H: HostTree> {
    component: C,
    state: C::State,
    view: VNode,
    root: H::Node,
    config: DiffConfig,
    cycles: u64,
}

impl<C: Component, H: HostTree> Mounted<C, H> {
    /// Render the component's initial view and append it under `container`.
    pub fn mount(
        component: C,
        host: &mut H,
        container: H::Node,
        config: DiffConfig,
    ) -> RuntimeResult<Self> {
        let state = component.init_state();
        let view = component.view(&state);
        let root = mount(host, container, &view)?;
        debug!(nodes = view.count() + 1, "component mounted");

        Ok(Self {
            component,
            state,
            view,
            root,
            config,
            cycles: 0,
        })
    }

    /// Run one update cycle for `action`.
    ///
    /// State and view advance only when the host was patched successfully.
    /// A patch error can leave the host partly updated.
    pub fn dispatch(&mut self, host: &mut H, action: C::Action) -> RuntimeResult<CycleReport<H::Node>> {
        let state = self.component.reduce(&self.state, action);
        let view = self.component.view(&state);
        let patches = diff_with_config(&self.view, &view, &self.config)?;
        let stats = patches.stats();

        self.root = apply(host, self.root, &patches)?;
        self.state = state;
        self.view = view;
        self.cycles += 1;
        debug!(cycle = self.cycles, patches = stats.total(), "update cycle complete");

        Ok(CycleReport {
            stats,
            root: self.root,
        })
    }

    pub fn state(&self) -> &C::State {
        &self.state
    }

    /// The virtual tree currently reflected by the host.
    pub fn view(&self) -> &VNode {
        &self.view
    }

    pub fn root(&self) -> H::Node {
        self.root
    }

    /// Number of completed update cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn component(&self) -> &C {
        &self.component
    }
}
