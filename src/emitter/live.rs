use crate::loader::{Procedure, RouteSpec};
use crate::tree::{Leaf, Router};
use log::debug;

/// Finalizes every handler in a simplified tree.
///
/// Each leaf's handler is asked to register itself under the leaf's route path. The method is
/// passed along only when `with_method` is set.
pub fn finalize<P: Procedure>(router: Router<P>, with_method: bool) -> Router<P::Registered> {
    router.map_leaves(&mut |leaf: Leaf<P>| {
        let spec = RouteSpec {
            path: leaf.path.to_string(),
            method: with_method.then(|| leaf.method.clone()),
        };
        debug!("Registering {} {}", leaf.method, spec.path);
        leaf.payload.route(&spec)
    })
}
