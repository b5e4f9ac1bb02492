//! When steps for service registration BDD scenarios.

use super::world::{RegistrationWorld, run_async};
use rstest_bdd_macros::when;

#[when("the service is registered")]
fn register_service(world: &mut RegistrationWorld) -> Result<(), eyre::Report> {
    let request = world.pending_request()?;
    world.last_add_result = Some(run_async(world.registry.add(request)));
    Ok(())
}
