//! Given steps for service registration BDD scenarios.

use super::world::{PendingService, RegistrationWorld, run_async};
use aries::registry::domain::BaseAddress;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a catalog service "{name}" at "{address}" that confirms its identity"#)]
fn a_confirming_service(
    world: &mut RegistrationWorld,
    name: String,
    address: String,
) -> Result<(), eyre::Report> {
    let base = BaseAddress::new(address.as_str()).wrap_err("parse scenario address")?;
    world.probe.serve_identity(&base, &name);
    world.pending = Some(PendingService { name, address });
    Ok(())
}

#[given(r#"a catalog service "{name}" at "{address}" that answers "{body}""#)]
fn a_service_answering(
    world: &mut RegistrationWorld,
    name: String,
    address: String,
    body: String,
) -> Result<(), eyre::Report> {
    let base = BaseAddress::new(address.as_str()).wrap_err("parse scenario address")?;
    world.probe.serve(&base, body);
    world.pending = Some(PendingService { name, address });
    Ok(())
}

#[given("the service has already been registered")]
fn service_already_registered(world: &mut RegistrationWorld) -> Result<(), eyre::Report> {
    let request = world.pending_request()?;
    run_async(world.registry.add(request))
        .wrap_err("register existing service for duplicate scenario")?;
    Ok(())
}
