//! Given steps for resource lookup BDD scenarios.

use super::world::{LookupWorld, run_async};
use aries::registry::{domain::BaseAddress, services::AddServiceRequest};
use eyre::WrapErr;
use rstest_bdd_macros::given;

fn register(world: &LookupWorld, name: &str, address: &BaseAddress) -> Result<(), eyre::Report> {
    world.probe.serve_identity(address, name);
    run_async(
        world
            .registry
            .add(AddServiceRequest::new(name, address.as_str())),
    )
    .wrap_err_with(|| format!("register '{name}' for scenario"))?;
    Ok(())
}

#[given(r#"a registered catalog service "{name}" at "{address}" answering {status:u16}"#)]
fn registered_service_answering(
    world: &mut LookupWorld,
    name: String,
    address: String,
    status: u16,
) -> Result<(), eyre::Report> {
    let base = BaseAddress::new(address).wrap_err("parse scenario address")?;
    register(world, &name, &base)?;
    world
        .client
        .reply(&base, status, format!(r#"{{"holder":"{name}"}}"#));
    Ok(())
}

#[given(r#"a registered catalog service "{name}" at "{address}" that refuses lookups"#)]
fn registered_service_refusing(
    world: &mut LookupWorld,
    name: String,
    address: String,
) -> Result<(), eyre::Report> {
    let base = BaseAddress::new(address).wrap_err("parse scenario address")?;
    register(world, &name, &base)
}
