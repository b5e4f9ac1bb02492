//! Then steps for service registration BDD scenarios.

use super::world::{RegistrationWorld, run_async};
use aries::registry::{domain::ServiceRecord, services::RegistryServiceError};
use rstest_bdd_macros::then;

fn last_result(
    world: &RegistrationWorld,
) -> Result<&Result<ServiceRecord, RegistryServiceError>, eyre::Report> {
    world
        .last_add_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing registration result in scenario world"))
}

#[then("registration succeeds with the service marked alive")]
fn registration_succeeds(world: &RegistrationWorld) -> Result<(), eyre::Report> {
    let record = last_result(world)?
        .as_ref()
        .map_err(|err| eyre::eyre!("expected registration to succeed, got {err}"))?;
    if !record.is_alive() {
        return Err(eyre::eyre!("expected '{}' to be alive", record.name()));
    }
    Ok(())
}

#[then("listing services returns {count:usize} entries")]
fn listing_returns_count(world: &RegistrationWorld, count: usize) -> Result<(), eyre::Report> {
    let listed = run_async(world.registry.list());
    if listed.len() != count {
        return Err(eyre::eyre!(
            "expected {count} services, found {}",
            listed.len()
        ));
    }
    Ok(())
}

#[then("registration fails with a duplicate name error")]
fn registration_fails_duplicate(world: &RegistrationWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    if !matches!(result, Err(RegistryServiceError::DuplicateName(_))) {
        return Err(eyre::eyre!("expected duplicate name error, got {result:?}"));
    }
    Ok(())
}

#[then("registration fails with an identity check error")]
fn registration_fails_identity(world: &RegistrationWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    if !matches!(result, Err(RegistryServiceError::IdentityCheckFailed { .. })) {
        return Err(eyre::eyre!("expected identity check error, got {result:?}"));
    }
    Ok(())
}
