//! Then steps for resource lookup BDD scenarios.

use super::world::{LookupWorld, run_async};
use rstest_bdd_macros::then;

#[then("the report searched {searched:usize} services with {hits:usize} hits")]
fn report_counts(world: &LookupWorld, searched: usize, hits: usize) -> Result<(), eyre::Report> {
    let report = world.report()?;
    if report.services_searched() != searched || report.hits() != hits {
        return Err(eyre::eyre!(
            "expected {searched} searched and {hits} hits, got {} and {}",
            report.services_searched(),
            report.hits()
        ));
    }
    if report.results().len() != searched {
        return Err(eyre::eyre!(
            "expected one result per service, got {}",
            report.results().len()
        ));
    }
    Ok(())
}

#[then(r#""{name}" answered with status {status:u16}"#)]
fn service_answered(world: &LookupWorld, name: String, status: u16) -> Result<(), eyre::Report> {
    let result = world
        .report()?
        .result_for(&name)
        .ok_or_else(|| eyre::eyre!("no result for '{name}'"))?;
    if result.status() != status {
        return Err(eyre::eyre!(
            "expected '{name}' to answer {status}, got {}",
            result.status()
        ));
    }
    Ok(())
}

fn liveness_of(world: &LookupWorld, name: &str) -> Result<bool, eyre::Report> {
    run_async(world.registry.find_by_name(name))
        .map(|record| record.is_alive())
        .ok_or_else(|| eyre::eyre!("service '{name}' is not registered"))
}

#[then(r#""{name}" is marked offline"#)]
fn service_marked_offline(world: &LookupWorld, name: String) -> Result<(), eyre::Report> {
    if liveness_of(world, &name)? {
        return Err(eyre::eyre!("expected '{name}' to be offline"));
    }
    Ok(())
}

#[then(r#""{name}" is still alive"#)]
fn service_still_alive(world: &LookupWorld, name: String) -> Result<(), eyre::Report> {
    if !liveness_of(world, &name)? {
        return Err(eyre::eyre!("expected '{name}' to stay alive"));
    }
    Ok(())
}
