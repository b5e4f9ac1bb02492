//! When steps for resource lookup BDD scenarios.

use super::world::{LookupWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#"identifier "{identifier}" is looked up"#)]
fn look_up_identifier(world: &mut LookupWorld, identifier: String) {
    world.last_report = Some(run_async(world.aggregator.aggregate(&identifier)));
}
