//! Behaviour tests for catalog service registration.

mod service_registration_steps;

use rstest_bdd_macros::scenario;
use service_registration_steps::world::{RegistrationWorld, world};

#[scenario(
    path = "tests/features/service_registration.feature",
    name = "Register a service that confirms its identity"
)]
#[tokio::test(flavor = "multi_thread")]
async fn register_confirmed_service(world: RegistrationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/service_registration.feature",
    name = "Reject a duplicate service name"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_duplicate_name(world: RegistrationWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/service_registration.feature",
    name = "Reject a service that fails its identity check"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_failed_identity(world: RegistrationWorld) {
    let _ = world;
}
