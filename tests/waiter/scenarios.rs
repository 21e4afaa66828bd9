//! BDD scenarios for the poll-until-state waiter.

use rstest_bdd_macros::scenario;

use super::test_helpers::{WaiterContext, waiter_context};

#[scenario(
    path = "tests/features/waiter.feature",
    name = "A building resource becomes active"
)]
fn scenario_building_to_active(waiter_context: WaiterContext) {
    drop(waiter_context);
}

#[scenario(
    path = "tests/features/waiter.feature",
    name = "A building resource fails"
)]
fn scenario_building_to_error(waiter_context: WaiterContext) {
    drop(waiter_context);
}

#[scenario(
    path = "tests/features/waiter.feature",
    name = "A resource stuck building times out"
)]
fn scenario_stuck_building(waiter_context: WaiterContext) {
    drop(waiter_context);
}

#[scenario(
    path = "tests/features/waiter.feature",
    name = "A deleted resource is already gone"
)]
fn scenario_already_deleted(waiter_context: WaiterContext) {
    drop(waiter_context);
}

#[scenario(
    path = "tests/features/waiter.feature",
    name = "A deleted resource lingers"
)]
fn scenario_deletion_lingers(waiter_context: WaiterContext) {
    drop(waiter_context);
}

#[scenario(
    path = "tests/features/waiter.feature",
    name = "A resource reports a state nobody expected"
)]
fn scenario_unexpected_state(waiter_context: WaiterContext) {
    drop(waiter_context);
}
