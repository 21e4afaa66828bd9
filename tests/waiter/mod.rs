//! BDD coverage for [`piwait::AsyncOperationWaiter`].

mod bdd_steps;
mod scenarios;
mod test_helpers;
