//! Testing policies.
//!
//! Testing finds *spread*, not infection: a test only triggers quarantine for
//! an agent that is infected, not yet quarantined, and has infected at least
//! one other agent.  An infectious agent with no onward contacts tests
//! negative.

use log::info;

use ct_agent::{Agent, Population};
use ct_core::{AgentId, EpiConfig, Millis, SimClock, SimRng};

/// Outcome of one testing opportunity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TestResult {
    /// Not eligible yet, or the coin flip skipped the test.
    NotTested,
    /// Tested; no quarantine.
    Negative,
    /// Tested and quarantined now.
    Positive,
}

/// Test `agent` at `now`.  A positive result starts quarantine (with no
/// notifier) and, if `mark_index` is set, flags the agent as an index case.
pub fn apply_test(agent: &mut Agent, now: Millis, mark_index: bool) -> TestResult {
    agent.last_tested = now;
    if !agent.is_spreading() || agent.contacts().is_empty() {
        return TestResult::Negative;
    }
    agent.quarantine(now, None);
    if mark_index {
        agent.is_index_case = true;
    }
    TestResult::Positive
}

/// Per-agent probabilistic policy: once more than `testing_frequency` has
/// passed since the agent's last test, it is tested with probability
/// `test_probability`.  Every positive agent is flagged as an index case.
pub fn per_agent_test(
    agent:  &mut Agent,
    config: &EpiConfig,
    now:    Millis,
    rng:    &mut SimRng,
) -> TestResult {
    if !now.exceeds(agent.last_tested, config.testing_frequency) {
        return TestResult::NotTested;
    }
    if !rng.gen_bool(config.test_probability) {
        return TestResult::NotTested;
    }
    apply_test(agent, now, true)
}

/// Global random single-test policy: once more than `testing_frequency` has
/// passed since the previous global test, one live agent drawn uniformly is
/// tested.  Only the first positive of the run becomes the index case.
///
/// Returns the tested agent and the result, or `None` if no test was due
/// (or the population is empty).  `clock.last_test` advances whenever a test
/// was due.
pub fn global_random_test(
    population: &mut Population,
    config:     &EpiConfig,
    clock:      &mut SimClock,
    rng:        &mut SimRng,
    index_case: &mut Option<AgentId>,
) -> Option<(AgentId, TestResult)> {
    if !clock.test_due(config.testing_frequency) {
        return None;
    }
    let now = clock.now;
    clock.last_test = now;

    let ids = population.ids();
    let id = *rng.choose(&ids)?;
    let agent = population.get_mut(id)?;
    let result = apply_test(agent, now, index_case.is_none());
    if result == TestResult::Positive && index_case.is_none() {
        *index_case = Some(id);
        info!("index case {id} found by random test at {now}");
    }
    Some((id, result))
}
