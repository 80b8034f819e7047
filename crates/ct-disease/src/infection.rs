//! Transmission from one contagious agent.

use log::trace;

use ct_agent::Population;
use ct_core::{AgentId, EpiConfig, Millis};
use ct_spatial::ContactDetector;

/// Infect every susceptible agent within reach of `infector`.
///
/// Does nothing unless `infector` is live, not quarantined, and infected for
/// longer than `infection_delay`.  Each newly infected agent records
/// `infector` as its source and is appended (once) to the infector's
/// contacts.  The infector's own state is otherwise untouched.
///
/// Returns the ids infected by this call, ascending.
pub fn spread_from<D: ContactDetector + ?Sized>(
    infector:   AgentId,
    population: &mut Population,
    detector:   &D,
    config:     &EpiConfig,
    now:        Millis,
) -> Vec<AgentId> {
    let exposed = match population.get(infector) {
        Some(agent) if agent.is_contagious(now, config.infection_delay) => {
            detector.exposed(agent, population, config.infection_radius)
        }
        _ => return Vec::new(),
    };

    let mut infected = Vec::with_capacity(exposed.len());
    for id in exposed {
        // Susceptibility is re-checked by `infect`; stale ids are skipped.
        if population.get_mut(id).is_some_and(|target| target.infect(now, Some(infector))) {
            infected.push(id);
        }
    }

    if let Some(agent) = population.get_mut(infector) {
        for &id in &infected {
            agent.add_contact(id);
            trace!("{infector} infected {id} at {now}");
        }
    }
    infected
}
