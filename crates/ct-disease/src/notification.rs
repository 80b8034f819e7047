//! Contact notification.

use log::trace;

use ct_agent::Population;
use ct_core::{AgentId, EpiConfig, Millis};

/// Let a quarantined agent warn its contacts.
///
/// Fires once per agent, the first time it is called more than
/// `notification_delay` after the agent's quarantine began.  Every contact
/// (plus the agent's infector when `notify_infector` is set) that is still
/// live and not yet quarantined starts quarantine now, with `id` recorded as
/// the notifier.  Infection status is never changed.  Contacts that have
/// already left the population are skipped.
///
/// Returns the ids quarantined by this call.
pub fn notify_contacts(
    population: &mut Population,
    id:         AgentId,
    config:     &EpiConfig,
    now:        Millis,
) -> Vec<AgentId> {
    let Some(agent) = population.get_mut(id) else {
        return Vec::new();
    };
    let due = agent
        .quarantined_at()
        .is_some_and(|at| now.exceeds(at, config.notification_delay));
    if !due || !agent.mark_notified() {
        return Vec::new();
    }

    let mut targets = agent.contacts().to_vec();
    if config.notify_infector {
        if let Some(by) = agent.infected_by() {
            if !targets.contains(&by) {
                targets.push(by);
            }
        }
    }

    let mut quarantined = Vec::new();
    for target in targets {
        let Some(contact) = population.get_mut(target) else {
            continue;
        };
        if contact.quarantine(now, Some(id)) {
            trace!("{id} notified {target} at {now}");
            quarantined.push(target);
        }
    }
    quarantined
}
