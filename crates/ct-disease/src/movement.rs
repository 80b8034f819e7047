//! Agent movement: travel, pause, and world wrap.

use ct_agent::Agent;
use ct_core::{EpiConfig, Millis, SimRng, Vec2, circle_intersection, distance};

/// What happened to one agent's movement this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Movement {
    /// Quarantined agents never move.
    Frozen,
    /// Stepped toward the target without reaching it.
    Travelling,
    /// Reached the target; now pausing.
    Arrived,
    /// Idle, and chose a new target this tick.
    Departed,
    /// Idle and staying put.
    Resting,
}

/// Advance `agent` by one tick of `elapsed` milliseconds.
///
/// A travelling agent moves `cell_speed * elapsed` toward its target (never
/// past it), arrives once its body circle overlaps the goal circle, and is
/// then wrapped back into the world if it drifted beyond `wrap_bound`.  An
/// idle agent whose pause is over starts a new trip with probability
/// `travel_frequency`.
pub fn step_movement(
    agent:   &mut Agent,
    config:  &EpiConfig,
    now:     Millis,
    elapsed: Millis,
    rng:     &mut SimRng,
) -> Movement {
    if agent.is_quarantined() {
        return Movement::Frozen;
    }

    match agent.travel_target {
        Some(target) => {
            let remaining = distance(agent.position, target);
            let step = (config.cell_speed * elapsed.as_f64()).min(remaining);
            agent.position += (target - agent.position).normalize().scale(step);

            let arrived = circle_intersection(
                agent.position,
                config.cell_radius,
                target,
                config.goal_radius,
            );
            if arrived {
                agent.travel_target = None;
                agent.last_traveled = now;
            }
            wrap(&mut agent.position, config.wrap_bound);

            if arrived { Movement::Arrived } else { Movement::Travelling }
        }
        None => {
            if now.exceeds(agent.last_traveled, config.pause_interval)
                && agent.travel_frequency > rng.unit()
            {
                agent.travel_target = Some(rng.unit_point());
                Movement::Departed
            } else {
                Movement::Resting
            }
        }
    }
}

/// One-sided reset: past `+bound` goes to 0, past `-bound` goes to 1.
pub fn wrap(position: &mut Vec2, bound: f64) {
    position.x = wrap_axis(position.x, bound);
    position.y = wrap_axis(position.y, bound);
}

#[inline]
fn wrap_axis(v: f64, bound: f64) -> f64 {
    if v > bound {
        0.0
    } else if v < -bound {
        1.0
    } else {
        v
    }
}
