use message_schema::common::Direction;

use crate::world::WorldSnapshot;

/// Hard invariant (§4.6): a proposed `forward` direction is rewritten to
/// `stop` whenever the latest world snapshot has `obstacle` or `warning`
/// set. Every other direction passes through unchanged.
pub fn sanitize_direction(direction: Direction, world: &WorldSnapshot) -> Direction {
    if direction == Direction::Forward && (world.obstacle || world.warning) {
        Direction::Stop
    } else {
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with(obstacle: bool, warning: bool) -> WorldSnapshot {
        let mut w = WorldSnapshot::default();
        w.obstacle = obstacle;
        w.warning = warning;
        w
    }

    #[test]
    fn forward_with_obstacle_becomes_stop() {
        let w = world_with(true, false);
        assert_eq!(sanitize_direction(Direction::Forward, &w), Direction::Stop);
    }

    #[test]
    fn forward_with_warning_becomes_stop() {
        let w = world_with(false, true);
        assert_eq!(sanitize_direction(Direction::Forward, &w), Direction::Stop);
    }

    #[test]
    fn forward_without_hazard_passes_through() {
        let w = world_with(false, false);
        assert_eq!(sanitize_direction(Direction::Forward, &w), Direction::Forward);
    }

    #[test]
    fn non_forward_direction_never_rewritten() {
        let w = world_with(true, true);
        assert_eq!(sanitize_direction(Direction::Left, &w), Direction::Left);
    }
}
