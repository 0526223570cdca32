use message_schema::common::Direction;
use robot_core::SensorSample;

/// Independent Pi-side hazard classification from the minimum sensor
/// distance, using the gateway's own configured thresholds. Deliberately
/// does not trust the MCU-reported `obstacle`/`warning` bits for the
/// forward-block decision — both layers must independently refuse to move
/// forward into an obstacle (§4.7).
pub fn classify(min_distance: f64, stop_distance_cm: f64, warning_distance_cm: f64) -> (bool, bool) {
    let obstacle = min_distance <= stop_distance_cm;
    let warning = !obstacle && min_distance <= warning_distance_cm;
    (obstacle, warning)
}

/// Whether a `FORWARD` command must be suppressed given the latest cached
/// sample, independent of the MCU's self-reported flags.
pub fn should_block_forward(sample: &SensorSample, stop_distance_cm: f64, warning_distance_cm: f64) -> bool {
    let (obstacle, warning) = classify(sample.min_distance, stop_distance_cm, warning_distance_cm);
    obstacle || warning
}

/// Map a `nav.cmd` direction to its uppercase UART line command (§6).
pub fn uart_command_for(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "FORWARD",
        Direction::Backward => "BACKWARD",
        Direction::Left => "LEFT",
        Direction::Right => "RIGHT",
        Direction::Stop => "STOP",
        Direction::Scan => "SCAN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(min_distance: f64) -> SensorSample {
        SensorSample {
            s1: min_distance,
            s2: min_distance,
            s3: min_distance,
            mq2: 0.0,
            min_distance,
            obstacle: false,
            warning: false,
            motor_left: 0,
            motor_right: 0,
            ts: 0,
        }
    }

    #[test]
    fn classify_clear_distance_is_neither() {
        assert_eq!(classify(100.0, 15.0, 30.0), (false, false));
    }

    #[test]
    fn classify_warning_band() {
        assert_eq!(classify(25.0, 15.0, 30.0), (false, true));
    }

    #[test]
    fn classify_stop_band_wins_over_warning() {
        assert_eq!(classify(10.0, 15.0, 30.0), (true, false));
    }

    #[test]
    fn forward_blocked_when_within_warning_distance() {
        assert!(should_block_forward(&sample(20.0), 15.0, 30.0));
    }

    #[test]
    fn forward_allowed_when_clear() {
        assert!(!should_block_forward(&sample(100.0), 15.0, 30.0));
    }

    #[test]
    fn uart_command_mapping_is_uppercase() {
        assert_eq!(uart_command_for(Direction::Forward), "FORWARD");
        assert_eq!(uart_command_for(Direction::Stop), "STOP");
        assert_eq!(uart_command_for(Direction::Scan), "SCAN");
    }
}
