//! End-to-end check of the UART-line -> sensor-sample -> safety-decision
//! pipeline that `handle_uart_line`/`run_nav_drain` wire together in
//! `main.rs`. `parser` and `safety` are self-contained (no `crate::`
//! references), so they're safe to pull in directly as integration-test
//! modules rather than duplicating them.
#[path = "../src/parser.rs"]
mod parser;
#[path = "../src/safety.rs"]
mod safety;

use std::convert::TryFrom;

use message_schema::common::Direction;
use parser::UartLine;
use robot_core::SensorSample;

fn sample_from_data(line: &str) -> SensorSample {
    let UartLine::Data(d) = UartLine::try_from(line).expect("line parses") else {
        panic!("expected a DATA line");
    };
    let min_distance = d.s1.min(d.s2).min(d.s3);
    SensorSample {
        s1: d.s1,
        s2: d.s2,
        s3: d.s3,
        mq2: d.mq2,
        min_distance,
        obstacle: d.obstacle,
        warning: d.warning,
        motor_left: d.lmotor,
        motor_right: d.rmotor,
        ts: 0,
    }
}

#[test]
fn a_close_obstacle_blocks_forward_even_if_mcu_did_not_flag_it() {
    // MCU reports OBSTACLE:0, but the gateway's own stop threshold (15cm)
    // disagrees with the raw minimum distance — the Pi-side check must win.
    let line = "DATA:S1:10.0,S2:50.0,S3:50.0,MQ2:0.1,SERVO:90,LMOTOR:0,RMOTOR:0,OBSTACLE:0,WARNING:0";
    let sample = sample_from_data(line);
    assert!(safety::should_block_forward(&sample, 15.0, 30.0));
}

#[test]
fn a_clear_reading_permits_forward_motion() {
    let line = "DATA:S1:100.0,S2:100.0,S3:100.0,MQ2:0.1,SERVO:90,LMOTOR:50,RMOTOR:50,OBSTACLE:0,WARNING:0";
    let sample = sample_from_data(line);
    assert!(!safety::should_block_forward(&sample, 15.0, 30.0));
    assert_eq!(safety::uart_command_for(Direction::Forward), "FORWARD");
}

#[test]
fn a_collision_alert_line_parses_independently_of_data_lines() {
    let line = "ALERT:COLLISION:rear_bumper,S1:3.0,S2:4.0,S3:5.0";
    let parsed = UartLine::try_from(line).expect("alert line parses");
    match parsed {
        UartLine::Alert(a) => {
            assert_eq!(a.reason, "rear_bumper");
            assert!(safety::should_block_forward(
                &SensorSample {
                    s1: a.s1,
                    s2: a.s2,
                    s3: a.s3,
                    mq2: 0.0,
                    min_distance: a.s1.min(a.s2).min(a.s3),
                    obstacle: false,
                    warning: false,
                    motor_left: 0,
                    motor_right: 0,
                    ts: 0,
                },
                15.0,
                30.0,
            ));
        }
        other => panic!("expected an Alert line, got {other:?}"),
    }
}
