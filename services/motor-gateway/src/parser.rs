use std::convert::TryFrom;

/// One decoded line of UART telemetry. `Ack` and `Unknown` are logged but
/// otherwise inert — only `Data`/`Alert` drive the upstream publish.
#[derive(Debug, Clone, PartialEq)]
pub enum UartLine {
    Data(DataFields),
    Alert(AlertFields),
    Ack { cmd: String, status: String },
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataFields {
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub mq2: f64,
    pub servo: f64,
    pub lmotor: i32,
    pub rmotor: i32,
    pub obstacle: bool,
    pub warning: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertFields {
    pub reason: String,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("field {0} is not a number: {1}")]
    NotANumber(&'static str, String),
    #[error("field {0} is not 0/1: {1}")]
    NotABool(&'static str, String),
}

fn fields_after(line: &str, prefix: &str) -> impl Iterator<Item = (&str, &str)> {
    line[prefix.len()..]
        .split(',')
        .filter_map(|part| part.split_once(':'))
}

fn lookup<'a>(fields: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    fields.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn parse_f64(fields: &[(&str, &str)], key: &'static str) -> Result<f64, ParseError> {
    let raw = lookup(fields, key).ok_or(ParseError::MissingField(key))?;
    raw.parse::<f64>()
        .map_err(|_| ParseError::NotANumber(key, raw.to_owned()))
}

fn parse_i32(fields: &[(&str, &str)], key: &'static str) -> Result<i32, ParseError> {
    let raw = lookup(fields, key).ok_or(ParseError::MissingField(key))?;
    raw.parse::<i32>()
        .map_err(|_| ParseError::NotANumber(key, raw.to_owned()))
}

fn parse_bool01(fields: &[(&str, &str)], key: &'static str) -> Result<bool, ParseError> {
    let raw = lookup(fields, key).ok_or(ParseError::MissingField(key))?;
    match raw {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(ParseError::NotABool(key, other.to_owned())),
    }
}

impl TryFrom<&str> for UartLine {
    type Error = ParseError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("DATA:") {
            let fields: Vec<(&str, &str)> = fields_after(line, "DATA:").collect();
            let _ = rest;
            return Ok(UartLine::Data(DataFields {
                s1: parse_f64(&fields, "S1")?,
                s2: parse_f64(&fields, "S2")?,
                s3: parse_f64(&fields, "S3")?,
                mq2: parse_f64(&fields, "MQ2")?,
                servo: parse_f64(&fields, "SERVO")?,
                lmotor: parse_i32(&fields, "LMOTOR")?,
                rmotor: parse_i32(&fields, "RMOTOR")?,
                obstacle: parse_bool01(&fields, "OBSTACLE")?,
                warning: parse_bool01(&fields, "WARNING")?,
            }));
        }
        if let Some(rest) = line.strip_prefix("ALERT:COLLISION:") {
            let reason = rest.split(',').next().unwrap_or("").to_owned();
            let fields: Vec<(&str, &str)> = rest.split(',').skip(1).filter_map(|p| p.split_once(':')).collect();
            return Ok(UartLine::Alert(AlertFields {
                reason,
                s1: parse_f64(&fields, "S1")?,
                s2: parse_f64(&fields, "S2")?,
                s3: parse_f64(&fields, "S3")?,
            }));
        }
        if let Some(rest) = line.strip_prefix("ACK:") {
            let mut parts = rest.splitn(2, ':');
            let cmd = parts.next().unwrap_or("").to_owned();
            let status = parts.next().unwrap_or("").to_owned();
            return Ok(UartLine::Ack { cmd, status });
        }
        Ok(UartLine::Unknown(line.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_line() {
        let line = "DATA:S1:12.5,S2:30.0,S3:41.2,MQ2:0.1,SERVO:90,LMOTOR:120,RMOTOR:-120,OBSTACLE:0,WARNING:1";
        let parsed = UartLine::try_from(line).unwrap();
        assert_eq!(
            parsed,
            UartLine::Data(DataFields {
                s1: 12.5,
                s2: 30.0,
                s3: 41.2,
                mq2: 0.1,
                servo: 90.0,
                lmotor: 120,
                rmotor: -120,
                obstacle: false,
                warning: true,
            })
        );
    }

    #[test]
    fn parses_alert_line() {
        let line = "ALERT:COLLISION:front_bumper,S1:5.0,S2:6.0,S3:7.0";
        let parsed = UartLine::try_from(line).unwrap();
        assert_eq!(
            parsed,
            UartLine::Alert(AlertFields {
                reason: "front_bumper".to_owned(),
                s1: 5.0,
                s2: 6.0,
                s3: 7.0,
            })
        );
    }

    #[test]
    fn parses_ack_line() {
        let parsed = UartLine::try_from("ACK:FORWARD:OK").unwrap();
        assert_eq!(parsed, UartLine::Ack { cmd: "FORWARD".to_owned(), status: "OK".to_owned() });
    }

    #[test]
    fn unknown_line_is_preserved_not_rejected() {
        let parsed = UartLine::try_from("garbage line").unwrap();
        assert_eq!(parsed, UartLine::Unknown("garbage line".to_owned()));
    }

    #[test]
    fn missing_field_in_data_line_is_an_error() {
        let err = UartLine::try_from("DATA:S1:1.0,S2:2.0").unwrap_err();
        assert_eq!(err, ParseError::MissingField("S3"));
    }

    #[test]
    fn non_numeric_field_is_an_error() {
        let line = "DATA:S1:abc,S2:2.0,S3:3.0,MQ2:0.1,SERVO:90,LMOTOR:1,RMOTOR:1,OBSTACLE:0,WARNING:0";
        let err = UartLine::try_from(line).unwrap_err();
        assert_eq!(err, ParseError::NotANumber("S1", "abc".to_owned()));
    }

    #[test]
    fn non_01_bool_field_is_an_error() {
        let line = "DATA:S1:1.0,S2:2.0,S3:3.0,MQ2:0.1,SERVO:90,LMOTOR:1,RMOTOR:1,OBSTACLE:2,WARNING:0";
        let err = UartLine::try_from(line).unwrap_err();
        assert_eq!(err, ParseError::NotABool("OBSTACLE", "2".to_owned()));
    }
}
