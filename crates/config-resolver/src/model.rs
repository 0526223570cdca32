use ipnet::IpNet;

use crate::error::ConfigError;
use crate::raw::RawConfig;

#[derive(Debug, Clone)]
pub struct IpcConfig {
    pub upstream: String,
    pub downstream: String,
    pub hwm: usize,
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub stt_timeout_s: u64,
    pub llm_timeout_s: u64,
    /// Required; no silent default — resolution fails if absent.
    pub tts_timeout_s: u64,
    pub remote_session_timeout_s: u64,
    pub auto_trigger_enabled: bool,
    pub auto_trigger_interval_s: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct MotorConfig {
    pub port: String,
    pub baud: u32,
    pub stop_distance_cm: f64,
    pub warning_distance_cm: f64,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    pub allow_cidrs: Vec<IpNet>,
    pub log_dir: String,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub history_len: usize,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub ipc: IpcConfig,
    pub orchestrator: OrchestratorConfig,
    pub motor: MotorConfig,
    pub http: HttpConfig,
    pub telemetry: TelemetryConfig,
}

impl ResolvedConfig {
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let raw_ipc = raw.ipc.unwrap_or_default();
        let ipc = IpcConfig {
            upstream: raw_ipc
                .upstream
                .ok_or_else(|| ConfigError::MissingField("ipc.upstream".to_owned()))?,
            downstream: raw_ipc
                .downstream
                .ok_or_else(|| ConfigError::MissingField("ipc.downstream".to_owned()))?,
            hwm: raw_ipc.hwm.unwrap_or(1000),
        };

        let raw_orch = raw.orchestrator.unwrap_or_default();
        let orchestrator = OrchestratorConfig {
            stt_timeout_s: raw_orch.stt_timeout_s.unwrap_or(15),
            llm_timeout_s: raw_orch.llm_timeout_s.unwrap_or(45),
            tts_timeout_s: raw_orch
                .tts_timeout_s
                .ok_or_else(|| ConfigError::MissingField("orchestrator.tts_timeout_s".to_owned()))?,
            remote_session_timeout_s: raw_orch.remote_session_timeout_s.unwrap_or(30),
            auto_trigger_enabled: raw_orch.auto_trigger_enabled.unwrap_or(false),
            auto_trigger_interval_s: raw_orch.auto_trigger_interval_s,
        };

        let raw_motor = raw.motor.unwrap_or_default();
        let motor = MotorConfig {
            port: raw_motor
                .port
                .ok_or_else(|| ConfigError::MissingField("motor.port".to_owned()))?,
            baud: raw_motor.baud.unwrap_or(115_200),
            stop_distance_cm: raw_motor.stop_distance_cm.unwrap_or(15.0),
            warning_distance_cm: raw_motor.warning_distance_cm.unwrap_or(30.0),
        };

        let raw_http = raw.http.unwrap_or_default();
        let allow_cidrs = raw_http
            .allow_cidrs
            .unwrap_or_default()
            .into_iter()
            .map(|s| {
                s.parse::<IpNet>()
                    .map_err(|e| ConfigError::InvalidValue(format!("http.allow_cidrs[{s}]"), e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let http = HttpConfig {
            bind: raw_http.bind.unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: raw_http.port.unwrap_or(8090),
            allow_cidrs,
            log_dir: raw_http.log_dir.unwrap_or_else(|| "/var/log/robot".to_owned()),
        };

        let raw_telemetry = raw.telemetry.unwrap_or_default();
        let telemetry = TelemetryConfig {
            history_len: raw_telemetry.history_len.unwrap_or(10),
        };

        Ok(Self {
            ipc,
            orchestrator,
            motor,
            http,
            telemetry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawIpc, RawOrchestrator};

    #[test]
    fn missing_tts_timeout_fails() {
        let raw = RawConfig {
            ipc: Some(RawIpc {
                upstream: Some("tcp://127.0.0.1:6000".into()),
                downstream: Some("tcp://127.0.0.1:6001".into()),
                hwm: None,
            }),
            orchestrator: Some(RawOrchestrator::default()),
            motor: None,
            http: None,
            telemetry: None,
        };
        let err = ResolvedConfig::from_raw(raw).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == "orchestrator.tts_timeout_s"));
    }
}
