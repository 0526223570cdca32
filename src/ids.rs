/// Generate a fresh request/session identifier. Every `llm.request` and
/// `cmd.listen.start` gets one of these so responses can be correlated back
/// to the outstanding marker that issued them (§3 LLM request/response
/// pairing, §8 P4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Seconds since the Unix epoch, the universal `timestamp` field required on
/// every message envelope (§3).
pub fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}
