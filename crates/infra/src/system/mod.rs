use chrono::Utc;

/// Clock used by the scheduling and reconciliation code. Mocked out in
/// tests so that due-time behavior is deterministic.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
