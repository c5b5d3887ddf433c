//! Provider implementations.
//!
//! Each module declares its descriptor, parses its loose request into a typed
//! action, and extracts the fields it reports from the upstream response.

pub mod ai;
pub mod discord;
pub mod drive;
pub mod gmail;
pub mod linkedin;
pub mod twitter;
pub mod youtube;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::endpoints::Endpoints;
    use crate::mock::MockTransport;
    use crate::proxy::Proxy;
    use chrono::TimeZone;
    use nodeflow_core::FixedClock;
    use std::sync::Arc;

    /// The instant every test clock is frozen at.
    pub const NOW: &str = "2024-05-01T12:00:00.000Z";

    pub fn proxy(mock: &MockTransport) -> Proxy {
        let clock = FixedClock(
            chrono::Utc
                .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
                .single()
                .expect("valid instant"),
        );
        Proxy::new(Arc::new(mock.clone()), Endpoints::default()).with_clock(Arc::new(clock))
    }
}
