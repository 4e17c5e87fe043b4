//! Path parameter parsing for the event and waiter endpoints.
//!
//! Values are parsed explicitly rather than tested for truthiness, so a
//! legitimate `0` coordinate is accepted.

use crate::domain::ports::{NearbyEventsRequest, WaiterMove};
use crate::domain::{Error, EventId, GeoPoint, UserId};

const NEAR_FAILED: &str = "Get Event Near Location failed";

/// Parse a finite coordinate no larger than `limit` in magnitude.
fn parse_coordinate(raw: &str, limit: f64) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() <= limit)
}

/// Parse the `long`, `lat` and `zoom` segments of a proximity search.
///
/// Every unparseable segment contributes a cause; all are reported together.
///
/// # Examples
/// ```
/// use eventwait::inbound::http::validation::parse_near_request;
///
/// let request = parse_near_request("0", "0", "3").expect("valid");
/// assert_eq!(request.zoom, 3);
///
/// let error = parse_near_request("east", "0", "").expect_err("invalid");
/// assert_eq!(error.causes(), ["A long is required", "A zoom is required"]);
/// ```
pub fn parse_near_request(long: &str, lat: &str, zoom: &str) -> Result<NearbyEventsRequest, Error> {
    let longitude = parse_coordinate(long, 180.0);
    let latitude = parse_coordinate(lat, 90.0);
    let zoom = zoom.trim().parse::<u32>().ok();

    let mut causes = Vec::new();
    if longitude.is_none() {
        causes.push("A long is required");
    }
    if latitude.is_none() {
        causes.push("A lat is required");
    }
    if zoom.is_none() {
        causes.push("A zoom is required");
    }

    match (longitude, latitude, zoom) {
        (Some(longitude), Some(latitude), Some(zoom)) => {
            let center = GeoPoint::new(longitude, latitude)
                .map_err(|err| Error::invalid_request(NEAR_FAILED).with_cause(err.to_string()))?;
            Ok(NearbyEventsRequest { center, zoom })
        }
        _ => Err(Error::invalid_request(NEAR_FAILED).with_causes(causes)),
    }
}

/// Parse the event and waiter identifiers of a join or leave request.
///
/// Malformed identifiers cannot name an existing record, so they are
/// reported as not found, waiter first.
pub fn parse_waiter_move(
    operation: &'static str,
    event_id: &str,
    waiter_id: &str,
) -> Result<WaiterMove, Error> {
    let user_id =
        UserId::new(waiter_id).map_err(|_| Error::not_found(operation).with_cause("User not found"))?;
    let event_id =
        EventId::new(event_id).map_err(|_| Error::not_found(operation).with_cause("Event not found"))?;
    Ok(WaiterMove { event_id, user_id })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case("0", "0", "1")]
    #[case("-180", "90", "20")]
    #[case(" 2.35 ", "48.85", "7")]
    fn accepts_valid_segments(#[case] long: &str, #[case] lat: &str, #[case] zoom: &str) {
        assert!(parse_near_request(long, lat, zoom).is_ok());
    }

    #[rstest]
    #[case("NaN", "0", "1", &["A long is required"])]
    #[case("0", "91", "1", &["A lat is required"])]
    #[case("0", "0", "-1", &["A zoom is required"])]
    #[case("inf", "x", "1.5", &["A long is required", "A lat is required", "A zoom is required"])]
    fn reports_each_bad_segment(
        #[case] long: &str,
        #[case] lat: &str,
        #[case] zoom: &str,
        #[case] expected: &[&str],
    ) {
        let error = parse_near_request(long, lat, zoom).expect_err("invalid");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "Get Event Near Location failed");
        assert_eq!(error.causes(), expected);
    }

    #[rstest]
    fn malformed_waiter_id_is_reported_before_event_id() {
        let error = parse_waiter_move("Join event failed", "bad", "also-bad").expect_err("invalid");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.causes(), ["User not found"]);
    }

    #[rstest]
    fn malformed_event_id_is_not_found() {
        let waiter = UserId::random().to_string();
        let error = parse_waiter_move("Leave event failed", "bad", &waiter).expect_err("invalid");
        assert_eq!(error.causes(), ["Event not found"]);
    }
}
