//! Reference point resolution.

use std::future::Future;
use std::time::Duration;

use kwn_core::Coordinate;

/// Source of the user's current position.
pub trait LocationProvider: Send + Sync {
    /// `None` when the position is unavailable or permission was denied.
    fn current_position(&self) -> impl Future<Output = Option<Coordinate>> + Send;
}

/// Provider that always answers with the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub Option<Coordinate>);

impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Option<Coordinate> {
        self.0
    }
}

/// Waits up to `timeout` for `provider`, then settles on `fallback`.
///
/// Positions outside the WGS84 ranges count as unavailable.
pub async fn resolve_reference_point<P: LocationProvider>(
    provider: &P,
    timeout: Duration,
    fallback: Option<Coordinate>,
) -> Option<Coordinate> {
    match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(Some(position)) if position.is_valid() => Some(position),
        Ok(Some(position)) => {
            tracing::warn!(
                lat = position.lat,
                lng = position.lng,
                "location provider returned invalid position, using fallback"
            );
            fallback
        }
        Ok(None) => {
            tracing::info!("location unavailable, using fallback reference point");
            fallback
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                "location provider timed out, using fallback"
            );
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverAnswers;

    impl LocationProvider for NeverAnswers {
        async fn current_position(&self) -> Option<Coordinate> {
            std::future::pending::<()>().await;
            None
        }
    }

    const AKIBA: Coordinate = Coordinate::new(35.6984, 139.7731);

    #[tokio::test]
    async fn provider_position_wins() {
        let point = resolve_reference_point(
            &FixedLocation(Some(AKIBA)),
            Duration::from_millis(100),
            Some(Coordinate::TOKYO_STATION),
        )
        .await;
        assert_eq!(point, Some(AKIBA));
    }

    #[tokio::test]
    async fn unavailable_position_uses_fallback() {
        let point = resolve_reference_point(
            &FixedLocation(None),
            Duration::from_millis(100),
            Some(Coordinate::TOKYO_STATION),
        )
        .await;
        assert_eq!(point, Some(Coordinate::TOKYO_STATION));
    }

    #[tokio::test]
    async fn timeout_uses_fallback() {
        let point = resolve_reference_point(
            &NeverAnswers,
            Duration::from_millis(10),
            Some(Coordinate::TOKYO_STATION),
        )
        .await;
        assert_eq!(point, Some(Coordinate::TOKYO_STATION));
    }

    #[tokio::test]
    async fn invalid_position_without_fallback_is_none() {
        let point = resolve_reference_point(
            &FixedLocation(Some(Coordinate::new(95.0, 0.0))),
            Duration::from_millis(100),
            None,
        )
        .await;
        assert_eq!(point, None);
    }
}
