//! Query cycle: input → resolve → fetch → one published [`QueryState`].

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::{
    error::ErrorKind,
    fetcher::WeatherFetcher,
    model::WeatherReport,
    provider::{ForecastSource, Geocoder},
    resolver::Resolver,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Loading,
    Success(WeatherReport),
    Failure(ErrorKind),
}

impl QueryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    /// True for `Success` and `Failure`.
    pub fn is_settled(&self) -> bool {
        matches!(self, QueryState::Success(_) | QueryState::Failure(_))
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            QueryState::Success(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorKind> {
        match self {
            QueryState::Failure(kind) => Some(kind),
            _ => None,
        }
    }
}

impl From<Result<WeatherReport, ErrorKind>> for QueryState {
    fn from(result: Result<WeatherReport, ErrorKind>) -> Self {
        match result {
            Ok(report) => QueryState::Success(report),
            Err(kind) => QueryState::Failure(kind),
        }
    }
}

/// Resolve then fetch; the first failing stage ends the run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    resolver: Resolver,
    fetcher: WeatherFetcher,
}

impl Pipeline {
    pub fn new(resolver: Resolver, fetcher: WeatherFetcher) -> Self {
        Self { resolver, fetcher }
    }

    pub fn from_providers(geocoder: Arc<dyn Geocoder>, source: Arc<dyn ForecastSource>) -> Self {
        Self::new(Resolver::new(geocoder), WeatherFetcher::new(source))
    }

    pub async fn run(&self, input: &str) -> Result<WeatherReport, ErrorKind> {
        let location = self.resolver.resolve(input).await?;
        let (current, daily, timezone) = self
            .fetcher
            .fetch_forecast(location.latitude, location.longitude)
            .await?;

        Ok(WeatherReport {
            location,
            current,
            daily,
            timezone,
        })
    }
}

/// Owns the single [`QueryState`]. Readers subscribe; only [`submit`](Self::submit)
/// and [`reset`](Self::reset) write.
///
/// Each submit takes a new generation number. A query that completes after a
/// newer one has started is dropped instead of overwriting the newer state.
#[derive(Debug)]
pub struct QueryCoordinator {
    pipeline: Pipeline,
    generation: AtomicU64,
    state: watch::Sender<QueryState>,
}

impl QueryCoordinator {
    pub fn new(pipeline: Pipeline) -> Self {
        let (state, _) = watch::channel(QueryState::Idle);
        Self {
            pipeline,
            generation: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    /// Run one query cycle and return its outcome.
    ///
    /// The outcome is published only if no newer submit started meanwhile.
    #[instrument(skip(self))]
    pub async fn submit(&self, input: &str) -> QueryState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(QueryState::Loading);

        let outcome = QueryState::from(self.pipeline.run(input).await);

        self.publish_if_current(generation, outcome.clone());
        outcome
    }

    /// Back to `Idle`; also invalidates any query still in flight.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(QueryState::Idle);
    }

    fn publish_if_current(&self, generation: u64, outcome: QueryState) {
        let published = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = outcome;
            true
        });

        if published {
            match self.state.borrow().error() {
                Some(kind) => info!(generation, error = %kind, "query failed"),
                None => info!(generation, "query succeeded"),
            }
        } else {
            debug!(generation, "discarding stale query result");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, Location};
    use crate::provider::Forecast;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug)]
    struct StubGeocoder {
        result: Result<Option<Location>, ErrorKind>,
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn search(&self, _name: &str) -> Result<Option<Location>, ErrorKind> {
            self.result.clone()
        }
    }

    #[derive(Debug, Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ForecastSource for CountingSource {
        async fn forecast(&self, latitude: f64, _longitude: f64) -> Result<Forecast, ErrorKind> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
            Ok(Forecast {
                current: CurrentConditions {
                    temperature_c: latitude,
                    feels_like_c: latitude,
                    humidity_pct: 50,
                    wind_kmh: 3.0,
                    pressure_hpa: 1015.0,
                    visibility_km: 20.0,
                    weather_code: 1,
                    observed_at: date.and_hms_opt(12, 0, 0).unwrap(),
                },
                daily: vec![],
                timezone: "GMT".into(),
            })
        }
    }

    fn location() -> Location {
        Location {
            name: "Oslo".into(),
            country: "Norway".into(),
            region: None,
            latitude: 59.91,
            longitude: 10.75,
        }
    }

    fn coordinator(geocoder: StubGeocoder) -> (QueryCoordinator, Arc<CountingSource>) {
        let source = Arc::new(CountingSource::default());
        let pipeline = Pipeline::from_providers(Arc::new(geocoder), source.clone());
        (QueryCoordinator::new(pipeline), source)
    }

    #[test]
    fn state_starts_idle() {
        let (coord, _) = coordinator(StubGeocoder { result: Ok(None) });
        assert_eq!(coord.state(), QueryState::Idle);
        assert!(!coord.state().is_settled());
    }

    #[tokio::test]
    async fn success_publishes_merged_report() {
        let (coord, source) = coordinator(StubGeocoder {
            result: Ok(Some(location())),
        });

        let outcome = coord.submit("Oslo").await;
        let report = outcome.report().expect("success");
        assert_eq!(report.location, location());
        assert_eq!(report.current.temperature_c, 59.91);
        assert_eq!(report.timezone, "GMT");
        assert_eq!(coord.state(), outcome);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resolver_failure_skips_fetch() {
        let (coord, source) = coordinator(StubGeocoder {
            result: Err(ErrorKind::network("offline")),
        });

        let outcome = coord.submit("Oslo").await;
        assert!(matches!(outcome, QueryState::Failure(ErrorKind::NetworkError { .. })));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_replaces_previous_success() {
        let (coord, _) = coordinator(StubGeocoder {
            result: Ok(Some(location())),
        });
        coord.submit("Oslo").await;
        assert!(coord.state().report().is_some());

        let outcome = coord.submit("   ").await;
        assert_eq!(outcome, QueryState::Failure(ErrorKind::EmptyInput));
        assert_eq!(coord.state(), QueryState::Failure(ErrorKind::EmptyInput));
        assert!(coord.state().report().is_none());
    }

    #[tokio::test]
    async fn reset_returns_to_idle() {
        let (coord, _) = coordinator(StubGeocoder { result: Ok(None) });
        coord.submit("nowhere").await;
        assert!(coord.state().error().is_some());

        coord.reset();
        assert_eq!(coord.state(), QueryState::Idle);
    }

    #[tokio::test]
    async fn subscribers_see_loading_then_outcome() {
        let (coord, _) = coordinator(StubGeocoder {
            result: Ok(Some(location())),
        });
        let mut rx = coord.subscribe();

        coord.submit("Oslo").await;
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_settled());
    }

    #[test]
    fn stale_outcome_is_not_published() {
        let (coord, _) = coordinator(StubGeocoder { result: Ok(None) });
        coord.generation.store(5, Ordering::SeqCst);
        coord.state.send_replace(QueryState::Loading);

        coord.publish_if_current(4, QueryState::Failure(ErrorKind::EmptyInput));
        assert_eq!(coord.state(), QueryState::Loading);

        coord.publish_if_current(5, QueryState::Failure(ErrorKind::EmptyInput));
        assert_eq!(coord.state(), QueryState::Failure(ErrorKind::EmptyInput));
    }
}
