//! Catalogs returned by an external event feed.
//!
//! The feed's query logic lives outside this crate. Conversion consumes only
//! the six fields of [`FeedEvent`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use quake_types::{
    epoch_seconds, CanonicalRecord, CatalogError, CatalogResult, Event, SourceFormat,
};

use crate::source::{retain_by_mask, CatalogSource};

const SECONDS_PER_YEAR: f64 = 365.25 * 86_400.0;
const MAX_WINDOW_YEARS: f64 = 10_000.0;

/// Output contract of the external feed.
pub trait FeedEvent {
    fn id(&self) -> &str;
    fn time(&self) -> DateTime<Utc>;
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;
    fn depth(&self) -> f64;
    fn magnitude(&self) -> f64;
}

impl<T: FeedEvent + ?Sized> FeedEvent for &T {
    fn id(&self) -> &str {
        (**self).id()
    }
    fn time(&self) -> DateTime<Utc> {
        (**self).time()
    }
    fn latitude(&self) -> f64 {
        (**self).latitude()
    }
    fn longitude(&self) -> f64 {
        (**self).longitude()
    }
    fn depth(&self) -> f64 {
        (**self).depth()
    }
    fn magnitude(&self) -> f64 {
        (**self).magnitude()
    }
}

/// Owned copy of a feed event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub id: String,
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64,
    pub magnitude: f64,
}

impl FeedRecord {
    pub fn from_event<E: FeedEvent>(event: &E) -> Self {
        Self {
            id: event.id().to_string(),
            time: event.time(),
            latitude: event.latitude(),
            longitude: event.longitude(),
            depth: event.depth(),
            magnitude: event.magnitude(),
        }
    }
}

impl FeedEvent for FeedRecord {
    fn id(&self) -> &str {
        &self.id
    }
    fn time(&self) -> DateTime<Utc> {
        self.time
    }
    fn latitude(&self) -> f64 {
        self.latitude
    }
    fn longitude(&self) -> f64 {
        self.longitude
    }
    fn depth(&self) -> f64 {
        self.depth
    }
    fn magnitude(&self) -> f64 {
        self.magnitude
    }
}

/// Time/space window a feed query was issued for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub min_magnitude: Option<f64>,
    pub min_latitude: Option<f64>,
    pub max_latitude: Option<f64>,
    pub min_longitude: Option<f64>,
    pub max_longitude: Option<f64>,
}

impl QueryWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> CatalogResult<Self> {
        if start > end {
            return Err(CatalogError::format(
                SourceFormat::ExternalService,
                format!("query window starts at {start} after it ends at {end}"),
            ));
        }
        Ok(Self {
            start,
            end,
            min_magnitude: None,
            min_latitude: None,
            max_latitude: None,
            min_longitude: None,
            max_longitude: None,
        })
    }

    /// Window of `years` Julian years (365.25 days) starting at `start`.
    pub fn from_duration_years(start: DateTime<Utc>, years: f64) -> CatalogResult<Self> {
        if !years.is_finite() || !(0.0..=MAX_WINDOW_YEARS).contains(&years) {
            return Err(CatalogError::format(
                SourceFormat::ExternalService,
                format!("window duration of {years} years is out of range"),
            ));
        }
        let millis = (years * SECONDS_PER_YEAR * 1_000.0).round() as i64;
        let end = start
            .checked_add_signed(Duration::milliseconds(millis))
            .ok_or_else(|| {
                CatalogError::format(
                    SourceFormat::ExternalService,
                    format!("window end {years} years after {start} is out of range"),
                )
            })?;
        Self::new(start, end)
    }

    pub fn with_min_magnitude(mut self, magnitude: f64) -> Self {
        self.min_magnitude = Some(magnitude);
        self
    }

    pub fn with_region(
        mut self,
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    ) -> Self {
        self.min_latitude = Some(min_latitude);
        self.max_latitude = Some(max_latitude);
        self.min_longitude = Some(min_longitude);
        self.max_longitude = Some(max_longitude);
        self
    }

    pub fn duration_years(&self) -> f64 {
        (epoch_seconds(&self.end) - epoch_seconds(&self.start)) / SECONDS_PER_YEAR
    }
}

/// Events retrieved from an external feed, with the window they were requested for.
#[derive(Clone, Debug, PartialEq)]
pub struct ExternalServiceCatalog {
    events: Vec<FeedRecord>,
    epoch_times: Vec<f64>,
    window: Option<QueryWindow>,
    date_accessed: DateTime<Utc>,
}

impl ExternalServiceCatalog {
    pub fn from_events<I>(events: I, window: Option<QueryWindow>) -> CatalogResult<Self>
    where
        I: IntoIterator,
        I::Item: FeedEvent,
    {
        let events: Vec<FeedRecord> = events
            .into_iter()
            .map(|e| FeedRecord::from_event(&e))
            .collect();
        for record in &events {
            let finite = [record.latitude, record.longitude, record.depth, record.magnitude]
                .iter()
                .all(|v| v.is_finite());
            if !finite {
                return Err(CatalogError::format(
                    SourceFormat::ExternalService,
                    format!("event '{}' has a non-finite coordinate, depth or magnitude", record.id),
                ));
            }
        }
        let epoch_times = events.iter().map(|e| epoch_seconds(&e.time)).collect();
        Ok(Self {
            events,
            epoch_times,
            window,
            date_accessed: Utc::now(),
        })
    }

    /// Parse a JSON array of feed events (RFC 3339 times).
    pub fn from_json(json: &str, window: Option<QueryWindow>) -> CatalogResult<Self> {
        let events: Vec<FeedRecord> = serde_json::from_str(json)
            .map_err(|e| CatalogError::format(SourceFormat::ExternalService, e.to_string()))?;
        Self::from_events(events, window)
    }

    pub fn feed_records(&self) -> &[FeedRecord] {
        &self.events
    }

    pub fn window(&self) -> Option<&QueryWindow> {
        self.window.as_ref()
    }

    pub fn date_accessed(&self) -> DateTime<Utc> {
        self.date_accessed
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .iter()
            .zip(&self.epoch_times)
            .map(|(e, &origin_time)| Event {
                longitude: e.longitude,
                latitude: e.latitude,
                origin_time,
                magnitude: e.magnitude,
                depth: e.depth,
                source_id: Some(e.id.clone()),
            })
            .collect()
    }

    pub fn datetimes(&self) -> Vec<DateTime<Utc>> {
        self.events.iter().map(|e| e.time).collect()
    }

    pub(crate) fn field_values(&self, field: &str) -> Option<Vec<f64>> {
        let values = match field {
            "origin_time" => self.epoch_times.clone(),
            "latitude" => self.latitudes(),
            "longitude" => self.longitudes(),
            "depth" => self.events.iter().map(|e| e.depth).collect(),
            "magnitude" => self.magnitudes(),
            _ => return None,
        };
        Some(values)
    }

    pub(crate) fn retain(&self, mask: &[bool]) -> Self {
        Self {
            events: retain_by_mask(&self.events, mask),
            epoch_times: retain_by_mask(&self.epoch_times, mask),
            window: self.window.clone(),
            date_accessed: self.date_accessed,
        }
    }
}

impl CatalogSource for ExternalServiceCatalog {
    fn to_canonical_form(&self) -> CatalogResult<Vec<CanonicalRecord>> {
        Ok(self
            .events
            .iter()
            .map(|e| CanonicalRecord::new(e.longitude, e.latitude, &e.time, e.magnitude, e.depth))
            .collect())
    }

    fn event_count(&self) -> usize {
        self.events.len()
    }

    fn magnitudes(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.magnitude).collect()
    }

    fn epoch_times(&self) -> Vec<f64> {
        self.epoch_times.clone()
    }

    fn latitudes(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.latitude).collect()
    }

    fn longitudes(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.longitude).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Stand-in for a feed client's event type.
    struct SummaryEvent {
        code: String,
        when: DateTime<Utc>,
        lat: f64,
        lon: f64,
        km: f64,
        mag: f64,
        #[allow(dead_code)]
        felt_reports: u32,
    }

    impl FeedEvent for SummaryEvent {
        fn id(&self) -> &str {
            &self.code
        }
        fn time(&self) -> DateTime<Utc> {
            self.when
        }
        fn latitude(&self) -> f64 {
            self.lat
        }
        fn longitude(&self) -> f64 {
            self.lon
        }
        fn depth(&self) -> f64 {
            self.km
        }
        fn magnitude(&self) -> f64 {
            self.mag
        }
    }

    fn feed() -> Vec<SummaryEvent> {
        vec![
            SummaryEvent {
                code: "ci38457511".into(),
                when: Utc.with_ymd_and_hms(2019, 7, 6, 3, 19, 53).unwrap(),
                lat: 35.7695,
                lon: -117.5993,
                km: 8.0,
                mag: 7.1,
                felt_reports: 21_000,
            },
            SummaryEvent {
                code: "ci38443183".into(),
                when: Utc.with_ymd_and_hms(2019, 7, 4, 17, 33, 49).unwrap(),
                lat: 35.7053,
                lon: -117.5038,
                km: 10.5,
                mag: 6.4,
                felt_reports: 9_000,
            },
        ]
    }

    #[test]
    fn converts_feed_events_by_contract_fields() {
        let catalog = ExternalServiceCatalog::from_events(&feed(), None).unwrap();
        assert_eq!(catalog.event_count(), 2);
        assert_eq!(catalog.feed_records()[0].id, "ci38457511");
        assert_eq!(catalog.epoch_times()[0], 1_562_383_193.0);
        assert_eq!(catalog.events()[1].source_id.as_deref(), Some("ci38443183"));

        let rows = catalog.to_canonical_form().unwrap();
        assert_eq!((rows[1].month, rows[1].day, rows[1].hour), (7, 4, 17));
        assert_eq!(rows[1].depth, 10.5);
    }

    #[test]
    fn parses_json_feed() {
        let json = r#"[{"id": "nc73201181", "time": "2019-06-23T03:53:02Z",
                        "latitude": 40.28, "longitude": -124.96, "depth": 9.9, "magnitude": 5.6}]"#;
        let catalog = ExternalServiceCatalog::from_json(json, None).unwrap();
        assert_eq!(catalog.magnitudes(), vec![5.6]);

        let missing_time = r#"[{"id": "x", "latitude": 1.0, "longitude": 1.0, "depth": 1.0, "magnitude": 1.0}]"#;
        let err = ExternalServiceCatalog::from_json(missing_time, None).unwrap_err();
        assert!(matches!(err, CatalogError::Format { format: SourceFormat::ExternalService, .. }));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut events = feed();
        events[0].mag = f64::NAN;
        assert!(ExternalServiceCatalog::from_events(events, None).is_err());
    }

    #[test]
    fn query_window_validates_order() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        assert!(QueryWindow::new(start, end).is_err());
        assert!(QueryWindow::new(end, start).is_ok());
    }

    #[test]
    fn query_window_from_duration() {
        let start = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
        let window = QueryWindow::from_duration_years(start, 1.0)
            .unwrap()
            .with_min_magnitude(2.5)
            .with_region(31.5, 43.0, -125.4, -113.1);
        assert_eq!(window.end, start + Duration::seconds(31_557_600));
        assert!((window.duration_years() - 1.0).abs() < 1e-12);
        assert_eq!(window.min_magnitude, Some(2.5));

        assert!(QueryWindow::from_duration_years(start, -1.0).is_err());
        assert!(QueryWindow::from_duration_years(start, f64::NAN).is_err());
    }

    #[test]
    fn retain_keeps_window() {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let window = QueryWindow::from_duration_years(start, 1.0).unwrap();
        let catalog = ExternalServiceCatalog::from_events(feed(), Some(window.clone())).unwrap();
        let kept = catalog.retain(&[true, false]);
        assert_eq!(kept.event_count(), 1);
        assert_eq!(kept.window(), Some(&window));
        assert_eq!(kept.date_accessed(), catalog.date_accessed());
    }
}
