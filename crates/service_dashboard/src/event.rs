//! Events delivered to the UI loop by background tasks.

use adapter_api::feed::FeedUpdate;
use adapter_api::search_driver::SearchUpdate;
use chrono::{DateTime, Utc};
use targeting_core::types::{
    Assumption, BdaReport, BdaVersion, DecisionGate, RoeRule, Target, Unit,
};

/// Message from a feed, the search driver or a finished action
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Decision gate feed
    Gates(FeedUpdate<Vec<DecisionGate>>),
    /// Target list feed
    Targets(FeedUpdate<Vec<Target>>),
    /// ORBAT feed
    Units(FeedUpdate<Vec<Unit>>),
    /// BDA report feed
    Reports(FeedUpdate<Vec<BdaReport>>),
    /// Assumption feed
    Assumptions(FeedUpdate<Vec<Assumption>>),
    /// ROE rule feed
    RoeRules(FeedUpdate<Vec<RoeRule>>),
    /// Version history for one report
    History {
        /// Report the history belongs to
        report_id: String,
        /// Versions, oldest first
        update: FeedUpdate<Vec<BdaVersion>>,
    },
    /// Quick search results
    Search(SearchUpdate),
    /// The backend accepted a target change
    TargetChanged(Target),
    /// The backend accepted an assumption change
    AssumptionChanged(Assumption),
    /// A requested action failed
    ActionFailed(String),
}

/// A view's data with its fetch state.
///
/// Starts out holding sample data. A failed fetch keeps whatever was shown
/// before and records the error for inline display.
#[derive(Debug, Clone, PartialEq)]
pub struct Loadable<T> {
    /// Data to display
    pub data: T,
    /// Whether `data` came from the backend
    pub live: bool,
    /// Error from the most recent fetch, if it failed
    pub error: Option<String>,
    /// Time of the last successful fetch
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Loadable<T> {
    /// Wrap sample data
    pub fn sample(data: T) -> Self {
        Self {
            data,
            live: false,
            error: None,
            updated_at: None,
        }
    }

    /// Apply a feed update. Returns true if the data was replaced.
    pub fn apply(&mut self, update: FeedUpdate<T>) -> bool {
        match update {
            FeedUpdate::Loaded(data) => {
                self.data = data;
                self.live = true;
                self.error = None;
                self.updated_at = Some(Utc::now());
                true
            }
            FeedUpdate::Failed(message) => {
                self.error = Some(message);
                false
            }
        }
    }

    /// Short source label for panel titles
    pub fn source_label(&self) -> &'static str {
        match (self.live, self.error.is_some()) {
            (true, false) => "LIVE",
            (true, true) => "STALE",
            (false, _) => "SAMPLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_keeps_sample_data() {
        let mut view = Loadable::sample(vec![1, 2]);
        assert!(!view.apply(FeedUpdate::Failed("offline".to_string())));
        assert_eq!(view.data, vec![1, 2]);
        assert_eq!(view.error.as_deref(), Some("offline"));
        assert_eq!(view.source_label(), "SAMPLE");
    }

    #[test]
    fn test_failure_after_load_keeps_last_good() {
        let mut view = Loadable::sample(vec![1]);
        assert!(view.apply(FeedUpdate::Loaded(vec![7, 8, 9])));
        assert_eq!(view.source_label(), "LIVE");

        view.apply(FeedUpdate::Failed("Request failed with status 502".to_string()));
        assert_eq!(view.data, vec![7, 8, 9]);
        assert_eq!(view.source_label(), "STALE");

        view.apply(FeedUpdate::Loaded(vec![]));
        assert!(view.error.is_none());
    }
}
