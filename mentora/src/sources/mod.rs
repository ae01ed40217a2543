//! Candidate sources and their external collaborators
//!
//! Three source variants feed the aggregator: [`GeneratedSource`] (text
//! completion), [`ScrapedSource`] (catalog scrapers), and [`MatchedSource`]
//! (embedding index). Each is fault-isolated: a failing source degrades
//! into an empty batch plus a warning at the service boundary, never an
//! aborted request.

mod catalog;
mod generated;
mod matched;
mod notify;
mod scraped;
mod traits;

pub use catalog::CourseraCatalogScraper;
pub use generated::GeneratedSource;
pub use matched::MatchedSource;
pub use notify::WebhookNotifier;
pub use scraped::ScrapedSource;
pub use traits::{
    CatalogScraper, NotificationSender, SearchConstraints, SourceError, TextCompletion,
};

#[cfg(test)]
pub use traits::{MockCatalogScraper, MockNotificationSender, MockTextCompletion};
