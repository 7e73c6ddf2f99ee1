// Evently core - client-side tracking and recommendation retrieval
//
// This crate holds everything that is independent of the storage backend:
// - Domain types (interactions, sessions, recommendations)
// - The EventsBackend trait that storage implementations plug into
// - The tracking layer itself (fire-and-forget policy lives here)

pub mod error;
pub mod recommender;
pub mod session;
pub mod tracker;
pub mod traits;
pub mod types;
pub mod view_timer;

pub use error::{Result, TrackingError};
pub use recommender::Recommender;
pub use session::SessionTracker;
pub use tracker::InteractionTracker;
pub use traits::EventsBackend;
pub use types::{
    DeviceInfo, Interaction, InteractionKind, Recommendation, SearchBehavior, Session,
    SessionUpdate, SimilarEvent,
};
pub use view_timer::ViewTimer;

#[cfg(test)]
pub(crate) mod test_support;
