//! # VitalSync Client
//!
//! Core client for the VitalSync realtime recommendation service:
//! connection supervision with reconnect backoff, activity telemetry,
//! and typed dispatch of server pushes.
//!
//! ## Architecture
//!
//! - [`Client`]: cloneable handle to a supervised connection
//! - [`ActivityRelay`]: classifies user interactions and relays them
//! - [`UpdateDispatcher`]: routes inbound events to registered handlers
//! - [`SuggestionRequester`]: debounces search suggestion queries
//! - [`render`]: pure transforms from payloads to view models
//!
//! ## Example
//!
//! ```no_run
//! use vitalsync_client::{Client, ClientConfig};
//!
//! # async fn run() {
//! let client = Client::new(ClientConfig::new("ws://localhost:8765/ws"));
//! client.dispatcher().on_recommendations(|update| {
//!     for rec in &update.ai_recommendations {
//!         println!("{}: {}", rec.category, rec.title);
//!     }
//! });
//! client.connect().unwrap();
//! # }
//! ```

pub mod backoff;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod metrics;
pub mod relay;
pub mod render;
pub mod search;
pub mod state;

pub use backoff::ReconnectPolicy;
pub use client::{Client, ClientError};
pub use config::{ClientConfig, ReconnectConfig};
pub use dispatch::UpdateDispatcher;
pub use relay::{classify, ActivityRelay, Interaction, InteractionMarkers};
pub use render::{QuickRecommendationRow, RecommendationCard, SuggestionEntry};
pub use search::SuggestionRequester;
pub use state::{ConnectionState, ConnectionStatus};
