//! SSE (Server-Sent Events) module for client subscriptions
//!
//! Each endpoint opens one topic bus subscription for the lifetime of the
//! HTTP connection.
//!
//! ## Endpoints
//! - `GET /api/subscribe/tables/:table_id` - Membership lists
//! - `GET /api/subscribe/chat/:event_id/:table_id` - Chat messages
//! - `GET /api/subscribe/surveys/:survey_id` - Survey objects

pub mod handler;
