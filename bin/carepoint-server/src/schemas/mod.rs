//! Request / response bodies for the `/api` routes.
//!
//! Field names follow the web client's camelCase JSON except where the
//! upstream shape is passed through unchanged (`place_id`).

pub mod auth;
pub mod generate;
pub mod history;
pub mod hospital;
