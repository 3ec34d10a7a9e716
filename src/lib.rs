//! Content-based movie recommendations over precomputed similarity artifacts,
//! with poster thumbnails from TMDB.
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod middleware;
pub mod models;
pub mod services;
