//! Marquee
//!
//! Marquee is the promotion storefront core for a cinema ticketing client: it
//! canonicalises backend promotion payloads, quotes percentage and fixed-amount
//! discounts, derives redemption eligibility from usage counters, and decides
//! route access for the platform's role taxonomy.
//!
//! All authoritative state (pricing, seat locking, payment, redemption) lives
//! in the remote backend; everything computed here is an advisory overlay on a
//! fetched snapshot.

pub mod access;
pub mod client;
pub mod config;
pub mod discounts;
pub mod money;
pub mod observability;
pub mod poll;
pub mod promotions;
pub mod usage;
