//! Client for the hosted facts board.
//!
//! The board lives behind a PostgREST-style REST endpoint: a single `facts`
//! table exposed at `/rest/v1/facts` with filtering, ordering and row limits
//! expressed in the query string. This module owns the wire model
//! ([`Fact`], [`NewFact`], [`VoteColumn`]) and the HTTP client
//! ([`StoreClient`]) that speaks that dialect.
//!
//! Every operation is a single request with a hard timeout and no retry.
//! A failed call reports exactly one [`StoreError`] and the caller decides
//! what the UI does with it.

mod client;
mod types;

pub use client::{StoreClient, StoreConfig, StoreError};
pub use types::{Fact, NewFact, VoteColumn};
