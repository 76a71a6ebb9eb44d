//! Domain logic for the movie catalog.
//!
//! Everything in this crate is infrastructure-free: the genre bitflag codec,
//! search parameter validation, query planning, pagination and response
//! assembly. Storage is reached only through the [`store::MovieStore`] trait,
//! so the same pipeline runs against PostgreSQL in production and against
//! [`store::MemoryMovieStore`] in tests.

pub mod catalog;
pub mod error;
pub mod genre;
pub mod movie;
pub mod query;
pub mod search;
pub mod store;
pub mod types;
