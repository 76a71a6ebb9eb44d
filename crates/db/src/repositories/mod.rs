//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` (or any executor) as the first argument.

pub mod movie_repo;

pub use movie_repo::MovieRepo;
