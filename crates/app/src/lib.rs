//! Entity Bridge App - lets callers work with facade entities while a
//! differently shaped backing repository does the persisting.

pub mod application;
