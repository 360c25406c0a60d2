//! Helpers shared by unit tests.
