//! Shared test utilities for reg-db unit tests.
