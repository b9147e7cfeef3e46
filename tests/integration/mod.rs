//! Integration test modules.

mod replay_test;
