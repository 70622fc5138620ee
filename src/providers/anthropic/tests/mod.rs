//! Tests for the Anthropic handler internals
//!
//! HTTP behaviour is covered in tests/anthropic_handler.rs against a mock
//! server; these tests stay pure.
