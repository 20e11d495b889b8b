//! # Pipeline Test Suite
//!
//! End-to-end checks of a full request run: grid sizes, highlight matching,
//! tick plans and the CSV round trip. Most tests use a synthetic solver with a
//! known curve so expected values can be worked out by hand; the scenarios that
//! need real sunrise/sunset behavior use the SPA solver.
