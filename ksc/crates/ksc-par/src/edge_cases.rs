//! Edge case tests for ksc-par.
