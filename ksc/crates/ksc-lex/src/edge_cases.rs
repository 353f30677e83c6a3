//! Edge case tests for ksc-lex.
