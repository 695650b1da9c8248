//! # tabledit
//!
//! Inserts rows and columns into tables embedded in Word (`.docx`) documents.
//! The table markup has no native insert-row/insert-column primitive, so an
//! edit rebuilds the table: a blank grid of the target dimensions is filled
//! by remapping every destination cell back to a source cell, new cells get
//! placeholder text, and the rebuilt table replaces the original in the
//! document body. Untouched body content round-trips byte-for-byte.
//!
//! ## Modules
//!
//! - [`document`]: DOCX package access and the body/table/cell model
//! - [`editor`]: the row/column insertion transform
//! - [`prompt`]: the interactive per-table dialogue
//! - [`app`]: the load, edit, save process flow

pub mod app;
pub mod document;
pub mod editor;
pub mod error;
pub mod helpers;
pub mod prompt;
