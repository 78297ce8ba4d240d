//! The formatting pipeline: extract text from the upload, segment it into
//! résumé sections, and populate the styled output template.

pub mod extract;
pub mod handlers;
pub mod populate;
pub mod sections;
