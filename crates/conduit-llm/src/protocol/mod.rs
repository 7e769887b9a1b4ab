//! Wire format types for vendor chat APIs
//!
//! Each module contains pure serde structs matching the vendor's JSON format.
//! These types only exist at the HTTP boundary; the rest of the crate works
//! with the canonical types.

pub mod openai;
pub mod watsonx;
