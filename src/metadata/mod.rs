//! Client side of the CloudStack instance metadata service.
//!
//! Every field lives at `<endpoint>/latest/<field-name>` and is answered with
//! a plain text body.

pub mod client;
pub mod endpoint;
pub mod field;
pub mod record;
pub mod source;

pub use client::MetadataClient;
pub use endpoint::Endpoint;
pub use field::MetadataField;
pub use record::MetadataRecord;
pub use source::{HttpSource, MetadataSource};
