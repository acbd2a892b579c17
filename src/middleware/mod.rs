//! Request extractors: the claimed identity headers and the JSON body.

pub mod identity;
pub mod json_body;

pub use identity::ActingIdentity;
pub use json_body::JsonBody;
