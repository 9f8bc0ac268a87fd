//! Authorization and visibility filtering

pub mod policy;
pub mod visibility;

pub use policy::{authorize, ensure, Action, AuthContext, Verdict};
pub use visibility::{check_submission_scope, is_visible, listing_filter, ListingRequest};
