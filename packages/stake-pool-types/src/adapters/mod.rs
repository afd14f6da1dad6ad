//! Thin typed wrappers around the engine's external collaborators: a small struct wrapping the
//! collaborator's identity, with methods that build typed outbound messages instead of reaching
//! for ad hoc string formatting at each call site.

mod amm;
mod mint_policy;
mod treasury;

pub use amm::Amm;
pub use mint_policy::MintPolicy;
pub use treasury::Treasury;
