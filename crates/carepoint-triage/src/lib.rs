//! Text processing behind the carepoint symptom-intake service.
//!
//! Nothing in this crate performs I/O. The server assembles a prompt with
//! [`prompt::assemble`], sends it to the model, decodes the reply with
//! [`Assessment::from_reply`], files the exchange under the specialty from
//! [`categorize`], and derives lookup keys for the hospital and drug-label
//! searches with [`hospital::search_term`] and [`medication::lookup_term`].

pub mod categorize;
pub mod hospital;
pub mod medication;
pub mod prompt;
pub mod reply;

pub use categorize::{categorize, Specialty};
pub use prompt::HistoryExcerpt;
pub use reply::{parse_labeled, Assessment, Field};
