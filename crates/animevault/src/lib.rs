//! AnimeVault library for browsing the MyAnimeList catalog.
//!
//! Page controllers fetch from the Jikan API v4 and render through the
//! text view layer; the vault store keeps favorites, history and
//! preferences between runs.

pub mod pages;
pub mod view;

pub use pages::detail::DetailPage;
pub use pages::home::{HomePage, HomeRequest};
pub use pages::PageState;
