//! Request construction errors.

use thiserror::Error;

/// A request could not be built, so nothing was sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    /// Neither the descriptor URL nor the derived endpoint is usable.
    #[error("No resolvable URL for locale {locale}")]
    UnresolvableLocaleUrl {
        /// Locale tag the request was meant for
        locale: String,
    },

    /// A configured endpoint does not form a valid URL.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}
