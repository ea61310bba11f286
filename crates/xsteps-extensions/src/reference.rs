//! Conan package reference syntax.
//!
//! A reference is `name[/version][@[user/channel]]`, for example
//! `cmake/3.22.0`, `cmake/3.22.0@` or `zlib/1.2.13@acme/stable`.

use regex::Regex;
use std::sync::LazyLock;

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    const TOKEN: &str = r"[A-Za-z0-9_][A-Za-z0-9_.+-]*";
    Regex::new(&format!(r"^{TOKEN}(?:/{TOKEN})?(?:@(?:{TOKEN}/{TOKEN})?)?$"))
        .expect("Invalid package reference regex")
});

/// Check that `reference` is a syntactically valid Conan reference.
pub fn is_valid(reference: &str) -> bool {
    REFERENCE.is_match(reference)
}

/// The reference as Conan's command line expects it.
///
/// References without a user/channel part get a trailing `@`; otherwise
/// `conan install cmake/3.22.0` would be read as a path.
pub fn qualified(reference: &str) -> String {
    if reference.contains('@') {
        reference.to_string()
    } else {
        format!("{reference}@")
    }
}

/// The recipe id Conan reports in search results.
///
/// Search output lists `cmake/3.22.0` for the `cmake/3.22.0@` reference.
pub fn recipe_id(reference: &str) -> &str {
    reference.strip_suffix('@').unwrap_or(reference)
}
