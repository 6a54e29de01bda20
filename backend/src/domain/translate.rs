//! Localisation seam for failure messages.
//!
//! Failure variants carry English message templates; a [`Translate`]
//! implementation swaps the template for a localized form at render time.
//! Translation data itself lives outside this crate, so the trait only deals
//! in template strings and the positional `{0}`/`{1}` placeholders survive
//! translation untouched.

use std::borrow::Cow;

/// Resolve a message template to its localized form.
///
/// Implementations look the template up in their catalogue and return it
/// verbatim when no translation exists. The same failure value can be
/// rendered through different translators, once per locale.
pub trait Translate {
    /// Return the localized form of `template`, or the template itself when
    /// no translation is available.
    fn message(&self, template: &'static str) -> Cow<'_, str>;
}

/// Identity translator: every template renders as its English source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslation;

impl Translate for NoTranslation {
    fn message(&self, template: &'static str) -> Cow<'_, str> {
        Cow::Borrowed(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn no_translation_returns_template_verbatim() {
        let template = "The username '{0}' is too long.";
        assert_eq!(NoTranslation.message(template), template);
    }
}
