//! User-facing failure catalog.
//!
//! Every way a request can be refused with a human-readable explanation is a
//! variant of [`Failure`]. A variant is constructed eagerly at the point the
//! business-rule violation is detected and rendered exactly once later, when
//! a translator for the response locale is available. Rendering substitutes
//! positional arguments into the (possibly translated) template; nothing is
//! evaluated lazily.
//!
//! Status codes are fixed per variant family and mapped in the HTTP adapter
//! (`inbound::http::error`): 400 for validation, 403 for authorisation, 503
//! for unavailable dependencies, 500 for failed transfers.

use std::fmt;

use crate::domain::translate::{NoTranslation, Translate};

/// Minimum accepted password length.
pub const PASSWORD_MIN_SIZE: usize = 8;
/// Maximum accepted password length.
pub const PASSWORD_MAX_SIZE: usize = 150;
/// Maximum accepted username length.
pub const USERNAME_MAX_SIZE: usize = 32;

/// Donation schedule, with per-period amount limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DonationPeriod {
    Weekly,
    Monthly,
    Yearly,
}

impl DonationPeriod {
    /// Inclusive (min, max) donation amounts for this period, as rendered in
    /// messages.
    #[must_use]
    pub const fn limits(self) -> (&'static str, &'static str) {
        match self {
            Self::Weekly => ("0.01", "100.00"),
            Self::Monthly => ("0.04", "433.33"),
            Self::Yearly => ("0.52", "5200.00"),
        }
    }

    const fn bad_amount_template(self) -> &'static str {
        match self {
            Self::Weekly => "'{0}' is not a valid weekly donation amount (min={1}, max={2})",
            Self::Monthly => "'{0}' is not a valid monthly donation amount (min={1}, max={2})",
            Self::Yearly => "'{0}' is not a valid yearly donation amount (min={1}, max={2})",
        }
    }
}

impl fmt::Display for DonationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

/// The closed set of user-facing failures.
///
/// ## Invariants
/// - Each variant maps to exactly one HTTP status code and one message
///   template.
/// - Values are consumed once by the response layer and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    // Username validation (400).
    UsernameIsEmpty,
    UsernameTooLong { username: String },
    UsernameContainsInvalidCharacters { username: String },
    UsernameIsRestricted { username: String },
    UsernameAlreadyTaken { username: String },

    // Email validation (400).
    EmailAlreadyTaken { email: String },
    CannotRemovePrimaryEmail,
    EmailNotVerified { email: String },
    TooManyEmailAddresses,
    BadEmailAddress { email: String },

    // Password validation (400).
    BadPasswordSize,

    // Donations (400).
    NoSelfTipping,
    NoTippee { username: String },
    BadAmount { amount: String, period: DonationPeriod },
    UserDoesntAcceptTips { username: String },

    // Miscellaneous validation (400).
    NonexistingElsewhere,
    NegativeBalance,
    NotEnoughWithdrawableMoney { limit: String },
    FeeExceedsAmount,
    InvalidNumber { value: String },
    CommunityAlreadyExists { name: String },
    InvalidCommunityName { name: String },

    // Authorisation (403).
    AuthRequired,
    LoginRequired,
    AccountSuspended,

    // Unavailable dependencies (503).
    NeedDatabase,
    PaydayIsRunning,

    // Internal transfer failure (500). The underlying message is embedded
    // in the user-facing text by design.
    TransferError { message: String },
}

impl Failure {
    /// Render the localized message for this failure.
    ///
    /// Two-phase contract: the variant was constructed eagerly where the
    /// violation was detected; this resolves the template through
    /// `translator` and substitutes the positional arguments.
    pub fn render(&self, translator: &dyn Translate) -> String {
        let (template, args) = self.message_parts();
        fill(&translator.message(template), &args)
    }

    /// HTML template hint for non-JSON responses, when the page renderer
    /// has a dedicated template for this failure.
    #[must_use]
    pub const fn template(&self) -> Option<&'static str> {
        match self {
            Self::AuthRequired => Some("auth-required"),
            Self::LoginRequired => Some("log-in-required"),
            Self::NeedDatabase => Some("no-db"),
            _ => None,
        }
    }

    fn message_parts(&self) -> (&'static str, Vec<String>) {
        match self {
            Self::UsernameIsEmpty => ("You need to provide a username!", vec![]),
            Self::UsernameTooLong { username } => {
                ("The username '{0}' is too long.", vec![username.clone()])
            }
            Self::UsernameContainsInvalidCharacters { username } => (
                "The username '{0}' contains invalid characters.",
                vec![username.clone()],
            ),
            Self::UsernameIsRestricted { username } => {
                ("The username '{0}' is restricted.", vec![username.clone()])
            }
            Self::UsernameAlreadyTaken { username } => (
                "The username '{0}' is already taken.",
                vec![username.clone()],
            ),
            Self::EmailAlreadyTaken { email } => (
                "{0} is already connected to a different account.",
                vec![email.clone()],
            ),
            Self::CannotRemovePrimaryEmail => {
                ("You cannot remove your primary email address.", vec![])
            }
            Self::EmailNotVerified { email } => (
                "The email address '{0}' is not verified.",
                vec![email.clone()],
            ),
            Self::TooManyEmailAddresses => (
                "You've reached the maximum number of email addresses we allow.",
                vec![],
            ),
            Self::BadEmailAddress { email } => {
                ("'{0}' is not a valid email address.", vec![email.clone()])
            }
            Self::BadPasswordSize => (
                "The password must be at least {0} and at most {1} characters long.",
                vec![PASSWORD_MIN_SIZE.to_string(), PASSWORD_MAX_SIZE.to_string()],
            ),
            Self::NoSelfTipping => ("You can't donate to yourself.", vec![]),
            Self::NoTippee { username } => {
                ("There is no user named {0}.", vec![username.clone()])
            }
            Self::BadAmount { amount, period } => {
                let (min, max) = period.limits();
                (
                    period.bad_amount_template(),
                    vec![amount.clone(), min.to_owned(), max.to_owned()],
                )
            }
            Self::UserDoesntAcceptTips { username } => (
                "The user {0} doesn't accept donations.",
                vec![username.clone()],
            ),
            Self::NonexistingElsewhere => (
                "It seems you're trying to delete something that doesn't exist.",
                vec![],
            ),
            Self::NegativeBalance => ("There isn't enough money in your wallet.", vec![]),
            Self::NotEnoughWithdrawableMoney { limit } => (
                "You can't withdraw more than {0} at this time.",
                vec![limit.clone()],
            ),
            Self::FeeExceedsAmount => {
                ("The transaction's fee would exceed its amount.", vec![])
            }
            Self::InvalidNumber { value } => {
                ("\"{0}\" is not a valid number.", vec![value.clone()])
            }
            Self::CommunityAlreadyExists { name } => {
                ("The \"{0}\" community already exists.", vec![name.clone()])
            }
            Self::InvalidCommunityName { name } => {
                ("\"{0}\" is not a valid community name.", vec![name.clone()])
            }
            Self::AuthRequired => ("You need to sign in first", vec![]),
            Self::LoginRequired => ("You need to log in", vec![]),
            Self::AccountSuspended => (
                "You are not allowed to do this because your account is currently suspended.",
                vec![],
            ),
            Self::NeedDatabase => (
                "We're unable to process your request right now, sorry.",
                vec![],
            ),
            Self::PaydayIsRunning => (
                "Sorry, we're running payday right now, and we're not set up to do \
                 payouts while payday is running. Please check back in a few hours.",
                vec![],
            ),
            Self::TransferError { message } => (
                "Transferring the money failed, sorry. Please contact support if \
                 the problem persists. Error message: {0}",
                vec![message.clone()],
            ),
        }
    }
}

/// Substitute positional `{0}`/`{1}`/`{2}` placeholders.
///
/// Single pass over the template: substituted arguments are emitted
/// verbatim and never rescanned for placeholders. A placeholder without a
/// matching argument stays in the output, surplus arguments are ignored.
fn fill(template: &str, args: &[String]) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let (literal, tail) = rest.split_at(start);
        message.push_str(literal);
        match tail.find('}') {
            Some(end) => {
                let placeholder = &tail[..=end];
                match placeholder
                    .trim_start_matches('{')
                    .trim_end_matches('}')
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| args.get(index))
                {
                    Some(arg) => message.push_str(arg),
                    None => message.push_str(placeholder),
                }
                rest = &tail[end + 1..];
            }
            None => {
                message.push_str(tail);
                return message;
            }
        }
    }
    message.push_str(rest);
    message
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&NoTranslation))
    }
}

impl std::error::Error for Failure {}

#[cfg(test)]
mod tests;
