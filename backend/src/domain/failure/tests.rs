//! Unit tests for failure rendering.

use std::borrow::Cow;

use rstest::rstest;

use super::*;

/// Translator with a one-entry catalogue, to prove rendering is two-phase:
/// the same variant renders differently per translator.
struct FrenchUsernames;

impl Translate for FrenchUsernames {
    fn message(&self, template: &'static str) -> Cow<'_, str> {
        if template == "The username '{0}' is too long." {
            Cow::Borrowed("Le nom d'utilisateur '{0}' est trop long.")
        } else {
            Cow::Borrowed(template)
        }
    }
}

#[rstest]
fn over_length_username_renders_the_offending_literal() {
    let failure = Failure::UsernameTooLong {
        username: "this_is_too_long_123456789".to_owned(),
    };
    let message = failure.render(&NoTranslation);
    assert!(message.contains("this_is_too_long_123456789"), "{message}");
}

#[rstest]
fn the_same_variant_renders_in_multiple_locales() {
    let failure = Failure::UsernameTooLong {
        username: "jeanne".to_owned(),
    };
    assert_eq!(
        failure.render(&NoTranslation),
        "The username 'jeanne' is too long."
    );
    assert_eq!(
        failure.render(&FrenchUsernames),
        "Le nom d'utilisateur 'jeanne' est trop long."
    );
}

#[rstest]
fn bad_password_size_renders_the_bounds() {
    let message = Failure::BadPasswordSize.render(&NoTranslation);
    assert_eq!(
        message,
        "The password must be at least 8 and at most 150 characters long."
    );
}

#[rstest]
#[case(DonationPeriod::Weekly, "'x' is not a valid weekly donation amount (min=0.01, max=100.00)")]
#[case(
    DonationPeriod::Monthly,
    "'x' is not a valid monthly donation amount (min=0.04, max=433.33)"
)]
#[case(
    DonationPeriod::Yearly,
    "'x' is not a valid yearly donation amount (min=0.52, max=5200.00)"
)]
fn bad_amount_renders_period_limits(#[case] period: DonationPeriod, #[case] expected: &str) {
    let failure = Failure::BadAmount {
        amount: "x".to_owned(),
        period,
    };
    assert_eq!(failure.render(&NoTranslation), expected);
}

#[rstest]
fn transfer_error_embeds_the_underlying_message() {
    let failure = Failure::TransferError {
        message: "upstream timed out".to_owned(),
    };
    let message = failure.render(&NoTranslation);
    assert!(message.ends_with("Error message: upstream timed out"), "{message}");
}

#[rstest]
#[case(Failure::AuthRequired, Some("auth-required"))]
#[case(Failure::LoginRequired, Some("log-in-required"))]
#[case(Failure::NeedDatabase, Some("no-db"))]
#[case(Failure::NoSelfTipping, None)]
fn template_hints_cover_the_dedicated_pages(
    #[case] failure: Failure,
    #[case] expected: Option<&str>,
) {
    assert_eq!(failure.template(), expected);
}

#[rstest]
fn display_matches_untranslated_rendering() {
    let failure = Failure::NoTippee {
        username: "ghost".to_owned(),
    };
    assert_eq!(failure.to_string(), "There is no user named ghost.");
}

#[rstest]
fn arguments_are_never_rescanned_for_placeholders() {
    // A user-supplied amount that looks like a placeholder must come out
    // verbatim, not swallow the template's own later placeholders.
    let failure = Failure::BadAmount {
        amount: "{1}".to_owned(),
        period: DonationPeriod::Weekly,
    };
    assert_eq!(
        failure.render(&NoTranslation),
        "'{1}' is not a valid weekly donation amount (min=0.01, max=100.00)"
    );
    assert_eq!(
        fill("{0} then {1}", &["{1}".to_owned(), "x".to_owned()]),
        "{1} then x"
    );
}

#[rstest]
fn surplus_placeholders_survive_substitution() {
    // Argument validation is implicit; a missing argument leaves the
    // placeholder visible rather than panicking.
    assert_eq!(fill("{0} and {1}", &["only".to_owned()]), "only and {1}");
}
