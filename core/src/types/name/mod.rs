use nutype::nutype;

pub const MAX_USERNAME_LENGTH: usize = 64;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_TITLE_LENGTH: usize = 200;

/// Registry key of a user. Compared exactly, so `Alice` and `alice` are distinct.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = MAX_USERNAME_LENGTH),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Hash,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct Username(String);

/// Contact address of a user, stored lowercased.
#[nutype(
    sanitize(trim, lowercase),
    validate(
        not_empty,
        len_char_max = MAX_EMAIL_LENGTH,
        predicate = |s: &str| s.contains('@')
    ),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Hash,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct Email(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = MAX_TITLE_LENGTH),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct Title(String);
