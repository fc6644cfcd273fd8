//! [`User`] definitions.

pub mod session;

use std::{str::FromStr, sync::LazyLock};

use common::define_kind;
use derive_more::{AsRef, Display};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret, ExposeSecret as _, SecretBox};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq as _;

pub use self::session::Session;

/// Known user allowed to sign into the admin area.
///
/// [`User`]s are static for the whole process lifetime: there is no way to
/// create, update or delete them at runtime.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// Display [`Name`] of this [`User`].
    pub name: Name,

    /// [`Role`] of this [`User`].
    pub role: Role,

    /// [`Password`] of this [`User`].
    ///
    /// Stored as is, without any hashing.
    pub password: SecretBox<Password>,
}

impl User {
    /// Checks whether this [`User`] is the one the provided [`Identity`]
    /// refers to, either by its [`Id`] or by its [`Email`].
    #[must_use]
    pub fn is_identified_by(&self, identity: &Identity) -> bool {
        let identity = identity.as_ref();
        self.id.as_ref() == identity
            || self.email.as_ref().eq_ignore_ascii_case(identity)
    }

    /// Checks whether the provided [`Password`] matches the one of this
    /// [`User`].
    #[must_use]
    pub fn has_password(&self, password: &Password) -> bool {
        self.password.expose_secret() == password
    }
}

/// ID of a [`User`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(str)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Creates a new [`Id`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`Id`].
    fn check(id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        id.trim() == id && !id.is_empty() && id.len() <= 128
    }
}

impl FromStr for Id {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Id`")
    }
}

/// Name of a [`User`] displayed in the admin area.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[as_ref(str)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Email address of a [`User`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[as_ref(str)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                "^([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                  |\\x5c[\\x00-\\x7f])*\\x22)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x22))*\\x40\
                  ([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d))*$",
            )
            .expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Identity a [`User`] signs in with: either its [`Id`] or its [`Email`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Identity(String);

impl Identity {
    /// Creates a new [`Identity`] if the given `identity` is not blank.
    #[must_use]
    pub fn new(identity: impl AsRef<str>) -> Option<Self> {
        let identity = identity.as_ref().trim();
        (!identity.is_empty()).then(|| Self(identity.to_owned()))
    }
}

impl FromStr for Identity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Identity`")
    }
}

/// Password of a [`User`].
///
/// Compared in constant time.
#[derive(Clone, Debug)]
pub struct Password(String);

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl Eq for Password {}

impl Password {
    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        !password.is_empty() && password.len() <= 128
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

define_kind! {
    #[doc = "Role of a `User`."]
    enum Role {
        #[doc = "Administrator managing the site content."]
        Admin = 1,

        #[doc = "Regular user."]
        User = 2,
    }
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use super::{Email, Id, Identity, Name, Password, Role, User};

    fn user() -> User {
        User {
            id: Id::new("1").unwrap(),
            email: Email::new("admin@institute.test").unwrap(),
            name: Name::new("Admin").unwrap(),
            role: Role::Admin,
            password: SecretBox::new(Box::new(
                Password::new("admin123").unwrap(),
            )),
        }
    }

    #[test]
    fn identified_by_id_or_email() {
        let user = user();

        assert!(user.is_identified_by(&Identity::new("1").unwrap()));
        assert!(user.is_identified_by(
            &Identity::new("admin@institute.test").unwrap()
        ));
        assert!(user.is_identified_by(
            &Identity::new(" Admin@Institute.test ").unwrap()
        ));
        assert!(!user.is_identified_by(&Identity::new("2").unwrap()));
        assert!(!user.is_identified_by(&Identity::new("Admin").unwrap()));
    }

    #[test]
    fn checks_password() {
        let user = user();

        assert!(user.has_password(&Password::new("admin123").unwrap()));
        assert!(!user.has_password(&Password::new("admin1234").unwrap()));
        assert!(!user.has_password(&Password::new("admin12").unwrap()));
        assert!(!user.has_password(&Password::new("Admin123").unwrap()));
    }

    #[test]
    fn validates_fields() {
        assert!(Id::new("").is_none());
        assert!(Id::new(" 1").is_none());
        assert!(Name::new("  ").is_none());
        assert!(Email::new("not-an-email").is_none());
        assert!(Email::new("a@b.c").is_some());
        assert!(Password::new("").is_none());
        assert!(Password::new("x".repeat(129)).is_none());
        assert!(Identity::new("   ").is_none());
    }

    #[test]
    fn parses_role() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "ADMIN");
    }
}
