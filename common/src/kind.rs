//! Macros for defining kind enums.

/// Macro for defining a closed set of named values.
///
/// The generated enum is (de)serialized and displayed in
/// `SCREAMING_SNAKE_CASE`, and parsed case-insensitively.
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
///
/// define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube"]
///         Cube = 1,
///
///         #[doc = "A sphere"]
///         Sphere = 2,
///     }
/// }
///
/// assert_eq!(Kind::Cube.to_string(), "CUBE");
/// assert_eq!("sphere".parse::<Kind>(), Ok(Kind::Sphere));
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
            $crate::private::serde::Deserialize,
            $crate::private::serde::Serialize,
        )]
        #[serde(
            crate = "::common::private::serde",
            rename_all = "SCREAMING_SNAKE_CASE",
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[strum(
            crate = "::common::private::strum",
            serialize_all = "SCREAMING_SNAKE_CASE",
            ascii_case_insensitive,
        )]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant = $value,
            )*
        }
    };
}
