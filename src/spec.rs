/// A TOML language revision, as `major.minor.patch`.
///
/// Revisions are ordered, so dialect-dependent code can ask questions like
/// `spec.version >= TomlVersion::V1_1_0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TomlVersion {
    /// Major version number.
    pub major: u32,
    /// Minor version number.
    pub minor: u32,
    /// Patch version number.
    pub patch: u32,
}

impl TomlVersion {
    /// TOML v1.0.0, the latest stable revision.
    pub const V1_0_0: TomlVersion = TomlVersion::new(1, 0, 0);

    /// TOML v1.1.0 (draft revision).
    pub const V1_1_0: TomlVersion = TomlVersion::new(1, 1, 0);

    /// Creates a new version value.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        TomlVersion {
            major,
            minor,
            patch,
        }
    }
}

impl std::fmt::Display for TomlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The dialect a document is parsed and serialized under: a [`TomlVersion`]
/// plus the set of feature flags that gate optional grammar productions and
/// library-specific extensions.
///
/// A `TomlSpec` is immutable once constructed and is only ever read during a
/// parse. The same value can be shared freely between parse calls and
/// threads.
///
/// The default spec is the latest stable revision with no extensions, i.e.
/// [`TomlSpec::v1_0`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TomlSpec {
    /// The language revision this spec corresponds to.
    pub version: TomlVersion,

    /// Allow non-tab control characters in comments (TOML v1.1).
    pub control_chars_in_comments: bool,
    /// Allow newlines (and therefore comments) inside inline tables (TOML
    /// v1.1).
    pub newlines_in_inline_tables: bool,
    /// Allow a trailing comma after the last key/value pair of an inline
    /// table (TOML v1.1).
    pub trailing_comma_in_inline_tables: bool,
    /// Recognize the `\e` (escape, U+001B) escape sequence in basic strings
    /// (TOML v1.1).
    pub escape_sequence_e: bool,
    /// Recognize `\xHH` two-digit hex escapes in basic strings (TOML v1.1).
    pub escape_sequence_x: bool,
    /// Allow `HH:MM` times with the seconds component omitted (TOML v1.1).
    pub optional_seconds: bool,

    /// Language extension: hexadecimal floating point values like
    /// `0x1.8p+3`. Not part of any released TOML revision.
    pub ext_hex_float: bool,
    /// Language extension: a `_suffix` unit tag after a number, like
    /// `100_000_yen`. The suffix is kept in the value's format descriptor
    /// and restored on serialization. Not part of any released TOML
    /// revision.
    pub ext_num_suffix: bool,

    /// Legacy pre-1.0 rule requiring all elements of an array to share one
    /// type, rejecting e.g. `[1, 1.0]`. Heterogeneous arrays are standard
    /// from v1.0.0 on, so this defaults to off.
    pub homogeneous_arrays: bool,
}

impl TomlSpec {
    /// TOML v1.0.0 with no extensions. This is the default dialect.
    pub fn v1_0() -> Self {
        TomlSpec {
            version: TomlVersion::V1_0_0,
            control_chars_in_comments: false,
            newlines_in_inline_tables: false,
            trailing_comma_in_inline_tables: false,
            escape_sequence_e: false,
            escape_sequence_x: false,
            optional_seconds: false,
            ext_hex_float: false,
            ext_num_suffix: false,
            homogeneous_arrays: false,
        }
    }

    /// TOML v1.1.0 (draft): every v1.1 grammar relaxation enabled, no
    /// library extensions.
    pub fn v1_1() -> Self {
        TomlSpec {
            version: TomlVersion::V1_1_0,
            control_chars_in_comments: true,
            newlines_in_inline_tables: true,
            trailing_comma_in_inline_tables: true,
            escape_sequence_e: true,
            escape_sequence_x: true,
            optional_seconds: true,
            ..TomlSpec::v1_0()
        }
    }
}

impl Default for TomlSpec {
    fn default() -> Self {
        TomlSpec::v1_0()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn version_ordering() {
        assert!(TomlVersion::V1_0_0 < TomlVersion::V1_1_0);
        assert!(TomlVersion::new(0, 5, 0) < TomlVersion::V1_0_0);
        assert_eq!(format!("{}", TomlVersion::V1_1_0), "1.1.0");
    }

    #[test]
    fn default_is_stable() {
        let spec = TomlSpec::default();
        assert_eq!(spec, TomlSpec::v1_0());
        assert_eq!(spec.version, TomlVersion::V1_0_0);
        assert!(!spec.optional_seconds);
        assert!(!spec.ext_hex_float);
    }

    #[test]
    fn v1_1_flags() {
        let spec = TomlSpec::v1_1();
        assert!(spec.optional_seconds);
        assert!(spec.trailing_comma_in_inline_tables);
        assert!(spec.newlines_in_inline_tables);
        assert!(!spec.ext_num_suffix);
    }
}
