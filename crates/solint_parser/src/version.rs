//! Supported language versions and version-gated features.

use std::fmt;
use std::sync::LazyLock;

use semver::Version;

/// `(minor, first patch, last patch)` of every supported release line.
const RELEASES: &[(u64, u64, u64)] = &[(4, 11, 26), (5, 0, 17), (6, 0, 12), (7, 0, 6), (8, 0, 28)];

static SUPPORTED_VERSIONS: LazyLock<Vec<Version>> = LazyLock::new(|| {
    RELEASES
        .iter()
        .flat_map(|&(minor, first, last)| (first..=last).map(move |patch| Version::new(0, minor, patch)))
        .collect()
});

/// Every released compiler version the grammar understands, ascending.
pub fn supported_versions() -> &'static [Version] {
    &SUPPORTED_VERSIONS
}

/// The newest supported version.
pub fn latest_version() -> &'static Version {
    // RELEASES is a non-empty constant, so the catalogue is never empty.
    &SUPPORTED_VERSIONS[SUPPORTED_VERSIONS.len() - 1]
}

pub fn is_supported(version: &Version) -> bool {
    SUPPORTED_VERSIONS.binary_search(version).is_ok()
}

/// Grammar differences between language versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageFeature {
    /// `emit` statements.
    EmitStatement,
    /// The `constructor` keyword.
    ConstructorKeyword,
    /// `var` declarations with inferred types.
    VarDeclarations,
    /// `byte` as an alias of `bytes1`.
    ByteType,
    /// `abstract`, `virtual` and `override`.
    VirtualAndOverride,
    /// `try` / `catch`.
    TryCatch,
    /// `receive` and `fallback` functions.
    ReceiveAndFallback,
    /// `immutable` state variables.
    Immutable,
    /// Constants declared outside of contracts.
    FileLevelConstants,
    /// `unchecked` blocks.
    UncheckedBlocks,
    /// `error` definitions and `revert` statements.
    CustomErrors,
    /// `type T is V;`
    UserDefinedValueTypes,
}

impl LanguageFeature {
    pub const ALL: &'static [LanguageFeature] = &[
        LanguageFeature::EmitStatement,
        LanguageFeature::ConstructorKeyword,
        LanguageFeature::VarDeclarations,
        LanguageFeature::ByteType,
        LanguageFeature::VirtualAndOverride,
        LanguageFeature::TryCatch,
        LanguageFeature::ReceiveAndFallback,
        LanguageFeature::Immutable,
        LanguageFeature::FileLevelConstants,
        LanguageFeature::UncheckedBlocks,
        LanguageFeature::CustomErrors,
        LanguageFeature::UserDefinedValueTypes,
    ];

    /// First version with the feature.
    pub const fn introduced(&self) -> Version {
        match self {
            LanguageFeature::VarDeclarations | LanguageFeature::ByteType => Version::new(0, 4, 11),
            LanguageFeature::EmitStatement => Version::new(0, 4, 21),
            LanguageFeature::ConstructorKeyword => Version::new(0, 4, 22),
            LanguageFeature::VirtualAndOverride
            | LanguageFeature::TryCatch
            | LanguageFeature::ReceiveAndFallback => Version::new(0, 6, 0),
            LanguageFeature::Immutable => Version::new(0, 6, 5),
            LanguageFeature::FileLevelConstants => Version::new(0, 7, 4),
            LanguageFeature::UncheckedBlocks => Version::new(0, 8, 0),
            LanguageFeature::CustomErrors => Version::new(0, 8, 4),
            LanguageFeature::UserDefinedValueTypes => Version::new(0, 8, 8),
        }
    }

    /// First version without the feature, if it was removed.
    pub const fn removed(&self) -> Option<Version> {
        match self {
            LanguageFeature::VarDeclarations => Some(Version::new(0, 5, 0)),
            LanguageFeature::ByteType => Some(Version::new(0, 8, 0)),
            _ => None,
        }
    }

    pub fn is_enabled(&self, version: &Version) -> bool {
        *version >= self.introduced() && self.removed().is_none_or(|removed| *version < removed)
    }

    /// Human readable name used in syntax errors.
    pub const fn description(&self) -> &'static str {
        match self {
            LanguageFeature::EmitStatement => "`emit` statements",
            LanguageFeature::ConstructorKeyword => "the `constructor` keyword",
            LanguageFeature::VarDeclarations => "`var` declarations",
            LanguageFeature::ByteType => "the `byte` type",
            LanguageFeature::VirtualAndOverride => "`virtual` and `override`",
            LanguageFeature::TryCatch => "`try` statements",
            LanguageFeature::ReceiveAndFallback => "`receive` and `fallback` functions",
            LanguageFeature::Immutable => "`immutable` variables",
            LanguageFeature::FileLevelConstants => "file-level constants",
            LanguageFeature::UncheckedBlocks => "`unchecked` blocks",
            LanguageFeature::CustomErrors => "custom errors",
            LanguageFeature::UserDefinedValueTypes => "user defined value types",
        }
    }

    /// The message reported when the feature is used where it is not
    /// available, or None if `version` has it.
    pub fn unavailable_message(&self, version: &Version) -> Option<String> {
        if self.is_enabled(version) {
            return None;
        }
        match self.removed() {
            Some(removed) if *version >= removed => Some(format!(
                "{} were removed in Solidity {removed}",
                capitalize(self.description())
            )),
            _ => Some(format!(
                "{} require Solidity {} or later",
                capitalize(self.description()),
                self.introduced()
            )),
        }
    }
}

impl fmt::Display for LanguageFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
