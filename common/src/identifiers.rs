// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! Canonical identity for a module, independent of whether it has been
//! located on disk yet.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use ustr::Ustr;

/// Where a module's definition physically lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A parsable source file on disk.
    File(PathBuf),
    /// A directory with no `__init__` file, treated as a namespace package.
    Namespace(PathBuf),
    /// A platform built-in module with no backing file.
    Builtin,
    /// A frozen module with no backing file.
    Frozen,
}

impl Origin {
    pub fn as_path(&self) -> Option<&PathBuf> {
        match self {
            Origin::File(p) | Origin::Namespace(p) => Some(p),
            Origin::Builtin | Origin::Frozen => None,
        }
    }

    /// A source file whose origin is neither built-in, frozen, nor a
    /// directory, i.e. one that `SyntaxParser` can actually read.
    pub fn is_parsable(&self) -> bool {
        matches!(self, Origin::File(_))
    }

    /// A module whose file stem equals `__init__`, or a namespace
    /// directory: either way it may own submodules on disk.
    pub fn is_package_module(&self) -> bool {
        match self {
            Origin::File(p) => p.file_stem().and_then(|s| s.to_str()) == Some("__init__"),
            Origin::Namespace(_) => true,
            Origin::Builtin | Origin::Frozen => false,
        }
    }
}

/// Advisory metadata obtained once a name has actually been located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub origin: Origin,
    pub canonical_name: Ustr,
}

/// `{name, spec?}`. Equality and hash are by `name` only; `spec` is
/// advisory and may differ between two identifiers that compare equal
/// (e.g. an unresolved stub later replaced by a resolved one).
#[derive(Debug, Clone)]
pub struct ModuleIdentifier {
    pub name: Ustr,
    pub spec: Option<ModuleSpec>,
}

impl ModuleIdentifier {
    pub fn new(name: impl Into<Ustr>) -> Self {
        ModuleIdentifier {
            name: name.into(),
            spec: None,
        }
    }

    pub fn resolved(name: impl Into<Ustr>, spec: ModuleSpec) -> Self {
        ModuleIdentifier {
            name: name.into(),
            spec: Some(spec),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.spec.is_some()
    }

    pub fn is_package_module(&self) -> bool {
        self.spec
            .as_ref()
            .map(|s| s.origin.is_package_module())
            .unwrap_or(false)
    }
}

impl PartialEq for ModuleIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ModuleIdentifier {}

impl Hash for ModuleIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for ModuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Provenance of a package, per the four-way classification in
/// `PackageClassifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PackageType {
    Local,
    StandardLib,
    Site,
    Unknown,
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PackageType::Local => "Local",
            PackageType::StandardLib => "StandardLib",
            PackageType::Site => "Site",
            PackageType::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Fixed package name under which every standard-library module is
/// grouped, matching the original tool's `STDLIB_PACKAGE_NAME` constant.
pub const STDLIB_PACKAGE_NAME: &str = "stdlib";

/// The top-script sentinel name (`__main__` equivalent): parsed as a
/// stub module with no path and no tree, never as a real file lookup.
pub const TOP_SCRIPT_SENTINEL: &str = "__main__";

/// Enumerated known-pathological module, treated like a parse failure
/// without ever attempting to extract its imports.
pub const KNOWN_PATHOLOGICAL_MODULES: &[&str] = &["pydoc_data.topics"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_by_name_only() {
        let a = ModuleIdentifier::new("pkg.mod");
        let b = ModuleIdentifier::resolved(
            "pkg.mod",
            ModuleSpec {
                origin: Origin::Builtin,
                canonical_name: "pkg.mod".into(),
            },
        );
        assert_eq!(a, b);
    }

    #[test]
    fn package_module_detection() {
        let init = Origin::File(PathBuf::from("/proj/pkg/__init__.py"));
        assert!(init.is_package_module());
        let plain = Origin::File(PathBuf::from("/proj/pkg/impl.py"));
        assert!(!plain.is_package_module());
        assert!(Origin::Namespace(PathBuf::from("/proj/ns")).is_package_module());
        assert!(!Origin::Builtin.is_package_module());
    }

    #[test]
    fn non_file_origins_are_not_parsable() {
        assert!(!Origin::Builtin.is_parsable());
        assert!(!Origin::Frozen.is_parsable());
        assert!(!Origin::Namespace(PathBuf::from("/x")).is_parsable());
        assert!(Origin::File(PathBuf::from("/x/a.py")).is_parsable());
    }
}
