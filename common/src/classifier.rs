// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! `PackageClassifier`: maps a resolved module's physical path to its
//! owning package and type. Grounded near-verbatim in the original tool's
//! `PackageFinder.find_package` decision tree, adapted to query
//! `ruff_python_stdlib` instead of a live interpreter's `sys.prefix`, and
//! a virtualenv/site-packages heuristic instead of `sysconfig.get_path`.

use std::path::{Path, PathBuf};

use ruff_python_stdlib::sys::is_known_standard_library;
use ustr::Ustr;

use crate::identifiers::{PackageType, STDLIB_PACKAGE_NAME};
use crate::project::Project;
use crate::site::is_under_site_packages;

const PYTHON_MINOR_VERSION: u8 = 12;

pub struct Classification {
    pub package_name: Ustr,
    pub package_path: Option<PathBuf>,
    pub package_kind: PackageType,
}

/// Decision tree from SPEC_FULL.md §4.5. `module_name`/`module_path` are
/// the already-resolved module's dotted name and file path (`None` for
/// built-in/frozen modules).
pub fn classify(project: &Project, module_name: &str, module_path: Option<&Path>) -> Classification {
    let path = match module_path {
        None => return stdlib_classification(),
        Some(p) => p,
    };

    if is_known_standard_library(PYTHON_MINOR_VERSION, module_name) && !is_under_site_packages(path)
    {
        return stdlib_classification();
    }

    let parts: Vec<&str> = module_name.split('.').collect();

    if is_under_site_packages(path) {
        let package_name = Ustr::from(parts[0]);
        return reuse_or_new(project, package_name, None, PackageType::Site);
    }

    if parts.len() > 1 {
        let package_name = Ustr::from(parts[0]);
        return reuse_or_new(project, package_name, None, PackageType::Local);
    }

    let dir_name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or(module_name);
    let package_name = Ustr::from(dir_name);
    reuse_or_new(
        project,
        package_name,
        path.parent().map(|p| p.to_path_buf()),
        PackageType::Local,
    )
}

fn stdlib_classification() -> Classification {
    Classification {
        package_name: Ustr::from(STDLIB_PACKAGE_NAME),
        package_path: None,
        package_kind: PackageType::StandardLib,
    }
}

/// A package's type is decided by its first classified member and never
/// changes thereafter; later members of the same package name just reuse
/// the existing record.
fn reuse_or_new(
    project: &Project,
    name: Ustr,
    path: Option<PathBuf>,
    kind: PackageType,
) -> Classification {
    if let Some(existing) = project.get_package(&name) {
        Classification {
            package_name: existing.name,
            package_path: existing.path.clone(),
            package_kind: existing.kind,
        }
    } else {
        Classification {
            package_name: name,
            package_path: path,
            package_kind: kind,
        }
    }
}
