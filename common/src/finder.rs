// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! `ModuleFinder`: locates a module name on disk and normalizes it to a
//! canonical identifier, purely by filesystem probing plus the bundled
//! standard-library module list — never by executing any user code.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use ruff_python_stdlib::sys::is_known_standard_library;
use ustr::Ustr;

use crate::identifiers::{ModuleIdentifier, ModuleSpec, Origin};

/// Standard-library module listing is versioned by minor version in
/// `ruff_python_stdlib`; without a live interpreter to query there is no
/// single "true" answer, so a recent, broadly compatible version is used.
const PYTHON_MINOR_VERSION: u8 = 12;

const SOURCE_EXTENSIONS: [&str; 2] = ["py", "pyi"];
const INIT_STEM: &str = "__init__";

pub struct ModuleFinder {
    /// Ordered top-level search roots; first match wins, which is what
    /// lets a local module shadow a standard-library one of the same name.
    roots: Vec<PathBuf>,
    memo: RefCell<HashMap<Ustr, ModuleIdentifier>>,
}

impl ModuleFinder {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        ModuleFinder {
            roots,
            memo: RefCell::new(HashMap::new()),
        }
    }

    pub fn push_root(&mut self, root: PathBuf) {
        self.roots.push(root);
    }

    /// Always returns an identifier; an unresolved stub (no `spec`) when
    /// nothing was found.
    pub fn find_top_level(&self, name: &str) -> ModuleIdentifier {
        self.try_find_top_level(name)
            .unwrap_or_else(|| ModuleIdentifier::new(name))
    }

    pub fn try_find_top_level(&self, name: &str) -> Option<ModuleIdentifier> {
        if let Some(id) = self.resolve_on_filesystem(name) {
            return Some(id);
        }
        self.resolve_as_stdlib(name)
    }

    /// Resolves a relative import from `parent`'s position in the package
    /// tree. Relative imports only ever walk the project's own filesystem
    /// roots — there is no such thing as a relative import into the
    /// standard library — so this never falls back to the stdlib listing.
    pub fn find_relative(
        &self,
        name: Option<&str>,
        relative_level: u32,
        parent: &ModuleIdentifier,
    ) -> Option<ModuleIdentifier> {
        let parts: Vec<&str> = parent.name.split('.').collect();
        let mut needed = parts.len() as i64 - relative_level as i64;
        if parent.is_package_module() {
            needed += 1;
        }
        if needed <= 0 {
            warn!(
                "relative import (level={}) from {} climbs above the package root",
                relative_level, parent.name
            );
            return None;
        }
        let needed = (needed as usize).min(parts.len());
        let mut joined = parts[0..needed].join(".");
        if let Some(n) = name {
            if !joined.is_empty() {
                joined.push('.');
            }
            joined.push_str(n);
        }
        if joined.is_empty() {
            return None;
        }
        self.resolve_on_filesystem(&joined)
    }

    fn resolve_as_stdlib(&self, name: &str) -> Option<ModuleIdentifier> {
        let direct = is_known_standard_library(PYTHON_MINOR_VERSION, name);
        let top_level = name
            .split('.')
            .next()
            .map(|seg| is_known_standard_library(PYTHON_MINOR_VERSION, seg))
            .unwrap_or(false);
        if direct || top_level {
            Some(ModuleIdentifier::resolved(
                name,
                ModuleSpec {
                    origin: Origin::Builtin,
                    canonical_name: Ustr::from(name),
                },
            ))
        } else {
            None
        }
    }

    /// Explicit iteration over the dotted-name segments (not true
    /// recursion), resolving each successive segment inside the directory
    /// owned by the previous one.
    fn resolve_on_filesystem(&self, name: &str) -> Option<ModuleIdentifier> {
        let key = Ustr::from(name);
        if let Some(cached) = self.memo.borrow().get(&key) {
            return Some(cached.clone());
        }

        let segments: Vec<&str> = name.split('.').collect();
        let mut prefix = String::new();
        let mut current_origin: Option<Origin> = None;
        let mut last_id: Option<ModuleIdentifier> = None;

        for (i, seg) in segments.iter().enumerate() {
            if i > 0 {
                prefix.push('.');
            }
            prefix.push_str(seg);
            let prefix_key = Ustr::from(prefix.as_str());

            if let Some(cached) = self.memo.borrow().get(&prefix_key) {
                current_origin = cached.spec.as_ref().map(|s| s.origin.clone());
                last_id = Some(cached.clone());
                continue;
            }

            let search_dirs: Vec<PathBuf> = if i == 0 {
                self.roots.clone()
            } else {
                match current_origin.as_ref().and_then(package_dir) {
                    Some(dir) => vec![dir],
                    None => return None,
                }
            };

            let origin = search_dirs.iter().find_map(|dir| probe_segment(dir, seg))?;
            let id = ModuleIdentifier::resolved(
                prefix.as_str(),
                ModuleSpec {
                    origin: origin.clone(),
                    canonical_name: prefix_key,
                },
            );
            self.memo.borrow_mut().insert(prefix_key, id.clone());
            current_origin = Some(origin);
            last_id = Some(id);
        }

        last_id
    }
}

/// The directory a package module may search for its own submodules:
/// the `__init__` file's parent directory, or the namespace directory
/// itself. `None` for anything that cannot own submodule files.
fn package_dir(origin: &Origin) -> Option<PathBuf> {
    match origin {
        Origin::File(p) if p.file_stem().and_then(|s| s.to_str()) == Some(INIT_STEM) => {
            p.parent().map(|p| p.to_path_buf())
        }
        Origin::Namespace(dir) => Some(dir.clone()),
        _ => None,
    }
}

/// Looks for `seg` inside `dir`: a package directory (with or without an
/// `__init__` file, the latter being a namespace package per the Open
/// Question resolution in `SPEC_FULL.md` §9), or a plain source file.
fn probe_segment(dir: &Path, seg: &str) -> Option<Origin> {
    let subdir = dir.join(seg);
    if exists_case_sensitive(&subdir) && subdir.is_dir() {
        for ext in SOURCE_EXTENSIONS {
            let init = subdir.join(format!("{INIT_STEM}.{ext}"));
            if exists_case_sensitive(&init) {
                return Some(Origin::File(init));
            }
        }
        if has_any_source_file(&subdir) {
            return Some(Origin::Namespace(subdir));
        }
    }
    for ext in SOURCE_EXTENSIONS {
        let file = dir.join(format!("{seg}.{ext}"));
        if exists_case_sensitive(&file) {
            return Some(Origin::File(file));
        }
    }
    None
}

fn has_any_source_file(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|entries| {
            entries.flatten().any(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false)
}

/// PEP 235-safe existence check: a case-insensitive filesystem (macOS,
/// Windows) would report `path.exists()` as true for a name that only
/// matches up to case, which would silently resolve the wrong module.
/// Listing the parent directory and comparing exact names avoids that.
fn exists_case_sensitive(path: &Path) -> bool {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return false;
    };
    fs::read_dir(parent)
        .map(|entries| entries.flatten().any(|e| e.file_name() == name))
        .unwrap_or(false)
}
