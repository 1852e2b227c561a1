// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! Import descriptors: the normalized, transient output of `ImportExtractor`
//! and the input to `ImportResolver`. A tagged sum with two arms, no
//! subclassing, per the data model's explicit rejection of dynamic dispatch
//! here.

use ustr::Ustr;

/// `import A` / `import A.B` / `import A as X` (alias discarded).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlainImport {
    pub package_name: Ustr,
}

/// The target list of a `from … import …` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTargets {
    Star,
    Named(Vec<Ustr>),
}

/// `from [.…][pkg] import t1, t2 | *`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromImport {
    /// `None` for `from . import x` (a bare relative import with no
    /// named package segment).
    pub package_name: Option<Ustr>,
    pub targets: ImportTargets,
    /// Count of leading dots; zero means absolute.
    pub relative_level: u32,
}

impl FromImport {
    pub fn is_relative(&self) -> bool {
        self.relative_level > 0
    }
}

/// The deduplicated output of a single file's extraction pass.
#[derive(Debug, Clone, Default)]
pub struct ExtractedImports {
    pub plain: Vec<PlainImport>,
    pub from: Vec<FromImport>,
}
