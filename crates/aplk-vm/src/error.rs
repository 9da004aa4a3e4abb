// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The interpreter's typed error taxonomy.
//!
//! Every fallible stage (tokenizer, compiler, VM, primitives) returns
//! `Result<_, KError>` instead of setting a shared error register, per the
//! original design's own suggested direction.

use thiserror::Error;

// Kept tiny on purpose: every stage in this crate returns `Result<_, KError>`
// rather than threading a shared error register through every call.

/// The six error classes the original implementation distinguishes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KErrorKind {
    Parse,
    Type,
    Length,
    Value,
    Rank,
    Nyi,
}

impl KErrorKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Type => "type",
            Self::Length => "length",
            Self::Value => "value",
            Self::Rank => "rank",
            Self::Nyi => "nyi",
        }
    }
}

/// An error raised while tokenizing, compiling or running a line of source.
///
/// `position` is the byte offset into the source line the error pertains
/// to, used to render the `^` underline the original's `kperror` prints;
/// it is `None` for errors with no fixed source location (e.g. a runtime
/// stack-depth violation).
#[derive(Error, Debug)]
#[error("{kind}: {message}", kind = self.kind.name())]
pub struct KError {
    pub kind: KErrorKind,
    pub message: String,
    pub position: Option<usize>,
}

impl KError {
    #[must_use]
    pub fn new(kind: KErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
        }
    }

    #[must_use]
    pub fn at(kind: KErrorKind, message: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            position: Some(position),
        }
    }

    #[must_use]
    pub fn parse(message: impl Into<String>, position: usize) -> Self {
        Self::at(KErrorKind::Parse, message, position)
    }

    #[must_use]
    pub fn ty(message: impl Into<String>) -> Self {
        Self::new(KErrorKind::Type, message)
    }

    #[must_use]
    pub fn length(message: impl Into<String>) -> Self {
        Self::new(KErrorKind::Length, message)
    }

    #[must_use]
    pub fn value(message: impl Into<String>) -> Self {
        Self::new(KErrorKind::Value, message)
    }

    #[must_use]
    pub fn rank(message: impl Into<String>) -> Self {
        Self::new(KErrorKind::Rank, message)
    }

    #[must_use]
    pub fn nyi(message: impl Into<String>) -> Self {
        Self::new(KErrorKind::Nyi, message)
    }

    /// Render source + a `^` underline at `position`, mirroring `kperror`.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        match self.position {
            Some(pos) if self.kind == KErrorKind::Parse => {
                let caret = " ".repeat(pos) + "^";
                format!("{source}\n{caret}\n{self}")
            }
            _ => format!("{self}"),
        }
    }
}
