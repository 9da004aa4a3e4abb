// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Monadic and dyadic primitive dispatch tables.

mod dyad;
mod monad;

pub use dyad::DYAD_TABLE;
pub use monad::MONAD_TABLE;
