// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   sync, allow, status, exec
//! ```

pub mod exec;
pub mod status;
pub mod sync;
