// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core synchronization machinery.
//!
//! ```text
//! sync (engine)
//!   |-- path    .envrc discovery, bounded ancestor walk
//!   |-- process direnv invocation, WSL re-targeting
//!   |-- decode  export json event stream
//!   |-- store   process-wide environment table
//!   '-- wsl     distribution detection & path translation
//! ```

pub mod decode;
pub mod path;
pub mod process;
pub mod store;
pub mod sync;
pub mod wsl;
