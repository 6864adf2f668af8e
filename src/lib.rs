// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |           sync / allow / status / exec
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '-------------+-------------'
//!                            |
//!                            v
//!                     core::sync engine
//!                            |
//!          +---------+-------+-------+---------+
//!          v         v       v       v         v
//!        path     process  decode  store      wsl
//!      .envrc     direnv    JSON    env     \\wsl$
//!     discovery   spawn    stream  table    remap
//!
//!   +-----------------------------------------+
//!   |  hook   notifier + build-env collaborators |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod hook;
pub mod logging;
