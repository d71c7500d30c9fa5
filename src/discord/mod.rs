// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Discord gateway adapter built on serenity

pub mod commands;
pub mod handler;
pub mod interaction;

pub use handler::{run, Handler};
pub use interaction::{InteractionKind, SerenitySurface};
