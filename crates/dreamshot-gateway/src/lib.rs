// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Same-origin image proxy for Dreamshot.
//!
//! Sample images hosted on third-party storage are fetched through this proxy
//! so the browser sees a same-origin response. Only allow-listed hosts are
//! reachable.

pub mod allowlist;
pub mod handlers;
pub mod server;

pub use allowlist::{HostAllowlist, ProxyRejection, is_private_ip};
pub use server::{ProxyState, router, serve};
