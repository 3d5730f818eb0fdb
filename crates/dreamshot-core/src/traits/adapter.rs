// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all remote adapters implement.

/// Identity shared by every Dreamshot remote adapter.
///
/// The binary reports the name and version of each backend it wires in, and
/// `Debug` output names the adapter behind a trait object.
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;
}
