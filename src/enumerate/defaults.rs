// SPDX-License-Identifier: Apache-2.0

//! Default mining policy constants.

/// Occurrence size (operation nodes) of the default single exhaustive pass.
pub const DEFAULT_SIZE: usize = 4;

/// Bound on inputs plus outputs of an accepted occurrence.
pub const DEFAULT_MAX_PORTS: usize = 8;
