// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! This module organizes message handlers by functional domain,
//! keeping related functionality together for easier maintenance.

pub mod background;
pub mod mode;
pub mod profiles;
pub mod ranges;
pub mod run;
pub mod sampler;
pub mod system;
