//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! User store

pub mod manager;
pub mod model;
pub mod stats;

pub use manager::UserManager;
pub use model::User;
pub use stats::UserStats;
