// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod controller;
pub mod filter;
pub mod group;
pub mod record;
pub mod settings;
pub mod sort;
pub mod viewport;

pub use controller::*;
pub use filter::*;
pub use group::*;
pub use record::*;
pub use settings::*;
pub use sort::*;
pub use viewport::*;
