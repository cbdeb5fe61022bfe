//! Flutter-facing bridge over `journeyboard_core`.

pub mod api;
