//! Core building blocks with no process or filesystem side effects: product
//! identity, parameters, recipe selection, swath-mask composition and the
//! dB scaling / band compositing used for visualization. Consumed by the
//! high-level `api` module.
pub mod identity;
pub mod params;
pub mod processing;
pub mod recipe;
