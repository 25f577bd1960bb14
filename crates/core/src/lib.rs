//! Core monetary logic for Monetra.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Currency configuration, decimal arithmetic policy, validation, fees and
//! conversion all live here.
//!
//! # Modules
//!
//! - `currency` - Currency registry, amount formatting/parsing/validation,
//!   fees, exchange rates and the `Money` value type

pub mod currency;
