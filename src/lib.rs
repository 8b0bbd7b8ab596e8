//! Earned wage access engine
//!
//! This crate loads per-country statutory rate tables from spreadsheet
//! exports and calculates payroll deductions, net pay, and how much of an
//! employee's accrued wages can be advanced before payday.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
