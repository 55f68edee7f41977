//! Hotel operations back office.
//!
//! This crate provides the REST API and background workers for running a
//! hotel: accounts, staff, room inventory, bookings, housekeeping, payroll,
//! guest profiles, the room-service menu and orders.
//!
//! The two pieces of real business logic are the booking availability
//! transaction ([`services::BookingManager`]) and monthly payroll
//! aggregation ([`services::PayrollService`] over [`calculation`]).

#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod calculation;
pub mod config;
pub mod db;
pub mod error;
pub mod jobs;
pub mod models;
pub mod notify;
pub mod services;
