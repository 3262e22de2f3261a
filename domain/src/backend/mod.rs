//! Backend configuration domain

pub mod config;
