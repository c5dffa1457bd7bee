//! Core modules for command-reference navigation synthesis.
//!
//! The pipeline runs bottom-up: descriptors ([`model`]) are folded into a
//! [`tree`], grouped by resource ([`actions`]) or RPC service ([`rpc`]),
//! categorized ([`category`], [`protocol`]), and finally shaped into
//! navigation ([`nav`]) and page models ([`pages`]).

pub mod actions;
pub mod category;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod nav;
pub mod pages;
pub mod protocol;
pub mod rpc;
pub mod tree;
