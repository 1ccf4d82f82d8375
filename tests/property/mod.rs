// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `collection` - connection filtering and reference de-duplication
//! - `normalization` - subnet masks, interface filtering, GiB formatting
//! - `rules` - mapping tables and custom field expressions

mod collection;
mod normalization;
mod rules;
