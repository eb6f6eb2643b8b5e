//! Tarot Guide - A conversational tarot reading service
//!
//! A reading walks a visitor from a greeting through topic and spread
//! choice to a card draw, an interpretation and closing advice. Each step
//! is narrated by an AI provider, with a fixed fallback when it fails.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
