//! Translator keyboard: an on-screen keyboard core that types into the
//! focused field and can translate its text in place via a hosted language
//! model.
//!
//! * [`keyboard`] — layout, view, key routing.
//! * [`connection`] — the text-connection trait and an in-memory field.
//! * [`translate`] — translate state and the background runner.
//! * [`llm`] — remote translation backend.
//! * [`service`] — the component a host input framework drives.
//! * [`config`] — TOML settings.
//! * [`app`] — egui demo host.

pub mod app;
pub mod config;
pub mod connection;
pub mod keyboard;
pub mod llm;
pub mod service;
pub mod translate;
