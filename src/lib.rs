// SPDX-License-Identifier: MPL-2.0
//! `formcheck` classifies camera frames into exercise poses with an ONNX image
//! classifier and counts repetitions from the stream of classifications.
//!
//! The [`PoseClassifier`](application::port::PoseClassifier) trait is the
//! boundary to the model: construct an adapter once, then classify frames and
//! query the model's input size. Everything downstream (detection, rep
//! counting, history) depends only on that trait.

#![doc(html_root_url = "https://docs.rs/formcheck/0.1.0")]

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod media;
