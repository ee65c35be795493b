//! scorm-pack: SCORM 2004 Package Assembly
//!
//! Turns the static build output of a multi-module course into one self-contained
//! SCORM 2004 4th Edition package per module: staged files, a generated
//! `imsmanifest.xml`, and a zip archive ready for upload to a learning platform.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod init;
pub mod logging;
pub mod manifest;
pub mod packager;
pub mod pipeline;
pub mod run;
pub mod staging;
pub mod tree;
