//! TRIZ Solver - contradiction matrix compiler and AI-assisted problem solver
//!
//! Two programs share this library:
//!
//! - `triz-compile` flattens a contradiction matrix spreadsheet into JSON.
//! - `triz-solver` takes a free-text engineering problem, has a hosted model
//!   pick the parameter to improve, looks up the inventive principles for it
//!   and has the model illustrate each one.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use triz_solver::{compiler, SolverConfig};
//!
//! // Offline, once
//! let matrix = compiler::compile_file(&source, &Default::default())?;
//! matrix.save(Path::new("data/triz_matrix.json"))?;
//!
//! // Per process
//! let session = SolverConfig::default().build_session()?;
//! let report = session.solve("Stronger panels make the car too heavy").await;
//! println!("{}", triz_solver::render::render_text(&report));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  triz_matrix.json  ┌──────────────────────────────────┐
//! │ triz-compile │ ─────────────────▶ │ SolverSession                    │
//! │ xlsx/csv     │                    │  classify  → Classifier          │
//! └──────────────┘                    │  select    → selector (max 6)    │
//!                                     │  explain   → Generator           │
//!                                     │  recommend → Generator           │
//!                                     └───────────────┬──────────────────┘
//!                                                     │ CompletionBackend
//!                                                     ▼
//!                                              Groq chat completions
//! ```

pub mod catalog;
pub mod classifier;
pub mod compiler;
pub mod config;
pub mod generator;
pub mod llm;
pub mod matrix;
pub mod render;
pub mod selector;
pub mod server;
pub mod session;
pub mod types;

// Core types
pub use types::*;
pub use catalog::PrincipleCatalog;
pub use matrix::ContradictionMatrix;

// Compile step
pub use compiler::{compile, compile_file, parse_principles, CompileError, SourceOptions, SourceTable};

// Solve step
pub use config::SolverConfig;
pub use llm::{CompletionBackend, CompletionRequest, GroqClient, LlmConfig, LlmError};
pub use session::{SessionOptions, SolverSession};
