//! Askdoc QA Library
//!
//! The question-answering core: context selection under model token
//! budgets, the answer engine dispatching between extractive and
//! generative backends, and the evaluator for automated overlap scores
//! and human ratings.

pub mod engine;
pub mod eval;
pub mod select;
pub mod types;

pub use engine::{QaEngine, TurnPhase, MAX_ANSWER_TOKENS, MIN_SPAN_CONFIDENCE};
pub use eval::{overlap_score, EvaluationRecord, HumanRatings, OverlapReport, RougeScore};
pub use select::select_context;
pub use types::{Answer, SpanProvenance};
