//! Drag-and-drop engine for a phase board: cards grouped into ordered
//! phases, moved between phases by dragging.
//!
//! The engine is host-agnostic. A host feeds it pointer events and container
//! measurements and gets back [`engine::Action`]s telling it what to
//! re-render. Board values are replaced, never edited in place, so a change
//! is always visible as `old != new`.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::BoardEngine`] routing pointer and dialog events |
//! | [`board`] | Board, phase and card types with CRUD |
//! | [`coordinator`] | Pure move resolution: which phase owns a dragged card |
//! | [`gesture`] | Per-card drag state machine and release animation |
//! | [`throttle`] | Per-drag rate limit on move processing |
//! | [`layout`] | Shared registry of measured phase containers |
//! | [`hit`] | Point-to-phase resolution against a layout snapshot |
//! | [`geom`] | Points and bounding boxes |
//! | [`forms`] | Add/edit dialog drafts and id allocation |
//! | [`seed`] | Bundled and file-based initial boards |
//! | [`config`] | Environment-driven engine settings |
//! | [`replay`] | Timed event scripts played against an engine |
//! | [`consts`] | Shared timing constants |

pub mod board;
pub mod config;
pub mod consts;
pub mod coordinator;
pub mod engine;
pub mod forms;
pub mod geom;
pub mod gesture;
pub mod hit;
pub mod layout;
pub mod replay;
pub mod seed;
pub mod throttle;
