//! PostaJá autopilot — deterministic post planning.
//!
//! Given an `AutopilotConfig`, a catalog snapshot and the posting
//! history, the engine decides which product to feature in which post
//! slot. It does NOT generate captions or publish anything; the `Plan`
//! it returns is handed to the publisher.
//!
//! # Components
//!
//! - **`slots`** — Weekly cadence → ordered time slots over a horizon
//! - **`allocator`** — Objective mix → per-objective slot targets
//! - **`rotation`** — Product ranking per rotation strategy
//! - **`scheduler`** — Slot-by-slot assignment with repetition and promo caps
//! - **`plan`** — Plan output and diagnostics
//!
//! Every run is a pure function of its inputs: no I/O, no clock, no
//! randomness.

pub mod allocator;
pub mod error;
pub mod plan;
pub mod rotation;
pub mod scheduler;
pub mod slots;

pub use allocator::{Allocation, allocate};
pub use error::{PlanError, PlanResult};
pub use plan::{Diagnostic, Plan, ScheduledSlotAssignment};
pub use rotation::RotationPolicy;
pub use scheduler::{Scheduler, plan};
pub use slots::{DEFAULT_HORIZON_DAYS, Slot, generate_slots};
