//! Statistic system.
//!
//! ```text
//! [ BaseStats + level ]   stored, externally owned
//!          ↓
//! [ baselines ]           pure formulas over effective primaries
//!          ↓
//! [ BonusStack ]          equipment, then active effects in type order
//!          ↓
//! [ BattleStats ]         clamped, written only by the calculator
//! ```
//!
//! ## Bonus Stack
//!
//! Every statistic uses the same calculation order:
//! `Flat → %Inc → More → Less → Override → Clamp`

pub mod battle;
pub mod bonus;
pub mod calculator;
pub mod category;
pub mod core;

pub use battle::BattleStats;
pub use bonus::{Bonus, BonusOp, BonusStack, StatBounds};
pub use calculator::{AttributeCalculator, StatChanges, StatInputs};
pub use category::{StatCategory, StatId};
pub use core::{BaseStats, StatBonuses};
