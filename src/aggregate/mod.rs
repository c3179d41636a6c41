pub mod batch;
pub mod life;
pub mod recovery;
pub mod zone;

pub use batch::{roll_encounter, simulate_many, simulate_many_par, BatchSummary};
pub use life::{simulate_repeated, LifeEnd, LifeSummary};
pub use recovery::{recover_between_fights, Recovery};
pub use zone::{simulate_zone, ZoneEnd, ZoneSummary};
