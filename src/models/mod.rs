pub mod de;
pub mod diagnostics;
pub mod dlc;
pub mod game;
pub mod responses;

pub use diagnostics::*;
pub use dlc::*;
pub use game::*;
pub use responses::*;
