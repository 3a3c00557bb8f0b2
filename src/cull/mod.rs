pub mod catalog;
pub mod cursor;
pub mod filter;
pub mod gate;
pub mod session;
pub mod state;
pub mod window;

pub use catalog::{Catalog, Photo, PhotoLocation};
pub use cursor::Direction;
pub use session::CullSession;
pub use state::{CullState, DecisionChange, StateCounts};
pub use window::{GroupSlice, WindowBounds};
