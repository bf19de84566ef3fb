pub mod category;
pub mod enriched;
pub mod geolocation;
pub mod transaction;

pub use category::*;
pub use enriched::*;
pub use geolocation::*;
pub use transaction::*;
