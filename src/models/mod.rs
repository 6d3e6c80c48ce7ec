pub mod itinerary;
pub mod place;
pub mod request;
pub mod schedule;

pub use itinerary::*;
pub use place::*;
pub use request::*;
pub use schedule::*;
