pub mod media;
pub mod movie;
pub mod partial_date;
pub mod status;

pub use media::{MediaType, DEFAULT_COUNTRIES};
pub use movie::{Movie, MoviePatch, NewMovie};
pub use partial_date::{PartialDate, DATE_FORMATS};
pub use status::Status;
