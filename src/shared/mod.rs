pub mod error;
pub mod macros;
pub mod structs;

pub use error::DispatchError;
pub use structs::CarEvent;
pub use structs::CarId;
pub use structs::CarStatus;
pub use structs::Direction;
pub use structs::Floor;
pub use structs::Mode;
pub use structs::Person;
pub use structs::Request;
