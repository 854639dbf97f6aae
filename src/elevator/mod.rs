pub mod car;


pub use car::CarController;
pub use car::CarState;
