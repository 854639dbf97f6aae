pub mod coordinator;


pub use coordinator::DispatchCoordinator;
