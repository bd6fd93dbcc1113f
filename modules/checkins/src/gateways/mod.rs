pub mod local;

pub use local::CheckInsLocalClient;
